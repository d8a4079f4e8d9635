//! Socket factories for a metrics transport daemon.
//!
//! This crate builds ready-to-use transport endpoints: connected UDP
//! clients, bound non-blocking UDP and TCP servers, and multicast
//! senders/receivers with group membership pinned to a chosen network
//! interface. It dispatches correctly across IPv4 and IPv6, whose socket
//! options and structure layouts differ, and guarantees that no factory
//! ever leaks a half-configured descriptor: on any failure after socket
//! creation the descriptor is closed before the error is returned.
//!
//! What this crate deliberately does *not* do: application-level framing,
//! retransmission, the metrics wire protocol, or any poll/event loop.
//! Callers receive a [`net::Socket`] and drive it themselves.
//!
//! # Examples
//!
//! ```no_run
//! use metricd_net::net::{self, Family, Iface};
//!
//! # fn main() -> metricd_net::Result<()> {
//! // A UDP server on an OS-assigned port, then a client talking to it.
//! let server = net::udp_server(Family::Unspec, 0, None)?;
//! let port = server.local_addr().map_err(|_| metricd_net::Error::AddressUnavailable)?.port();
//! let client = net::udp_client("127.0.0.1", port)?;
//!
//! // A multicast receiver joined on a specific interface.
//! let rx = net::multicast_server(
//!     Family::V4,
//!     "239.2.11.71",
//!     8649,
//!     None,
//!     Iface::from_name(Some("eth0")),
//! )?;
//! # drop((server, client, rx));
//! # Ok(())
//! # }
//! ```
#![deny(missing_docs, missing_debug_implementations, rust_2018_idioms)]
#![cfg(unix)]

mod addr;
mod error;
pub mod net;
mod sys;

pub use addr::format_ip;
pub use error::{Error, Result};
