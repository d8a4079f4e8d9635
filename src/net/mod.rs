//! Transport endpoint factories.
//!
//! Five constructors cover what a metrics daemon needs: [`udp_client`],
//! [`udp_server`], [`tcp_server`], [`multicast_client`] and
//! [`multicast_server`]. Each returns a fully-configured [`Socket`] or a
//! typed error; on any failure after socket creation the descriptor is
//! closed before the error surfaces, so an `Err` never leaks a socket.

use std::io;
use std::net::{SocketAddr, ToSocketAddrs};

use crate::{Error, Result};

mod client;
mod mcast;
mod server;
mod socket;

pub use self::client::udp_client;
pub use self::mcast::{join_multicast, multicast_client, multicast_server, set_multicast_ttl};
pub use self::server::{tcp_server, udp_server};
pub use self::socket::{Socket, SocketType};

/// Address family of a socket or resolved address.
///
/// `Unspec` defers the choice: factories taking a host string let the
/// resolved address decide, and a server built with `Unspec` and no bind
/// address listens on the IPv4 wildcard.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Family {
    /// No family preference.
    Unspec,
    /// IPv4.
    V4,
    /// IPv6.
    V6,
}

impl Family {
    /// The family of an already-resolved address.
    pub fn of(addr: &SocketAddr) -> Family {
        match addr {
            SocketAddr::V4(..) => Family::V4,
            SocketAddr::V6(..) => Family::V6,
        }
    }

    pub(crate) fn domain(self) -> libc::c_int {
        match self {
            // A wildcard server with no family hint serves IPv4; an IPv6
            // listener would be V6-only and unreachable from v4 senders.
            Family::Unspec | Family::V4 => libc::AF_INET,
            Family::V6 => libc::AF_INET6,
        }
    }
}

/// Which network interface a multicast membership is pinned to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Iface<'a> {
    /// Let the kernel pick an interface.
    Any,
    /// A specific named interface, e.g. `"eth0"`.
    Named(&'a str),
    /// Join on every local interface. Declared extension point; see
    /// [`multicast_server`].
    All,
}

impl<'a> Iface<'a> {
    /// Maps an optional configured interface name, treating the
    /// case-insensitive sentinel `"ALL"` as [`Iface::All`].
    pub fn from_name(name: Option<&'a str>) -> Iface<'a> {
        match name {
            None => Iface::Any,
            Some(name) if name.eq_ignore_ascii_case("ALL") => Iface::All,
            Some(name) => Iface::Named(name),
        }
    }
}

/// Resolves `host:port` with no family preference and takes the first
/// result, so the name (or literal) decides between IPv4 and IPv6.
pub(crate) fn resolve(host: &str, port: u16) -> Result<SocketAddr> {
    let mut addrs = (host, port).to_socket_addrs().map_err(Error::Resolution)?;
    addrs.next().ok_or_else(|| {
        Error::Resolution(io::Error::new(
            io::ErrorKind::NotFound,
            "name resolved to no addresses",
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::{Family, Iface};

    #[test]
    fn iface_sentinel_is_case_insensitive() {
        assert_eq!(Iface::from_name(None), Iface::Any);
        assert_eq!(Iface::from_name(Some("ALL")), Iface::All);
        assert_eq!(Iface::from_name(Some("all")), Iface::All);
        assert_eq!(Iface::from_name(Some("eth0")), Iface::Named("eth0"));
    }

    #[test]
    fn family_of_resolved_address() {
        assert_eq!(Family::of(&"127.0.0.1:0".parse().unwrap()), Family::V4);
        assert_eq!(Family::of(&"[::1]:0".parse().unwrap()), Family::V6);
    }
}
