use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::os::unix::io::AsRawFd;

use log::{debug, warn};

use crate::net::{resolve, Family, Socket, SocketType};
use crate::sys;
use crate::{Error, Result};

/// Listen backlog for TCP servers. The serving loop drains accepted
/// connections quickly, so a short queue is enough.
const BACKLOG: libc::c_int = 5;

/// Builds a bound, non-blocking UDP server socket.
///
/// With no `bind_addr` the socket binds the family's wildcard address on
/// `port`. A `bind_addr` is resolved family-unspecified and its family
/// overrides `family`: asking for [`Family::V6`] while binding
/// `"127.0.0.1"` yields an IPv4 socket, since an explicit address is
/// authoritative over a family hint.
pub fn udp_server(family: Family, port: u16, bind_addr: Option<&str>) -> Result<Socket> {
    net_server(family, SocketType::Datagram, port, bind_addr)
}

/// Builds a bound, non-blocking TCP server socket, already listening.
pub fn tcp_server(family: Family, port: u16, bind_addr: Option<&str>) -> Result<Socket> {
    let socket = net_server(family, SocketType::Stream, port, bind_addr)?;
    sys::listen(socket.as_raw_fd(), BACKLOG).map_err(Error::Listen)?;
    Ok(socket)
}

pub(super) fn net_server(
    family: Family,
    kind: SocketType,
    port: u16,
    bind_addr: Option<&str>,
) -> Result<Socket> {
    // An explicit bind address wins over the requested family.
    let local = match bind_addr {
        Some(host) => Some(resolve(host, port)?),
        None => None,
    };
    let family = match local {
        Some(ref addr) => Family::of(addr),
        // No hint at all: serve the IPv4 wildcard. An IPv6 default would
        // come up V6-only and be unreachable from plain IPv4 senders.
        None if family == Family::Unspec => Family::V4,
        None => family,
    };

    let fd = sys::new_socket(family.domain(), kind.raw()).map_err(Error::SocketCreate)?;
    // The handle owns the descriptor now; every early return below drops
    // it, closing the socket.
    let socket = Socket::from_parts(fd, family, kind);

    // The serving loop polls rather than blocks per connection.
    sys::set_nonblocking(socket.as_raw_fd()).map_err(Error::SocketOption)?;
    // Let a restarted daemon rebind immediately.
    sys::set_reuseaddr(socket.as_raw_fd()).map_err(Error::SocketOption)?;

    let local = local.unwrap_or_else(|| wildcard(family, port));

    if local.is_ipv6() {
        // Don't accept IPv4 connections on an IPv6 listening socket. Not
        // every platform supports the option; warn and carry on rather
        // than refusing to start.
        if let Err(err) = sys::set_v6only(socket.as_raw_fd()) {
            warn!("your operating system does not support IPV6_V6ONLY: {}", err);
            warn!(
                "this means you are also listening to IPv4 traffic on port {}",
                port
            );
            warn!("this IPv6=>IPv4 mapping may be a security risk");
        }
    }

    sys::bind(socket.as_raw_fd(), &local).map_err(Error::Bind)?;

    debug!("bound {:?} server to {}", kind, local);
    Ok(socket)
}

fn wildcard(family: Family, port: u16) -> SocketAddr {
    match family {
        Family::Unspec | Family::V4 => SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)),
        Family::V6 => SocketAddr::from((Ipv6Addr::UNSPECIFIED, port)),
    }
}
