//! Multicast group membership and scope.
//!
//! A membership is fire-and-forget kernel state: it is attached to a
//! socket with one join call and lives until the socket is closed. The
//! group address's family decides the shape of the request — IPv4
//! memberships name an interface by its assigned address, IPv6
//! memberships by its index — and must match the socket's family.

use std::net::{IpAddr, Ipv4Addr};
use std::os::unix::io::AsRawFd;

use log::{debug, warn};

use crate::net::{resolve, udp_client, udp_server, Family, Iface, Socket};
use crate::sys;
use crate::{Error, Result};

/// Builds a connected UDP client for a multicast group and applies the
/// scope `ttl` (router-hop budget) to it.
///
/// A scope-setting failure is logged and ignored: sending with the
/// kernel's default scope still works, so it never fails client creation.
pub fn multicast_client(group: &str, port: u16, ttl: u32) -> Result<Socket> {
    let socket = udp_client(group, port)?;
    if let Err(err) = set_multicast_ttl(&socket, ttl) {
        warn!(
            "could not set multicast scope {} for {}:{}: {}",
            ttl, group, port, err
        );
    }
    Ok(socket)
}

/// Builds a UDP server for a multicast group and joins the group on the
/// selected interface.
///
/// Binding `bind_addr` to the group address itself filters out datagrams
/// sent to the same port on other channels; with no `bind_addr` any
/// datagram delivered to the port is processed.
///
/// [`Iface::All`] is a declared extension point: the intent is to join on
/// every local interface (important for multihomed machines), but that
/// enumeration is not wired up yet, so the server is returned without any
/// membership. A failed join on any other selector fails the whole call
/// and closes the socket.
pub fn multicast_server(
    family: Family,
    group: &str,
    port: u16,
    bind_addr: Option<&str>,
    iface: Iface<'_>,
) -> Result<Socket> {
    let socket = udp_server(family, port, bind_addr)?;

    match iface {
        Iface::All => {
            // TODO: enumerate the local interfaces and join the group on
            // each of them.
            debug!(
                "interface 'ALL' requested for {}:{}; joining every interface \
                 is not implemented, no membership added",
                group, port
            );
        }
        iface => join_multicast(&socket, group, port, iface)?,
    }

    Ok(socket)
}

/// Joins `socket` to the multicast group `group`, optionally pinned to
/// one named interface.
///
/// The group string is resolved family-unspecified; the resolved family
/// picks the request shape. With [`Iface::Any`] (or [`Iface::All`], which
/// callers should have handled already) the kernel chooses the interface.
/// A failed resolution mutates nothing on the socket.
pub fn join_multicast<S: AsRawFd>(
    socket: &S,
    group: &str,
    port: u16,
    iface: Iface<'_>,
) -> Result<()> {
    let addr = resolve(group, port)?;
    let fd = socket.as_raw_fd();

    match addr.ip() {
        IpAddr::V4(group) => {
            let interface = match iface {
                Iface::Named(name) => {
                    sys::ipv4_interface_addr(fd, name).map_err(Error::InterfaceLookup)?
                }
                // Wildcard address: let the kernel decide.
                Iface::Any | Iface::All => Ipv4Addr::UNSPECIFIED,
            };
            sys::join_v4(fd, &group, &interface).map_err(Error::Join)?;
            debug!("joined {} on interface {}", group, interface);
        }
        IpAddr::V6(group) => {
            let interface = match iface {
                Iface::Named(name) => {
                    sys::interface_index(name).map_err(Error::InterfaceLookup)?
                }
                Iface::Any | Iface::All => 0,
            };
            sys::join_v6(fd, &group, interface).map_err(Error::Join)?;
            debug!("joined {} on interface index {}", group, interface);
        }
    }

    Ok(())
}

/// Sets the multicast scope (router-hop budget) on a socket.
///
/// The socket's family is read back from its local address: IPv4 sockets
/// take `IP_MULTICAST_TTL`, IPv6 sockets `IPV6_MULTICAST_HOPS`. Any other
/// family — a Unix-domain socket, say — fails with
/// [`Error::UnsupportedFamily`] and leaves the socket untouched.
///
/// The IPv4 option holds a single byte; a larger `ttl` saturates at 255
/// instead of wrapping, which would silently shrink the scope.
pub fn set_multicast_ttl<S: AsRawFd>(socket: &S, ttl: u32) -> Result<()> {
    let fd = socket.as_raw_fd();
    let family = sys::local_family(fd).map_err(|_| Error::AddressUnavailable)?;

    match family {
        libc::AF_INET => {
            let ttl = u8::try_from(ttl).unwrap_or(u8::MAX);
            sys::set_ttl_v4(fd, ttl).map_err(Error::SocketOption)
        }
        libc::AF_INET6 => {
            sys::set_hops_v6(fd, ttl as libc::c_int).map_err(Error::SocketOption)
        }
        _ => Err(Error::UnsupportedFamily),
    }
}
