use std::os::unix::io::AsRawFd;

use log::debug;

use crate::net::{resolve, Family, Socket, SocketType};
use crate::sys;
use crate::{Error, Result};

/// Builds a connected UDP client for `host:port`.
///
/// Resolution picks the family, so a literal or name that yields IPv6
/// produces an IPv6 socket. Connecting a datagram socket fixes its
/// default destination without any handshake.
pub fn udp_client(host: &str, port: u16) -> Result<Socket> {
    net_client(SocketType::Datagram, host, port)
}

pub(super) fn net_client(kind: SocketType, host: &str, port: u16) -> Result<Socket> {
    let remote = resolve(host, port)?;
    let family = Family::of(&remote);

    let fd = sys::new_socket(family.domain(), kind.raw()).map_err(Error::SocketCreate)?;
    // From here on the handle owns the descriptor; any early return
    // below drops it, closing the socket.
    let socket = Socket::from_parts(fd, family, kind);

    sys::connect(socket.as_raw_fd(), &remote).map_err(Error::Connect)?;

    debug!("connected {:?} client to {}", kind, remote);
    Ok(socket)
}
