use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::os::unix::io::{AsFd, AsRawFd, BorrowedFd, FromRawFd, IntoRawFd, OwnedFd, RawFd};

use crate::net::Family;
use crate::sys;

/// Datagram or stream semantics for a [`Socket`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SocketType {
    /// UDP-style datagram socket.
    Datagram,
    /// TCP-style stream socket.
    Stream,
}

impl SocketType {
    pub(crate) fn raw(self) -> libc::c_int {
        match self {
            SocketType::Datagram => libc::SOCK_DGRAM,
            SocketType::Stream => libc::SOCK_STREAM,
        }
    }
}

/// A transport endpoint handed out by the factory functions.
///
/// The handle owns its descriptor; dropping it closes the socket, which
/// also discards any multicast memberships attached to it. Non-blocking
/// sockets surface would-block conditions as
/// [`io::ErrorKind::WouldBlock`].
pub struct Socket {
    fd: OwnedFd,
    family: Family,
    kind: SocketType,
}

impl Socket {
    /// Takes ownership of a raw descriptor created by the `sys` layer.
    pub(crate) fn from_parts(fd: RawFd, family: Family, kind: SocketType) -> Socket {
        Socket {
            fd: unsafe { OwnedFd::from_raw_fd(fd) },
            family,
            kind,
        }
    }

    /// The address family the socket was created with.
    pub fn family(&self) -> Family {
        self.family
    }

    /// Datagram or stream.
    pub fn socket_type(&self) -> SocketType {
        self.kind
    }

    /// The local address the socket is bound to.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        sys::local_addr(self.as_raw_fd())
    }

    /// The remote address a connected socket points at.
    pub fn peer_addr(&self) -> io::Result<SocketAddr> {
        sys::peer_addr(self.as_raw_fd())
    }

    /// Sends on a connected socket.
    pub fn send(&self, buf: &[u8]) -> io::Result<usize> {
        sys::send(self.as_raw_fd(), buf)
    }

    /// Receives on the socket.
    pub fn recv(&self, buf: &mut [u8]) -> io::Result<usize> {
        sys::recv(self.as_raw_fd(), buf)
    }

    /// Sends one datagram to `addr`.
    pub fn send_to(&self, buf: &[u8], addr: &SocketAddr) -> io::Result<usize> {
        sys::send_to(self.as_raw_fd(), buf, addr)
    }

    /// Receives one datagram along with its sender.
    pub fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        sys::recv_from(self.as_raw_fd(), buf)
    }

    /// Accepts one connection on a listening stream socket. The accepted
    /// socket inherits the listener's family.
    pub fn accept(&self) -> io::Result<(Socket, SocketAddr)> {
        let (fd, addr) = sys::accept(self.as_raw_fd())?;
        Ok((Socket::from_parts(fd, self.family, self.kind), addr))
    }
}

impl AsRawFd for Socket {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.as_raw_fd()
    }
}

impl AsFd for Socket {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.fd.as_fd()
    }
}

impl IntoRawFd for Socket {
    fn into_raw_fd(self) -> RawFd {
        self.fd.into_raw_fd()
    }
}

impl fmt::Debug for Socket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Socket")
            .field("fd", &self.fd.as_raw_fd())
            .field("family", &self.family)
            .field("type", &self.kind)
            .finish()
    }
}
