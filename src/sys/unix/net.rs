use std::io;
use std::mem;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6};
use std::os::unix::io::RawFd;

/// Create a new socket, with close-on-exec set, and return its descriptor.
pub(crate) fn new_socket(domain: libc::c_int, socket_type: libc::c_int) -> io::Result<RawFd> {
    #[cfg(any(
        target_os = "android",
        target_os = "dragonfly",
        target_os = "freebsd",
        target_os = "illumos",
        target_os = "linux",
        target_os = "netbsd",
        target_os = "openbsd",
        target_os = "solaris",
    ))]
    let socket_type = socket_type | libc::SOCK_CLOEXEC;

    let socket = syscall!(socket(domain, socket_type, 0))?;

    // Darwin doesn't have SOCK_CLOEXEC, so set the flag separately.
    #[cfg(any(target_os = "ios", target_os = "macos", target_os = "tvos", target_os = "watchos"))]
    if let Err(err) = syscall!(fcntl(socket, libc::F_SETFD, libc::FD_CLOEXEC)) {
        let _ = syscall!(close(socket));
        return Err(err);
    }

    Ok(socket)
}

pub(crate) fn set_nonblocking(fd: RawFd) -> io::Result<()> {
    let flags = syscall!(fcntl(fd, libc::F_GETFL))?;
    if flags & libc::O_NONBLOCK == 0 {
        syscall!(fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK))?;
    }
    Ok(())
}

pub(crate) fn set_reuseaddr(fd: RawFd) -> io::Result<()> {
    setsockopt(fd, libc::SOL_SOCKET, libc::SO_REUSEADDR, 1 as libc::c_int)
}

/// Stop an IPv6 socket from also accepting IPv4-mapped traffic.
pub(crate) fn set_v6only(fd: RawFd) -> io::Result<()> {
    setsockopt(fd, libc::IPPROTO_IPV6, libc::IPV6_V6ONLY, 1 as libc::c_int)
}

pub(super) fn setsockopt<T>(
    fd: RawFd,
    level: libc::c_int,
    name: libc::c_int,
    value: T,
) -> io::Result<()> {
    syscall!(setsockopt(
        fd,
        level,
        name,
        &value as *const T as *const libc::c_void,
        mem::size_of::<T>() as libc::socklen_t,
    ))
    .map(|_| ())
}

pub(crate) fn bind(fd: RawFd, addr: &SocketAddr) -> io::Result<()> {
    let (raw_addr, raw_addr_length) = socket_addr(addr);
    syscall!(bind(fd, raw_addr.as_ptr(), raw_addr_length)).map(|_| ())
}

pub(crate) fn connect(fd: RawFd, addr: &SocketAddr) -> io::Result<()> {
    let (raw_addr, raw_addr_length) = socket_addr(addr);
    syscall!(connect(fd, raw_addr.as_ptr(), raw_addr_length)).map(|_| ())
}

pub(crate) fn listen(fd: RawFd, backlog: libc::c_int) -> io::Result<()> {
    syscall!(listen(fd, backlog)).map(|_| ())
}

pub(crate) fn accept(fd: RawFd) -> io::Result<(RawFd, SocketAddr)> {
    let mut storage: libc::sockaddr_storage = unsafe { mem::zeroed() };
    let mut length = mem::size_of::<libc::sockaddr_storage>() as libc::socklen_t;

    #[cfg(any(
        target_os = "android",
        target_os = "dragonfly",
        target_os = "freebsd",
        target_os = "illumos",
        target_os = "linux",
        target_os = "netbsd",
        target_os = "openbsd",
    ))]
    let stream = syscall!(accept4(
        fd,
        &mut storage as *mut _ as *mut libc::sockaddr,
        &mut length,
        libc::SOCK_CLOEXEC,
    ))?;

    #[cfg(not(any(
        target_os = "android",
        target_os = "dragonfly",
        target_os = "freebsd",
        target_os = "illumos",
        target_os = "linux",
        target_os = "netbsd",
        target_os = "openbsd",
    )))]
    let stream = {
        let stream = syscall!(accept(
            fd,
            &mut storage as *mut _ as *mut libc::sockaddr,
            &mut length,
        ))?;
        if let Err(err) = syscall!(fcntl(stream, libc::F_SETFD, libc::FD_CLOEXEC)) {
            let _ = syscall!(close(stream));
            return Err(err);
        }
        stream
    };

    let addr = to_socket_addr(&storage)?;
    Ok((stream, addr))
}

pub(crate) fn local_addr(fd: RawFd) -> io::Result<SocketAddr> {
    let mut storage: libc::sockaddr_storage = unsafe { mem::zeroed() };
    let mut length = mem::size_of::<libc::sockaddr_storage>() as libc::socklen_t;
    syscall!(getsockname(
        fd,
        &mut storage as *mut _ as *mut libc::sockaddr,
        &mut length,
    ))?;
    to_socket_addr(&storage)
}

pub(crate) fn peer_addr(fd: RawFd) -> io::Result<SocketAddr> {
    let mut storage: libc::sockaddr_storage = unsafe { mem::zeroed() };
    let mut length = mem::size_of::<libc::sockaddr_storage>() as libc::socklen_t;
    syscall!(getpeername(
        fd,
        &mut storage as *mut _ as *mut libc::sockaddr,
        &mut length,
    ))?;
    to_socket_addr(&storage)
}

/// The raw address family the socket is bound in, straight from
/// `getsockname`. Unlike [`local_addr`] this also reports families this
/// crate does not speak, e.g. `AF_UNIX`.
pub(crate) fn local_family(fd: RawFd) -> io::Result<libc::c_int> {
    let mut storage: libc::sockaddr_storage = unsafe { mem::zeroed() };
    let mut length = mem::size_of::<libc::sockaddr_storage>() as libc::socklen_t;
    syscall!(getsockname(
        fd,
        &mut storage as *mut _ as *mut libc::sockaddr,
        &mut length,
    ))?;
    Ok(storage.ss_family as libc::c_int)
}

pub(crate) fn send(fd: RawFd, buf: &[u8]) -> io::Result<usize> {
    syscall!(send(fd, buf.as_ptr() as *const libc::c_void, buf.len(), 0)).map(|n| n as usize)
}

pub(crate) fn recv(fd: RawFd, buf: &mut [u8]) -> io::Result<usize> {
    syscall!(recv(fd, buf.as_mut_ptr() as *mut libc::c_void, buf.len(), 0)).map(|n| n as usize)
}

pub(crate) fn send_to(fd: RawFd, buf: &[u8], addr: &SocketAddr) -> io::Result<usize> {
    let (raw_addr, raw_addr_length) = socket_addr(addr);
    syscall!(sendto(
        fd,
        buf.as_ptr() as *const libc::c_void,
        buf.len(),
        0,
        raw_addr.as_ptr(),
        raw_addr_length,
    ))
    .map(|n| n as usize)
}

pub(crate) fn recv_from(fd: RawFd, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
    let mut storage: libc::sockaddr_storage = unsafe { mem::zeroed() };
    let mut length = mem::size_of::<libc::sockaddr_storage>() as libc::socklen_t;
    let n = syscall!(recvfrom(
        fd,
        buf.as_mut_ptr() as *mut libc::c_void,
        buf.len(),
        0,
        &mut storage as *mut _ as *mut libc::sockaddr,
        &mut length,
    ))?;
    let addr = to_socket_addr(&storage)?;
    Ok((n as usize, addr))
}

#[repr(C)]
pub(crate) union SocketAddrCRepr {
    v4: libc::sockaddr_in,
    v6: libc::sockaddr_in6,
}

impl SocketAddrCRepr {
    pub(crate) fn as_ptr(&self) -> *const libc::sockaddr {
        self as *const _ as *const libc::sockaddr
    }
}

/// Converts a Rust `SocketAddr` into the system representation.
pub(crate) fn socket_addr(addr: &SocketAddr) -> (SocketAddrCRepr, libc::socklen_t) {
    match addr {
        SocketAddr::V4(ref addr) => {
            // The zeroed base covers `sin_zero` and, on the BSDs, `sin_len`.
            let mut sockaddr_in: libc::sockaddr_in = unsafe { mem::zeroed() };
            sockaddr_in.sin_family = libc::AF_INET as libc::sa_family_t;
            sockaddr_in.sin_port = addr.port().to_be();
            // `s_addr` is stored as BE on all machines and the array is in
            // BE order, so the native endian conversion is never a swap.
            sockaddr_in.sin_addr = libc::in_addr {
                s_addr: u32::from_ne_bytes(addr.ip().octets()),
            };

            let sockaddr = SocketAddrCRepr { v4: sockaddr_in };
            let socklen = mem::size_of::<libc::sockaddr_in>() as libc::socklen_t;
            (sockaddr, socklen)
        }
        SocketAddr::V6(ref addr) => {
            let mut sockaddr_in6: libc::sockaddr_in6 = unsafe { mem::zeroed() };
            sockaddr_in6.sin6_family = libc::AF_INET6 as libc::sa_family_t;
            sockaddr_in6.sin6_port = addr.port().to_be();
            sockaddr_in6.sin6_addr = libc::in6_addr {
                s6_addr: addr.ip().octets(),
            };
            sockaddr_in6.sin6_flowinfo = addr.flowinfo();
            sockaddr_in6.sin6_scope_id = addr.scope_id();

            let sockaddr = SocketAddrCRepr { v6: sockaddr_in6 };
            let socklen = mem::size_of::<libc::sockaddr_in6>() as libc::socklen_t;
            (sockaddr, socklen)
        }
    }
}

/// Decodes a `sockaddr_storage` filled in by the kernel. `storage` must
/// hold a `sockaddr_in` or `sockaddr_in6`.
pub(crate) fn to_socket_addr(storage: &libc::sockaddr_storage) -> io::Result<SocketAddr> {
    match storage.ss_family as libc::c_int {
        libc::AF_INET => {
            let addr = unsafe { &*(storage as *const _ as *const libc::sockaddr_in) };
            let ip = Ipv4Addr::from(u32::from_be(addr.sin_addr.s_addr));
            Ok(SocketAddr::V4(SocketAddrV4::new(
                ip,
                u16::from_be(addr.sin_port),
            )))
        }
        libc::AF_INET6 => {
            let addr = unsafe { &*(storage as *const _ as *const libc::sockaddr_in6) };
            let ip = Ipv6Addr::from(addr.sin6_addr.s6_addr);
            Ok(SocketAddr::V6(SocketAddrV6::new(
                ip,
                u16::from_be(addr.sin6_port),
                addr.sin6_flowinfo,
                addr.sin6_scope_id,
            )))
        }
        _ => Err(io::ErrorKind::InvalidInput.into()),
    }
}
