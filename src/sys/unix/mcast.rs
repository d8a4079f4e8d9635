//! Multicast membership and scope options, plus the interface queries
//! that pin a membership to one NIC. IPv4 memberships carry the
//! interface's assigned address (`ip_mreq`); IPv6 memberships carry the
//! interface index (`ipv6_mreq`). The two families must never be mixed.

use std::ffi::CString;
use std::io;
use std::mem;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::os::unix::io::RawFd;

use super::net::setsockopt;

#[cfg(any(target_os = "android", target_os = "fuchsia", target_os = "linux"))]
use libc::IPV6_ADD_MEMBERSHIP as IPV6_JOIN_GROUP;
#[cfg(not(any(target_os = "android", target_os = "fuchsia", target_os = "linux")))]
use libc::IPV6_JOIN_GROUP;

pub(crate) fn set_ttl_v4(fd: RawFd, ttl: u8) -> io::Result<()> {
    // IP_MULTICAST_TTL takes a single byte, unlike IPV6_MULTICAST_HOPS.
    setsockopt(fd, libc::IPPROTO_IP, libc::IP_MULTICAST_TTL, ttl)
}

pub(crate) fn set_hops_v6(fd: RawFd, hops: libc::c_int) -> io::Result<()> {
    setsockopt(fd, libc::IPPROTO_IPV6, libc::IPV6_MULTICAST_HOPS, hops)
}

pub(crate) fn join_v4(fd: RawFd, group: &Ipv4Addr, interface: &Ipv4Addr) -> io::Result<()> {
    let mreq = libc::ip_mreq {
        imr_multiaddr: libc::in_addr {
            s_addr: u32::from_ne_bytes(group.octets()),
        },
        imr_interface: libc::in_addr {
            s_addr: u32::from_ne_bytes(interface.octets()),
        },
    };
    setsockopt(fd, libc::IPPROTO_IP, libc::IP_ADD_MEMBERSHIP, mreq)
}

pub(crate) fn join_v6(fd: RawFd, group: &Ipv6Addr, interface: libc::c_uint) -> io::Result<()> {
    let mreq = libc::ipv6_mreq {
        ipv6mr_multiaddr: libc::in6_addr {
            s6_addr: group.octets(),
        },
        ipv6mr_interface: interface,
    };
    setsockopt(fd, libc::IPPROTO_IPV6, IPV6_JOIN_GROUP, mreq)
}

/// Looks up the index of a named interface, for IPv6 memberships.
pub(crate) fn interface_index(name: &str) -> io::Result<libc::c_uint> {
    let name = CString::new(name).map_err(|_| io::Error::from(io::ErrorKind::InvalidInput))?;
    let index = unsafe { libc::if_nametoindex(name.as_ptr()) };
    if index == 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(index)
    }
}

/// Looks up the IPv4 address assigned to a named interface via the
/// `SIOCGIFADDR` ioctl, for IPv4 memberships.
pub(crate) fn ipv4_interface_addr(fd: RawFd, name: &str) -> io::Result<Ipv4Addr> {
    let mut ifreq: libc::ifreq = unsafe { mem::zeroed() };
    let bytes = name.as_bytes();
    // Leave room for the NUL; an over-long name can't be a real interface.
    if bytes.is_empty() || bytes.len() >= ifreq.ifr_name.len() {
        return Err(io::ErrorKind::InvalidInput.into());
    }
    for (dst, src) in ifreq.ifr_name.iter_mut().zip(bytes.iter()) {
        *dst = *src as libc::c_char;
    }

    syscall!(ioctl(fd, libc::SIOCGIFADDR as _, &mut ifreq as *mut libc::ifreq))?;

    let addr =
        unsafe { &*(&ifreq.ifr_ifru.ifru_addr as *const libc::sockaddr as *const libc::sockaddr_in) };
    if addr.sin_family as libc::c_int != libc::AF_INET {
        return Err(io::ErrorKind::AddrNotAvailable.into());
    }
    Ok(Ipv4Addr::from(u32::from_be(addr.sin_addr.s_addr)))
}
