use std::io;
use std::os::unix::net::UnixDatagram;

use metricd_net::net::{self, Family, Iface};
use metricd_net::Error;

mod util;
use util::init;

#[test]
fn set_ttl_on_ipv4_socket() {
    init();

    let socket = net::udp_server(Family::V4, 0, None).unwrap();
    net::set_multicast_ttl(&socket, 9).unwrap();
    assert_eq!(multicast_scope_v4(&socket), 9);
}

#[test]
fn set_hops_on_ipv6_socket() {
    init();

    let socket = net::udp_server(Family::V6, 0, None).unwrap();
    net::set_multicast_ttl(&socket, 9).unwrap();
}

#[test]
fn multicast_client_is_connected_with_scope_applied() {
    init();

    // Connecting a datagram socket to the group needs no handshake (and
    // no multicast routing), so this works on loopback-only machines.
    let client = net::multicast_client("239.2.11.71", 8649, 4).unwrap();
    assert_eq!(client.peer_addr().unwrap(), "239.2.11.71:8649".parse().unwrap());
    assert_eq!(multicast_scope_v4(&client), 4);
}

#[test]
fn ipv4_scope_saturates_at_255() {
    init();

    // The IPv4 option is one byte wide; 300 must cap at 255, not wrap to
    // 44 and shrink the scope.
    let socket = net::udp_server(Family::V4, 0, None).unwrap();
    net::set_multicast_ttl(&socket, 300).unwrap();
    assert_eq!(multicast_scope_v4(&socket), 255);
}

#[test]
fn set_ttl_rejects_unix_domain_sockets() {
    init();

    // Neither IPv4 nor IPv6; the socket must be left untouched.
    let socket = UnixDatagram::unbound().unwrap();
    assert!(matches!(
        net::set_multicast_ttl(&socket, 4),
        Err(Error::UnsupportedFamily)
    ));
}

#[test]
fn join_with_unresolvable_group() {
    init();

    let socket = net::udp_server(Family::V4, 0, None).unwrap();
    let err =
        net::join_multicast(&socket, "this-host-does-not-exist.invalid", 8649, Iface::Any)
            .unwrap_err();
    assert!(matches!(err, Error::Resolution(..)));

    // The socket is unchanged and still usable.
    let mut buf = [0u8; 8];
    let err = socket.recv_from(&mut buf).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::WouldBlock);
}

#[test]
fn join_v4_with_unknown_interface() {
    init();

    let socket = net::udp_server(Family::V4, 0, None).unwrap();
    let err = net::join_multicast(&socket, "239.2.11.71", 8649, Iface::Named("no-such-if0"))
        .unwrap_err();
    assert!(matches!(err, Error::InterfaceLookup(..)));
}

#[test]
fn join_v6_with_unknown_interface() {
    init();

    let socket = net::udp_server(Family::V6, 0, None).unwrap();
    let err = net::join_multicast(&socket, "ff05::2:11:71", 8649, Iface::Named("no-such-if0"))
        .unwrap_err();
    assert!(matches!(err, Error::InterfaceLookup(..)));
}

#[test]
fn multicast_server_all_interfaces_skips_the_join() {
    init();

    // 'ALL' is a declared extension point: the server comes up bound and
    // usable, with no membership attached.
    let server =
        net::multicast_server(Family::V4, "239.2.11.71", 0, None, Iface::from_name(Some("ALL")))
            .unwrap();
    let addr = server.local_addr().unwrap();
    assert_ne!(addr.port(), 0);

    let mut buf = [0u8; 8];
    let err = server.recv_from(&mut buf).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::WouldBlock);
}

fn multicast_scope_v4<S: std::os::unix::io::AsRawFd>(socket: &S) -> u8 {
    let mut optval: u8 = 0;
    let mut optlen = std::mem::size_of::<u8>() as libc::socklen_t;
    let res = unsafe {
        libc::getsockopt(
            socket.as_raw_fd(),
            libc::IPPROTO_IP,
            libc::IP_MULTICAST_TTL,
            &mut optval as *mut _ as *mut libc::c_void,
            &mut optlen,
        )
    };
    assert_eq!(res, 0, "getsockopt failed: {}", io::Error::last_os_error());
    optval
}
