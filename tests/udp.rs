use std::io;

use metricd_net::net::{self, Family};

mod util;
use util::{getsockopt_bool, init, retry_would_block};

const DATA1: &[u8] = b"Hello world!";
const DATA2: &[u8] = b"Hello mars!";

#[test]
fn udp_server_binds_an_os_assigned_port() {
    init();

    let server = net::udp_server(Family::Unspec, 0, None).unwrap();
    let addr = server.local_addr().unwrap();
    assert_ne!(addr.port(), 0);
    assert!(addr.ip().is_unspecified());
}

#[test]
fn udp_server_is_non_blocking_and_reuse_enabled() {
    init();

    let server = net::udp_server(Family::V4, 0, None).unwrap();

    let mut buf = [0u8; 32];
    let err = server.recv_from(&mut buf).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::WouldBlock);

    assert!(getsockopt_bool(
        &server,
        libc::SOL_SOCKET,
        libc::SO_REUSEADDR
    ));
}

#[test]
fn bind_address_family_overrides_requested_family() {
    init();

    // Asking for IPv6 while binding an IPv4 address yields an IPv4 socket.
    let server = net::udp_server(Family::V6, 0, Some("127.0.0.1")).unwrap();
    assert_eq!(server.family(), Family::V4);
    assert!(server.local_addr().unwrap().is_ipv4());
}

#[test]
fn ipv6_server_is_v6only() {
    init();

    let server = net::udp_server(Family::V6, 0, None).unwrap();
    assert!(server.local_addr().unwrap().is_ipv6());
    assert!(getsockopt_bool(
        &server,
        libc::IPPROTO_IPV6,
        libc::IPV6_V6ONLY
    ));
}

#[test]
fn udp_client_is_connected() {
    init();

    let server = net::udp_server(Family::V4, 0, None).unwrap();
    let port = server.local_addr().unwrap().port();

    let client = net::udp_client("127.0.0.1", port).unwrap();
    let peer = client.peer_addr().unwrap();
    assert!(peer.ip().is_loopback());
    assert_eq!(peer.port(), port);
}

#[test]
fn udp_client_unresolvable_host() {
    init();

    let err = net::udp_client("this-host-does-not-exist.invalid", 8649).unwrap_err();
    assert!(matches!(err, metricd_net::Error::Resolution(..)));
}

#[test]
fn one_datagram_end_to_end() {
    init();

    let server = net::udp_server(Family::Unspec, 0, None).unwrap();
    let port = server.local_addr().unwrap().port();
    let client = net::udp_client("127.0.0.1", port).unwrap();

    assert_eq!(client.send(DATA1).unwrap(), DATA1.len());

    let mut buf = [0u8; 64];
    let (n, from) = retry_would_block(|| server.recv_from(&mut buf)).unwrap();
    assert_eq!(&buf[..n], DATA1);
    assert!(from.ip().is_loopback());

    // Exactly one datagram was ready.
    let err = server.recv_from(&mut buf).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::WouldBlock);

    // The unconnected server replies to the sender it observed.
    assert_eq!(server.send_to(DATA2, &from).unwrap(), DATA2.len());
    let n = retry_would_block(|| client.recv(&mut buf)).unwrap();
    assert_eq!(&buf[..n], DATA2);
}
