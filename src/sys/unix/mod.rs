/// Helper macro to execute a system call that returns an `io::Result`.
//
// Macro must be defined before any modules that uses them.
macro_rules! syscall {
    ($fn: ident ( $($arg: expr),* $(,)* ) ) => {{
        let res = unsafe { libc::$fn($($arg, )*) };
        if res == -1 {
            Err(std::io::Error::last_os_error())
        } else {
            Ok(res)
        }
    }};
}

mod mcast;
mod net;

pub(crate) use self::mcast::{
    interface_index, ipv4_interface_addr, join_v4, join_v6, set_hops_v6, set_ttl_v4,
};
pub(crate) use self::net::{
    accept, bind, connect, listen, local_addr, local_family, new_socket, peer_addr, recv,
    recv_from, send, send_to, set_nonblocking, set_reuseaddr, set_v6only,
};
