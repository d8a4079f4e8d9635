// Not all functions are used by all tests.
#![allow(dead_code)]

use std::io;
use std::sync::Once;
use std::time::Duration;

pub fn init() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        env_logger::try_init().expect("unable to initialise logger");
    })
}

/// Retries a non-blocking operation until it stops returning
/// `WouldBlock`, with a bounded number of attempts.
pub fn retry_would_block<T>(mut op: impl FnMut() -> io::Result<T>) -> io::Result<T> {
    const ATTEMPTS: usize = 100;

    let mut last = None;
    for _ in 0..ATTEMPTS {
        match op() {
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                last = Some(err);
                std::thread::sleep(Duration::from_millis(10));
            }
            result => return result,
        }
    }
    Err(last.unwrap())
}

/// Reads a boolean socket option straight from the kernel.
pub fn getsockopt_bool<S: std::os::unix::io::AsRawFd>(
    socket: &S,
    level: libc::c_int,
    name: libc::c_int,
) -> bool {
    let mut optval: libc::c_int = 0;
    let mut optlen = std::mem::size_of::<libc::c_int>() as libc::socklen_t;
    let res = unsafe {
        libc::getsockopt(
            socket.as_raw_fd(),
            level,
            name,
            &mut optval as *mut _ as *mut libc::c_void,
            &mut optlen,
        )
    };
    assert_eq!(res, 0, "getsockopt failed: {}", io::Error::last_os_error());
    optval != 0
}
