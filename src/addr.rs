use std::fmt::{self, Write};
use std::net::{IpAddr, SocketAddr};
use std::str;

use crate::{Error, Result};

/// Writes the presentation text of `addr`'s IP into `buf` and returns the
/// written prefix as a `&str`.
///
/// An IPv4-mapped IPv6 address is collapsed to plain dotted IPv4 text:
/// `::ffff:192.0.2.5` formats as `"192.0.2.5"`. Downstream consumers
/// expect familiar IPv4 text even when the kernel reports the mapped form.
///
/// Fails with [`Error::InvalidArgument`] when `buf` is too small for the
/// address text; `buf` is never written past its length.
pub fn format_ip<'a>(buf: &'a mut [u8], addr: &SocketAddr) -> Result<&'a str> {
    let ip = match addr.ip() {
        IpAddr::V6(ip) => match ip.to_ipv4_mapped() {
            Some(mapped) => IpAddr::V4(mapped),
            None => IpAddr::V6(ip),
        },
        ip => ip,
    };

    let mut cursor = Cursor { buf, len: 0 };
    write!(cursor, "{}", ip).map_err(|_| Error::InvalidArgument)?;
    let Cursor { buf, len } = cursor;
    // IP presentation text is plain ASCII.
    Ok(str::from_utf8(&buf[..len]).expect("IP text is ASCII"))
}

/// `fmt::Write` adaptor over a fixed-size byte buffer. Refuses writes that
/// would run past the end instead of truncating.
struct Cursor<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl Write for Cursor<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let bytes = s.as_bytes();
        let end = self.len.checked_add(bytes.len()).ok_or(fmt::Error)?;
        if end > self.buf.len() {
            return Err(fmt::Error);
        }
        self.buf[self.len..end].copy_from_slice(bytes);
        self.len = end;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use super::format_ip;
    use crate::Error;

    fn addr(s: &str) -> SocketAddr {
        s.parse().unwrap()
    }

    #[test]
    fn formats_ipv4() {
        let mut buf = [0u8; 46];
        let text = format_ip(&mut buf, &addr("192.0.2.5:8649")).unwrap();
        assert_eq!(text, "192.0.2.5");
    }

    #[test]
    fn formats_ipv6() {
        let mut buf = [0u8; 46];
        let text = format_ip(&mut buf, &addr("[2001:db8::1]:8649")).unwrap();
        assert_eq!(text, "2001:db8::1");
    }

    #[test]
    fn collapses_v4_mapped() {
        let mut buf = [0u8; 46];
        let text = format_ip(&mut buf, &addr("[::ffff:192.0.2.5]:8649")).unwrap();
        assert_eq!(text, "192.0.2.5");
        assert!(!text.contains("ffff"));
    }

    #[test]
    fn exact_capacity_is_enough() {
        let mut buf = [0u8; 9];
        let text = format_ip(&mut buf, &addr("192.0.2.5:8649")).unwrap();
        assert_eq!(text, "192.0.2.5");
    }

    #[test]
    fn undersized_buffer_is_rejected() {
        let mut buf = [0u8; 8];
        assert!(matches!(
            format_ip(&mut buf, &addr("192.0.2.5:8649")),
            Err(Error::InvalidArgument)
        ));
    }

    #[test]
    fn empty_buffer_is_rejected() {
        let mut buf = [0u8; 0];
        assert!(matches!(
            format_ip(&mut buf, &addr("127.0.0.1:0")),
            Err(Error::InvalidArgument)
        ));
    }

    #[test]
    fn never_writes_past_capacity() {
        let mut buf = [0xaau8; 12];
        let _ = format_ip(&mut buf[..4], &addr("192.0.2.5:8649"));
        assert_eq!(&buf[4..], &[0xaau8; 8][..]);
    }
}
