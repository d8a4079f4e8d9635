use std::error;
use std::fmt;
use std::io;

/// A specialized result type for endpoint construction.
pub type Result<T> = std::result::Result<T, Error>;

/// The reasons an endpoint factory call can fail.
///
/// Each variant names the step that failed; variants carrying an
/// [`io::Error`] expose the underlying OS error through
/// [`source`](error::Error::source). Any failure after a socket has been
/// created closes that socket before the error is returned, so an `Err`
/// never leaves a descriptor behind.
#[derive(Debug)]
pub enum Error {
    /// Bad caller input, e.g. a destination buffer too small for the
    /// formatted address text.
    InvalidArgument,
    /// Name or address resolution failed, or resolved to nothing.
    Resolution(io::Error),
    /// The kernel refused to create the socket.
    SocketCreate(io::Error),
    /// Setting a socket option failed.
    SocketOption(io::Error),
    /// Connecting a client socket to its remote address failed.
    Connect(io::Error),
    /// Binding a server socket to its local address failed.
    Bind(io::Error),
    /// Switching a stream socket into listening mode failed.
    Listen(io::Error),
    /// A named network interface could not be resolved to an address or
    /// index.
    InterfaceLookup(io::Error),
    /// The kernel rejected a multicast group membership request.
    Join(io::Error),
    /// The socket's address family is neither IPv4 nor IPv6.
    UnsupportedFamily,
    /// The socket's local address could not be determined.
    AddressUnavailable,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument => f.write_str("invalid argument"),
            Error::Resolution(err) => write!(f, "address resolution failed: {}", err),
            Error::SocketCreate(err) => write!(f, "socket creation failed: {}", err),
            Error::SocketOption(err) => write!(f, "setting socket option failed: {}", err),
            Error::Connect(err) => write!(f, "connect failed: {}", err),
            Error::Bind(err) => write!(f, "bind failed: {}", err),
            Error::Listen(err) => write!(f, "listen failed: {}", err),
            Error::InterfaceLookup(err) => write!(f, "interface lookup failed: {}", err),
            Error::Join(err) => write!(f, "multicast group join failed: {}", err),
            Error::UnsupportedFamily => f.write_str("unsupported address family"),
            Error::AddressUnavailable => f.write_str("local address unavailable"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Resolution(err)
            | Error::SocketCreate(err)
            | Error::SocketOption(err)
            | Error::Connect(err)
            | Error::Bind(err)
            | Error::Listen(err)
            | Error::InterfaceLookup(err)
            | Error::Join(err) => Some(err),
            Error::InvalidArgument | Error::UnsupportedFamily | Error::AddressUnavailable => None,
        }
    }
}
