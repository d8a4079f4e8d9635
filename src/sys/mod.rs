//! Syscall layer. All kernel interaction lives here; the `net` module
//! above maps these `io::Result`s into the crate's error taxonomy.

#[cfg(unix)]
mod unix;
#[cfg(unix)]
pub(crate) use self::unix::*;
