use std::io;
use thiserror::Error;

/// Failure classes. Every one of them is fatal; nothing in the protocol
/// retries.
///
/// Each class maps to a distinct process exit status, see
/// [`Error::exit_code`].
#[derive(Debug, Error)]
pub enum Error {
    /// Host name did not resolve to any IPv4 address.
    #[error("cannot resolve '{0}' to an IPv4 address")]
    Resolve(String),

    /// Socket creation or bind failed.
    #[error("socket setup failed: {0}")]
    Socket(io::Error),

    /// A datagram could not be sent.
    #[error("send failed: {0}")]
    Send(io::Error),

    /// A blocking receive failed at the OS layer.
    #[error("receive failed: {0}")]
    Recv(io::Error),

    /// A datagram did not match the fixed size expected in its phase.
    #[error("unexpected datagram size: got {got} bytes, expected {want}")]
    MessageSize { want: usize, got: usize },
}

impl Error {
    /// Process exit status for this failure class.
    ///
    /// Status 1 belongs to argument parsing, so these start at 2.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Resolve(_) => 2,
            Error::Socket(_) => 3,
            Error::Send(_) => 4,
            Error::Recv(_) => 5,
            Error::MessageSize { .. } => 6,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
