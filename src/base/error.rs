use std::error;
use std::fmt;
use std::io;

/// Represents errors that can occur during SF45 operations.
#[derive(Debug)]
pub enum Error {
    /// The transport could not be opened.
    ConnectionFailed {
        identifier: String,
        description: String,
    },

    /// The device has no open transport.
    NotConnected,

    /// The execution of operation failed. Contains a description of the failure.
    OperationFail { description: String },

    /// The decoding data is invalid according to current protocol. Contains a description of the protocol error.
    ProtocolError { description: String },

    /// The checksum transmitted with a frame does not match the one computed over its bytes.
    ChecksumMismatch { received: u16, calculated: u16 },

    /// A frame tried to grow past the bounded receive buffer.
    BufferOverflow { capacity: usize },

    /// An I/O error occurred while communicating with the underlying transport (e.g., serial port).
    IoError(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ConnectionFailed {
                identifier,
                description,
            } => write!(f, "failed to connect to {}: {}", identifier, description),
            Error::NotConnected => write!(f, "device not connected"),
            Error::OperationFail { description } => write!(f, "operation failed: {}", description),
            Error::ProtocolError { description } => write!(f, "protocol error: {}", description),
            Error::ChecksumMismatch {
                received,
                calculated,
            } => write!(
                f,
                "checksum mismatch: received {:04X}, calculated {:04X}",
                received, calculated
            ),
            Error::BufferOverflow { capacity } => {
                write!(f, "frame exceeds receive buffer of {} bytes", capacity)
            }
            Error::IoError(err) => write!(f, "io error: {}", err),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::IoError(err)
    }
}

/// A specialized `Result` type for SF45 operations.
pub type Result<T> = std::result::Result<T, Error>;
