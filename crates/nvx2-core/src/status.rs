use std::io;

use thiserror::Error;

/// Errors produced while decoding an NVX2 mesh or driving a reader.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Nvx2Error {
    /// The stream ended before a fixed-size region was fully read.
    #[error("Truncated input: {0}")]
    TruncatedInput(String),
    /// Values in the file are internally inconsistent.
    #[error("Format error: {0}")]
    Format(String),
    /// A vertex or index buffer builder failed.
    #[error("Resource creation failed: {0}")]
    ResourceCreation(String),
    /// The reader API was used out of order or in the wrong mode.
    #[error("Invalid state: {0}")]
    InvalidState(String),
    /// Any other stream failure.
    #[error("IO error: {0}")]
    Io(String),
}

pub type Nvx2Result<T> = Result<T, Nvx2Error>;

impl Nvx2Error {
    pub fn format(msg: impl Into<String>) -> Self {
        Nvx2Error::Format(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Nvx2Error::InvalidState(msg.into())
    }

    pub fn resource_creation(msg: impl Into<String>) -> Self {
        Nvx2Error::ResourceCreation(msg.into())
    }

    /// Maps a failed read of `what` into the error taxonomy.
    ///
    /// A short read becomes `TruncatedInput`; everything else is `Io`.
    pub fn from_read(err: io::Error, what: &str) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Nvx2Error::TruncatedInput(format!("stream ended while reading {}", what))
        } else {
            Nvx2Error::Io(format!("{}: {}", what, err))
        }
    }
}

impl From<io::Error> for Nvx2Error {
    fn from(err: io::Error) -> Self {
        Nvx2Error::from_read(err, "stream")
    }
}
