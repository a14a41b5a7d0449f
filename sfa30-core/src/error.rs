//! Driver error type.

use sfa30_proto::{DeviceStatus, FrameError, ResponseError, WordError};

/// Error type for driver operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Bus or serial I/O error.
    Io,
    /// Malformed SHDLC frame or bad I2C transfer length.
    Frame(FrameError),
    /// Checksum mismatch in the response.
    Checksum,
    /// The sensor answered with a non-zero state.
    Device(DeviceStatus),
    /// Operation attempted before `init`.
    NotInitialized,
    /// The transport could not be opened.
    Unbound,
    /// The liveness reset in `init` or `deinit` failed.
    ResetFailed,
}

impl Error {
    /// Whether this is a failure of the command exchange itself, as opposed
    /// to a lifecycle error.
    #[must_use]
    pub const fn is_operation_failure(&self) -> bool {
        matches!(
            self,
            Self::Io | Self::Frame(_) | Self::Checksum | Self::Device(_)
        )
    }
}

impl From<FrameError> for Error {
    fn from(err: FrameError) -> Self {
        Error::Frame(err)
    }
}

impl From<ResponseError> for Error {
    fn from(err: ResponseError) -> Self {
        match err {
            ResponseError::Frame(e) => Error::Frame(e),
            ResponseError::Checksum { .. } => Error::Checksum,
            ResponseError::Device(status) => Error::Device(status),
        }
    }
}

impl From<WordError> for Error {
    fn from(err: WordError) -> Self {
        match err {
            WordError::Length => Error::Frame(FrameError::Overflow),
            WordError::Checksum { .. } => Error::Checksum,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Io => write!(f, "i/o error"),
            Self::Frame(e) => write!(f, "frame error: {}", e),
            Self::Checksum => write!(f, "checksum mismatch"),
            Self::Device(status) => write!(f, "device error: {}", status),
            Self::NotInitialized => write!(f, "handle is not initialized"),
            Self::Unbound => write!(f, "transport could not be opened"),
            Self::ResetFailed => write!(f, "reset failed"),
        }
    }
}
