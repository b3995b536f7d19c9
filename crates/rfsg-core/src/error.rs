//! Error types for the RFSG call path.
//!
//! `RfsgError` is the single error type produced while servicing a call. It
//! separates failures reported *by the driver* (`Driver`, which always carries
//! the original status code and a best-effort description) from failures that
//! happen *around* the driver: cancellation, session lookup, malformed request
//! payloads, library loading and internal faults.
//!
//! ## Error Categories
//!
//! 1. **Call-state errors** - `Cancelled`, `SessionNotFound`
//!    - Raised before the driver is touched
//!    - Recovery: caller re-issues the call or re-resolves the session
//!
//! 2. **Argument errors** - `OddSampleCount`, `SampleCountOverflow`,
//!    `SampleOutOfRange`, `InvalidWaveformName`
//!    - Raised while marshaling; the driver is never invoked
//!    - Recovery: fix the request
//!
//! 3. **Driver errors** - `Driver`
//!    - Negative status returned by the driver, translated into a description
//!    - Recovery: caller policy; nothing here retries
//!
//! 4. **Infrastructure errors** - `LibraryLoad`, `SymbolNotFound`, `Internal`

use crate::types::ViStatus;
use thiserror::Error;

/// Convenience alias for results using [`RfsgError`].
pub type RfsgResult<T> = std::result::Result<T, RfsgError>;

// =============================================================================
// Driver Errors
// =============================================================================

/// A failed driver call: the original status code and its description.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Driver error {code}: {description}")]
pub struct DriverError {
    /// Negative status code returned by the driver.
    pub code: ViStatus,
    /// Human readable description, empty if the driver had none.
    pub description: String,
}

impl DriverError {
    /// Error for `code` with the given description.
    pub fn new(code: ViStatus, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
        }
    }
}

// =============================================================================
// Call Errors
// =============================================================================

/// Primary error type for servicing an RFSG call.
#[derive(Error, Debug)]
pub enum RfsgError {
    /// The call was cancelled before any session or driver interaction.
    #[error("Call cancelled")]
    Cancelled,

    /// The session name does not resolve to a live driver handle.
    ///
    /// Either the name was never registered or the session was closed
    /// concurrently. Not retried.
    #[error("Session '{0}' not found")]
    SessionNotFound(String),

    /// The driver returned a negative status code.
    #[error("{0}")]
    Driver(DriverError),

    /// Interleaved sample buffers must hold an even number of elements.
    #[error("Waveform data has {len} elements; interleaved I/Q data requires an even count")]
    OddSampleCount {
        /// Number of elements received.
        len: usize,
    },

    /// Pair count does not fit the driver's 32-bit sample count argument.
    #[error("Waveform of {count} samples exceeds the driver sample count limit")]
    SampleCountOverflow {
        /// Number of complex pairs in the request.
        count: usize,
    },

    /// A 16-bit sample arrived outside the `i16` range.
    #[error("Waveform element {index} has value {value}, outside the 16-bit range")]
    SampleOutOfRange {
        /// Position of the element in the interleaved buffer.
        index: usize,
        /// The value received.
        value: i64,
    },

    /// The waveform name cannot be passed to the driver as a C string.
    #[error("Invalid waveform name {0:?}: contains an interior NUL byte")]
    InvalidWaveformName(String),

    /// The driver shared library could not be opened.
    #[error("Failed to load driver library '{path}': {message}")]
    LibraryLoad {
        /// Path or name that was opened.
        path: String,
        /// Loader error text.
        message: String,
    },

    /// A required entry point is missing from the driver library.
    #[error("Driver library is missing symbol '{0}'")]
    SymbolNotFound(&'static str),

    /// Server-side fault unrelated to the driver contract.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RfsgError {
    /// Short, stable label for the error category.
    ///
    /// Used for structured logs and as a status metadata value.
    pub fn kind(&self) -> &'static str {
        match self {
            RfsgError::Cancelled => "cancelled",
            RfsgError::SessionNotFound(_) => "session",
            RfsgError::Driver(_) => "driver",
            RfsgError::OddSampleCount { .. }
            | RfsgError::SampleCountOverflow { .. }
            | RfsgError::SampleOutOfRange { .. }
            | RfsgError::InvalidWaveformName(_) => "argument",
            RfsgError::LibraryLoad { .. } | RfsgError::SymbolNotFound(_) => "library",
            RfsgError::Internal(_) => "internal",
        }
    }

    /// Driver status code carried by this error, if any.
    pub fn driver_code(&self) -> Option<ViStatus> {
        match self {
            RfsgError::Driver(err) => Some(err.code),
            _ => None,
        }
    }
}

impl From<DriverError> for RfsgError {
    fn from(err: DriverError) -> Self {
        RfsgError::Driver(err)
    }
}
