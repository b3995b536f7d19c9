//! Shared hard limits for driver interaction.
//!
//! This module centralizes the buffer sizes used when talking to the driver
//! so that the translator, the driver bindings and the mock agree.

// =============================================================================
// Diagnostic Buffers
// =============================================================================

/// Capacity of the buffer handed to the driver for error descriptions (2 KiB).
///
/// The same capacity bounds the description carried by a failed RPC.
pub const MAX_ERROR_DESCRIPTION_SIZE: usize = 2048;

/// Minimum buffer the driver's static `ErrorMessage` lookup may write into.
pub const ERROR_MESSAGE_MIN_SIZE: usize = 256;

const _: () = assert!(
    MAX_ERROR_DESCRIPTION_SIZE >= 1024,
    "error descriptions need at least a 1024 byte buffer"
);
const _: () = assert!(MAX_ERROR_DESCRIPTION_SIZE >= ERROR_MESSAGE_MIN_SIZE);

// =============================================================================
// Message Limits
// =============================================================================

/// Default maximum decoded gRPC request size (64 MiB).
///
/// Waveform writes carry the full sample buffer in a single message, so the
/// tonic default of 4 MiB is too small for long waveforms.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 64 * 1024 * 1024;
