//! The driver boundary.
//!
//! [`RfsgLibrary`] mirrors the subset of the NI-RFSG C API used by the RPC
//! layer. Implementations keep C calling semantics: every function returns a
//! [`ViStatus`], and text is written NUL-terminated into caller-owned
//! buffers. Implementations must be callable from many threads at once; the
//! driver's per-session error state is shared and may change between calls.

use crate::types::{ViBoolean, ViInt16, ViInt32, ViReal32, ViReal64, ViSession, ViStatus};
use num_complex::Complex;
use std::ffi::CStr;

/// Status-code-returning NI-RFSG entry points.
pub trait RfsgLibrary: Send + Sync {
    /// Fetch the most recent error recorded on `vi`.
    ///
    /// Writes the description into `description` (NUL-terminated, truncated
    /// to the buffer) and returns the error code the driver associates with
    /// it. Returns `0` when no error is recorded.
    fn get_error(&self, vi: ViSession, description: &mut [u8]) -> ViStatus;

    /// Look up the static description of `error_code`.
    ///
    /// Independent of the current error state of `vi`. `message` must hold
    /// at least [`ERROR_MESSAGE_MIN_SIZE`](crate::limits::ERROR_MESSAGE_MIN_SIZE) bytes.
    fn error_message(&self, vi: ViSession, error_code: ViStatus, message: &mut [u8]) -> ViStatus;

    /// `niRFSG_WriteArbWaveformComplexF32`.
    fn write_arb_waveform_complex_f32(
        &self,
        vi: ViSession,
        waveform_name: &CStr,
        number_of_samples: ViInt32,
        wfm_data: &[Complex<ViReal32>],
        more_data_pending: ViBoolean,
    ) -> ViStatus;

    /// `niRFSG_WriteArbWaveformComplexF64`.
    fn write_arb_waveform_complex_f64(
        &self,
        vi: ViSession,
        waveform_name: &CStr,
        number_of_samples: ViInt32,
        wfm_data: &[Complex<ViReal64>],
        more_data_pending: ViBoolean,
    ) -> ViStatus;

    /// `niRFSG_WriteArbWaveformComplexI16`.
    fn write_arb_waveform_complex_i16(
        &self,
        vi: ViSession,
        waveform_name: &CStr,
        number_of_samples: ViInt32,
        wfm_data: &[Complex<ViInt16>],
    ) -> ViStatus;
}
