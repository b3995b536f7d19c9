//! Raw NI-RFSG entry point signatures.
//!
//! All functions use the C calling convention and return a `ViStatus`.
//! `ViConstString` arguments are NUL-terminated; `ViChar[]` outputs are
//! caller-owned buffers.

use num_complex::Complex;
use rfsg_core::{ViBoolean, ViInt16, ViInt32, ViReal32, ViReal64, ViSession, ViStatus};
use std::ffi::c_char;

/// ```c
/// ViStatus niRFSG_GetError(ViSession vi, ViStatus* errorCode,
///                          ViInt32 errorDescriptionBufferSize, ViChar errorDescription[]);
/// ```
pub type GetErrorFn = unsafe extern "C" fn(
    vi: ViSession,
    error_code: *mut ViStatus,
    error_description_buffer_size: ViInt32,
    error_description: *mut c_char,
) -> ViStatus;

/// ```c
/// ViStatus niRFSG_ErrorMessage(ViSession vi, ViStatus errorCode, ViChar errorMessage[256]);
/// ```
pub type ErrorMessageFn =
    unsafe extern "C" fn(vi: ViSession, error_code: ViStatus, error_message: *mut c_char) -> ViStatus;

/// ```c
/// ViStatus niRFSG_WriteArbWaveformComplexF32(ViSession vi, ViConstString waveformName,
///     ViInt32 numberOfSamples, NIComplexNumberF32_struct wfmData[], ViBoolean moreDataPending);
/// ```
pub type WriteArbWaveformComplexF32Fn = unsafe extern "C" fn(
    vi: ViSession,
    waveform_name: *const c_char,
    number_of_samples: ViInt32,
    wfm_data: *mut Complex<ViReal32>,
    more_data_pending: ViBoolean,
) -> ViStatus;

/// ```c
/// ViStatus niRFSG_WriteArbWaveformComplexF64(ViSession vi, ViConstString waveformName,
///     ViInt32 numberOfSamples, NIComplexNumber_struct wfmData[], ViBoolean moreDataPending);
/// ```
pub type WriteArbWaveformComplexF64Fn = unsafe extern "C" fn(
    vi: ViSession,
    waveform_name: *const c_char,
    number_of_samples: ViInt32,
    wfm_data: *mut Complex<ViReal64>,
    more_data_pending: ViBoolean,
) -> ViStatus;

/// ```c
/// ViStatus niRFSG_WriteArbWaveformComplexI16(ViSession vi, ViConstString waveformName,
///     ViInt32 numberOfSamples, NIComplexI16_struct wfmData[]);
/// ```
pub type WriteArbWaveformComplexI16Fn = unsafe extern "C" fn(
    vi: ViSession,
    waveform_name: *const c_char,
    number_of_samples: ViInt32,
    wfm_data: *mut Complex<ViInt16>,
) -> ViStatus;
