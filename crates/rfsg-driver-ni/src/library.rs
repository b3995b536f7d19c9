//! Runtime-loaded NI-RFSG shared library.

use crate::ffi::{
    ErrorMessageFn, GetErrorFn, WriteArbWaveformComplexF32Fn, WriteArbWaveformComplexF64Fn,
    WriteArbWaveformComplexI16Fn,
};
use libloading::Library;
use num_complex::Complex;
use rfsg_core::limits::ERROR_MESSAGE_MIN_SIZE;
use rfsg_core::{
    RfsgError, RfsgLibrary, RfsgResult, ViBoolean, ViInt16, ViInt32, ViReal32, ViReal64,
    ViSession, ViStatus,
};
use std::ffi::CStr;
use std::path::{Path, PathBuf};

/// Library name the driver installs on this platform.
#[cfg(windows)]
pub const DEFAULT_LIBRARY_NAME: &str = "niRFSG_64.dll";
/// Library name the driver installs on this platform.
#[cfg(not(windows))]
pub const DEFAULT_LIBRARY_NAME: &str = "libnirfsg.so";

/// NI-RFSG entry points resolved from the vendor library.
///
/// Function pointers are copied out at load time; the [`Library`] handle is
/// kept alive alongside them so they stay valid.
pub struct NiRfsgLibrary {
    _library: Library,
    path: PathBuf,
    get_error: GetErrorFn,
    error_message: ErrorMessageFn,
    write_f32: WriteArbWaveformComplexF32Fn,
    write_f64: WriteArbWaveformComplexF64Fn,
    write_i16: WriteArbWaveformComplexI16Fn,
}

impl std::fmt::Debug for NiRfsgLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NiRfsgLibrary")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Resolve `name` from `library`, copying the function pointer out.
///
/// # Safety
///
/// `T` must match the C signature of the exported symbol.
unsafe fn resolve<T: Copy>(library: &Library, name: &'static str) -> RfsgResult<T> {
    let symbol = format!("{name}\0");
    library
        .get::<T>(symbol.as_bytes())
        .map(|sym| *sym)
        .map_err(|_| RfsgError::SymbolNotFound(name))
}

impl NiRfsgLibrary {
    /// Load the driver from `path` and resolve every entry point used here.
    ///
    /// Loading runs the library's initialisers; the file must be a genuine
    /// NI-RFSG runtime.
    pub fn load<P: AsRef<Path>>(path: P) -> RfsgResult<Self> {
        let path = path.as_ref();

        let library = unsafe { Library::new(path) }.map_err(|e| RfsgError::LibraryLoad {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let (get_error, error_message, write_f32, write_f64, write_i16) = unsafe {
            (
                resolve::<GetErrorFn>(&library, "niRFSG_GetError")?,
                resolve::<ErrorMessageFn>(&library, "niRFSG_ErrorMessage")?,
                resolve::<WriteArbWaveformComplexF32Fn>(
                    &library,
                    "niRFSG_WriteArbWaveformComplexF32",
                )?,
                resolve::<WriteArbWaveformComplexF64Fn>(
                    &library,
                    "niRFSG_WriteArbWaveformComplexF64",
                )?,
                resolve::<WriteArbWaveformComplexI16Fn>(
                    &library,
                    "niRFSG_WriteArbWaveformComplexI16",
                )?,
            )
        };

        tracing::info!(path = %path.display(), "Loaded NI-RFSG library");

        Ok(Self {
            _library: library,
            path: path.to_path_buf(),
            get_error,
            error_message,
            write_f32,
            write_f64,
            write_i16,
        })
    }

    /// Load the driver by its platform library name from the loader search path.
    pub fn load_default() -> RfsgResult<Self> {
        Self::load(DEFAULT_LIBRARY_NAME)
    }

    /// Path the library was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

// The library only holds function pointers and the handle keeping them
// loaded. NI-RFSG entry points are thread safe.
unsafe impl Send for NiRfsgLibrary {}
unsafe impl Sync for NiRfsgLibrary {}

impl RfsgLibrary for NiRfsgLibrary {
    fn get_error(&self, vi: ViSession, description: &mut [u8]) -> ViStatus {
        let mut error_code: ViStatus = 0;
        let size = ViInt32::try_from(description.len()).unwrap_or(ViInt32::MAX);
        let status = unsafe {
            (self.get_error)(vi, &mut error_code, size, description.as_mut_ptr().cast())
        };
        if status < 0 {
            tracing::debug!(vi, status, "niRFSG_GetError failed");
        }
        error_code
    }

    fn error_message(&self, vi: ViSession, error_code: ViStatus, message: &mut [u8]) -> ViStatus {
        if message.len() >= ERROR_MESSAGE_MIN_SIZE {
            return unsafe { (self.error_message)(vi, error_code, message.as_mut_ptr().cast()) };
        }

        // The driver writes up to 256 bytes regardless of the buffer passed.
        let mut scratch = [0u8; ERROR_MESSAGE_MIN_SIZE];
        let status = unsafe { (self.error_message)(vi, error_code, scratch.as_mut_ptr().cast()) };
        if let Some(last) = message.len().checked_sub(1) {
            message[..last].copy_from_slice(&scratch[..last]);
            message[last] = 0;
        }
        status
    }

    fn write_arb_waveform_complex_f32(
        &self,
        vi: ViSession,
        waveform_name: &CStr,
        number_of_samples: ViInt32,
        wfm_data: &[Complex<ViReal32>],
        more_data_pending: ViBoolean,
    ) -> ViStatus {
        // wfmData is input only despite its non-const C declaration.
        unsafe {
            (self.write_f32)(
                vi,
                waveform_name.as_ptr(),
                number_of_samples,
                wfm_data.as_ptr().cast_mut(),
                more_data_pending,
            )
        }
    }

    fn write_arb_waveform_complex_f64(
        &self,
        vi: ViSession,
        waveform_name: &CStr,
        number_of_samples: ViInt32,
        wfm_data: &[Complex<ViReal64>],
        more_data_pending: ViBoolean,
    ) -> ViStatus {
        unsafe {
            (self.write_f64)(
                vi,
                waveform_name.as_ptr(),
                number_of_samples,
                wfm_data.as_ptr().cast_mut(),
                more_data_pending,
            )
        }
    }

    fn write_arb_waveform_complex_i16(
        &self,
        vi: ViSession,
        waveform_name: &CStr,
        number_of_samples: ViInt32,
        wfm_data: &[Complex<ViInt16>],
    ) -> ViStatus {
        unsafe {
            (self.write_i16)(
                vi,
                waveform_name.as_ptr(),
                number_of_samples,
                wfm_data.as_ptr().cast_mut(),
            )
        }
    }
}
