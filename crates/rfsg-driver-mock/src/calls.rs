//! Recorded driver interactions.

use num_complex::Complex;
use rfsg_core::{ViInt32, ViSession, ViStatus};

/// One call made into the mock driver.
#[derive(Debug, Clone, PartialEq)]
pub enum DriverCall {
    /// `GetError` on a session.
    GetError {
        /// Session queried.
        vi: ViSession,
    },
    /// `ErrorMessage` for a status code.
    ErrorMessage {
        /// Session passed along with the code.
        vi: ViSession,
        /// Code being described.
        error_code: ViStatus,
    },
    /// One of the `WriteArbWaveformComplex*` entry points.
    WriteArbWaveform {
        /// Target session.
        vi: ViSession,
        /// Waveform name as passed to the driver.
        waveform_name: String,
        /// Sample count argument (complex pairs).
        number_of_samples: ViInt32,
        /// `None` for the i16 entry point, which has no such flag.
        more_data_pending: Option<bool>,
        /// Status the mock returned.
        status: ViStatus,
    },
}

impl DriverCall {
    /// True for the waveform write entry points.
    pub fn is_write(&self) -> bool {
        matches!(self, DriverCall::WriteArbWaveform { .. })
    }
}

/// Last waveform written under a name, in the element type it was written with.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredWaveform {
    /// Written with `WriteArbWaveformComplexF32`.
    F32(Vec<Complex<f32>>),
    /// Written with `WriteArbWaveformComplexF64`.
    F64(Vec<Complex<f64>>),
    /// Written with `WriteArbWaveformComplexI16`.
    I16(Vec<Complex<i16>>),
}

impl StoredWaveform {
    /// Number of complex pairs.
    pub fn len(&self) -> usize {
        match self {
            StoredWaveform::F32(pairs) => pairs.len(),
            StoredWaveform::F64(pairs) => pairs.len(),
            StoredWaveform::I16(pairs) => pairs.len(),
        }
    }

    /// True if no pairs were written.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
