//! Minimal in-crate driver double for unit tests.

use crate::library::RfsgLibrary;
use crate::types::{ViBoolean, ViInt16, ViInt32, ViSession, ViStatus};
use num_complex::Complex;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::ffi::CStr;

#[derive(Default)]
struct FakeState {
    write_status: ViStatus,
    recent_error: (ViStatus, String),
    static_messages: HashMap<ViStatus, String>,
    writes: Vec<(ViSession, String, ViInt32)>,
    error_message_calls: usize,
    error_message_status: ViStatus,
}

#[derive(Default)]
pub(crate) struct FakeLibrary {
    state: Mutex<FakeState>,
}

impl FakeLibrary {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_write_status(&self, status: ViStatus) {
        self.state.lock().write_status = status;
    }

    pub(crate) fn set_recent_error(&self, code: ViStatus, description: &str) {
        self.state.lock().recent_error = (code, description.to_string());
    }

    pub(crate) fn set_static_message(&self, code: ViStatus, message: &str) {
        self.state.lock().static_messages.insert(code, message.to_string());
    }

    pub(crate) fn set_error_message_status(&self, status: ViStatus) {
        self.state.lock().error_message_status = status;
    }

    pub(crate) fn writes(&self) -> Vec<(ViSession, String, ViInt32)> {
        self.state.lock().writes.clone()
    }

    pub(crate) fn error_message_calls(&self) -> usize {
        self.state.lock().error_message_calls
    }

    fn record_write(&self, vi: ViSession, name: &CStr, number_of_samples: ViInt32) -> ViStatus {
        let mut state = self.state.lock();
        state
            .writes
            .push((vi, name.to_string_lossy().into_owned(), number_of_samples));
        state.write_status
    }
}

fn copy_c_string(text: &str, buffer: &mut [u8]) {
    let len = text.len().min(buffer.len().saturating_sub(1));
    buffer[..len].copy_from_slice(&text.as_bytes()[..len]);
    if let Some(terminator) = buffer.get_mut(len) {
        *terminator = 0;
    }
}

impl RfsgLibrary for FakeLibrary {
    fn get_error(&self, _vi: ViSession, description: &mut [u8]) -> ViStatus {
        let state = self.state.lock();
        copy_c_string(&state.recent_error.1, description);
        state.recent_error.0
    }

    fn error_message(&self, _vi: ViSession, error_code: ViStatus, message: &mut [u8]) -> ViStatus {
        let mut state = self.state.lock();
        state.error_message_calls += 1;
        if let Some(text) = state.static_messages.get(&error_code) {
            copy_c_string(text, message);
        }
        state.error_message_status
    }

    fn write_arb_waveform_complex_f32(
        &self,
        vi: ViSession,
        waveform_name: &CStr,
        number_of_samples: ViInt32,
        _wfm_data: &[Complex<f32>],
        _more_data_pending: ViBoolean,
    ) -> ViStatus {
        self.record_write(vi, waveform_name, number_of_samples)
    }

    fn write_arb_waveform_complex_f64(
        &self,
        vi: ViSession,
        waveform_name: &CStr,
        number_of_samples: ViInt32,
        _wfm_data: &[Complex<f64>],
        _more_data_pending: ViBoolean,
    ) -> ViStatus {
        self.record_write(vi, waveform_name, number_of_samples)
    }

    fn write_arb_waveform_complex_i16(
        &self,
        vi: ViSession,
        waveform_name: &CStr,
        number_of_samples: ViInt32,
        _wfm_data: &[Complex<ViInt16>],
    ) -> ViStatus {
        self.record_write(vi, waveform_name, number_of_samples)
    }
}
