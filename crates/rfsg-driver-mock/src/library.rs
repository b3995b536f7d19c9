//! `MockRfsgLibrary` - scriptable in-process driver.

use crate::calls::{DriverCall, StoredWaveform};
use num_complex::Complex;
use parking_lot::Mutex;
use rfsg_core::types::{VI_SUCCESS, VI_TRUE};
use rfsg_core::{RfsgLibrary, ViBoolean, ViInt16, ViInt32, ViSession, ViStatus};
use std::collections::{HashMap, VecDeque};
use std::ffi::CStr;

/// Status the mock uses for invalid arguments (sample count mismatch).
pub const INVALID_PARAMETER_ERROR: ViStatus = -1_074_118_656;

/// Number of most recent calls kept by [`MockRfsgLibrary::calls`].
pub const CALL_LOG_CAPACITY: usize = 1024;

#[derive(Debug, Default)]
struct MockState {
    /// Statuses returned by the next writes, oldest first. Empty means success.
    queued_statuses: VecDeque<ViStatus>,
    /// Most recent error per session: (code, description).
    session_errors: HashMap<ViSession, (ViStatus, String)>,
    /// Errors that overwrite a session's state right after its next failed write.
    pending_races: HashMap<ViSession, (ViStatus, String)>,
    static_messages: HashMap<ViStatus, String>,
    dynamic_messages: HashMap<ViStatus, String>,
    /// Last waveform per (session, name).
    waveforms: HashMap<(ViSession, String), StoredWaveform>,
    /// Most recent calls, oldest first, at most `CALL_LOG_CAPACITY`.
    calls: VecDeque<DriverCall>,
    write_count: usize,
}

impl MockState {
    fn record(&mut self, call: DriverCall) {
        if self.calls.len() == CALL_LOG_CAPACITY {
            self.calls.pop_front();
        }
        if call.is_write() {
            self.write_count += 1;
        }
        self.calls.push_back(call);
    }
}

/// In-process [`RfsgLibrary`] with per-session error state.
#[derive(Debug)]
pub struct MockRfsgLibrary {
    state: Mutex<MockState>,
}

impl Default for MockRfsgLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRfsgLibrary {
    /// Create a mock whose writes succeed until told otherwise.
    pub fn new() -> Self {
        let mut state = MockState::default();
        state.static_messages.insert(
            INVALID_PARAMETER_ERROR,
            "Invalid value for parameter or property.".to_string(),
        );
        Self {
            state: Mutex::new(state),
        }
    }

    /// Description returned by `ErrorMessage` for `code`.
    pub fn set_static_message(&self, code: ViStatus, message: impl Into<String>) {
        self.state.lock().static_messages.insert(code, message.into());
    }

    /// Description recorded on the session when a write fails with `code`.
    ///
    /// Without one, failed writes record the static message followed by the
    /// waveform name.
    pub fn set_dynamic_message(&self, code: ViStatus, message: impl Into<String>) {
        self.state.lock().dynamic_messages.insert(code, message.into());
    }

    /// Make the next write return `status`.
    pub fn queue_status(&self, status: ViStatus) {
        self.state.lock().queued_statuses.push_back(status);
    }

    /// Overwrite the most recent error recorded on `vi`.
    pub fn set_session_error(&self, vi: ViSession, code: ViStatus, description: impl Into<String>) {
        self.state
            .lock()
            .session_errors
            .insert(vi, (code, description.into()));
    }

    /// Simulate a concurrent call on `vi` failing right after our next failed write.
    ///
    /// The session's most recent error becomes `(code, description)` before
    /// the RPC layer gets to query it.
    pub fn inject_error_race(&self, vi: ViSession, code: ViStatus, description: impl Into<String>) {
        self.state
            .lock()
            .pending_races
            .insert(vi, (code, description.into()));
    }

    /// The most recent calls, oldest first.
    ///
    /// Only the last [`CALL_LOG_CAPACITY`] calls are kept, so a long-running
    /// daemon on the mock does not grow without bound.
    pub fn calls(&self) -> Vec<DriverCall> {
        self.state.lock().calls.iter().cloned().collect()
    }

    /// Number of waveform write calls made so far.
    pub fn write_count(&self) -> usize {
        self.state.lock().write_count
    }

    /// Last waveform successfully written to `vi` under `name`.
    pub fn waveform(&self, vi: ViSession, name: &str) -> Option<StoredWaveform> {
        self.state
            .lock()
            .waveforms
            .get(&(vi, name.to_string()))
            .cloned()
    }

    fn write(
        &self,
        vi: ViSession,
        waveform_name: &CStr,
        number_of_samples: ViInt32,
        pair_count: usize,
        more_data_pending: Option<ViBoolean>,
        data: impl FnOnce() -> StoredWaveform,
    ) -> ViStatus {
        let name = waveform_name.to_string_lossy().into_owned();
        let mut state = self.state.lock();

        let status = if usize::try_from(number_of_samples).ok() != Some(pair_count) {
            INVALID_PARAMETER_ERROR
        } else {
            state.queued_statuses.pop_front().unwrap_or(VI_SUCCESS)
        };

        state.record(DriverCall::WriteArbWaveform {
            vi,
            waveform_name: name.clone(),
            number_of_samples,
            more_data_pending: more_data_pending.map(|flag| flag == VI_TRUE),
            status,
        });

        if status < 0 {
            let description = state
                .dynamic_messages
                .get(&status)
                .cloned()
                .or_else(|| {
                    state
                        .static_messages
                        .get(&status)
                        .map(|message| format!("{}\n\nWaveform Name: {}", message, name))
                })
                .unwrap_or_default();
            state.session_errors.insert(vi, (status, description));
            if let Some(race) = state.pending_races.remove(&vi) {
                tracing::debug!(vi, code = race.0, "Injecting concurrent error");
                state.session_errors.insert(vi, race);
            }
        } else {
            state.waveforms.insert((vi, name), data());
        }

        status
    }
}

/// Copy `text` into a C buffer, truncating and NUL-terminating.
fn copy_c_string(text: &str, buffer: &mut [u8]) {
    let len = text.len().min(buffer.len().saturating_sub(1));
    buffer[..len].copy_from_slice(&text.as_bytes()[..len]);
    if let Some(terminator) = buffer.get_mut(len) {
        *terminator = 0;
    }
}

impl RfsgLibrary for MockRfsgLibrary {
    fn get_error(&self, vi: ViSession, description: &mut [u8]) -> ViStatus {
        let mut state = self.state.lock();
        state.record(DriverCall::GetError { vi });
        match state.session_errors.get(&vi) {
            Some((code, text)) => {
                copy_c_string(text, description);
                *code
            }
            None => {
                copy_c_string("", description);
                VI_SUCCESS
            }
        }
    }

    fn error_message(&self, vi: ViSession, error_code: ViStatus, message: &mut [u8]) -> ViStatus {
        let mut state = self.state.lock();
        state.record(DriverCall::ErrorMessage { vi, error_code });
        let text = state
            .static_messages
            .get(&error_code)
            .map(String::as_str)
            .unwrap_or("");
        copy_c_string(text, message);
        VI_SUCCESS
    }

    fn write_arb_waveform_complex_f32(
        &self,
        vi: ViSession,
        waveform_name: &CStr,
        number_of_samples: ViInt32,
        wfm_data: &[Complex<f32>],
        more_data_pending: ViBoolean,
    ) -> ViStatus {
        self.write(
            vi,
            waveform_name,
            number_of_samples,
            wfm_data.len(),
            Some(more_data_pending),
            || StoredWaveform::F32(wfm_data.to_vec()),
        )
    }

    fn write_arb_waveform_complex_f64(
        &self,
        vi: ViSession,
        waveform_name: &CStr,
        number_of_samples: ViInt32,
        wfm_data: &[Complex<f64>],
        more_data_pending: ViBoolean,
    ) -> ViStatus {
        self.write(
            vi,
            waveform_name,
            number_of_samples,
            wfm_data.len(),
            Some(more_data_pending),
            || StoredWaveform::F64(wfm_data.to_vec()),
        )
    }

    fn write_arb_waveform_complex_i16(
        &self,
        vi: ViSession,
        waveform_name: &CStr,
        number_of_samples: ViInt32,
        wfm_data: &[Complex<ViInt16>],
    ) -> ViStatus {
        self.write(
            vi,
            waveform_name,
            number_of_samples,
            wfm_data.len(),
            None,
            || StoredWaveform::I16(wfm_data.to_vec()),
        )
    }
}
