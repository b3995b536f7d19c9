//! Mock NI-RFSG driver for the rfsg gRPC shim.
//!
//! [`MockRfsgLibrary`] implements [`RfsgLibrary`](rfsg_core::RfsgLibrary)
//! entirely in process. It keeps the parts of driver behavior the RPC layer
//! depends on:
//!
//! - per-session "most recent error" state, set when a write fails
//! - a static code-to-message table for `ErrorMessage`
//! - scripted statuses for upcoming writes ([`MockRfsgLibrary::queue_status`])
//! - error races: another caller overwriting a session's error state between
//!   a failed write and the follow-up `GetError`
//!   ([`MockRfsgLibrary::inject_error_race`])
//! - a bounded log of recent driver calls and the last waveform written per name
//!
//! ```rust,ignore
//! use rfsg_driver_mock::MockRfsgLibrary;
//!
//! let library = MockRfsgLibrary::new();
//! library.queue_status(-1074118656);
//! ```

mod calls;
mod library;

pub use calls::{DriverCall, StoredWaveform};
pub use library::{MockRfsgLibrary, CALL_LOG_CAPACITY, INVALID_PARAMETER_ERROR};
