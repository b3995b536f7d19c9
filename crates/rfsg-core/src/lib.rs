//! `rfsg-core`
//!
//! Transport-agnostic building blocks for exposing the NI-RFSG driver over RPC.
//!
//! Every remote operation follows the same skeleton: check for cancellation,
//! resolve the caller's session name to a driver handle, marshal the request
//! into the driver's memory layout, invoke the driver and classify the
//! returned status code. This crate holds each of those pieces:
//!
//! - [`types`]: VISA scalar aliases (`ViStatus`, `ViSession`, ...) and [`status_ok`]
//! - [`library`]: the [`RfsgLibrary`] trait implemented by real and mock drivers
//! - [`session`]: the [`SessionRepository`] lookup contract
//! - [`marshal`]: zero-copy interleaved-sample to complex-pair views
//! - [`error_translation`]: two-phase diagnostic lookup for failed calls
//! - [`adapter`]: the [`CallAdapter`] that sequences all of the above
//!
//! ## Example
//!
//! ```rust,ignore
//! use rfsg_core::{as_complex_pairs, CallAdapter};
//!
//! let status = adapter.run(&context, "sessA", |library, vi| {
//!     let view = as_complex_pairs(&samples)?;
//!     Ok(library.write_arb_waveform_complex_f32(vi, &name, view.number_of_samples(), view.pairs(), 0))
//! })?;
//! ```

pub mod adapter;
pub mod error;
pub mod error_translation;
pub mod library;
pub mod limits;
pub mod marshal;
pub mod session;
pub mod types;

#[cfg(test)]
mod testing;

pub use adapter::{CallAdapter, CallContext};
pub use error::{DriverError, RfsgError, RfsgResult};
pub use error_translation::translate;
pub use library::RfsgLibrary;
pub use marshal::{as_complex_pairs, narrow_i16, waveform_name_to_c_string, ComplexView};
pub use session::{InMemorySessionRepository, SessionRepository};
pub use types::{status_ok, ViBoolean, ViInt16, ViInt32, ViReal32, ViReal64, ViSession, ViStatus};

pub use num_complex::Complex;
