//! Interleaved waveform marshaling.
//!
//! Waveforms arrive as flat arrays of real numbers holding interleaved I/Q
//! components: `[i0, q0, i1, q1, ...]`. The driver expects an array of
//! complex structs `{ real, imaginary }` of the same element type. Because
//! [`Complex<T>`] is `#[repr(C)]` with exactly two `T` fields, the wire slice
//! can be viewed as a complex slice without copying.
//!
//! The allowed pairings are fixed by the sealed [`InterleavedSample`] trait:
//!
//! | wire element | driver element   |
//! |--------------|------------------|
//! | `f32`        | `Complex<f32>`   |
//! | `f64`        | `Complex<f64>`   |
//! | `i16`        | `Complex<i16>`   |
//!
//! A view of one width over storage of another cannot be expressed.

use crate::error::{RfsgError, RfsgResult};
use crate::types::{ViInt16, ViInt32};
use num_complex::Complex;
use std::ffi::CString;

mod sealed {
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
    impl Sealed for i16 {}
}

/// Real element type that may be reinterpreted as interleaved complex pairs.
pub trait InterleavedSample: bytemuck::Pod + sealed::Sealed {
    /// Name used in logs and error messages.
    const TYPE_NAME: &'static str;
}

impl InterleavedSample for f32 {
    const TYPE_NAME: &'static str = "f32";
}

impl InterleavedSample for f64 {
    const TYPE_NAME: &'static str = "f64";
}

impl InterleavedSample for i16 {
    const TYPE_NAME: &'static str = "i16";
}

/// Borrowed complex-pair view over an interleaved sample buffer.
#[derive(Debug, Clone, Copy)]
pub struct ComplexView<'a, T> {
    pairs: &'a [Complex<T>],
    number_of_samples: ViInt32,
}

impl<'a, T> ComplexView<'a, T> {
    /// The complex pairs, aliasing the original buffer.
    pub fn pairs(&self) -> &'a [Complex<T>] {
        self.pairs
    }

    /// Number of complex pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// True for an empty waveform.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Pair count as the driver's sample count argument.
    pub fn number_of_samples(&self) -> ViInt32 {
        self.number_of_samples
    }
}

/// View an interleaved real buffer as complex pairs.
///
/// The pair count is `samples.len() / 2`. Odd-length buffers are rejected
/// with [`RfsgError::OddSampleCount`] rather than dropping the trailing
/// element, and counts beyond `ViInt32::MAX` with
/// [`RfsgError::SampleCountOverflow`]. An empty buffer yields an empty view.
pub fn as_complex_pairs<T: InterleavedSample>(samples: &[T]) -> RfsgResult<ComplexView<'_, T>> {
    if samples.len() % 2 != 0 {
        return Err(RfsgError::OddSampleCount { len: samples.len() });
    }

    let count = samples.len() / 2;
    let number_of_samples =
        ViInt32::try_from(count).map_err(|_| RfsgError::SampleCountOverflow { count })?;

    // Complex<T> has the size of two T and the alignment of T, so this only
    // fails if the layout assumption is broken.
    let pairs: &[Complex<T>] = bytemuck::try_cast_slice(samples).map_err(|e| {
        RfsgError::Internal(format!(
            "cannot view {} buffer as complex pairs: {}",
            T::TYPE_NAME,
            e
        ))
    })?;
    debug_assert_eq!(pairs.len(), count);

    Ok(ComplexView {
        pairs,
        number_of_samples,
    })
}

/// Narrow the 32-bit wire form of 16-bit samples.
///
/// Protobuf has no 16-bit scalar, so I16 waveforms travel as `sint32`.
/// Values outside `i16` are rejected instead of wrapped.
pub fn narrow_i16(samples: &[i32]) -> RfsgResult<Vec<ViInt16>> {
    samples
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            ViInt16::try_from(value).map_err(|_| RfsgError::SampleOutOfRange {
                index,
                value: i64::from(value),
            })
        })
        .collect()
}

/// Convert a waveform name into the C string passed to the driver.
pub fn waveform_name_to_c_string(name: &str) -> RfsgResult<CString> {
    CString::new(name).map_err(|_| RfsgError::InvalidWaveformName(name.to_string()))
}
