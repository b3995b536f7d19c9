//! VISA scalar types shared with the NI-RFSG C API.
//!
//! The aliases keep driver signatures readable next to the vendor
//! documentation. Widths match `visatype.h`.

/// Driver status code. Non-negative is success (possibly a warning), negative is failure.
pub type ViStatus = i32;
/// Opaque driver session handle.
pub type ViSession = u32;
/// 32-bit signed integer argument.
pub type ViInt32 = i32;
/// 16-bit signed integer argument.
pub type ViInt16 = i16;
/// Single precision float argument.
pub type ViReal32 = f32;
/// Double precision float argument.
pub type ViReal64 = f64;
/// VISA boolean (`VI_TRUE` / `VI_FALSE`).
pub type ViBoolean = u16;

/// VISA true.
pub const VI_TRUE: ViBoolean = 1;
/// VISA false.
pub const VI_FALSE: ViBoolean = 0;
/// Status returned by a call that completed without error or warning.
pub const VI_SUCCESS: ViStatus = 0;

/// Returns true if it is safe to use the outputs of a call that returned `status`.
#[inline]
pub fn status_ok(status: ViStatus) -> bool {
    status >= 0
}

/// Convert a Rust bool into the driver's boolean representation.
#[inline]
pub fn to_vi_boolean(value: bool) -> ViBoolean {
    if value {
        VI_TRUE
    } else {
        VI_FALSE
    }
}
