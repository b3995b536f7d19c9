//! NI-RFSG driver binding.
//!
//! [`NiRfsgLibrary`] opens the vendor runtime (`libnirfsg.so` or
//! `niRFSG_64.dll`) with `libloading` and implements
//! [`RfsgLibrary`](rfsg_core::RfsgLibrary) by calling straight into it.
//! Waveform slices are passed to the driver by pointer without copying;
//! `Complex<T>` has the same layout as the driver's complex structs.
//!
//! Resolution happens once at load: a missing entry point fails
//! [`NiRfsgLibrary::load`] with
//! [`RfsgError::SymbolNotFound`](rfsg_core::RfsgError::SymbolNotFound)
//! instead of failing later at call time.

#![allow(unsafe_code)]

pub mod ffi;
mod library;

pub use library::{NiRfsgLibrary, DEFAULT_LIBRARY_NAME};
