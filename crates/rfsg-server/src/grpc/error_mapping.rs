//! Mapping from `RfsgError` to gRPC `Status`.
//!
//! # Mapping
//!
//! - **Unknown**: the driver returned a negative status. The message is the
//!   driver's description and the code travels in the `ni-error` trailer.
//! - **Cancelled**: the call was cancelled before reaching the driver.
//! - **NotFound**: the session name is not registered.
//! - **InvalidArgument**: the request cannot be marshaled for the driver.
//! - **Internal**: server-side faults, including driver library problems.
//!
//! Every status also carries `x-rfsg-error-kind` with [`RfsgError::kind`].

use rfsg_core::{RfsgError, RfsgResult};
use std::str::FromStr;
use tonic::metadata::{MetadataMap, MetadataValue};
use tonic::{Code, Status};

/// Trailer holding the error category.
pub const ERROR_KIND_HEADER: &str = "x-rfsg-error-kind";
/// Trailer holding the driver status code of a failed driver call.
pub const NI_ERROR_HEADER: &str = "ni-error";

fn sanitize_metadata_value(value: &str) -> String {
    let ascii: String = value.chars().filter(|c| c.is_ascii() && !c.is_ascii_control()).collect();
    let trimmed = ascii.trim();
    if trimmed.is_empty() {
        "unknown".to_string()
    } else {
        trimmed.to_string()
    }
}

fn insert_metadata(metadata: &mut MetadataMap, key: &'static str, value: &str) {
    let sanitized = sanitize_metadata_value(value);
    if let Ok(val) = MetadataValue::from_str(&sanitized) {
        metadata.insert(key, val);
    }
}

fn status_with_metadata(code: Code, message: impl Into<String>, err: &RfsgError) -> Status {
    let mut status = Status::new(code, message.into());
    let metadata = status.metadata_mut();
    insert_metadata(metadata, ERROR_KIND_HEADER, err.kind());
    if let Some(code) = err.driver_code() {
        insert_metadata(metadata, NI_ERROR_HEADER, &code.to_string());
    }
    status
}

/// Map an `RfsgError` to the status returned to the client.
///
/// ```
/// use rfsg_core::{DriverError, RfsgError};
/// use rfsg_server::grpc::map_rfsg_error_to_status;
/// use tonic::Code;
///
/// let err = RfsgError::Driver(DriverError::new(-1074118656, "Invalid parameter."));
/// let status = map_rfsg_error_to_status(err);
/// assert_eq!(status.code(), Code::Unknown);
/// assert_eq!(status.message(), "Invalid parameter.");
/// ```
pub fn map_rfsg_error_to_status(err: RfsgError) -> Status {
    match &err {
        RfsgError::Driver(driver) => {
            status_with_metadata(Code::Unknown, driver.description.clone(), &err)
        }
        RfsgError::Cancelled => status_with_metadata(Code::Cancelled, "", &err),
        RfsgError::SessionNotFound(_) => {
            status_with_metadata(Code::NotFound, err.to_string(), &err)
        }
        RfsgError::OddSampleCount { .. }
        | RfsgError::SampleCountOverflow { .. }
        | RfsgError::SampleOutOfRange { .. }
        | RfsgError::InvalidWaveformName(_) => {
            status_with_metadata(Code::InvalidArgument, err.to_string(), &err)
        }
        RfsgError::LibraryLoad { .. } | RfsgError::SymbolNotFound(_) | RfsgError::Internal(_) => {
            status_with_metadata(Code::Internal, err.to_string(), &err)
        }
    }
}

/// Convert `RfsgResult` into a tonic result.
pub trait RfsgResultExt<T> {
    /// Map the error through [`map_rfsg_error_to_status`].
    fn map_rfsg_err(self) -> Result<T, Status>;
}

impl<T> RfsgResultExt<T> for RfsgResult<T> {
    fn map_rfsg_err(self) -> Result<T, Status> {
        self.map_err(map_rfsg_error_to_status)
    }
}
