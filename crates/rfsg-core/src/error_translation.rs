//! Translation of failed driver status codes into descriptions.
//!
//! Driver error state belongs to the session handle, not to the call: two
//! calls sharing a handle can overwrite each other's "most recent error".
//! Translation therefore runs in two phases:
//!
//! 1. Ask the driver for the most recent error on the handle. If it reports
//!    the same code we are translating, its description is the situational
//!    one for this failure.
//! 2. Otherwise another call has changed the handle's error state since our
//!    call returned. Fall back to the static description for the code, which
//!    does not depend on handle state.
//!
//! Either way the description returned belongs to the code being reported.
//! Translation never fails; if the driver produces nothing usable the
//! description is empty.

use crate::error::DriverError;
use crate::library::RfsgLibrary;
use crate::limits::MAX_ERROR_DESCRIPTION_SIZE;
use crate::types::{ViSession, ViStatus};
use tracing::debug;

/// Build the failure description for `code`, returned by a call on `vi`.
pub fn translate(library: &dyn RfsgLibrary, vi: ViSession, code: ViStatus) -> DriverError {
    let mut description = vec![0u8; MAX_ERROR_DESCRIPTION_SIZE];
    let error_code = library.get_error(vi, &mut description);

    if error_code != code {
        debug!(
            vi,
            code,
            recent_error = error_code,
            "Session error state changed; falling back to static error message"
        );
        description.fill(0);
        let status = library.error_message(vi, code, &mut description);
        if status < 0 {
            debug!(vi, code, status, "ErrorMessage failed; description may be empty");
        }
    }

    DriverError::new(code, decode_description(&description))
}

/// Decode a NUL-terminated driver buffer, replacing invalid UTF-8.
fn decode_description(buffer: &[u8]) -> String {
    let end = buffer.iter().position(|&b| b == 0).unwrap_or(buffer.len());
    String::from_utf8_lossy(&buffer[..end]).into_owned()
}
