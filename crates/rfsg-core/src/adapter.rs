//! The per-call control skeleton.
//!
//! Every operation runs through [`CallAdapter::run`]:
//!
//! ```text
//! Start -> CancelCheck -> Resolve -> Marshal -> Invoke -> Classify -> { Success | Translate -> Failure }
//! ```
//!
//! - **CancelCheck**: a cancelled call ends here, before any session or
//!   driver interaction.
//! - **Resolve**: session name to handle; an unknown name ends the call
//!   without reaching the driver.
//! - **Marshal / Invoke**: supplied by the operation as a closure that
//!   receives the library and the resolved handle. Marshaling errors end the
//!   call before the driver function is entered.
//! - **Classify**: non-negative status is returned as-is (warnings included);
//!   negative status is translated into a [`DriverError`](crate::DriverError).
//!
//! The adapter is synchronous. The invoke step may block on hardware I/O, so
//! async callers run it on a blocking thread.

use crate::error::{RfsgError, RfsgResult};
use crate::error_translation::translate;
use crate::library::RfsgLibrary;
use crate::session::SessionRepository;
use crate::types::{status_ok, ViSession, ViStatus};
use std::sync::Arc;
use tracing::{debug, warn};

/// Cancellation state of the call being serviced.
pub trait CallContext {
    /// True if the call was cancelled before it reached the adapter.
    fn is_cancelled(&self) -> bool;
}

/// A context that is never cancelled.
impl CallContext for () {
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Shared driver and session collaborators for every call.
#[derive(Clone)]
pub struct CallAdapter {
    library: Arc<dyn RfsgLibrary>,
    sessions: Arc<dyn SessionRepository>,
}

impl CallAdapter {
    /// Adapter dispatching to `library` with handles from `sessions`.
    pub fn new(library: Arc<dyn RfsgLibrary>, sessions: Arc<dyn SessionRepository>) -> Self {
        Self { library, sessions }
    }

    /// Run one call against the session named `session_name`.
    ///
    /// `invoke` marshals the request and calls the driver, returning its raw
    /// status. On success the (non-negative) status is returned; a negative
    /// status becomes [`RfsgError::Driver`] with a translated description.
    pub fn run<C, F>(&self, context: &C, session_name: &str, invoke: F) -> RfsgResult<ViStatus>
    where
        C: CallContext + ?Sized,
        F: FnOnce(&dyn RfsgLibrary, ViSession) -> RfsgResult<ViStatus>,
    {
        if context.is_cancelled() {
            debug!(session = session_name, "Call cancelled before dispatch");
            return Err(RfsgError::Cancelled);
        }

        let vi = self.sessions.access_session(session_name)?;
        debug!(session = session_name, vi, "Resolved session");

        let status = invoke(self.library.as_ref(), vi)?;
        if status_ok(status) {
            debug!(session = session_name, vi, status, "Driver call succeeded");
            return Ok(status);
        }

        let err = translate(self.library.as_ref(), vi, status);
        warn!(
            session = session_name,
            vi,
            code = err.code,
            description = %err.description,
            "Driver call failed"
        );
        Err(RfsgError::Driver(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marshal::{as_complex_pairs, waveform_name_to_c_string};
    use crate::session::InMemorySessionRepository;
    use crate::testing::FakeLibrary;
    use crate::types::VI_FALSE;
    use std::cell::Cell;

    struct Cancelled;

    impl CallContext for Cancelled {
        fn is_cancelled(&self) -> bool {
            true
        }
    }

    fn adapter_with(library: Arc<FakeLibrary>) -> CallAdapter {
        let sessions: InMemorySessionRepository = [("sessA", 42)].into_iter().collect();
        CallAdapter::new(library, Arc::new(sessions))
    }

    fn write_f32(
        adapter: &CallAdapter,
        context: &dyn CallContext,
        session: &str,
        data: &[f32],
    ) -> RfsgResult<ViStatus> {
        adapter.run(context, session, |library, vi| {
            let name = waveform_name_to_c_string("wfm")?;
            let view = as_complex_pairs(data)?;
            Ok(library.write_arb_waveform_complex_f32(
                vi,
                &name,
                view.number_of_samples(),
                view.pairs(),
                VI_FALSE,
            ))
        })
    }

    #[test]
    fn success_returns_driver_status() {
        let library = Arc::new(FakeLibrary::new());
        let adapter = adapter_with(library.clone());

        let status = write_f32(&adapter, &(), "sessA", &[1.0, 2.0, 3.0, 4.0]).unwrap();

        assert_eq!(status, 0);
        assert_eq!(library.writes(), vec![(42, "wfm".to_string(), 2)]);
    }

    #[test]
    fn warnings_are_successes() {
        let library = Arc::new(FakeLibrary::new());
        library.set_write_status(1);
        let adapter = adapter_with(library);

        assert_eq!(write_f32(&adapter, &(), "sessA", &[]).unwrap(), 1);
    }

    #[test]
    fn cancellation_skips_resolution_and_driver() {
        let library = Arc::new(FakeLibrary::new());
        let adapter = adapter_with(library.clone());
        let invoked = Cell::new(false);

        let err = adapter
            .run(&Cancelled, "no-such-session", |_, _| {
                invoked.set(true);
                Ok(0)
            })
            .unwrap_err();

        assert!(matches!(err, RfsgError::Cancelled));
        assert!(!invoked.get());
        assert!(library.writes().is_empty());
    }

    #[test]
    fn unknown_session_never_reaches_driver() {
        let library = Arc::new(FakeLibrary::new());
        let adapter = adapter_with(library.clone());

        let err = write_f32(&adapter, &(), "sessX", &[1.0, 2.0]).unwrap_err();

        assert!(matches!(err, RfsgError::SessionNotFound(ref name) if name == "sessX"));
        assert!(library.writes().is_empty());
    }

    #[test]
    fn marshal_failure_never_reaches_driver() {
        let library = Arc::new(FakeLibrary::new());
        let adapter = adapter_with(library.clone());

        let err = write_f32(&adapter, &(), "sessA", &[1.0, 2.0, 3.0]).unwrap_err();

        assert!(matches!(err, RfsgError::OddSampleCount { len: 3 }));
        assert!(library.writes().is_empty());
    }

    #[test]
    fn negative_status_is_translated() {
        let library = Arc::new(FakeLibrary::new());
        library.set_write_status(-1_074_118_656);
        library.set_recent_error(-1_074_118_656, "Invalid parameter.");
        let adapter = adapter_with(library);

        let err = write_f32(&adapter, &(), "sessA", &[1.0, 2.0]).unwrap_err();

        match err {
            RfsgError::Driver(driver) => {
                assert_eq!(driver.code, -1_074_118_656);
                assert_eq!(driver.description, "Invalid parameter.");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
