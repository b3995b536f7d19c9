//! Cancellation state for a gRPC call.
//!
//! tonic drops a handler's future when the client cancels or disconnects,
//! but work already handed to the blocking pool keeps going. Each call
//! therefore pairs its [`GrpcCallContext`] with an [`AbandonGuard`] held by
//! the handler future. Dropping the guard marks the call abandoned, and the
//! adapter's cancel check sees it before touching the session or the driver.

use crate::shutdown::ShutdownSignal;
use rfsg_core::CallContext;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// [`CallContext`] for one incoming request.
///
/// A call is cancelled if its handler future has been dropped or if server
/// shutdown has begun by the time the adapter checks.
#[derive(Debug, Clone)]
pub struct GrpcCallContext {
    abandoned: Arc<AtomicBool>,
    shutdown: ShutdownSignal,
}

impl GrpcCallContext {
    /// Context for a new call plus the guard that cancels it when dropped.
    pub fn new(shutdown: &ShutdownSignal) -> (Self, AbandonGuard) {
        let abandoned = Arc::new(AtomicBool::new(false));
        let context = Self {
            abandoned: abandoned.clone(),
            shutdown: shutdown.clone(),
        };
        (context, AbandonGuard { abandoned })
    }
}

impl CallContext for GrpcCallContext {
    fn is_cancelled(&self) -> bool {
        self.abandoned.load(Ordering::Acquire) || self.shutdown.is_triggered()
    }
}

/// Marks its call abandoned on drop.
#[derive(Debug)]
pub struct AbandonGuard {
    abandoned: Arc<AtomicBool>,
}

impl Drop for AbandonGuard {
    fn drop(&mut self) {
        self.abandoned.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_call_is_not_cancelled() {
        let shutdown = ShutdownSignal::new();
        let (context, _guard) = GrpcCallContext::new(&shutdown);

        assert!(!context.is_cancelled());
    }

    #[test]
    fn dropping_guard_cancels() {
        let shutdown = ShutdownSignal::new();
        let (context, guard) = GrpcCallContext::new(&shutdown);

        drop(guard);

        assert!(context.is_cancelled());
    }

    #[test]
    fn guards_are_per_call() {
        let shutdown = ShutdownSignal::new();
        let (first, first_guard) = GrpcCallContext::new(&shutdown);
        let (second, _second_guard) = GrpcCallContext::new(&shutdown);

        drop(first_guard);

        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
    }

    #[test]
    fn shutdown_cancels_existing_contexts() {
        let shutdown = ShutdownSignal::new();
        let (context, _guard) = GrpcCallContext::new(&shutdown);

        shutdown.trigger();

        assert!(context.is_cancelled());
    }
}
