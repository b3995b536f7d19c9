//! gRPC services, error mapping and server bootstrap.

pub mod call_context;
pub mod error_mapping;
pub mod health_service;
pub mod nirfsg_service;
/// gRPC server hosting the NI-RFSG waveform service.
///
/// # Example
/// ```no_run
/// use rfsg_core::{CallAdapter, InMemorySessionRepository};
/// use rfsg_driver_mock::MockRfsgLibrary;
/// use rfsg_server::config::GrpcSettings;
/// use rfsg_server::grpc::RfsgServer;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
///     let sessions: InMemorySessionRepository = [("sessA", 1)].into_iter().collect();
///     let adapter = CallAdapter::new(Arc::new(MockRfsgLibrary::new()), Arc::new(sessions));
///     RfsgServer::new(GrpcSettings::default(), adapter).serve().await
/// }
/// ```
pub mod server;

/// Protocol Buffer definitions for the NI-RFSG service
///
/// Re-exported from the proto crate.
#[allow(missing_docs)]
pub mod proto {
    pub use rfsg_proto::nirfsg::*;

    pub mod health {
        pub use rfsg_proto::health::*;
    }
}

pub use call_context::{AbandonGuard, GrpcCallContext};
pub use error_mapping::{map_rfsg_error_to_status, RfsgResultExt};
pub use health_service::HealthServiceImpl;
pub use nirfsg_service::NiRfsgServiceImpl;
pub use server::RfsgServer;
