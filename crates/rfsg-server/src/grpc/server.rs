//! Server bootstrap.

use crate::config::GrpcSettings;
use crate::grpc::health_service::HealthServiceImpl;
use crate::grpc::nirfsg_service::NiRfsgServiceImpl;
use crate::grpc::proto::health::health_check_response::ServingStatus;
use crate::grpc::proto::health::health_server::HealthServer;
use crate::grpc::proto::ni_rfsg_server::NiRfsgServer;
use crate::shutdown::ShutdownSignal;
use rfsg_core::CallAdapter;
use rfsg_proto::NIRFSG_SERVICE_NAME;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::server::Router;
use tonic::transport::Server;

/// The NI-RFSG gRPC server: waveform service plus health checks.
pub struct RfsgServer {
    settings: GrpcSettings,
    adapter: CallAdapter,
    shutdown: ShutdownSignal,
    health: HealthServiceImpl,
}

impl RfsgServer {
    /// Server for `adapter` with the given listener settings.
    pub fn new(settings: GrpcSettings, adapter: CallAdapter) -> Self {
        Self {
            settings,
            adapter,
            shutdown: ShutdownSignal::new(),
            health: HealthServiceImpl::new(),
        }
    }

    /// Signal that stops the server and cancels calls that have not yet started.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// The waveform service with the configured message size limit.
    pub fn service(&self) -> NiRfsgServer<NiRfsgServiceImpl> {
        NiRfsgServer::new(NiRfsgServiceImpl::new(
            self.adapter.clone(),
            self.shutdown.clone(),
        ))
        .max_decoding_message_size(self.settings.max_decoding_message_size)
    }

    fn router(&self) -> Router {
        self.health.set_serving_status("", ServingStatus::Serving);
        self.health
            .set_serving_status(NIRFSG_SERVICE_NAME, ServingStatus::Serving);

        Server::builder()
            .add_service(HealthServer::new(self.health.clone()))
            .add_service(self.service())
    }

    fn shutdown_future(&self) -> impl std::future::Future<Output = ()> + Send + 'static {
        let shutdown = self.shutdown.clone();
        let health = self.health.clone();
        async move {
            shutdown.wait().await;
            health.set_all_not_serving();
            tracing::info!("NI-RFSG gRPC server shutting down");
        }
    }

    /// Bind the configured address and serve until shutdown is signalled.
    pub async fn serve(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = self.settings.bind_socket();
        let listener = TcpListener::bind(addr).await?;
        self.serve_on(listener).await
    }

    /// Serve on an already bound listener until shutdown is signalled.
    pub async fn serve_on(
        self,
        listener: TcpListener,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let local_addr: SocketAddr = listener.local_addr()?;
        tracing::info!(%local_addr, "NI-RFSG gRPC server listening");

        let shutdown = self.shutdown_future();
        self.router()
            .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown)
            .await?;

        tracing::info!("NI-RFSG gRPC server stopped");
        Ok(())
    }
}
