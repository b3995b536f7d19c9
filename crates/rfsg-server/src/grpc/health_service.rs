//! Standard `grpc.health.v1` service.

use crate::grpc::proto::health::health_check_response::ServingStatus;
use crate::grpc::proto::health::health_server::Health;
use crate::grpc::proto::health::{HealthCheckRequest, HealthCheckResponse};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_stream::StreamExt;
use tonic::{Request, Response, Status};

/// gRPC Health Check Service implementation
///
/// The empty service name reports the server as a whole.
#[derive(Debug, Clone)]
pub struct HealthServiceImpl {
    // Map service name -> status sender
    statuses: Arc<Mutex<HashMap<String, watch::Sender<ServingStatus>>>>,
}

impl Default for HealthServiceImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthServiceImpl {
    /// Service with no registered statuses.
    pub fn new() -> Self {
        Self {
            statuses: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Update the serving status of a service
    pub fn set_serving_status(&self, service: &str, status: ServingStatus) {
        let mut statuses = self.statuses.lock();
        if let Some(tx) = statuses.get(service) {
            tx.send_replace(status);
        } else {
            let (tx, _) = watch::channel(status);
            statuses.insert(service.to_string(), tx);
        }
    }

    /// Mark every registered service as not serving.
    pub fn set_all_not_serving(&self) {
        for tx in self.statuses.lock().values() {
            tx.send_replace(ServingStatus::NotServing);
        }
    }

    /// Current status of `service`, if registered.
    pub fn serving_status(&self, service: &str) -> Option<ServingStatus> {
        self.statuses.lock().get(service).map(|tx| *tx.borrow())
    }
}

#[tonic::async_trait]
impl Health for HealthServiceImpl {
    type WatchStream = std::pin::Pin<
        Box<dyn tokio_stream::Stream<Item = Result<HealthCheckResponse, Status>> + Send + Sync>,
    >;

    async fn check(
        &self,
        request: Request<HealthCheckRequest>,
    ) -> Result<Response<HealthCheckResponse>, Status> {
        let service = request.into_inner().service;
        let status = self
            .serving_status(&service)
            .ok_or_else(|| Status::not_found(format!("Unknown service: {}", service)))?;

        Ok(Response::new(HealthCheckResponse {
            status: status.into(),
        }))
    }

    async fn watch(
        &self,
        request: Request<HealthCheckRequest>,
    ) -> Result<Response<Self::WatchStream>, Status> {
        let service = request.into_inner().service;

        let rx = {
            let mut statuses = self.statuses.lock();
            match statuses.get(&service) {
                Some(tx) => tx.subscribe(),
                None => {
                    // Unknown services are watched as SERVICE_UNKNOWN until registered.
                    let (tx, rx) = watch::channel(ServingStatus::ServiceUnknown);
                    statuses.insert(service, tx);
                    rx
                }
            }
        };

        let stream = tokio_stream::wrappers::WatchStream::new(rx).map(|status| {
            Ok(HealthCheckResponse {
                status: status.into(),
            })
        });

        Ok(Response::new(Box::pin(stream)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn check_reports_registered_status() {
        let health = HealthServiceImpl::new();
        health.set_serving_status("nirfsg_grpc.NiRfsg", ServingStatus::Serving);

        let response = health
            .check(Request::new(HealthCheckRequest {
                service: "nirfsg_grpc.NiRfsg".into(),
            }))
            .await
            .unwrap();

        assert_eq!(response.into_inner().status, ServingStatus::Serving as i32);
    }

    #[tokio::test]
    async fn check_unknown_service_is_not_found() {
        let health = HealthServiceImpl::new();

        let status = health
            .check(Request::new(HealthCheckRequest {
                service: "other.Service".into(),
            }))
            .await
            .unwrap_err();

        assert_eq!(status.code(), tonic::Code::NotFound);
    }

    #[tokio::test]
    async fn watch_sees_shutdown() {
        let health = HealthServiceImpl::new();
        health.set_serving_status("", ServingStatus::Serving);

        let mut stream = health
            .watch(Request::new(HealthCheckRequest {
                service: String::new(),
            }))
            .await
            .unwrap()
            .into_inner();

        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first.status, ServingStatus::Serving as i32);

        health.set_all_not_serving();
        let second = stream.next().await.unwrap().unwrap();
        assert_eq!(second.status, ServingStatus::NotServing as i32);
    }
}
