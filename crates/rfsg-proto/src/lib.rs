//! Protocol buffer definitions for the NI-RFSG gRPC service.
//!
//! - [`nirfsg`]: the `nirfsg_grpc.NiRfsg` service and its messages
//! - [`health`]: the standard `grpc.health.v1` health checking service

#![allow(missing_docs)] // Generated code doesn't have docs

/// Generated NI-RFSG protocol buffer types.
pub mod nirfsg {
    tonic::include_proto!("nirfsg_grpc");
}

/// Generated health check protocol buffer types.
pub mod health {
    tonic::include_proto!("grpc.health.v1");
}

pub use nirfsg::*;

/// Fully qualified name of the NI-RFSG service, as reported by health checks.
pub const NIRFSG_SERVICE_NAME: &str = "nirfsg_grpc.NiRfsg";
