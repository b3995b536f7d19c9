//! gRPC server for the NI-RFSG arbitrary waveform API.
//!
//! Clients refer to driver sessions by name and send interleaved I/Q data.
//! [`grpc::NiRfsgServiceImpl`] runs each call through
//! [`CallAdapter`](rfsg_core::CallAdapter) and maps failures to gRPC
//! statuses; [`grpc::RfsgServer`] hosts it next to the standard health
//! service.

pub mod config;
pub mod grpc;
pub mod shutdown;

pub use config::ServerSettings;
pub use grpc::RfsgServer;
pub use shutdown::ShutdownSignal;
