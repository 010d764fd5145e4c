//! gRPC adapter for the semantic backend.

mod grpc_backend;
mod proto;

pub use grpc_backend::GrpcSemanticBackend;
