//! Network surface of the service: the tonic gRPC server and the
//! `CryptoService` implementation.
pub mod grpc;
