//! Protocol Buffer definitions and generated code for the RPC service.
//!
//! Generated at build time by `tonic-build` from
//! `proto/crypto_service.proto` (package `crypto.v1`).

#![allow(clippy::all)]

tonic::include_proto!("crypto.v1");
