//! The transports exposing the greeting.

pub mod grpc;
pub mod rest;
