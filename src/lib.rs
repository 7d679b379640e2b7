//! Round-trip latency benchmarks for a trivial greeting service.
//!
//! Two programs share this library. `grpc-bench` times a batch of unary gRPC
//! calls against an in-process tonic server, `http-bench` times batches of
//! `GET /` and `POST /` requests against an in-process axum server.

pub mod api;
pub mod app;
pub mod bench;
pub mod core;
pub mod endpoint;
pub mod infra;
pub mod lifecycle;
