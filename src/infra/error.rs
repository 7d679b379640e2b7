//! Error types.
//!
//! [`BenchError`] covers everything that can end a benchmark run,
//! [`CallError`] a single failed round trip, and [`ClientError`] and
//! [`InternalError`] are what the HTTP endpoint reports back to its callers.

use super::extract::Json;
use axum::{extract::rejection::JsonRejection, http::HeaderValue, response::IntoResponse};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use time::OffsetDateTime;
use tower_http::catch_panic::ResponseForPanic;
use utoipa::ToSchema;

/// A standard error response body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// A description of the error.
    message: String,
    /// When the error happened.
    #[serde(with = "time::serde::rfc3339")]
    timestamp: OffsetDateTime,
}

impl ErrorBody {
    pub(crate) fn new(message: String) -> Self {
        Self {
            message,
            timestamp: OffsetDateTime::now_utc(),
        }
    }

    /// The error message.
    pub fn message(&self) -> &str {
        self.message.as_ref()
    }
}

/// Errors that end a benchmark run.
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    /// The endpoint could not bind its listener.
    #[error("failed to listen on {addr}: {source}")]
    Bind {
        /// The requested address.
        addr: String,
        /// The underlying io error.
        source: std::io::Error,
    },
    /// The driver could not connect to the endpoint.
    #[error("failed to connect to {addr}: {source}")]
    Dial {
        /// The endpoint uri.
        addr: String,
        /// The underlying transport error.
        source: tonic::transport::Error,
    },
    /// The HTTP client could not be constructed.
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
    /// A server stopped with an error.
    #[error("{name} server failed: {message}")]
    Serve {
        /// Which endpoint failed.
        name: &'static str,
        /// What went wrong.
        message: String,
    },
    /// A call failed while running with the abort policy.
    #[error("call {index} failed, aborting run: {source}")]
    Aborted {
        /// Zero based position of the failed call in the batch.
        index: usize,
        /// Why the call failed.
        source: CallError,
    },
    /// Draining took longer than the deadline.
    #[error("server forced to shutdown after {0:?}")]
    ShutdownTimeout(Duration),
    /// The endpoint task panicked or was cancelled.
    #[error("endpoint task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    /// Configuration could not be loaded.
    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),
}

/// A single failed round trip.
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    /// The gRPC call returned a non-ok status.
    #[error("grpc call failed: {0}")]
    Grpc(#[from] tonic::Status),
    /// The HTTP request could not be sent or its response not read.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The HTTP response had a non-success status.
    #[error("unexpected status {0}")]
    Status(StatusCode),
}

/// Errors caused by the client.
/// The client can do something to fix these.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The resource was not found.
    #[error("not found")]
    NotFound,
    /// Custom error.
    #[error("{1}")]
    Custom(StatusCode, String),
}

impl From<JsonRejection> for ClientError {
    fn from(value: JsonRejection) -> Self {
        ClientError::Custom(value.status(), value.body_text())
    }
}

impl IntoResponse for ClientError {
    fn into_response(self) -> axum::response::Response {
        let msg = self.to_string();
        let status = match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Custom(status, _) => status,
        };
        tracing::debug!("client error {}: {}", status, msg);
        (status, Json(ErrorBody::new(msg))).into_response()
    }
}

/// An internal error.
/// The client cannot do anything about this.
#[derive(Debug, thiserror::Error)]
pub enum InternalError {
    /// A handler panicked.
    #[error("handler panicked: {0}")]
    Panic(String),
}

impl IntoResponse for InternalError {
    fn into_response(self) -> axum::response::Response {
        tracing::error!("internal error: {}", self);
        let mut response = (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody::new("internal error".to_string())),
        )
            .into_response();
        response
            .headers_mut()
            .insert("Retry-After", HeaderValue::from_static("5"));
        response
    }
}

/// A handler for converting panics into proper responses for the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanicHandler;

impl ResponseForPanic for PanicHandler {
    type ResponseBody = axum::body::Body;

    fn response_for_panic(
        &mut self,
        err: Box<dyn std::any::Any + Send + 'static>,
    ) -> http::Response<Self::ResponseBody> {
        let message = if let Some(s) = err.downcast_ref::<String>() {
            s.clone()
        } else if let Some(s) = err.downcast_ref::<&str>() {
            s.to_string()
        } else {
            "unknown panic".to_string()
        };
        InternalError::Panic(message).into_response()
    }
}
