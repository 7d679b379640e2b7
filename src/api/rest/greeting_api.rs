//! Implementation of the greeting API. Echoes a JSON message back with a greeting prepended.

use crate::{core::greeting::greeting_service, infra::extract::Json};
use axum::{routing::get, Router};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

/// The greeting API endpoints.
pub fn routes() -> Router {
    Router::new().route("/", get(greet_get).post(greet_post))
}

/// Both the request and the response body of the greeting endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GreetMessage {
    /// The name to greet in a request, the greeting in a response.
    message: String,
}

impl GreetMessage {
    /// Constructs a new [`GreetMessage`].
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the message.
    pub fn message(&self) -> &str {
        self.message.as_ref()
    }
}

fn reply(request: GreetMessage) -> Json<GreetMessage> {
    Json(GreetMessage {
        message: greeting_service::greet(&request.message),
    })
}

/// Greets the name in the request body.
#[utoipa::path(
    get,
    path = "/",
    request_body = GreetMessage,
    responses(
        (status = 200, description = "Success", body = GreetMessage),
        (status = 400, description = "Malformed body", body = crate::infra::error::ErrorBody),
    )
)]
#[instrument(level = "trace")]
pub async fn greet_get(Json(request): Json<GreetMessage>) -> Json<GreetMessage> {
    reply(request)
}

/// Greets the name in the request body.
#[utoipa::path(
    post,
    path = "/",
    request_body = GreetMessage,
    responses(
        (status = 200, description = "Success", body = GreetMessage),
        (status = 400, description = "Malformed body", body = crate::infra::error::ErrorBody),
    )
)]
#[instrument(level = "trace")]
pub async fn greet_post(Json(request): Json<GreetMessage>) -> Json<GreetMessage> {
    reply(request)
}
