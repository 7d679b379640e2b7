//! Drives the HTTP greet endpoint.

use super::Target;
use crate::{api::rest::greeting_api::GreetMessage, infra::error::CallError};
use async_trait::async_trait;
use reqwest::{Client, Method};

/// Sends a JSON greet message with a fixed method to a fixed url.
#[derive(Clone, Debug)]
pub struct HttpGreetTarget {
    client: Client,
    method: Method,
    url: String,
    body: GreetMessage,
}

impl HttpGreetTarget {
    /// Constructs a new [`HttpGreetTarget`].
    ///
    /// The body is sent with `GET` requests as well since the endpoint decodes
    /// it for both methods.
    pub fn new(client: Client, method: Method, url: impl Into<String>, message: &str) -> Self {
        Self {
            client,
            method,
            url: url.into(),
            body: GreetMessage::new(message),
        }
    }
}

#[async_trait]
impl Target for HttpGreetTarget {
    async fn call(&mut self) -> Result<(), CallError> {
        let response = self
            .client
            .request(self.method.clone(), &self.url)
            .json(&self.body)
            .send()
            .await?;
        let status = response.status();
        // Drain the body so the connection can be reused.
        response.bytes().await?;
        if !status.is_success() {
            return Err(CallError::Status(status));
        }
        Ok(())
    }
}
