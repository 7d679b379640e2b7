//! The HTTP application.
//!
//! # Examples
//!
//! ```rust
//! # use greet_bench::{api::rest::greeting_api::GreetMessage, endpoint};
//! # tokio_test::block_on(async {
//! let endpoint = endpoint::start_http("127.0.0.1:0".parse().unwrap(), greet_bench::app::app())
//!     .await
//!     .unwrap();
//! let url = format!("http://{}/", endpoint.local_addr());
//! let response = reqwest::Client::new()
//!     .post(url)
//!     .json(&GreetMessage::new("World"))
//!     .send()
//!     .await
//!     .unwrap();
//! assert_eq!(200, response.status());
//! assert_eq!(GreetMessage::new("Hello World"), response.json::<GreetMessage>().await.unwrap());
//! # });
//! ```

use crate::infra::{
    error::{ClientError, PanicHandler},
    middleware::MakeRequestIdSpan,
    openapi::ApiDoc,
};
use axum::{routing::get, Router};
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

/// Constructs the full axum application.
pub fn app() -> Router {
    Router::new()
        .merge(crate::api::rest::api())
        .route(
            "/openapi.json",
            get(|| async { axum::Json(ApiDoc::openapi()) }),
        )
        .fallback(|| async { ClientError::NotFound })
        // Layers
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(MakeRequestIdSpan)
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::DEBUG))
                .on_failure(()),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CatchPanicLayer::custom(PanicHandler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{api::rest::greeting_api::GreetMessage, infra::error::ErrorBody};
    use axum::body::Body;
    use http::{header::CONTENT_TYPE, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn json_request(method: &str, body: &'static str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri("/")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn body<T: serde::de::DeserializeOwned>(res: axum::response::Response) -> T {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn get_greets() {
        let res = app()
            .oneshot(json_request("GET", r#"{"message": "World"}"#))
            .await
            .unwrap();
        assert_eq!(StatusCode::OK, res.status());
        let greeting: GreetMessage = body(res).await;
        assert_eq!("Hello World", greeting.message());
    }

    #[tokio::test]
    async fn post_greets() {
        let res = app()
            .oneshot(json_request("POST", r#"{"message": "Hello world"}"#))
            .await
            .unwrap();
        assert_eq!(StatusCode::OK, res.status());
        let greeting: GreetMessage = body(res).await;
        assert_eq!("Hello Hello world", greeting.message());
    }

    #[tokio::test]
    async fn invalid_json_is_a_client_error() {
        let res = app()
            .oneshot(json_request("POST", "{not json"))
            .await
            .unwrap();
        assert_eq!(StatusCode::BAD_REQUEST, res.status());
        let error: ErrorBody = body(res).await;
        assert!(!error.message().is_empty());
    }

    #[tokio::test]
    async fn missing_field_is_a_client_error() {
        let res = app()
            .oneshot(json_request("GET", r#"{"name": "World"}"#))
            .await
            .unwrap();
        assert!(res.status().is_client_error());
        let error: ErrorBody = body(res).await;
        assert!(error.message().contains("message"));
    }

    #[tokio::test]
    async fn empty_get_is_a_client_error() {
        let req = Request::get("/").body(Body::empty()).unwrap();
        let res = app().oneshot(req).await.unwrap();
        assert!(res.status().is_client_error());
    }

    #[tokio::test]
    async fn responses_carry_a_request_id() {
        let res = app()
            .oneshot(json_request("POST", r#"{"message": "World"}"#))
            .await
            .unwrap();
        assert!(res.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let req = Request::get("/nope").body(Body::empty()).unwrap();
        let res = app().oneshot(req).await.unwrap();
        assert_eq!(StatusCode::NOT_FOUND, res.status());
    }

    #[tokio::test]
    async fn serves_openapi_document() {
        let req = Request::get("/openapi.json").body(Body::empty()).unwrap();
        let res = app().oneshot(req).await.unwrap();
        assert_eq!(StatusCode::OK, res.status());
        let doc: serde_json::Value = body(res).await;
        assert!(doc["paths"]["/"]["post"].is_object());
    }
}
