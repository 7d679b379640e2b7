//! OpenAPI configuration.

use crate::api::rest::greeting_api;
use utoipa::OpenApi;

/// OpenApi configuration.
#[derive(OpenApi)]
#[openapi(
    paths(greeting_api::greet_get, greeting_api::greet_post),
    components(schemas(greeting_api::GreetMessage, crate::infra::error::ErrorBody))
)]
#[derive(Clone, Copy, Debug)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::ApiDoc;
    use utoipa::OpenApi;

    #[test]
    fn documents_both_greet_methods() {
        let doc = ApiDoc::openapi();
        let root = doc.paths.paths.get("/").expect("root path documented");
        let json = serde_json::to_value(root).unwrap();
        assert!(json.get("get").is_some());
        assert!(json.get("post").is_some());
    }
}
