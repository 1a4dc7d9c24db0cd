//! Raw calls to endpoints without a typed wrapper

use crate::error::{DeepintError, DeepintResult};
use crate::http::{ApiContext, ApiRequest, Method, Paginator};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Issues authenticated requests to arbitrary API paths.
///
/// Authentication and the organization header are added the same way as for
/// typed resources.
#[derive(Debug, Clone)]
pub struct CustomEndpoint {
    context: ApiContext,
}

impl CustomEndpoint {
    pub fn new(context: ApiContext) -> Self {
        Self { context }
    }

    /// Call `path` with `method` (GET, POST, PUT or DELETE in any case).
    ///
    /// With `paginated`, every page is fetched and the items are returned as
    /// one JSON array.
    pub async fn call(
        &self,
        method: &str,
        path: &str,
        headers: BTreeMap<String, String>,
        parameters: Option<Value>,
        paginated: bool,
    ) -> DeepintResult<Value> {
        let method = Method::parse(method).ok_or_else(|| {
            DeepintError::invalid_input(
                "OPERATION_NOT_ALLOWED",
                format!(
                    "'{}' is not allowed; custom endpoints accept GET, POST, PUT and DELETE",
                    method
                ),
            )
        })?;

        let mut request = ApiRequest::new(method, path);
        request.headers = headers;
        request.parameters = parameters;

        if !paginated {
            return self.context.send(request).await;
        }

        let mut paginator = Paginator::new(self.context.clone(), request);
        let items = paginator.collect_remaining().await?;
        debug!(
            path,
            items = items.len(),
            pages = paginator.pages_fetched(),
            "paginated custom call done"
        );
        Ok(Value::Array(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{MockTransport, ORGANIZATION_HEADER};
    use crate::test_support::{FakeTransport, records};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn unsupported_method_is_rejected_before_sending() {
        let mut mock = MockTransport::new();
        mock.expect_send().never();
        let endpoint = CustomEndpoint::new(ApiContext::new(Arc::new(mock), "org"));

        let err = endpoint
            .call("PATCH", "workspaces/", BTreeMap::new(), None, false)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DeepintError::InvalidInput { ref code, .. } if code == "OPERATION_NOT_ALLOWED"
        ));
    }

    #[tokio::test]
    async fn method_is_case_insensitive_and_headers_pass_through() {
        let mut mock = MockTransport::new();
        mock.expect_send()
            .withf(|request| {
                request.method == Method::Post
                    && request.path == "workspace/ws/sources"
                    && request.headers.get("x-custom").map(String::as_str) == Some("1")
                    && request.headers.get(ORGANIZATION_HEADER).map(String::as_str) == Some("org")
                    && request.parameter("name") == Some(&json!("s"))
            })
            .times(1)
            .returning(|_| Ok(json!({"source_id": "s1"})));
        let endpoint = CustomEndpoint::new(ApiContext::new(Arc::new(mock), "org"));

        let headers = BTreeMap::from([("x-custom".to_string(), "1".to_string())]);
        let body = endpoint
            .call("post", "workspace/ws/sources", headers, Some(json!({"name": "s"})), false)
            .await
            .unwrap();
        assert_eq!(body, json!({"source_id": "s1"}));
    }

    #[tokio::test]
    async fn paginated_call_returns_every_item() {
        let transport = FakeTransport::new(3);
        transport.list("workspaces/", records(7));
        let endpoint = CustomEndpoint::new(transport.context());

        let items = endpoint
            .call("GET", "workspaces/", BTreeMap::new(), None, true)
            .await
            .unwrap();
        assert_eq!(items.as_array().map(Vec::len), Some(7));
        assert_eq!(transport.requests().len(), 3);
    }
}
