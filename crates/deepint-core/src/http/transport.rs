//! Transport seam and per-organization request context

use super::request::ApiRequest;
use crate::error::DeepintResult;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Header carrying the organization every request is scoped to
pub const ORGANIZATION_HEADER: &str = "x-deepint-organization";

/// Issues a single request and returns the decoded response body.
///
/// Implementations map HTTP statuses onto the error taxonomy: 404 becomes
/// `NotFound`, other 4xx become `Validation`, 5xx and network failures become
/// `Transport`. Any retry policy lives here, never in the callers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> DeepintResult<Value>;
}

/// Transport plus organization, shared by every handle created from one client
#[derive(Clone)]
pub struct ApiContext {
    transport: Arc<dyn Transport>,
    organization_id: String,
}

impl ApiContext {
    pub fn new(transport: Arc<dyn Transport>, organization_id: impl Into<String>) -> Self {
        Self {
            transport,
            organization_id: organization_id.into(),
        }
    }

    pub fn organization_id(&self) -> &str {
        &self.organization_id
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Send a request with the organization header attached
    pub async fn send(&self, request: ApiRequest) -> DeepintResult<Value> {
        let request = request.with_header(ORGANIZATION_HEADER, self.organization_id.as_str());
        self.transport.send(request).await
    }
}

impl fmt::Debug for ApiContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiContext")
            .field("organization_id", &self.organization_id)
            .finish_non_exhaustive()
    }
}
