//! SDK client implementation

use crate::version;
use deepint_core::http::{ApiContext, HttpTransport, Transport};
use deepint_core::{
    Alert, ClientConfig, CustomEndpoint, Dashboard, DeepintError, DeepintResult, Entity,
    EntityFactory, Model, Organization, ResourceKind, ScanMode, Source, Task, Visualization,
    Workspace, parse_url,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Entity a link resolved to, loaded from the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenedResource {
    Workspace(Workspace),
    Source(Source),
    Task(Task),
    Alert(Alert),
    Model(Model),
    Dashboard(Dashboard),
    Visualization(Visualization),
}

impl OpenedResource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            OpenedResource::Workspace(_) => ResourceKind::Workspace,
            OpenedResource::Source(_) => ResourceKind::Source,
            OpenedResource::Task(_) => ResourceKind::Task,
            OpenedResource::Alert(_) => ResourceKind::Alert,
            OpenedResource::Model(_) => ResourceKind::Model,
            OpenedResource::Dashboard(_) => ResourceKind::Dashboard,
            OpenedResource::Visualization(_) => ResourceKind::Visualization,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            OpenedResource::Workspace(e) => e.id(),
            OpenedResource::Source(e) => e.id(),
            OpenedResource::Task(e) => e.id(),
            OpenedResource::Alert(e) => e.id(),
            OpenedResource::Model(e) => e.id(),
            OpenedResource::Dashboard(e) => e.id(),
            OpenedResource::Visualization(e) => e.id(),
        }
    }
}

/// Entry point of the SDK.
///
/// Holds one transport and the organization it is scoped to. Cloning is cheap
/// and clones share every cached collection.
#[derive(Debug, Clone)]
pub struct DeepintClient {
    context: ApiContext,
    organization: Organization,
}

impl DeepintClient {
    /// Create a client talking HTTP to the configured endpoint
    pub fn new(config: ClientConfig) -> DeepintResult<Self> {
        version::check_base_url(&config.base_url)
            .map_err(|e| DeepintError::config(e.to_string()))?;

        let config = config.with_header("user-agent", version::user_agent());
        let transport = HttpTransport::new(&config)?;
        info!(
            base_url = %transport.base_url(),
            organization = %config.organization_id,
            "deepint client ready"
        );

        Ok(Self::with_transport(
            Arc::new(transport),
            config.organization_id,
        ))
    }

    /// Create a client from `DEEPINT_*` environment variables
    pub fn from_env() -> DeepintResult<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Create a client from a TOML or JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> DeepintResult<Self> {
        Self::new(ClientConfig::from_file(path)?)
    }

    /// Create a client over any transport, e.g. a test double
    pub fn with_transport(transport: Arc<dyn Transport>, organization_id: impl Into<String>) -> Self {
        let context = ApiContext::new(transport, organization_id);
        Self {
            organization: Organization::new(context.clone()),
            context,
        }
    }

    /// Scan mode for every collection reached from this client.
    ///
    /// Replaces the organization handle, dropping anything cached so far.
    pub fn with_scan_mode(mut self, scan_mode: ScanMode) -> Self {
        self.organization = Organization::with_scan_mode(self.context.clone(), scan_mode);
        self
    }

    pub fn organization(&self) -> &Organization {
        &self.organization
    }

    /// Unhydrated handle on a workspace of this organization
    pub fn workspace(&self, id: &str) -> Workspace {
        self.organization.workspace(id)
    }

    pub fn custom_endpoint(&self) -> CustomEndpoint {
        CustomEndpoint::new(self.context.clone())
    }

    /// Open a web or API link and load the entity it points at.
    ///
    /// Web links carry their own organization; API links use this client's.
    pub async fn open_url(&self, url: &str) -> DeepintResult<OpenedResource> {
        let parsed = parse_url(url)?;
        debug!(?parsed, "opening link");

        let organization = match parsed.organization_id.as_deref() {
            Some(org) if org != self.organization.id() => Organization::with_scan_mode(
                ApiContext::new(self.context.transport().clone(), org),
                self.organization.scan_mode(),
            ),
            _ => self.organization.clone(),
        };
        let workspace = organization.workspace(&parsed.workspace_id);

        let Some(resource_id) = parsed.resource_id.as_deref() else {
            workspace.load().await?;
            return Ok(OpenedResource::Workspace(workspace));
        };

        let scope = workspace.scope();
        let opened = match parsed.kind {
            ResourceKind::Workspace => OpenedResource::Workspace(organization.workspace(resource_id)),
            ResourceKind::Source => OpenedResource::Source(scope.build(resource_id)),
            ResourceKind::Task => OpenedResource::Task(scope.build(resource_id)),
            ResourceKind::Alert => OpenedResource::Alert(scope.build(resource_id)),
            ResourceKind::Model => OpenedResource::Model(scope.build(resource_id)),
            ResourceKind::Dashboard => OpenedResource::Dashboard(scope.build(resource_id)),
            ResourceKind::Visualization => {
                OpenedResource::Visualization(scope.build(resource_id))
            }
        };

        match &opened {
            OpenedResource::Workspace(e) => e.load().await?,
            OpenedResource::Source(e) => e.load().await?,
            OpenedResource::Task(e) => e.load().await?,
            OpenedResource::Alert(e) => e.load().await?,
            OpenedResource::Model(e) => e.load().await?,
            OpenedResource::Dashboard(e) => e.load().await?,
            OpenedResource::Visualization(e) => e.load().await?,
        }
        Ok(opened)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use deepint_core::http::{ApiRequest, ORGANIZATION_HEADER};
    use deepint_core::{Credentials, Method};
    use mockall::mock;
    use serde_json::{Value, json};

    mock! {
        Api {}

        #[async_trait]
        impl Transport for Api {
            async fn send(&self, request: ApiRequest) -> DeepintResult<Value>;
        }
    }

    fn org_header(request: &ApiRequest) -> Option<&str> {
        request.headers.get(ORGANIZATION_HEADER).map(String::as_str)
    }

    #[tokio::test]
    async fn test_open_api_link_uses_client_organization() {
        let mut api = MockApi::new();
        api.expect_send()
            .withf(|r| {
                r.method == Method::Get
                    && r.path == "workspace/ws1/source/s9"
                    && org_header(r) == Some("org-a")
            })
            .times(1)
            .returning(|_| Ok(json!({"name": "sales"})));
        let client = DeepintClient::with_transport(Arc::new(api), "org-a");

        let opened = client
            .open_url("https://app.deepint.net/api/v1/workspace/ws1/sources/s9")
            .await
            .unwrap();
        assert_eq!(opened.kind(), ResourceKind::Source);
        assert_eq!(opened.id(), "s9");
        let OpenedResource::Source(source) = opened else {
            panic!("expected a source");
        };
        assert_eq!(source.name().as_deref(), Some("sales"));
    }

    #[tokio::test]
    async fn test_open_web_link_uses_link_organization() {
        let mut api = MockApi::new();
        api.expect_send()
            .withf(|r| r.path == "workspace/ws1" && org_header(r) == Some("org-b"))
            .times(1)
            .returning(|_| Ok(json!({"name": "other"})));
        let client = DeepintClient::with_transport(Arc::new(api), "org-a");

        let opened = client
            .open_url("https://app.deepint.net/o/org-b/workspace?ws=ws1")
            .await
            .unwrap();
        let OpenedResource::Workspace(ws) = opened else {
            panic!("expected a workspace");
        };
        assert_eq!(ws.organization_id(), "org-b");
    }

    #[tokio::test]
    async fn test_open_missing_entity_is_not_found() {
        let mut api = MockApi::new();
        api.expect_send()
            .returning(|r| Err(DeepintError::not_found_url("missing", r.path)));
        let client = DeepintClient::with_transport(Arc::new(api), "org-a");

        let err = client
            .open_url("https://app.deepint.net/o/org-a/workspace?ws=ws1&s=task&i=t1")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_bad_link_sends_nothing() {
        let mut api = MockApi::new();
        api.expect_send().never();
        let client = DeepintClient::with_transport(Arc::new(api), "org-a");

        assert!(client.open_url("https://example.com/nothing").await.is_err());
    }

    #[test]
    fn test_new_rejects_other_api_version() {
        let config = ClientConfig::new(Credentials::new("token"), "org")
            .with_base_url("https://app.deepint.net/api/v2/");
        let err = DeepintClient::new(config).unwrap_err();
        assert!(matches!(err, DeepintError::Config { .. }));
    }

    #[test]
    fn test_new_builds_http_client() {
        let config = ClientConfig::new(Credentials::new("token"), "org");
        let client = DeepintClient::new(config).unwrap();
        assert_eq!(client.organization().id(), "org");
    }

    #[test]
    fn test_scan_mode_reaches_workspaces() {
        let client = DeepintClient::with_transport(Arc::new(MockApi::new()), "org")
            .with_scan_mode(ScanMode::Streaming);
        assert_eq!(client.workspace("w").tasks().mode(), ScanMode::Streaming);
    }
}
