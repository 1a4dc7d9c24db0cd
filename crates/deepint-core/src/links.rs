//! Parsing of web and API links to platform resources
//!
//! Two link shapes are understood:
//!
//! - web: `https://app.deepint.net/o/{org}/workspace?ws={ws}&s={kind}&i={id}`
//! - API: `https://app.deepint.net/api/v1/workspace/{ws}/{kind}/{id}`
//!
//! In both the child part is optional, in which case the link points at the
//! workspace itself. API links carry no organization.

use crate::error::{DeepintError, DeepintResult};
use std::fmt;
use std::str::FromStr;
use url::Url;

const INVALID_URL: &str = "INVALID_URL";

/// Kind of resource a link points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Workspace,
    Source,
    Task,
    Alert,
    Model,
    Dashboard,
    Visualization,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Workspace => "workspace",
            ResourceKind::Source => "source",
            ResourceKind::Task => "task",
            ResourceKind::Alert => "alert",
            ResourceKind::Model => "model",
            ResourceKind::Dashboard => "dashboard",
            ResourceKind::Visualization => "visualization",
        }
    }
}

impl FromStr for ResourceKind {
    type Err = DeepintError;

    /// Singular and plural forms are both accepted, case-insensitively
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let lower = raw.trim().to_ascii_lowercase();
        let singular = lower.strip_suffix('s').unwrap_or(&lower);
        match singular {
            "workspace" => Ok(ResourceKind::Workspace),
            "source" => Ok(ResourceKind::Source),
            "task" => Ok(ResourceKind::Task),
            "alert" => Ok(ResourceKind::Alert),
            "model" => Ok(ResourceKind::Model),
            "dashboard" => Ok(ResourceKind::Dashboard),
            "visualization" => Ok(ResourceKind::Visualization),
            _ => Err(DeepintError::invalid_input(
                INVALID_URL,
                format!("Unknown resource kind '{}'", raw),
            )),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifiers extracted from a link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    /// Only web links name the organization
    pub organization_id: Option<String>,
    pub workspace_id: String,
    pub kind: ResourceKind,
    /// `None` when the link points at the workspace itself
    pub resource_id: Option<String>,
}

/// Parse a web or API link
pub fn parse_url(raw: &str) -> DeepintResult<ParsedUrl> {
    let url = Url::parse(raw.trim()).map_err(|e| {
        DeepintError::invalid_input(INVALID_URL, format!("Malformed link '{}': {}", raw, e))
    })?;
    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|segment| !segment.is_empty()).collect())
        .unwrap_or_default();

    if let Some(pos) = segments.iter().position(|s| *s == "o") {
        if segments.get(pos + 2) == Some(&"workspace") {
            if let Some(org) = segments.get(pos + 1) {
                return parse_web(&url, org);
            }
        }
    }

    if let Some(pos) = segments.iter().position(|s| *s == "workspace") {
        return parse_api(&segments[pos + 1..]).map_err(|e| e.with_context(raw.to_string()));
    }

    Err(DeepintError::invalid_input(
        INVALID_URL,
        format!("'{}' is neither a web nor an API link", raw),
    ))
}

fn parse_web(url: &Url, organization_id: &str) -> DeepintResult<ParsedUrl> {
    let query = |key: &str| {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
            .filter(|v| !v.is_empty())
    };

    let workspace_id = query("ws").ok_or_else(|| {
        DeepintError::invalid_input(INVALID_URL, "Web link has no 'ws' parameter")
    })?;

    let (kind, resource_id) = match (query("s"), query("i")) {
        (None, _) => (ResourceKind::Workspace, None),
        (Some(kind), Some(id)) => (kind.parse()?, Some(id)),
        (Some(kind), None) => {
            return Err(DeepintError::invalid_input(
                INVALID_URL,
                format!("Web link names a {} but has no 'i' parameter", kind),
            ));
        }
    };

    Ok(ParsedUrl {
        organization_id: Some(organization_id.to_string()),
        workspace_id,
        kind,
        resource_id,
    })
}

/// `rest` is what follows the `workspace` segment
fn parse_api(rest: &[&str]) -> DeepintResult<ParsedUrl> {
    let (workspace_id, kind, resource_id) = match rest {
        [ws] => (ws, ResourceKind::Workspace, None),
        [ws, kind, id] => (ws, kind.parse()?, Some(id.to_string())),
        _ => {
            return Err(DeepintError::invalid_input(
                INVALID_URL,
                "API link must end in workspace/{ws} or workspace/{ws}/{kind}/{id}",
            ));
        }
    };

    Ok(ParsedUrl {
        organization_id: None,
        workspace_id: workspace_id.to_string(),
        kind,
        resource_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn web_link_to_source() {
        let parsed =
            parse_url("https://app.deepint.net/o/org1/workspace?ws=ws1&s=source&i=src9").unwrap();
        assert_eq!(
            parsed,
            ParsedUrl {
                organization_id: Some("org1".into()),
                workspace_id: "ws1".into(),
                kind: ResourceKind::Source,
                resource_id: Some("src9".into()),
            }
        );
    }

    #[test]
    fn web_link_to_workspace() {
        let parsed = parse_url("https://app.deepint.net/o/org1/workspace?ws=ws1").unwrap();
        assert_eq!(parsed.kind, ResourceKind::Workspace);
        assert_eq!(parsed.resource_id, None);
    }

    #[test]
    fn api_link_with_plural_kind() {
        let parsed = parse_url("https://app.deepint.net/api/v1/workspace/ws1/models/m3").unwrap();
        assert_eq!(parsed.organization_id, None);
        assert_eq!(parsed.workspace_id, "ws1");
        assert_eq!(parsed.kind, ResourceKind::Model);
        assert_eq!(parsed.resource_id.as_deref(), Some("m3"));
    }

    #[test]
    fn api_link_to_workspace_with_trailing_slash() {
        let parsed = parse_url("https://app.deepint.net/api/v1/workspace/ws1/").unwrap();
        assert_eq!(parsed.kind, ResourceKind::Workspace);
        assert_eq!(parsed.workspace_id, "ws1");
    }

    #[test]
    fn kinds_normalize() {
        for raw in ["alert", "alerts", "ALERTS"] {
            assert_eq!(raw.parse::<ResourceKind>().unwrap(), ResourceKind::Alert);
        }
        assert_eq!(
            "visualizations".parse::<ResourceKind>().unwrap(),
            ResourceKind::Visualization
        );
        assert!("folder".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn rejects_unusable_links() {
        for raw in [
            "not a url",
            "https://app.deepint.net/o/org1/workspace",
            "https://app.deepint.net/o/org1/workspace?ws=ws1&s=source",
            "https://app.deepint.net/api/v1/workspace/ws1/source",
            "https://app.deepint.net/api/v1/sources",
        ] {
            let err = parse_url(raw).unwrap_err();
            assert!(
                matches!(err, DeepintError::InvalidInput { ref code, .. } if code == INVALID_URL),
                "{raw}: {err:?}"
            );
        }
    }
}
