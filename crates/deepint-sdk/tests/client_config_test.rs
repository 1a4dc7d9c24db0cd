//! Client construction from configuration files

use deepint_sdk::{DeepintClient, DeepintError};
use std::io::Write;

fn config_file(suffix: &str, body: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    write!(file, "{}", body).unwrap();
    file
}

#[test]
fn test_client_from_toml_file() {
    let file = config_file(
        ".toml",
        r#"
organization_id = "org-toml"
base_url = "https://app.deepint.net/api/v1"

[credentials]
token = "t"
"#,
    );

    let client = DeepintClient::from_file(file.path()).unwrap();
    assert_eq!(client.organization().id(), "org-toml");
}

#[test]
fn test_client_from_json_file() {
    let file = config_file(
        ".json",
        r#"{"organization_id": "org-json", "credentials": {"token": "t"}}"#,
    );

    let client = DeepintClient::from_file(file.path()).unwrap();
    assert_eq!(client.organization().id(), "org-json");
}

#[test]
fn test_empty_token_is_rejected() {
    let file = config_file(
        ".toml",
        r#"
organization_id = "org"

[credentials]
token = ""
"#,
    );

    let err = DeepintClient::from_file(file.path()).unwrap_err();
    assert!(matches!(err, DeepintError::Config { .. }));
}

#[test]
fn test_foreign_api_version_is_rejected() {
    let file = config_file(
        ".toml",
        r#"
organization_id = "org"
base_url = "https://app.deepint.net/api/v3/"

[credentials]
token = "t"
"#,
    );

    let err = DeepintClient::from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("v3"), "{err}");
}
