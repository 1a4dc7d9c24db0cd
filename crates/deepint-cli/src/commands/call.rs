//! Raw API call

use crate::console::CliConsole;
use anyhow::{Context, Result, bail};
use deepint_sdk::DeepintClient;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub struct CallRequest {
    pub method: String,
    pub path: String,
    pub params: Vec<String>,
    pub headers: Vec<String>,
    pub body: Option<String>,
    pub paginated: bool,
}

pub async fn call(client: &DeepintClient, console: &CliConsole, request: CallRequest) -> Result<()> {
    let headers: BTreeMap<String, String> = request
        .headers
        .iter()
        .map(|raw| split_pair(raw))
        .collect::<Result<_>>()?;
    let parameters = build_parameters(request.body.as_deref(), &request.params)?;

    console.info(&format!("{} {}", request.method.to_uppercase(), request.path));
    let response = client
        .custom_endpoint()
        .call(
            &request.method,
            &request.path,
            headers,
            parameters,
            request.paginated,
        )
        .await?;
    console.print_json(&response);
    Ok(())
}

fn split_pair(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => bail!("Expected key=value, got '{}'", raw),
    }
}

/// `--body` JSON object with each `--param` set on top. Values that parse as
/// JSON (numbers, booleans, quoted strings) keep their type.
fn build_parameters(body: Option<&str>, params: &[String]) -> Result<Option<Value>> {
    let mut object = match body {
        Some(raw) => match serde_json::from_str(raw).context("Parsing --body")? {
            Value::Object(map) => map,
            _ => bail!("--body must be a JSON object"),
        },
        None => Map::new(),
    };

    for raw in params {
        let (key, value) = split_pair(raw)?;
        let value = serde_json::from_str(&value).unwrap_or(Value::String(value));
        object.insert(key, value);
    }

    if object.is_empty() && body.is_none() {
        return Ok(None);
    }
    Ok(Some(Value::Object(object)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_params_keep_json_types() {
        let params = vec!["page=2".to_string(), "name=sales".to_string(), "flag=true".to_string()];
        let built = build_parameters(None, &params).unwrap();
        assert_eq!(built, Some(json!({"page": 2, "name": "sales", "flag": true})));
    }

    #[test]
    fn test_params_override_body() {
        let params = vec!["name=b".to_string()];
        let built = build_parameters(Some(r#"{"name": "a", "x": 1}"#), &params).unwrap();
        assert_eq!(built, Some(json!({"name": "b", "x": 1})));
    }

    #[test]
    fn test_no_parameters() {
        assert_eq!(build_parameters(None, &[]).unwrap(), None);
    }

    #[test]
    fn test_bad_input() {
        assert!(build_parameters(Some("[1]"), &[]).is_err());
        assert!(split_pair("novalue").is_err());
        assert!(split_pair("=x").is_err());
    }
}
