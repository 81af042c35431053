//! Raw GraphQL request command.

use anyhow::{Context, Result};
use polaris_client::{CancellationToken, ClientError};
use polaris_config::Config;
use serde_json::{Map, Value};
use std::io::Read;
use std::path::Path;

use crate::args::OutputFormat;
use crate::commands::{build_client_from_config, cancellable};
use crate::output::print_json;

/// Read the query text from `path`, or from stdin when `path` is `-`.
fn read_query(path: &Path) -> Result<String> {
    let query = if path == Path::new("-") {
        let mut query = String::new();
        std::io::stdin()
            .read_to_string(&mut query)
            .context("Failed to read query from stdin")?;
        query
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read query from {}", path.display()))?
    };

    if query.trim().is_empty() {
        return Err(ClientError::InvalidRequest("query is empty".to_string()).into());
    }
    Ok(query)
}

/// Parse `--variables` into a JSON object.
fn parse_variables(variables: Option<&str>) -> Result<Map<String, Value>, ClientError> {
    let Some(raw) = variables else {
        return Ok(Map::new());
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ClientError::InvalidRequest(format!(
            "variables must be a JSON object, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(ClientError::InvalidRequest(format!(
            "variables are not valid JSON: {e}"
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub async fn run(
    config: Config,
    file: &Path,
    variables: Option<&str>,
    format: OutputFormat,
    cancel: &CancellationToken,
) -> Result<()> {
    let query = read_query(file)?;
    let variables = parse_variables(variables)?;

    let client = build_client_from_config(&config)?;
    let body = cancellable(cancel, client.request(&query, &variables)).await?;

    match format {
        OutputFormat::Text => println!("{}", String::from_utf8_lossy(&body)),
        OutputFormat::Json => {
            let payload: Value = serde_json::from_slice(&body).context("Response is not JSON")?;
            print_json(&payload)?;
        }
    }
    Ok(())
}
