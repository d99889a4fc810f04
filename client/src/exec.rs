//! Request execution for synthesized routes.
//!
//! One HTTP call per invocation: fill `:name` placeholders from the
//! parameter object, partition the remainder into query string or JSON
//! body, and surface non-success statuses as [`ClientError::Request`].

use reqwest::{Method, StatusCode, header};
use serde_json::{Map, Value};
use url::Url;

use crate::error::ClientError;
use crate::synth::Route;

/// Parameter object for a synthesized call.
pub type Params = Map<String, Value>;

/// Executes one synthesized call.
///
/// No timeout beyond the transport's own defaults; callers that unmount
/// simply drop the future and discard a late result.
pub(crate) async fn execute(
    http: &reqwest::Client,
    base_url: &Url,
    route: &Route,
    params: Option<Params>,
) -> Result<Value, ClientError> {
    let mut params = params.unwrap_or_default();
    let path = fill_path(&route.path, &mut params)?;
    let url = request_url(base_url, &path);

    let mut request = http
        .request(route.method.clone(), &url)
        .header(header::CONTENT_TYPE, "application/json");

    if route.method == Method::GET {
        let query: Vec<(String, String)> = params
            .into_iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(key, value)| (key, scalar_value(&value)))
            .collect();
        if !query.is_empty() {
            request = request.query(&query);
        }
    } else if !params.is_empty() {
        request = request.json(&Value::Object(params));
    }

    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(error_for_status(status, response).await);
    }

    // Some mutation endpoints legitimately return an empty body.
    let bytes = response.bytes().await?;
    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(&bytes)?)
}

/// Substitutes every `:name` path segment with the percent-encoded value
/// from `params`, removing the key from the remaining parameter set.
fn fill_path(template: &str, params: &mut Params) -> Result<String, ClientError> {
    let segments: Vec<String> = template
        .split('/')
        .map(|segment| match segment.strip_prefix(':') {
            None => Ok(segment.to_string()),
            Some(name) => match params.remove(name) {
                Some(value) => Ok(urlencoding::encode(&scalar_value(&value)).into_owned()),
                None => Err(ClientError::MissingPathParam {
                    name: name.to_string(),
                    path: template.to_string(),
                }),
            },
        })
        .collect::<Result<_, _>>()?;
    Ok(segments.join("/"))
}

/// Relative manifest paths are served under `{base}/api`; absolute URLs
/// pass through untouched.
fn request_url(base_url: &Url, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = base_url.as_str().trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}/api{path}")
    } else {
        format!("{base}/api/{path}")
    }
}

/// Renders a JSON value for use in a path segment or query pair.
fn scalar_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Builds the error for a non-success response.
///
/// Best-effort: backends usually put a human-readable `message` (or
/// `error`) in a JSON body, but a body that fails to parse must not turn
/// into a second error.
async fn error_for_status(status: StatusCode, response: reqwest::Response) -> ClientError {
    let status_text = status.canonical_reason().unwrap_or("unknown").to_string();
    let message = match response.json::<Value>().await {
        Ok(body) => body
            .get("message")
            .or_else(|| body.get("error"))
            .and_then(Value::as_str)
            .map(String::from),
        Err(_) => None,
    };
    ClientError::Request {
        status: status.as_u16(),
        status_text,
        message,
    }
}
