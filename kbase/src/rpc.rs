use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::http_client;
use crate::error::{Error, Result};

// KBase JSON-RPC 1.1: params and result are both one-element arrays
// wrapping the actual value; errors ride on a 500 with an error object.

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    version: &'static str,
    method: &'a str,
    params: Value,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl RpcError {
    fn into_message(self) -> String {
        self.message
            .or(self.error)
            .or(self.name)
            .unwrap_or_else(|| "unspecified service error".to_string())
    }
}

async fn call_raw(url: &str, token: &str, method: &str, param: Value) -> Result<Option<Value>> {
    let request = RpcRequest {
        version: "1.1",
        method,
        params: Value::Array(vec![param]),
        id: 1,
    };
    let response = http_client()
        .post(url)
        .header(AUTHORIZATION, token)
        .json(&request)
        .send()
        .await?;
    let status = response.status();
    let body: RpcResponse = match response.json().await {
        Ok(body) => body,
        Err(_) if !status.is_success() => {
            return Err(Error::Http {
                status: status.as_u16(),
            })
        }
        Err(err) => return Err(err.into()),
    };
    if let Some(error) = body.error {
        return Err(Error::Service(error.into_message()));
    }
    if !status.is_success() {
        return Err(Error::Http {
            status: status.as_u16(),
        });
    }
    Ok(body.result)
}

/// Calls `method` with one param and returns the first element of the
/// result array.
pub(crate) async fn call(url: &str, token: &str, method: &str, param: Value) -> Result<Value> {
    match call_raw(url, token, method, param).await? {
        Some(Value::Array(mut items)) if !items.is_empty() => Ok(items.remove(0)),
        Some(Value::Array(_)) | Some(Value::Null) | None => {
            Err(Error::Service(format!("empty result from {}", method)))
        }
        Some(other) => Ok(other),
    }
}

/// Calls `method` and ignores whatever result comes back.
pub(crate) async fn call_void(url: &str, token: &str, method: &str, param: Value) -> Result<()> {
    call_raw(url, token, method, param).await.map(|_| ())
}
