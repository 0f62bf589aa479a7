use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::Result;
use crate::rpc;

/// A durable alias binding a shock node to its storage location. Library
/// objects reference handles instead of raw node URLs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HandleRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub id: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_md5: Option<String>,
}

/// Client for the handle service.
#[derive(Debug, Clone)]
pub struct HandleClient {
    url: String,
    token: String,
}

impl HandleClient {
    pub fn new(url: &str, token: &str) -> Self {
        Self {
            url: url.to_string(),
            token: token.to_string(),
        }
    }

    /// Registers a handle for an existing node and returns the handle id.
    pub async fn persist_handle(
        &self,
        node_id: &str,
        kind: &str,
        store_url: &str,
    ) -> Result<String> {
        let value = rpc::call(
            &self.url,
            &self.token,
            "AbstractHandle.persist_handle",
            json!({"id": node_id, "type": kind, "url": store_url}),
        )
        .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Resolves handle ids to full handle records, one batch call.
    pub async fn ids_to_handles(&self, ids: &[String]) -> Result<Vec<HandleRecord>> {
        let value = rpc::call(
            &self.url,
            &self.token,
            "AbstractHandle.ids_to_handles",
            json!(ids),
        )
        .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Deletes a batch of handles in one call.
    pub async fn delete_handles(&self, handles: &[HandleRecord]) -> Result<()> {
        rpc::call_void(
            &self.url,
            &self.token,
            "AbstractHandle.delete_handles",
            serde_json::to_value(handles)?,
        )
        .await
    }
}
