use std::path::Path;

use reqwest::header::AUTHORIZATION;
use reqwest::multipart;
use serde::Deserialize;

use crate::client::http_client;
use crate::error::{Error, Result};

/// Client for the shock blob store. Nodes are immutable once uploaded;
/// the suite deletes them explicitly during teardown.
#[derive(Debug, Clone)]
pub struct ShockClient {
    url: String,
    token: String,
}

/// What an upload or node fetch boils down to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfo {
    pub id: String,
    pub md5: String,
    pub size: u64,
}

#[derive(Debug, Deserialize)]
struct ShockResponse {
    #[serde(default)]
    data: Option<ShockNode>,
    #[serde(default)]
    error: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct ShockNode {
    id: String,
    file: ShockFile,
}

#[derive(Debug, Deserialize)]
struct ShockFile {
    #[serde(default)]
    size: u64,
    #[serde(default)]
    checksum: ShockChecksum,
}

#[derive(Debug, Default, Deserialize)]
struct ShockChecksum {
    #[serde(default)]
    md5: String,
}

impl ShockClient {
    pub fn new(url: &str, token: &str) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn auth_header(&self) -> String {
        format!("Oauth {}", self.token)
    }

    /// Multipart upload of one local file. The file must exist: a missing
    /// path fails with the io error before any request goes out.
    pub async fn upload(&self, path: &Path) -> Result<NodeInfo> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        log::info!("uploading {:?} to {}/node", path, self.url);

        let part = multipart::Part::bytes(bytes).file_name(file_name);
        let form = multipart::Form::new().part("upload", part);
        let response = http_client()
            .post(format!("{}/node", self.url))
            .header(AUTHORIZATION, self.auth_header())
            .multipart(form)
            .send()
            .await?;
        decode_node(response).await
    }

    /// Fetches node metadata (id, checksum, size).
    pub async fn get_node(&self, node_id: &str) -> Result<NodeInfo> {
        let response = http_client()
            .get(format!("{}/node/{}", self.url, node_id))
            .header(AUTHORIZATION, self.auth_header())
            .send()
            .await?;
        decode_node(response).await
    }

    pub async fn delete_node(&self, node_id: &str) -> Result<()> {
        let response = http_client()
            .delete(format!("{}/node/{}", self.url, node_id))
            .header(AUTHORIZATION, self.auth_header())
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
            });
        }
        log::info!("deleted shock node {}", node_id);
        Ok(())
    }
}

async fn decode_node(response: reqwest::Response) -> Result<NodeInfo> {
    let status = response.status();
    if !status.is_success() {
        return Err(Error::Http {
            status: status.as_u16(),
        });
    }
    let body: ShockResponse = response.json().await?;
    node_from_body(body)
}

fn node_from_body(body: ShockResponse) -> Result<NodeInfo> {
    if let Some(first) = body.error.as_ref().and_then(|e| e.first()) {
        return Err(Error::Service(first.clone()));
    }
    let node = body
        .data
        .ok_or_else(|| Error::Service("shock response carried no node data".to_string()))?;
    Ok(NodeInfo {
        id: node.id,
        md5: node.file.checksum.md5,
        size: node.file.size,
    })
}
