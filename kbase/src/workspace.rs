use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::Result;
use crate::rpc;

/// The workspace object info tuple, positionally:
/// (objid, name, type, save_date, version, saved_by, wsid, workspace,
/// chsum, size, metadata).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectInfo(
    pub i64,
    pub String,
    pub String,
    pub String,
    pub i64,
    pub String,
    pub i64,
    pub String,
    pub String,
    pub i64,
    #[serde(default)] pub Value,
);

impl ObjectInfo {
    pub fn object_id(&self) -> i64 {
        self.0
    }

    pub fn name(&self) -> &str {
        &self.1
    }

    /// Full type string, e.g. `KBaseGenomes.ContigSet-1.2`.
    pub fn type_string(&self) -> &str {
        &self.2
    }

    /// Type tag with the `-major.minor` suffix stripped.
    pub fn type_name(&self) -> &str {
        self.2.split('-').next().unwrap_or(&self.2)
    }

    pub fn version(&self) -> i64 {
        self.4
    }

    pub fn workspace_id(&self) -> i64 {
        self.6
    }

    /// Canonical reference, `wsid/objid/version`.
    pub fn ref_string(&self) -> String {
        format!("{}/{}/{}", self.6, self.0, self.4)
    }
}

/// One provenance entry attached to a stored object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvenanceAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default)]
    pub method_params: Vec<Value>,
    #[serde(default)]
    pub input_ws_objects: Vec<String>,
    #[serde(default)]
    pub resolved_ws_objects: Vec<String>,
}

/// One object to persist via `save_objects`.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectSaveData {
    #[serde(rename = "type")]
    pub object_type: String,
    pub data: Value,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Vec<ProvenanceAction>>,
}

/// An object as returned by `get_objects`: payload, info tuple and the
/// provenance trail recorded at save time.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectData {
    pub data: Value,
    pub info: ObjectInfo,
    #[serde(default)]
    pub provenance: Vec<ProvenanceAction>,
}

/// Client for the versioned workspace object store.
#[derive(Debug, Clone)]
pub struct WorkspaceClient {
    url: String,
    token: String,
}

impl WorkspaceClient {
    pub fn new(url: &str, token: &str) -> Self {
        Self {
            url: url.to_string(),
            token: token.to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn create_workspace(&self, name: &str) -> Result<()> {
        rpc::call_void(
            &self.url,
            &self.token,
            "Workspace.create_workspace",
            json!({"workspace": name}),
        )
        .await
    }

    pub async fn delete_workspace(&self, name: &str) -> Result<()> {
        rpc::call_void(
            &self.url,
            &self.token,
            "Workspace.delete_workspace",
            json!({"workspace": name}),
        )
        .await
    }

    /// Persists objects in one call; the returned info tuples carry the
    /// assigned ids and versions.
    pub async fn save_objects(
        &self,
        workspace: &str,
        objects: Vec<ObjectSaveData>,
    ) -> Result<Vec<ObjectInfo>> {
        let value = rpc::call(
            &self.url,
            &self.token,
            "Workspace.save_objects",
            json!({"workspace": workspace, "objects": objects}),
        )
        .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Fetches objects by reference (`wsid/objid/version` or
    /// `workspace/name` forms both resolve).
    pub async fn get_objects(&self, refs: &[String]) -> Result<Vec<ObjectData>> {
        let specs: Vec<Value> = refs.iter().map(|r| json!({"ref": r})).collect();
        let value = rpc::call(
            &self.url,
            &self.token,
            "Workspace.get_objects",
            Value::Array(specs),
        )
        .await?;
        Ok(serde_json::from_value(value)?)
    }
}
