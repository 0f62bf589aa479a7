use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use kbase::conf::DeployConfig;
use kbase::handle::HandleClient;
use kbase::shock::ShockClient;
use kbase::workspace::{ObjectInfo, WorkspaceClient};

/// Prefix of every workspace the suite creates.
pub const WS_PREFIX: &str = "test_kb_spades_";

/// Everything one suite run owns: the platform clients, the lazily
/// created run workspace, the blobs and handles to delete at teardown,
/// and the staged libraries keyed by label. Passed explicitly through
/// setup, tests and teardown.
pub struct TestFixture {
    pub cfg: DeployConfig,
    pub token: String,
    pub shock: ShockClient,
    pub handles: HandleClient,
    pub workspace: WorkspaceClient,
    ws_name: Option<String>,
    pub nodes_to_delete: Vec<String>,
    pub handles_to_delete: Vec<String>,
    pub staged: HashMap<String, ObjectInfo>,
}

impl TestFixture {
    pub fn new(cfg: DeployConfig, token: &str) -> Self {
        let shock = ShockClient::new(&cfg.shock_url, token);
        let handles = HandleClient::new(&cfg.handle_url, token);
        let workspace = WorkspaceClient::new(&cfg.workspace_url, token);
        Self {
            cfg,
            token: token.to_string(),
            shock,
            handles,
            workspace,
            ws_name: None,
            nodes_to_delete: Vec::new(),
            handles_to_delete: Vec::new(),
            staged: HashMap::new(),
        }
    }

    /// The run workspace, created on first use. The name is the fixed
    /// prefix plus a millisecond timestamp and stays the same for the
    /// rest of the run.
    pub async fn ws_name(&mut self) -> kbase::Result<String> {
        if let Some(name) = &self.ws_name {
            return Ok(name.clone());
        }
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let name = format!("{}{}", WS_PREFIX, millis);
        self.workspace.create_workspace(&name).await?;
        log::info!("created workspace {}", name);
        self.ws_name = Some(name.clone());
        Ok(name)
    }

    /// The run workspace name if it has been created.
    pub fn current_ws(&self) -> Option<&str> {
        self.ws_name.as_deref()
    }

    pub fn staged_info(&self, key: &str) -> Option<&ObjectInfo> {
        self.staged.get(key)
    }

    /// Reference (`wsid/objid/version`) of a staged library.
    pub fn staged_ref(&self, key: &str) -> Option<String> {
        self.staged.get(key).map(|info| info.ref_string())
    }

    /// Object name of a staged library, the form invocations pass.
    pub fn staged_name(&self, key: &str) -> Option<&str> {
        self.staged.get(key).map(|info| info.name())
    }

    /// Best-effort cleanup in fixed order: the workspace first, then the
    /// blob-store nodes one by one, then all handles in one batch. Each
    /// failure is logged and the remaining steps still run; nothing is
    /// retried and nothing propagates.
    pub async fn teardown(mut self) {
        if let Some(name) = self.ws_name.take() {
            match self.workspace.delete_workspace(&name).await {
                Ok(()) => log::info!("deleted workspace {}", name),
                Err(err) => log::error!("failed to delete workspace {}: {}", name, err),
            }
        }
        for node in &self.nodes_to_delete {
            if let Err(err) = self.shock.delete_node(node).await {
                log::error!("failed to delete shock node {}: {}", node, err);
            }
        }
        if self.handles_to_delete.is_empty() {
            return;
        }
        match self.handles.ids_to_handles(&self.handles_to_delete).await {
            Ok(records) => match self.handles.delete_handles(&records).await {
                Ok(()) => log::info!("deleted {} handles", records.len()),
                Err(err) => log::error!("failed to delete handles: {}", err),
            },
            Err(err) => log::error!("failed to resolve handles for deletion: {}", err),
        }
    }
}
