use kbase::conf::DeployConfig;
use kbase::workspace::ProvenanceAction;
use serde::Serialize;
use serde_json::Value;

use crate::engine::{AssemblyEngine, AssemblyJob, CommandEngine};
use crate::error::ServiceError;
use crate::objects::RunSpadesOutput;
use crate::params::RunSpadesParams;

pub const SERVICE_NAME: &str = "kb_spades";
pub const METHOD_RUN_SPADES: &str = "run_spades";

/// Per-call context: the auth token and the provenance stamp recorded on
/// every object the run saves.
#[derive(Debug, Clone, Serialize)]
pub struct RunContext {
    pub token: String,
    pub provenance: Vec<ProvenanceAction>,
    pub authenticated: bool,
}

impl RunContext {
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
            provenance: vec![ProvenanceAction {
                service: Some(SERVICE_NAME.to_string()),
                method: Some(METHOD_RUN_SPADES.to_string()),
                ..ProvenanceAction::default()
            }],
            authenticated: true,
        }
    }

    /// Same context with the invocation parameters recorded on the
    /// provenance entry.
    pub fn with_method_params(mut self, params: &Value) -> Self {
        if let Some(entry) = self.provenance.first_mut() {
            entry.method_params = vec![params.clone()];
        }
        self
    }
}

/// In-process entry point of the assembly operation.
pub struct SpadesService {
    cfg: DeployConfig,
    engine: Box<dyn AssemblyEngine>,
}

impl SpadesService {
    /// Wires the default command engine from the `spades-runner` config
    /// key.
    pub fn new(cfg: DeployConfig) -> Result<Self, ServiceError> {
        let runner = cfg.spades_runner.clone().ok_or_else(|| {
            ServiceError::integration("spades-runner is not configured")
        })?;
        Ok(Self::with_engine(cfg, Box::new(CommandEngine::new(runner))))
    }

    pub fn with_engine(cfg: DeployConfig, engine: Box<dyn AssemblyEngine>) -> Self {
        Self { cfg, engine }
    }

    pub fn config(&self) -> &DeployConfig {
        &self.cfg
    }

    /// Validates the raw parameter mapping, then hands the job to the
    /// engine. All validation happens before any side effect, so a
    /// rejected call leaves the platform untouched.
    pub async fn run_spades(
        &self,
        ctx: &RunContext,
        params: &Value,
    ) -> Result<RunSpadesOutput, ServiceError> {
        let params = RunSpadesParams::from_value(params)?;
        log::info!(
            "assembling {:?} from {} into {}",
            params.read_libraries,
            params.workspace_name,
            params.output_contigset_name
        );
        let job = AssemblyJob {
            workspace_name: params.workspace_name,
            read_libraries: params.read_libraries,
            output_contigset_name: params.output_contigset_name,
            dna_source: params.dna_source,
            workspace_url: self.cfg.workspace_url.clone(),
            shock_url: self.cfg.shock_url.clone(),
            handle_url: self.cfg.handle_url.clone(),
        };
        let out = self.engine.assemble(ctx, job).await?;
        log::info!("assembly report saved at {}", out.report_ref);
        Ok(out)
    }
}
