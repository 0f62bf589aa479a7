use std::io::Write;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use serde::Serialize;
use tokio::process::Command;

use crate::error::ServiceError;
use crate::objects::RunSpadesOutput;
use crate::service::RunContext;

/// Everything the assembler needs for one run: the validated parameters
/// plus the service endpoints it pulls reads from and saves results to.
#[derive(Debug, Clone, Serialize)]
pub struct AssemblyJob {
    pub workspace_name: String,
    pub read_libraries: Vec<String>,
    pub output_contigset_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dna_source: Option<String>,
    pub workspace_url: String,
    pub shock_url: String,
    pub handle_url: String,
}

/// Seam to the pre-built assembler. An implementation assembles the
/// named libraries, saves the contig set and a report into the job's
/// workspace, and returns the report reference.
#[async_trait]
pub trait AssemblyEngine: Send + Sync {
    async fn assemble(
        &self,
        ctx: &RunContext,
        job: AssemblyJob,
    ) -> Result<RunSpadesOutput, ServiceError>;
}

/// Default engine: spawns the configured runner binary with a JSON job
/// file as its only argument and reads the result object from the last
/// non-empty line of its stdout.
pub struct CommandEngine {
    runner: PathBuf,
}

impl CommandEngine {
    pub fn new(runner: PathBuf) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl AssemblyEngine for CommandEngine {
    async fn assemble(
        &self,
        ctx: &RunContext,
        job: AssemblyJob,
    ) -> Result<RunSpadesOutput, ServiceError> {
        let payload = serde_json::json!({ "job": job, "context": ctx });
        let mut job_file = tempfile::NamedTempFile::new().map_err(integration)?;
        serde_json::to_writer(&mut job_file, &payload).map_err(integration)?;
        job_file.flush().map_err(integration)?;

        log::info!(
            "running assembler {} for {}",
            self.runner.display(),
            job.output_contigset_name
        );
        let output = Command::new(&self.runner)
            .arg(job_file.path())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(integration)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ServiceError::integration(format!(
                "assembler exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        let line = stdout
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .unwrap_or("");
        serde_json::from_str(line).map_err(|err| {
            ServiceError::integration(format!("assembler wrote no result object: {}", err))
        })
    }
}

fn integration<E: std::fmt::Display>(err: E) -> ServiceError {
    ServiceError::integration(err.to_string())
}
