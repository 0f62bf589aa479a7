#![allow(dead_code)]


use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use kbase::md5sum::bytes_md5;
use kbase::shock::ShockClient;
use kbase::workspace::{ObjectSaveData, ProvenanceAction, WorkspaceClient};
use lazy_static::lazy_static;
use serde_json::json;

use kb_spades::engine::{AssemblyEngine, AssemblyJob};
use kb_spades::objects::{RunSpadesOutput, CONTIGSET_TYPE, REPORT_TYPE};
use kb_spades::service::RunContext;
use kb_spades::staging::{LibrarySpec, ReadsFile};
use kb_spades::verify::{AssemblyExpectations, ExpectedContig};
use kb_spades::{ServiceError, SpadesService, TestFixture};

pub const CONTIG_DESCRIPTION: &str = "Note MD5 is generated from uppercasing the sequence";

pub fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Spawns a stub platform and a fixture wired to it.
pub async fn stub_fixture() -> (stub::StubPlatform, TestFixture) {
    init_logs();
    let platform = stub::spawn().await;
    let fixture = TestFixture::new(platform.config(), stub::TOKEN);
    (platform, fixture)
}

/// Service with a recording fake engine instead of the external runner.
pub fn stub_service(platform: &stub::StubPlatform) -> (FakeEngine, SpadesService) {
    let engine = FakeEngine::default();
    let service = SpadesService::with_engine(platform.config(), Box::new(engine.clone()));
    (engine, service)
}

pub fn context() -> RunContext {
    RunContext::new(stub::TOKEN)
}

/// One canned contig of the fake assembler. The name embeds the length
/// the same way the real assembler names nodes.
pub struct CannedContig {
    pub name: &'static str,
    pub sequence: &'static str,
}

lazy_static! {
    static ref CANNED_CONTIGS: Vec<CannedContig> = vec![
        CannedContig {
            name: "NODE_1_length_48_cov_8.5_ID_21",
            sequence: "ATGGCTAAGGACGTTCCAGAAGCTTGGAATGCCTTGACTGAAGCTCGT",
        },
        CannedContig {
            name: "NODE_2_length_36_cov_6.1_ID_7",
            sequence: "CCGGATTACAGGCTTAACCGGATTACAGGCTTAACC",
        },
        CannedContig {
            name: "NODE_3_length_24_cov_2.2_ID_5",
            sequence: "TTGACCATGCGGTTGACCATGCGG",
        },
    ];
}

/// Contigs the fake engine produces for a run over `lib_count`
/// libraries: one more contig than libraries, capped by the table.
pub fn canned_contigs(lib_count: usize) -> Vec<&'static CannedContig> {
    let n = (lib_count + 1).min(CANNED_CONTIGS.len());
    CANNED_CONTIGS.iter().take(n).collect()
}

pub fn render_fasta(contigs: &[&CannedContig]) -> Vec<u8> {
    let mut out = Vec::new();
    for contig in contigs {
        out.extend_from_slice(format!(">{}\n{}\n", contig.name, contig.sequence).as_bytes());
    }
    out
}

fn contig_md5(contig: &CannedContig) -> String {
    bytes_md5(contig.sequence.to_uppercase().as_bytes())
}

fn set_md5(contigs: &[&CannedContig]) -> String {
    let mut sums: Vec<String> = contigs.iter().map(|c| contig_md5(c)).collect();
    sums.sort();
    bytes_md5(sums.join(",").as_bytes())
}

/// What a fake-engine run over `lib_count` libraries must verify as.
pub fn canned_expectations(lib_count: usize) -> AssemblyExpectations {
    let contigs = canned_contigs(lib_count);
    AssemblyExpectations {
        contigs: contigs
            .iter()
            .map(|contig| ExpectedContig {
                id: contig.name.to_string(),
                name: contig.name.to_string(),
                description: CONTIG_DESCRIPTION.to_string(),
                length: contig.sequence.chars().count() as u64,
                md5: contig_md5(contig),
            })
            .collect(),
        md5: set_md5(&contigs),
        fasta_md5: bytes_md5(&render_fasta(&contigs)),
        contig_count: None,
    }
}

fn fastq_records(tag: &str, count: usize) -> String {
    let mut out = String::new();
    for i in 0..count {
        out.push_str(&format!(
            "@{}_{}/1\nACGTACGTACGTACGTACGT\n+\nIIIIIIIIIIIIIIIIIIII\n",
            tag, i
        ));
    }
    out
}

/// Writes a small forward/reverse pair into `dir` and builds the
/// library spec for it.
pub fn paired_spec(dir: &Path, key: &str) -> LibrarySpec {
    let fwd = dir.join("small.forward.fq");
    let rev = dir.join("small.reverse.fq");
    std::fs::write(&fwd, fastq_records("fwd", 4)).unwrap();
    std::fs::write(&rev, fastq_records("rev", 4)).unwrap();
    LibrarySpec::paired(
        key,
        ReadsFile::new(fwd, "test_fwd.fq", "fastq"),
        ReadsFile::new(rev, "test_rev.fq", "fastq"),
    )
}

/// Writes a small interleaved file into `dir` and builds the library
/// spec for it.
pub fn interleaved_spec(dir: &Path, key: &str) -> LibrarySpec {
    let path = dir.join("interleaved.fq");
    std::fs::write(&path, fastq_records("int", 8)).unwrap();
    LibrarySpec::interleaved(key, ReadsFile::new(path, "test_int.fq", ".FQ"))
}

/// Engine double: resolves the named libraries, writes a canned contig
/// set, its FASTA blob and a report through the real clients, and
/// records every job it was handed. Clones share the job log.
#[derive(Clone, Default)]
pub struct FakeEngine {
    jobs: Arc<Mutex<Vec<AssemblyJob>>>,
}

impl FakeEngine {
    pub fn last_job(&self) -> Option<AssemblyJob> {
        self.jobs.lock().unwrap().last().cloned()
    }

    pub fn job_count(&self) -> usize {
        self.jobs.lock().unwrap().len()
    }
}

#[async_trait]
impl AssemblyEngine for FakeEngine {
    async fn assemble(
        &self,
        ctx: &RunContext,
        job: AssemblyJob,
    ) -> Result<RunSpadesOutput, ServiceError> {
        self.jobs.lock().unwrap().push(job.clone());
        let workspace = WorkspaceClient::new(&job.workspace_url, &ctx.token);
        let shock = ShockClient::new(&job.shock_url, &ctx.token);

        let name_refs: Vec<String> = job
            .read_libraries
            .iter()
            .map(|name| format!("{}/{}", job.workspace_name, name))
            .collect();
        let libraries = workspace.get_objects(&name_refs).await?;
        let lib_refs: Vec<String> = libraries.iter().map(|o| o.info.ref_string()).collect();

        let contigs = canned_contigs(libraries.len());
        let mut fasta_file = tempfile::NamedTempFile::new()
            .map_err(|err| ServiceError::integration(err.to_string()))?;
        fasta_file
            .write_all(&render_fasta(&contigs))
            .and_then(|_| fasta_file.flush())
            .map_err(|err| ServiceError::integration(err.to_string()))?;
        let fasta_node = shock.upload(fasta_file.path()).await?;

        let mut provenance = ctx.provenance.clone();
        if provenance.is_empty() {
            provenance.push(ProvenanceAction::default());
        }
        provenance[0].input_ws_objects = lib_refs.clone();

        let contigset = json!({
            "id": job.output_contigset_name,
            "name": job.output_contigset_name,
            "source": "See provenance",
            "source_id": "See provenance",
            "md5": set_md5(&contigs),
            "fasta_ref": fasta_node.id,
            "contigs": contigs.iter().map(|contig| json!({
                "id": contig.name,
                "name": contig.name,
                "description": CONTIG_DESCRIPTION,
                "length": contig.sequence.chars().count(),
                "md5": contig_md5(contig),
                "sequence": contig.sequence,
            })).collect::<Vec<_>>(),
        });
        let saved = workspace
            .save_objects(
                &job.workspace_name,
                vec![ObjectSaveData {
                    object_type: CONTIGSET_TYPE.to_string(),
                    data: contigset,
                    name: job.output_contigset_name.clone(),
                    provenance: Some(provenance.clone()),
                }],
            )
            .await?;
        let contigset_info = saved
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::integration("no contig set info returned"))?;

        let report = json!({
            "objects_created": [{
                "ref": contigset_info.ref_string(),
                "description": "Assembled contigs",
            }],
            "text_message": format!("Assembled into {} contigs.", contigs.len()),
        });
        let saved = workspace
            .save_objects(
                &job.workspace_name,
                vec![ObjectSaveData {
                    object_type: REPORT_TYPE.to_string(),
                    data: report,
                    name: format!("{}_report", job.output_contigset_name),
                    provenance: Some(provenance),
                }],
            )
            .await?;
        let report_info = saved
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::integration("no report info returned"))?;
        Ok(RunSpadesOutput {
            report_ref: report_info.ref_string(),
        })
    }
}
