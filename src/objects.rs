use kbase::handle::HandleRecord;
use serde::{Deserialize, Serialize};

/// Workspace type tags, without the `-major.minor` suffix the workspace
/// appends at save time.
pub const FILE_PAIRED_TYPE: &str = "KBaseFile.PairedEndLibrary";
pub const ASSY_PAIRED_TYPE: &str = "KBaseAssembly.PairedEndLibrary";
pub const REPORT_TYPE: &str = "KBaseReport.Report";
pub const CONTIGSET_TYPE: &str = "KBaseGenomes.ContigSet";

/// One file slot (`lib1`/`lib2`) of a `KBaseFile` paired-end library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileLib {
    pub file: HandleRecord,
    pub encoding: String,
    #[serde(rename = "type")]
    pub file_type: String,
    pub size: u64,
}

/// Report object saved by a successful assembly run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    #[serde(default)]
    pub objects_created: Vec<CreatedObject>,
    #[serde(default)]
    pub text_message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedObject {
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(default)]
    pub description: String,
}

/// Assembled contigs. `fasta_ref` points at the blob-store node holding
/// the FASTA rendition of the same sequences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContigSet {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub source_id: String,
    pub md5: String,
    pub fasta_ref: String,
    pub contigs: Vec<Contig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub length: u64,
    pub md5: String,
    pub sequence: String,
}

/// What `run_spades` returns: the reference of the saved report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSpadesOutput {
    pub report_ref: String,
}
