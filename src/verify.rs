use anyhow::{ensure, Context, Result};
use kbase::shock::ShockClient;
use kbase::workspace::{ObjectData, WorkspaceClient};

use crate::objects::{Contig, ContigSet, Report, CONTIGSET_TYPE, REPORT_TYPE};

/// One contig the assembler is expected to produce. Contigs are compared
/// positionally, i-th expected against i-th stored.
#[derive(Debug, Clone)]
pub struct ExpectedContig {
    pub id: String,
    pub name: String,
    pub description: String,
    pub length: u64,
    pub md5: String,
}

/// Expected outcome of one assembly run.
#[derive(Debug, Clone)]
pub struct AssemblyExpectations {
    /// Leading contigs to compare; the stored set may be longer.
    pub contigs: Vec<ExpectedContig>,
    /// Checksum declared on the contig set as a whole.
    pub md5: String,
    /// Checksum of the FASTA blob the contig set references.
    pub fasta_md5: String,
    /// Total contig count; when absent, `contigs.len()` is the count.
    pub contig_count: Option<usize>,
}

impl AssemblyExpectations {
    pub fn contig_count(&self) -> usize {
        self.contig_count.unwrap_or(self.contigs.len())
    }
}

/// Fetches the report behind `report_ref`, the contig set it links and
/// the FASTA node behind that, and checks the whole chain against the
/// expectations. `lib_refs` are the references of the invoked libraries,
/// in any order.
pub async fn check_assembly(
    workspace: &WorkspaceClient,
    shock: &ShockClient,
    report_ref: &str,
    output_name: &str,
    lib_refs: &[String],
    expected: &AssemblyExpectations,
) -> Result<()> {
    let mut sorted_refs = lib_refs.to_vec();
    sorted_refs.sort();

    let report_obj = fetch_one(workspace, report_ref).await?;
    ensure!(
        report_obj.info.type_name() == REPORT_TYPE,
        "report object has type {}, expected {}",
        report_obj.info.type_name(),
        REPORT_TYPE
    );
    let report: Report =
        serde_json::from_value(report_obj.data.clone()).context("report payload did not decode")?;
    ensure!(
        report.objects_created.len() == 1,
        "report lists {} created objects, expected exactly 1",
        report.objects_created.len()
    );
    let created = &report.objects_created[0];
    ensure!(
        created.description == "Assembled contigs",
        "created object description is {:?}, expected \"Assembled contigs\"",
        created.description
    );
    let summary = format!("Assembled into {} contigs", expected.contig_count());
    ensure!(
        report.text_message.contains(&summary),
        "report message {:?} does not contain {:?}",
        report.text_message,
        summary
    );
    check_provenance("report", &report_obj, &sorted_refs)?;

    let contigset_obj = fetch_one(workspace, &created.reference).await?;
    ensure!(
        contigset_obj.info.type_name() == CONTIGSET_TYPE,
        "created object has type {}, expected {}",
        contigset_obj.info.type_name(),
        CONTIGSET_TYPE
    );
    ensure!(
        contigset_obj.info.name() == output_name,
        "contig set is named {:?}, expected {:?}",
        contigset_obj.info.name(),
        output_name
    );
    check_provenance("contig set", &contigset_obj, &sorted_refs)?;
    let contigset: ContigSet = serde_json::from_value(contigset_obj.data.clone())
        .context("contig set payload did not decode")?;

    let fasta = shock.get_node(&contigset.fasta_ref).await?;
    ensure!(
        fasta.md5 == expected.fasta_md5,
        "FASTA node checksum is {}, expected {}",
        fasta.md5,
        expected.fasta_md5
    );

    ensure!(
        contigset.contigs.len() == expected.contig_count(),
        "contig set holds {} contigs, expected {}",
        contigset.contigs.len(),
        expected.contig_count()
    );
    ensure!(
        contigset.id == output_name,
        "contig set id is {:?}, expected {:?}",
        contigset.id,
        output_name
    );
    ensure!(
        contigset.name == output_name,
        "contig set name field is {:?}, expected {:?}",
        contigset.name,
        output_name
    );
    ensure!(
        contigset.source == "See provenance",
        "contig set source is {:?}",
        contigset.source
    );
    ensure!(
        contigset.source_id == "See provenance",
        "contig set source_id is {:?}",
        contigset.source_id
    );
    ensure!(
        contigset.md5 == expected.md5,
        "contig set checksum is {}, expected {}",
        contigset.md5,
        expected.md5
    );

    for (index, (exp, got)) in expected.contigs.iter().zip(contigset.contigs.iter()).enumerate() {
        check_contig(index, exp, got)?;
    }
    Ok(())
}

async fn fetch_one(workspace: &WorkspaceClient, reference: &str) -> Result<ObjectData> {
    let mut objects = workspace.get_objects(&[reference.to_string()]).await?;
    ensure!(
        objects.len() == 1,
        "get_objects returned {} objects for {}",
        objects.len(),
        reference
    );
    Ok(objects.remove(0))
}

fn check_provenance(what: &str, object: &ObjectData, sorted_refs: &[String]) -> Result<()> {
    ensure!(
        object.provenance.len() == 1,
        "{} carries {} provenance entries, expected exactly 1",
        what,
        object.provenance.len()
    );
    let entry = &object.provenance[0];
    let mut inputs = entry.input_ws_objects.clone();
    inputs.sort();
    ensure!(
        inputs.as_slice() == sorted_refs,
        "{} provenance inputs {:?} do not match library refs {:?}",
        what,
        inputs,
        sorted_refs
    );
    let mut resolved = entry.resolved_ws_objects.clone();
    resolved.sort();
    ensure!(
        resolved.as_slice() == sorted_refs,
        "{} resolved provenance refs {:?} do not match library refs {:?}",
        what,
        resolved,
        sorted_refs
    );
    Ok(())
}

fn check_contig(index: usize, exp: &ExpectedContig, got: &Contig) -> Result<()> {
    ensure!(
        got.id == exp.id,
        "contig {}: id {:?}, expected {:?}",
        index,
        got.id,
        exp.id
    );
    ensure!(
        got.name == exp.name,
        "contig {}: name {:?}, expected {:?}",
        index,
        got.name,
        exp.name
    );
    ensure!(
        got.description == exp.description,
        "contig {}: description {:?}, expected {:?}",
        index,
        got.description,
        exp.description
    );
    ensure!(
        got.md5 == exp.md5,
        "contig {}: checksum {}, expected {}",
        index,
        got.md5,
        exp.md5
    );
    ensure!(
        got.length == exp.length,
        "contig {}: length {}, expected {}",
        index,
        got.length,
        exp.length
    );
    let stored = got.sequence.chars().count() as u64;
    ensure!(
        stored == exp.length,
        "contig {}: stored sequence is {} characters, declared length {}",
        index,
        stored,
        exp.length
    );
    Ok(())
}
