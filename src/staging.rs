use std::path::PathBuf;

use anyhow::{anyhow, Result};
use kbase::handle::HandleRecord;
use kbase::workspace::{ObjectInfo, ObjectSaveData};
use serde_json::{json, Value};

use crate::fixture::TestFixture;
use crate::objects::{FileLib, ASSY_PAIRED_TYPE, FILE_PAIRED_TYPE};

/// Sequencing technology stamped on every staged library.
pub const SEQ_TECH: &str = "fake data";

/// One local reads file to upload: the path, the file name recorded on
/// its handle, and the declared format.
#[derive(Debug, Clone)]
pub struct ReadsFile {
    pub path: PathBuf,
    pub name: String,
    pub file_type: String,
}

impl ReadsFile {
    pub fn new(path: impl Into<PathBuf>, name: &str, file_type: &str) -> Self {
        Self {
            path: path.into(),
            name: name.to_string(),
            file_type: file_type.to_string(),
        }
    }
}

/// A library to stage under `object_name`: forward reads, optional
/// reverse reads, and the shape to save it in. `key` is the label the
/// fixture memoizes the saved info under.
#[derive(Debug, Clone)]
pub struct LibrarySpec {
    pub key: String,
    pub object_name: String,
    pub fwd: ReadsFile,
    pub rev: Option<ReadsFile>,
    pub kbase_assy: bool,
}

impl LibrarySpec {
    pub fn paired(key: &str, fwd: ReadsFile, rev: ReadsFile) -> Self {
        Self {
            key: key.to_string(),
            object_name: key.to_string(),
            fwd,
            rev: Some(rev),
            kbase_assy: false,
        }
    }

    pub fn interleaved(key: &str, fwd: ReadsFile) -> Self {
        Self {
            key: key.to_string(),
            object_name: key.to_string(),
            fwd,
            rev: None,
            kbase_assy: false,
        }
    }

    /// Same library in the legacy `KBaseAssembly` shape.
    pub fn legacy(mut self, key: &str) -> Self {
        self.key = key.to_string();
        self.object_name = key.to_string();
        self.kbase_assy = true;
        self
    }
}

struct UploadedReads {
    handle: HandleRecord,
    size: u64,
    file_type: String,
}

/// Uploads the library's files to the blob store, registers a handle per
/// file, composes the typed library object and saves it in the run
/// workspace. The saved info tuple lands in the fixture under
/// `spec.key`.
pub async fn stage_library(fixture: &mut TestFixture, spec: LibrarySpec) -> Result<ObjectInfo> {
    log::info!("staging library {} as {}", spec.key, spec.object_name);
    let fwd = upload_reads(fixture, &spec.fwd).await?;
    let rev = match &spec.rev {
        Some(file) => Some(upload_reads(fixture, file).await?),
        None => None,
    };
    let (object_type, data) = compose_library(&fwd, rev.as_ref(), spec.kbase_assy);

    let workspace = fixture.ws_name().await?;
    let saved = fixture
        .workspace
        .save_objects(
            &workspace,
            vec![ObjectSaveData {
                object_type: object_type.to_string(),
                data,
                name: spec.object_name.clone(),
                provenance: None,
            }],
        )
        .await?;
    let info = saved
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("save_objects returned no info for {}", spec.object_name))?;
    log::info!("staged {} at {}", spec.key, info.ref_string());
    fixture.staged.insert(spec.key, info.clone());
    Ok(info)
}

async fn upload_reads(fixture: &mut TestFixture, file: &ReadsFile) -> Result<UploadedReads> {
    let node = fixture.shock.upload(&file.path).await?;
    fixture.nodes_to_delete.push(node.id.clone());
    let hid = fixture
        .handles
        .persist_handle(&node.id, "shock", fixture.shock.url())
        .await?;
    log::info!("handle {} registered for node {}", hid, node.id);
    fixture.handles_to_delete.push(hid.clone());
    Ok(UploadedReads {
        handle: HandleRecord {
            hid: Some(hid),
            file_name: Some(file.name.clone()),
            id: node.id,
            url: fixture.shock.url().to_string(),
            kind: "shock".to_string(),
            remote_md5: Some(node.md5),
        },
        size: node.size,
        file_type: file.file_type.clone(),
    })
}

fn compose_library(
    fwd: &UploadedReads,
    rev: Option<&UploadedReads>,
    kbase_assy: bool,
) -> (&'static str, Value) {
    if kbase_assy {
        let mut data = json!({
            "sequencing_tech": SEQ_TECH,
            "handle_1": fwd.handle,
        });
        if let Some(rev) = rev {
            data["handle_2"] = json!(rev.handle);
        }
        (ASSY_PAIRED_TYPE, data)
    } else {
        let mut data = json!({
            "sequencing_tech": SEQ_TECH,
            "lib1": file_lib(fwd),
        });
        if let Some(rev) = rev {
            data["lib2"] = json!(file_lib(rev));
        }
        (FILE_PAIRED_TYPE, data)
    }
}

fn file_lib(reads: &UploadedReads) -> FileLib {
    FileLib {
        file: reads.handle.clone(),
        encoding: "UTF8".to_string(),
        file_type: reads.file_type.clone(),
        size: reads.size,
    }
}
