use std::path::Path;

use md5::{Digest, Md5};
use tokio::fs::File;
use tokio::io::AsyncReadExt;

use crate::error::Result;

/// Hex md5 of a local file, read in chunks. Used to cross-check the
/// checksum the blob store reports after an upload.
pub async fn file_md5(path: &Path) -> Result<String> {
    let mut hasher = Md5::new();
    let mut file = File::open(path).await?;
    let mut buffer = vec![0; 8192];

    loop {
        let n = file.read(&mut buffer).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Hex md5 of an in-memory buffer.
pub fn bytes_md5(bytes: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
