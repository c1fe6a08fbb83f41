use crate::error::{Error, Result};
use sha2::Digest;
use std::fs;
use std::path::Path;

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = sha2::Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Replace `dest` through a sibling temp file so readers never see a torn write.
pub fn write_atomic(dest: &Path, bytes: &[u8]) -> Result<()> {
    let parent = dest.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(Error::workspace("create", parent))?;
    let file_name = dest
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("staged");
    let tmp_path = parent.join(format!(".{file_name}.tmp"));
    fs::write(&tmp_path, bytes).map_err(Error::workspace("write", &tmp_path))?;
    fs::rename(&tmp_path, dest).map_err(Error::workspace("publish", dest))?;
    Ok(())
}
