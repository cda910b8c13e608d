use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Reads the whole document as UTF-8. Invalid UTF-8 is an error, never
/// lossily converted.
pub fn read_document(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))
}

/// Overwrites `path` with `content`.
///
/// With `atomic` set, the content is written to a temporary file beside the
/// target and renamed over it, so readers see either the old or the new
/// document. Symlinks are resolved first so the link's target is replaced,
/// not the link. The rename cannot carry the original owner over, so a file
/// owned by someone else is rewritten in place instead.
pub fn write_document(path: &Path, content: &str, atomic: bool) -> Result<()> {
    if atomic {
        write_atomic(path, content)
    } else {
        write_in_place(path, content)
    }
}

fn write_in_place(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("Failed to write file: {:?}", path))
}

fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let target = match fs::canonicalize(path) {
        Ok(resolved) => resolved,
        Err(_) => path.to_path_buf(),
    };
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {:?}", dir))?;

    if let Ok(metadata) = fs::metadata(&target) {
        let tmp_metadata = tmp
            .as_file()
            .metadata()
            .with_context(|| format!("Failed to stat temporary file for {:?}", target))?;
        if !same_owner(&metadata, &tmp_metadata) {
            debug!("{:?} has a different owner, writing in place", target);
            drop(tmp);
            return write_in_place(&target, content);
        }
        fs::set_permissions(tmp.path(), metadata.permissions())
            .with_context(|| format!("Failed to copy permissions of {:?}", target))?;
    }

    tmp.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write temporary file for {:?}", target))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("Failed to flush temporary file for {:?}", target))?;

    tmp.persist(&target)
        .with_context(|| format!("Failed to replace file: {:?}", target))?;
    Ok(())
}

#[cfg(unix)]
fn same_owner(a: &fs::Metadata, b: &fs::Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;
    a.uid() == b.uid() && a.gid() == b.gid()
}

#[cfg(not(unix))]
fn same_owner(_a: &fs::Metadata, _b: &fs::Metadata) -> bool {
    true
}
