use log::debug;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// `Ok(false)` only when the path is genuinely absent; any other probe
/// failure (e.g. a non-searchable parent directory) is an error.
pub fn target_exists(path: &Path) -> io::Result<bool> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(true),
        Ok(_) => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "target is not a regular file",
        )),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

pub fn read_file_content(path: &Path) -> io::Result<Vec<u8>> {
    fs::read(path)
}

/// Overwrites the file `path` resolves to, following symlinks.
///
/// The target must be openable for writing and must not carry a read-only
/// mode. The new bytes go through a sibling temp file and a rename so readers
/// see either the old or the new content; when the directory refuses the temp
/// file, the already opened target is rewritten in place.
pub fn write_file_atomic(path: &Path, content: &[u8]) -> io::Result<()> {
    let target = fs::canonicalize(path)?;
    let permissions = fs::metadata(&target)?.permissions();
    if permissions.readonly() {
        return Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "target file is read-only",
        ));
    }

    let mut file = OpenOptions::new().write(true).open(&target)?;
    let dir = target.parent().unwrap_or_else(|| Path::new("/"));

    match NamedTempFile::new_in(dir) {
        Ok(mut tmp) => {
            drop(file);
            tmp.write_all(content)?;
            tmp.as_file().sync_all()?;
            fs::set_permissions(tmp.path(), permissions)?;
            tmp.persist(&target).map_err(|e| e.error)?;
        }
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            debug!("{:?} not writable, rewriting {:?} in place", dir, target);
            file.set_len(0)?;
            file.write_all(content)?;
            file.sync_all()?;
        }
        Err(e) => return Err(e),
    }
    Ok(())
}
