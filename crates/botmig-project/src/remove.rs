//! Recursive deletion that survives read-only entries.
//!
//! Template checkouts contain read-only files (git pack files, and whatever
//! the submodules ship). A plain recursive delete stops at the first one, so
//! every failed removal with `PermissionDenied` makes the entry and its
//! parent writable and retries once.

use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use crate::error::ProjectError;

/// Remove a file, symlink, or directory tree. A missing path is not an error.
pub fn remove_all(path: &Path) -> Result<(), ProjectError> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(ProjectError::io(path, e)),
    };

    if metadata.is_dir() {
        for entry in retrying(path, |p| fs::read_dir(p))? {
            let entry = entry.map_err(|e| ProjectError::io(path, e))?;
            remove_all(&entry.path())?;
        }
        retrying(path, |p| fs::remove_dir(p))
    } else {
        retrying(path, |p| fs::remove_file(p))
    }
}

fn retrying<T>(path: &Path, op: impl Fn(&Path) -> io::Result<T>) -> Result<T, ProjectError> {
    match op(path) {
        Ok(value) => Ok(value),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            debug!(path = %path.display(), "permission denied, making writable and retrying");
            // Either may fail; the retry reports the error that matters.
            let _ = make_writable(path);
            if let Some(parent) = path.parent() {
                let _ = make_writable(parent);
            }
            op(path).map_err(|e| ProjectError::io(path, e))
        }
        Err(e) => Err(ProjectError::io(path, e)),
    }
}

#[cfg(unix)]
fn make_writable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = fs::symlink_metadata(path)?.permissions();
    permissions.set_mode(permissions.mode() | 0o700);
    fs::set_permissions(path, permissions)
}

#[cfg(not(unix))]
#[allow(clippy::permissions_set_readonly_false)]
fn make_writable(path: &Path) -> io::Result<()> {
    let mut permissions = fs::symlink_metadata(path)?.permissions();
    permissions.set_readonly(false);
    fs::set_permissions(path, permissions)
}
