//! Publish files through a temporary sibling and a rename.

use std::fs::File;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::EchoConfigError;

/// Create `path` from what `write` puts into a temporary file.
///
/// The temporary lives next to `path` so the final rename stays on one
/// filesystem. When `write` fails the temporary is removed and `path` keeps
/// its previous content, if any.
pub(crate) fn write_atomic<F, E>(path: &Path, write: F) -> Result<(), EchoConfigError>
where
    F: FnOnce(&mut File) -> Result<(), E>,
    EchoConfigError: From<E>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir).map_err(|err| EchoConfigError::io(path, err))?;
    write(temp.as_file_mut())?;
    temp.as_file_mut()
        .sync_all()
        .map_err(|err| EchoConfigError::io(path, err))?;
    temp.persist(path)
        .map_err(|err| EchoConfigError::io(path, err.error))?;
    debug!(path = %path.display(), "published file");
    Ok(())
}
