// dqgate-core/src/infrastructure/fs.rs

use crate::infrastructure::error::InfrastructureError;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Writes a report file so readers never observe a half-written document:
/// content goes to a sibling temp file which is then renamed over `path`.
/// Missing parent directories are created.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if !parent.exists() {
        fs::create_dir_all(parent)?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let mut staged = tempfile::NamedTempFile::new_in(parent)?;
    staged.write_all(content.as_ref())?;
    staged.flush()?;
    staged
        .persist(path)
        .map_err(|e| InfrastructureError::Io(e.error))?;

    Ok(())
}
