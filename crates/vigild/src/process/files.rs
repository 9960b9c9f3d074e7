use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;
use tempfile::Builder;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Serialises `value` as one JSON line and atomically replaces `path` with it.
///
/// The temporary file is fsync'd before the rename so readers never observe
/// a partial snapshot.
pub(super) fn write_json_atomically<T>(path: &Path, value: &T) -> io::Result<()>
where
    T: Serialize,
{
    let directory = path.parent().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "snapshot path has no parent directory",
        )
    })?;

    let mut builder = Builder::new();
    builder.prefix(".vigil-status");
    #[cfg(unix)]
    builder.permissions(std::fs::Permissions::from_mode(0o600));

    let mut file = builder.tempfile_in(directory)?;
    serde_json::to_writer(&mut file, value).map_err(io::Error::from)?;
    file.write_all(b"\n")?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|error| error.error)?;
    Ok(())
}
