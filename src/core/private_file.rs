//! Owner-only file writes.
//!
//! Both `keyseal.toml` (which may hold the master key) and the secrets store
//! are written here: content goes to `<name>.tmp`, opened with mode 0600,
//! and is renamed over the target once synced.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Expected mode of every file keyseal writes.
#[cfg(unix)]
pub const PRIVATE_MODE: u32 = 0o600;

/// Atomically replace `path` with `contents`, readable only by the owner.
///
/// Parent directories are created as needed. On failure the temp file is
/// removed and `path` is left as it was.
pub fn write(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp = tmp_path(path);
    let result = write_tmp(&tmp, contents).and_then(|()| fs::rename(&tmp, path));
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

/// Sibling temp file used by [`write`].
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_tmp(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.create(true).truncate(true).write(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(PRIVATE_MODE);
    }

    let mut file = options.open(path)?;

    // mode() only applies on creation; a stale temp file keeps its old mode
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(PRIVATE_MODE))?;
    }

    file.write_all(contents)?;
    file.sync_all()
}
