mod config;
pub mod history;

pub use config::{Config, DisplayConfig, EndpointConfig, OutputMode, StoragePaths, TimeoutConfig};
pub use history::HistoryStore;

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::StorageError;

/// Directory holding the running executable, falling back to the working directory.
pub fn executable_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Replace `path` with `contents` so readers see either the old or the new file.
///
/// Writes a sibling `*.tmp` file, flushes and syncs it, then renames it over
/// the target.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StorageError> {
    let fail = |source| StorageError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(fail)?;
    }

    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    {
        let mut file = File::create(&temp_path).map_err(fail)?;
        file.write_all(contents).map_err(fail)?;
        file.flush().map_err(fail)?;
        file.sync_all().map_err(fail)?;
    }

    if let Err(err) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(fail(err));
    }
    Ok(())
}
