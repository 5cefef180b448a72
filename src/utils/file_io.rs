use std::fs::File;
use std::fs::OpenOptions;
use std::fs::{self};
use std::path::Path;

use tracing::debug;

use crate::Result;
use crate::StorageError;

/// Creates the parent directory of `path` when it does not exist yet
pub fn create_parent_dir_if_not_exist(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(StorageError::Io)?;
            debug!("created directory: {:?}", parent);
        }
    }
    Ok(())
}

pub fn open_file_for_append(path: impl AsRef<Path>) -> Result<File> {
    let path = path.as_ref();
    create_parent_dir_if_not_exist(path)?;
    let log_file = match OpenOptions::new().append(true).create(true).open(path) {
        Ok(f) => f,
        Err(e) => {
            return Err(StorageError::Io(e).into());
        }
    };
    Ok(log_file)
}
