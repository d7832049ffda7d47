use std::fs;

use walkdir::WalkDir;

use crate::domain::{AppError, BuildPaths};

/// Copy every file under the asset tree into `<output>/assets`, preserving
/// relative structure.
///
/// Overwrites files already present; never deletes anything (that is the
/// cleaner's job). Returns the number of files copied.
pub fn copy_assets(paths: &BuildPaths) -> Result<usize, AppError> {
    if !paths.assets.exists() {
        return Ok(0);
    }

    let mut copied = 0;
    for entry in WalkDir::new(&paths.assets).sort_by_file_name() {
        let entry = entry.map_err(|err| AppError::Io(err.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(&paths.assets)
            .map_err(|_| AppError::InvalidPath(entry.path().to_path_buf()))?;
        let dest = paths.output_assets.join(relative);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(entry.path(), &dest)?;
        copied += 1;
    }

    tracing::debug!(count = copied, dest = %paths.output_assets.display(), "copied assets");
    Ok(copied)
}
