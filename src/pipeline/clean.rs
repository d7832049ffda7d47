use std::fs;
use std::io;

use crate::domain::{AppError, BuildPaths};

/// Remove the whole output tree.
///
/// Idempotent: an already-missing output root is not an error.
pub fn clean(paths: &BuildPaths) -> Result<(), AppError> {
    match fs::remove_dir_all(&paths.output) {
        Ok(()) => {
            tracing::debug!(output = %paths.output.display(), "removed output tree");
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}
