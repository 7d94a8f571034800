//! Safety checks to prevent overwriting an input list with the result.

use std::path::{Path, PathBuf};

use crate::errors::{CompareError, Result};

/// Best-effort canonical form: resolves symlinks and `..` for existing files,
/// falls back to the path as given otherwise.
fn canonical(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Validates that an output path is safe to overwrite.
///
/// # Arguments
/// * `output` - The output path that will be created/overwritten
/// * `source_paths` - Input lists that must not be replaced by the output
///
/// # Returns
/// * `Ok(())` if the output path is safe
/// * `Err(UnsafeOutput)` if the output resolves to one of the inputs
pub fn validate_output_path(output: &Path, source_paths: &[&Path]) -> Result<()> {
    if output.as_os_str().is_empty() {
        return Err(CompareError::UnsafeOutput("output path is empty".into()));
    }

    let output_resolved = canonical(output);
    for source in source_paths {
        if output == *source || output_resolved == canonical(source) {
            return Err(CompareError::UnsafeOutput(format!(
                "output '{}' cannot be the same as input '{}'",
                output.display(),
                source.display()
            )));
        }
    }

    Ok(())
}
