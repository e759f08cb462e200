//! Detection of link targets that already exist on disk

use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::linker::{LinkTarget, absolute_path};

/// An existence check failed for a reason other than "not found".
#[derive(Debug, Error)]
#[error("Error checking file \"{path}\": {source}")]
pub struct InspectError {
    pub path: String,
    #[source]
    pub source: io::Error,
}

/// Targets split by whether something already occupies their path.
///
/// Both lists keep the order in which targets were requested.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Classified {
    pub existing: Vec<LinkTarget>,
    pub new: Vec<LinkTarget>,
}

/// Partition `targets` into existing and new paths relative to `project_root`.
///
/// Uses `symlink_metadata`, so a dangling symlink counts as existing. Any
/// error other than `NotFound` aborts the whole classification.
pub fn classify_targets(
    project_root: &Path,
    targets: Vec<LinkTarget>,
) -> Result<Classified, InspectError> {
    let mut classified = Classified::default();

    for target in targets {
        let path = absolute_path(project_root, &target.path);
        match fs::symlink_metadata(&path) {
            Ok(_) => {
                tracing::debug!(path = %target.path, "target already exists");
                classified.existing.push(target);
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => classified.new.push(target),
            Err(source) => {
                return Err(InspectError {
                    path: target.path,
                    source,
                });
            }
        }
    }

    Ok(classified)
}
