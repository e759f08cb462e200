//! Symbolic link creation
//!
//! Clears targets the user agreed to overwrite, then links every target
//! back to the source rule file with relative symlinks.

use futures_util::stream::{FuturesUnordered, StreamExt};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// A resolved link destination
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LinkTarget {
    /// Path of the link, relative to the project root or absolute
    pub path: String,
    /// Human-readable label (tool name, or the raw path for custom targets)
    pub name: String,
}

impl LinkTarget {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }
}

/// Why a single link could not be created
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LinkFailure {
    #[error("File already exists")]
    AlreadyExists,
    #[error("Permission denied")]
    PermissionDenied,
    #[error("{0}")]
    Io(String),
}

impl From<io::Error> for LinkFailure {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::AlreadyExists => LinkFailure::AlreadyExists,
            io::ErrorKind::PermissionDenied => LinkFailure::PermissionDenied,
            _ => LinkFailure::Io(e.to_string()),
        }
    }
}

/// Deleting a target selected for overwrite failed
#[derive(Debug, Error)]
#[error("Failed to delete old file \"{path}\": {source}")]
pub struct RemoveError {
    pub path: String,
    #[source]
    pub source: io::Error,
}

/// Aggregate outcome of a link batch
#[derive(Debug, Default)]
pub struct BatchResult {
    /// True only if every target was linked
    pub success: bool,
    /// Paths of linked targets, in completion order
    pub created_files: Vec<String>,
    pub failures: Vec<(LinkTarget, LinkFailure)>,
}

/// Resolve `path` against `root` and drop `.`/`..` components lexically.
pub fn absolute_path(root: &Path, path: &str) -> PathBuf {
    let joined = root.join(path);
    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() && !out.has_root() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Creates rule file links inside one project
pub struct Linker {
    project_root: PathBuf,
}

impl Linker {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }

    /// Delete every target, stopping at the first failure.
    ///
    /// Must complete before [`Linker::create_links`] runs so a delete never
    /// races a create on the same path.
    pub fn remove_existing(&self, targets: &[LinkTarget]) -> Result<(), RemoveError> {
        for target in targets {
            let path = absolute_path(&self.project_root, &target.path);
            fs::remove_file(&path).map_err(|source| RemoveError {
                path: target.path.clone(),
                source,
            })?;
            tracing::debug!(path = %target.path, "removed existing target");
        }
        Ok(())
    }

    /// Link every target to `source`, concurrently.
    ///
    /// A failing target never stops its siblings; the result is only
    /// returned once every target has finished.
    pub async fn create_links(&self, source: &str, targets: &[LinkTarget]) -> BatchResult {
        let source = absolute_path(&self.project_root, source);

        let mut pending: FuturesUnordered<_> = targets
            .iter()
            .map(|target| {
                let source = &source;
                async move {
                    let dest = absolute_path(&self.project_root, &target.path);
                    (target, link_one(source, &dest).await)
                }
            })
            .collect();

        let mut result = BatchResult {
            success: true,
            ..Default::default()
        };

        while let Some((target, outcome)) = pending.next().await {
            match outcome {
                Ok(()) => {
                    tracing::debug!(path = %target.path, "linked");
                    result.created_files.push(target.path.clone());
                }
                Err(failure) => {
                    tracing::debug!(path = %target.path, error = %failure, "link failed");
                    result.success = false;
                    result.failures.push((target.clone(), failure));
                }
            }
        }

        result
    }

    /// Run [`Linker::create_links`] on a fresh runtime.
    pub fn create_links_blocking(
        &self,
        source: &str,
        targets: &[LinkTarget],
    ) -> io::Result<BatchResult> {
        let rt = tokio::runtime::Runtime::new()?;
        Ok(rt.block_on(self.create_links(source, targets)))
    }
}

async fn link_one(source: &Path, dest: &Path) -> Result<(), LinkFailure> {
    ensure_source_file(source).await?;

    let dest_dir = dest
        .parent()
        .ok_or_else(|| LinkFailure::Io(format!("Invalid link path: {}", dest.display())))?;
    tokio::fs::create_dir_all(dest_dir).await?;

    // Resolve both sides through any symlinked directories so the relative
    // path is computed between real locations.
    let real_dest_dir = tokio::fs::canonicalize(dest_dir).await?;
    let real_source = real_path_of_entry(source).await?;
    let relative_source = pathdiff::diff_paths(&real_source, &real_dest_dir)
        .ok_or_else(|| LinkFailure::Io("Cannot calculate relative path".to_string()))?;

    #[cfg(unix)]
    tokio::fs::symlink(&relative_source, dest).await?;

    #[cfg(windows)]
    tokio::fs::symlink_file(&relative_source, dest).await?;

    Ok(())
}

/// Create the source file (and its parent directories) if it is missing.
///
/// Never truncates, so concurrent calls for the same source are harmless.
async fn ensure_source_file(source: &Path) -> io::Result<()> {
    if tokio::fs::try_exists(source).await? {
        return Ok(());
    }
    if let Some(parent) = source.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(source)
        .await?;
    Ok(())
}

/// Canonicalize the parent directory but keep the final component as is,
/// so a source that is itself a symlink is linked to directly.
async fn real_path_of_entry(path: &Path) -> io::Result<PathBuf> {
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => Ok(tokio::fs::canonicalize(parent).await?.join(name)),
        _ => tokio::fs::canonicalize(path).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn target(path: &str) -> LinkTarget {
        LinkTarget::new(path, path)
    }

    #[test]
    fn test_absolute_path_normalizes_lexically() {
        let root = Path::new("/project");
        assert_eq!(absolute_path(root, "rule.md"), PathBuf::from("/project/rule.md"));
        assert_eq!(absolute_path(root, "./a/../b.md"), PathBuf::from("/project/b.md"));
        assert_eq!(absolute_path(root, "../shared/rule.md"), PathBuf::from("/shared/rule.md"));
        assert_eq!(absolute_path(root, "/abs/rule.md"), PathBuf::from("/abs/rule.md"));
    }

    #[test]
    fn test_link_failure_from_io_error() {
        let exists = io::Error::from(io::ErrorKind::AlreadyExists);
        assert_eq!(LinkFailure::from(exists), LinkFailure::AlreadyExists);

        let denied = io::Error::from(io::ErrorKind::PermissionDenied);
        assert_eq!(LinkFailure::from(denied), LinkFailure::PermissionDenied);

        let other = io::Error::other("disk on fire");
        assert_eq!(LinkFailure::from(other), LinkFailure::Io("disk on fire".to_string()));
    }

    #[test]
    fn test_remove_existing_deletes_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.md"), "a").unwrap();
        fs::write(temp_dir.path().join("b.md"), "b").unwrap();

        let linker = Linker::new(temp_dir.path());
        linker
            .remove_existing(&[target("a.md"), target("b.md")])
            .unwrap();

        assert!(!temp_dir.path().join("a.md").exists());
        assert!(!temp_dir.path().join("b.md").exists());
    }

    #[test]
    fn test_remove_existing_stops_at_first_failure() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("b.md"), "b").unwrap();

        let linker = Linker::new(temp_dir.path());
        let err = linker
            .remove_existing(&[target("missing.md"), target("b.md")])
            .unwrap_err();

        assert_eq!(err.path, "missing.md");
        assert!(temp_dir.path().join("b.md").exists());
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn test_create_links_creates_source_and_relative_links() {
        let temp_dir = TempDir::new().unwrap();
        let linker = Linker::new(temp_dir.path());

        let result = linker
            .create_links(
                "rule.md",
                &[target(".cursor/rules/coding-standards.mdc"), target("CLAUDE.md")],
            )
            .await;

        assert!(result.success);
        assert!(result.failures.is_empty());
        assert_eq!(result.created_files.len(), 2);

        let source = temp_dir.path().join("rule.md");
        assert_eq!(fs::read_to_string(&source).unwrap(), "");

        let nested = temp_dir.path().join(".cursor/rules/coding-standards.mdc");
        assert!(nested.is_symlink());
        assert_eq!(fs::read_link(&nested).unwrap(), PathBuf::from("../../rule.md"));
        assert_eq!(
            fs::read_link(temp_dir.path().join("CLAUDE.md")).unwrap(),
            PathBuf::from("rule.md")
        );

        fs::write(&source, "# Shared Rules").unwrap();
        assert_eq!(fs::read_to_string(&nested).unwrap(), "# Shared Rules");
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn test_create_links_keeps_existing_source_content() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("docs")).unwrap();
        fs::write(temp_dir.path().join("docs/rules.md"), "# Keep me").unwrap();

        let linker = Linker::new(temp_dir.path());
        let result = linker
            .create_links("docs/rules.md", &[target(".roo/rules/coding-standards.md")])
            .await;

        assert!(result.success);
        let link = temp_dir.path().join(".roo/rules/coding-standards.md");
        assert_eq!(fs::read_link(&link).unwrap(), PathBuf::from("../../docs/rules.md"));
        assert_eq!(fs::read_to_string(&link).unwrap(), "# Keep me");
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn test_create_links_failure_does_not_abort_siblings() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("taken.md"), "occupied").unwrap();

        let linker = Linker::new(temp_dir.path());
        let result = linker
            .create_links("rule.md", &[target("taken.md"), target("free.md")])
            .await;

        assert!(!result.success);
        assert_eq!(result.created_files, vec!["free.md".to_string()]);
        assert_eq!(
            result.failures,
            vec![(target("taken.md"), LinkFailure::AlreadyExists)]
        );
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("taken.md")).unwrap(),
            "occupied"
        );
        assert!(temp_dir.path().join("free.md").is_symlink());
    }

    #[tokio::test]
    async fn test_create_links_empty_batch_succeeds() {
        let temp_dir = TempDir::new().unwrap();
        let linker = Linker::new(temp_dir.path());

        let result = linker.create_links("rule.md", &[]).await;

        assert!(result.success);
        assert!(result.created_files.is_empty());
    }

    #[test]
    #[cfg(unix)]
    fn test_create_links_blocking() {
        let temp_dir = TempDir::new().unwrap();
        let linker = Linker::new(temp_dir.path());

        let result = linker
            .create_links_blocking("rule.md", &[target("GEMINI.md")])
            .unwrap();

        assert!(result.success);
        assert!(temp_dir.path().join("GEMINI.md").is_symlink());
    }
}
