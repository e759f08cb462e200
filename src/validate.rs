//! Input validation for paths and tool names

use thiserror::Error;

use crate::tools::{find_tool_by_name, supported_tool_names};

/// Longest accepted path, in characters
pub const MAX_PATH_LEN: usize = 260;

const INVALID_PATH_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*'];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("File path cannot be empty")]
    Empty,
    #[error("File path contains invalid characters: \"{0}\"")]
    InvalidCharacters(String),
    #[error("File path is too long: \"{0}\"")]
    TooLong(String),
}

/// Shallow syntactic check of a user-supplied path.
///
/// Does not touch the filesystem and does not care whether the path is
/// absolute or relative.
pub fn validate_path(path: &str) -> Result<(), PathError> {
    if path.trim().is_empty() {
        return Err(PathError::Empty);
    }
    if path.contains(INVALID_PATH_CHARS) {
        return Err(PathError::InvalidCharacters(path.to_string()));
    }
    if path.chars().count() > MAX_PATH_LEN {
        return Err(PathError::TooLong(path.to_string()));
    }
    Ok(())
}

/// Check that every name resolves to a supported tool.
///
/// On failure, returns one message per unknown name followed by a line
/// listing all supported tools.
pub fn validate_tool_names<S: AsRef<str>>(names: &[S]) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = names
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| find_tool_by_name(name).is_none())
        .map(|name| format!("Unsupported AI tool: \"{}\"", name))
        .collect();

    if errors.is_empty() {
        return Ok(());
    }

    errors.push(format!(
        "Supported tools: {}",
        supported_tool_names().join(", ")
    ));
    Err(errors)
}

/// Split a comma-separated list of paths, trimming and dropping empty entries.
pub fn parse_custom_paths(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|path| !path.is_empty())
        .map(String::from)
        .collect()
}
