//! rule-link - AI Tool Rule File Unifier
//!
//! Keeps one rule file as the single source of truth and links every AI
//! coding tool's expected rule path back to it with relative symbolic links.

pub mod conflict;
pub mod create;
pub mod linker;
pub mod overwrite;
pub mod prompt;
pub mod tools;
pub mod validate;

pub use create::{CreateError, CreateOptions, CreateOutcome, run_create};
pub use linker::{BatchResult, LinkFailure, LinkTarget, Linker};
pub use prompt::{Prompter, Selection, SelectionDefaults, TerminalPrompter};
pub use tools::{ToolConfig, find_tool_by_name, resolve_target_path, supported_tool_names};
