//! The `create` command
//!
//! Validates the request, resolves tool targets, settles conflicts with
//! existing files, and hands the final target set to the [`Linker`].

use colored::Colorize;
use std::collections::HashSet;
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::conflict::{Classified, InspectError, classify_targets};
use crate::linker::{BatchResult, LinkTarget, Linker, RemoveError, absolute_path};
use crate::overwrite::{AskOverwrite, ForceOverwrite, OverwriteStrategy};
use crate::prompt::{Prompter, Selection, SelectionDefaults};
use crate::tools::{DEFAULT_RULE_FILE, DEFAULT_TARGET_FILE, find_tool_by_name, resolve_target_path};
use crate::validate::{PathError, parse_custom_paths, validate_path, validate_tool_names};

/// Options for the create command
#[derive(Debug, Default, Clone)]
pub struct CreateOptions {
    /// Source rule file (default: `rule.md`)
    pub file: Option<String>,
    /// Target file name for configurable tools (default: `coding-standards.md`)
    pub target: Option<String>,
    /// Tool names to link, skipping interactive selection
    pub list: Option<Vec<String>>,
    /// Comma-separated custom link paths, skipping interactive selection
    pub custom: Option<String>,
}

impl CreateOptions {
    /// Interactive unless tools or custom paths were given up front
    pub fn is_interactive(&self) -> bool {
        self.list.is_none() && self.custom.is_none()
    }
}

/// Errors that abort the command before or during filesystem changes
#[derive(Debug, Error)]
pub enum CreateError {
    #[error("Invalid source file path: {0}")]
    InvalidSource(#[source] PathError),
    #[error("Invalid custom path: {0}")]
    InvalidCustomPath(#[source] PathError),
    #[error("Invalid tool name parameter:\n  {}", .0.join("\n  "))]
    InvalidToolNames(Vec<String>),
    #[error(transparent)]
    Inspect(#[from] InspectError),
    #[error(transparent)]
    Remove(#[from] RemoveError),
    #[error("Source file \"{0}\" is also a link target; choose a different source file")]
    SourceIsTarget(String),
    #[error("Interactive prompt failed: {0:#}")]
    Prompt(anyhow::Error),
    #[error("Failed to start async runtime: {0}")]
    Runtime(#[source] io::Error),
}

/// How a create run ended, when it did not fail outright
#[derive(Debug)]
pub enum CreateOutcome {
    /// The user backed out; nothing was touched
    Cancelled,
    /// No tools or custom paths were requested
    NoTargets,
    /// Every requested target already existed and none was chosen for overwrite
    NothingSelected,
    /// Links were attempted; see the batch for per-target results
    Linked(BatchResult),
}

impl CreateOutcome {
    pub fn is_success(&self) -> bool {
        match self {
            CreateOutcome::Linked(batch) => batch.success,
            _ => true,
        }
    }
}

/// Run the create command against `project_root`.
///
/// `prompter` is only consulted in interactive mode.
pub fn run_create(
    options: &CreateOptions,
    project_root: &Path,
    prompter: &dyn Prompter,
) -> Result<CreateOutcome, CreateError> {
    let source_file = options
        .file
        .clone()
        .unwrap_or_else(|| DEFAULT_RULE_FILE.to_string());
    validate_path(&source_file).map_err(CreateError::InvalidSource)?;

    let interactive = options.is_interactive();
    let selection = if interactive {
        let defaults = SelectionDefaults {
            source_file,
            target_file_name: options
                .target
                .clone()
                .unwrap_or_else(|| DEFAULT_TARGET_FILE.to_string()),
        };
        match prompter
            .prompt_selection(&defaults)
            .map_err(CreateError::Prompt)?
        {
            Some(selection) if selection.confirmed => {
                validate_path(&selection.source_file).map_err(CreateError::InvalidSource)?;
                validate_custom_paths(&selection.custom_paths)?;
                selection
            }
            _ => return Ok(cancelled()),
        }
    } else {
        selection_from_options(options, source_file)?
    };

    let targets = dedupe_targets(project_root, build_targets(&selection));
    if targets.is_empty() {
        println!(
            "🤔 No symbolic links to create. Please specify targets via --list or --custom, or run in interactive mode."
        );
        return Ok(CreateOutcome::NoTargets);
    }

    // Overwriting the source would delete the rules it holds
    let source_path = absolute_path(project_root, &selection.source_file);
    if let Some(target) = targets
        .iter()
        .find(|target| absolute_path(project_root, &target.path) == source_path)
    {
        return Err(CreateError::SourceIsTarget(target.path.clone()));
    }

    let Classified { existing, new } = classify_targets(project_root, targets)?;

    let strategy = overwrite_strategy(interactive, prompter);
    let Some(to_overwrite) = strategy.select(&existing).map_err(CreateError::Prompt)? else {
        return Ok(cancelled());
    };

    let mut to_create = new;
    to_create.extend(to_overwrite.iter().cloned());
    if to_create.is_empty() {
        println!("🤔 No symbolic links to create.");
        return Ok(CreateOutcome::NothingSelected);
    }

    let linker = Linker::new(project_root);
    linker.remove_existing(&to_overwrite)?;

    println!(
        "\n{}",
        format!("🚀 Creating symbolic links for {} targets...", to_create.len()).cyan()
    );
    let batch = linker
        .create_links_blocking(&selection.source_file, &to_create)
        .map_err(CreateError::Runtime)?;

    report(&batch, &selection.source_file);
    Ok(CreateOutcome::Linked(batch))
}

/// Build the selection from command-line flags, validating tools before paths.
fn selection_from_options(
    options: &CreateOptions,
    source_file: String,
) -> Result<Selection, CreateError> {
    let mut selected_tools = Vec::new();
    if let Some(names) = &options.list {
        validate_tool_names(names.as_slice()).map_err(CreateError::InvalidToolNames)?;
        selected_tools = names
            .iter()
            .filter_map(|name| find_tool_by_name(name))
            .collect();
    }

    let custom_paths = options
        .custom
        .as_deref()
        .map(parse_custom_paths)
        .unwrap_or_default();
    validate_custom_paths(&custom_paths)?;

    Ok(Selection {
        selected_tools,
        custom_paths,
        source_file,
        target_file_name: options
            .target
            .clone()
            .unwrap_or_else(|| DEFAULT_TARGET_FILE.to_string()),
        confirmed: true,
    })
}

fn validate_custom_paths(paths: &[String]) -> Result<(), CreateError> {
    paths
        .iter()
        .try_for_each(|path| validate_path(path).map_err(CreateError::InvalidCustomPath))
}

/// Tool targets first, then custom paths, each in the order requested.
fn build_targets(selection: &Selection) -> Vec<LinkTarget> {
    let tools = selection.selected_tools.iter().map(|tool| {
        LinkTarget::new(
            resolve_target_path(tool, &selection.target_file_name),
            tool.name,
        )
    });
    let custom = selection
        .custom_paths
        .iter()
        .map(|path| LinkTarget::new(path.as_str(), path.as_str()));
    tools.chain(custom).collect()
}

/// Drop targets that resolve to a path already requested; the first one wins.
fn dedupe_targets(project_root: &Path, targets: Vec<LinkTarget>) -> Vec<LinkTarget> {
    let mut seen = HashSet::new();
    targets
        .into_iter()
        .filter(|target| {
            let first = seen.insert(absolute_path(project_root, &target.path));
            if !first {
                tracing::warn!(
                    name = %target.name,
                    path = %target.path,
                    "Skipping duplicate link target"
                );
            }
            first
        })
        .collect()
}

fn overwrite_strategy<'a>(
    interactive: bool,
    prompter: &'a dyn Prompter,
) -> Box<dyn OverwriteStrategy + 'a> {
    if interactive {
        Box::new(AskOverwrite::new(prompter))
    } else {
        Box::new(ForceOverwrite)
    }
}

fn cancelled() -> CreateOutcome {
    println!("{} Operation cancelled", "✘".red());
    CreateOutcome::Cancelled
}

fn report(batch: &BatchResult, source_file: &str) {
    for (target, failure) in &batch.failures {
        eprintln!(
            "  {} {} ({}): {}",
            "✘".red(),
            target.name,
            target.path,
            failure
        );
    }

    if batch.success {
        println!(
            "\n{}",
            format!(
                "🎉 Successfully created {} symbolic links for {}.",
                batch.created_files.len(),
                source_file
            )
            .green()
            .bold()
        );
        println!("💡 It is recommended to add the generated rule files to .gitignore");
    } else {
        eprintln!(
            "\n{}",
            "Some symbolic links failed to be created. Please check the error messages above."
                .red()
        );
    }
}
