//! Interactive prompts
//!
//! The orchestrator only talks to the [`Prompter`] trait; the terminal
//! implementation lives here as well, built on `dialoguer`.

use anyhow::Result;
use colored::Colorize;
use dialoguer::{Confirm, Input, MultiSelect, theme::ColorfulTheme};
use std::io;

use crate::linker::LinkTarget;
use crate::tools::{SUPPORTED_TOOLS, ToolConfig, display_name, resolve_target_path};
use crate::validate::{parse_custom_paths, validate_path};

/// Values pre-filled into the interactive selection
#[derive(Debug, Clone)]
pub struct SelectionDefaults {
    pub source_file: String,
    pub target_file_name: String,
}

/// Everything the user chose during interactive selection
#[derive(Debug, Clone)]
pub struct Selection {
    pub selected_tools: Vec<&'static ToolConfig>,
    pub custom_paths: Vec<String>,
    pub source_file: String,
    pub target_file_name: String,
    /// The user accepted the final summary
    pub confirmed: bool,
}

/// User interaction needed by the `create` command.
///
/// `Ok(None)` means the user cancelled; it is not an error.
pub trait Prompter {
    fn prompt_selection(&self, defaults: &SelectionDefaults) -> Result<Option<Selection>>;

    /// Ask which existing targets to overwrite. Every target starts selected.
    fn prompt_overwrite(&self, existing: &[LinkTarget]) -> Result<Option<Vec<LinkTarget>>>;
}

/// Prompts on the controlling terminal
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn prompt_selection(&self, defaults: &SelectionDefaults) -> Result<Option<Selection>> {
        let _trap = InterruptTrap::install()?;
        let theme = ColorfulTheme::default();

        println!("\n{}", "🔗 rule-link - AI Tool Rule File Unifier".cyan().bold());
        println!(
            "{}\n",
            "Unify the management of rule files for multiple AI tools by creating symbolic links"
                .dimmed()
        );

        // Target name first, so the tool list can show real paths
        let Some(target_file_name) = cancel_on_interrupt(
            Input::<String>::with_theme(&theme)
                .with_prompt("Target file name for AI tools")
                .default(defaults.target_file_name.clone())
                .validate_with(|name: &String| -> Result<(), &'static str> {
                    if name.trim().is_empty() {
                        Err("Target file name cannot be empty")
                    } else if name.contains('/') || name.contains('\\') {
                        Err("Target file name should not contain path separators")
                    } else {
                        Ok(())
                    }
                })
                .interact_text(),
        )?
        else {
            return Ok(None);
        };

        let items: Vec<String> = SUPPORTED_TOOLS
            .iter()
            .map(|tool| display_name(tool, &target_file_name))
            .collect();
        let selected_tools: Vec<&'static ToolConfig> = loop {
            let Some(indices) = cancel_on_interrupt(
                MultiSelect::with_theme(&theme)
                    .with_prompt("Select the AI tools to link (Space to select, Enter to confirm)")
                    .items(&items)
                    .interact_opt(),
            )?
            .flatten() else {
                return Ok(None);
            };
            if indices.is_empty() {
                println!("  {} Please select at least one AI tool", "!".yellow());
                continue;
            }
            break indices.into_iter().map(|idx| &SUPPORTED_TOOLS[idx]).collect();
        };

        let Some(source_file) = cancel_on_interrupt(
            Input::<String>::with_theme(&theme)
                .with_prompt("Source rule file path")
                .default(defaults.source_file.clone())
                .validate_with(|path: &String| validate_path(path).map_err(|e| e.to_string()))
                .interact_text(),
        )?
        else {
            return Ok(None);
        };

        let Some(custom_input) = cancel_on_interrupt(
            Input::<String>::with_theme(&theme)
                .with_prompt("Custom rule file paths (comma-separated, leave empty to skip)")
                .allow_empty(true)
                .validate_with(|input: &String| -> Result<(), String> {
                    parse_custom_paths(input)
                        .iter()
                        .try_for_each(|path| validate_path(path).map_err(|e| e.to_string()))
                })
                .interact_text(),
        )?
        else {
            return Ok(None);
        };
        let custom_paths = parse_custom_paths(&custom_input);

        print_summary(&source_file, &target_file_name, &selected_tools, &custom_paths);

        let Some(confirmed) = cancel_on_interrupt(
            Confirm::with_theme(&theme)
                .with_prompt("Create the symbolic links above?")
                .default(true)
                .interact_opt(),
        )?
        .flatten() else {
            return Ok(None);
        };

        Ok(Some(Selection {
            selected_tools,
            custom_paths,
            source_file,
            target_file_name,
            confirmed,
        }))
    }

    fn prompt_overwrite(&self, existing: &[LinkTarget]) -> Result<Option<Vec<LinkTarget>>> {
        let _trap = InterruptTrap::install()?;
        let items: Vec<String> = existing
            .iter()
            .map(|t| format!("{} ({})", t.name, t.path))
            .collect();
        let defaults = vec![true; existing.len()];

        let selections = cancel_on_interrupt(
            MultiSelect::with_theme(&ColorfulTheme::default())
                .with_prompt("These files already exist. Select the ones to overwrite")
                .items(&items)
                .defaults(&defaults)
                .interact_opt(),
        )?
        .flatten();

        Ok(selections.map(|indices| {
            indices
                .into_iter()
                .map(|idx| existing[idx].clone())
                .collect()
        }))
    }
}

/// Ctrl+C while a prompt reads keys comes back as an interrupted read.
/// Treat it like Escape: the user backed out.
fn cancel_on_interrupt<T>(result: Result<T, dialoguer::Error>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(dialoguer::Error::IO(e)) if e.kind() == io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Holds a SIGINT handler for the lifetime of a prompt.
///
/// The terminal reader re-raises Ctrl+C as SIGINT before returning the
/// interrupted read; with a handler registered the process survives it
/// and [`cancel_on_interrupt`] sees the error instead.
struct InterruptTrap {
    #[cfg(unix)]
    _signal: tokio::signal::unix::Signal,
    _runtime: tokio::runtime::Runtime,
}

impl InterruptTrap {
    fn install() -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_io()
            .build()?;

        #[cfg(unix)]
        let signal = {
            let _guard = runtime.enter();
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())?
        };

        Ok(Self {
            #[cfg(unix)]
            _signal: signal,
            _runtime: runtime,
        })
    }
}

fn print_summary(
    source_file: &str,
    target_file_name: &str,
    tools: &[&ToolConfig],
    custom_paths: &[String],
) {
    println!("\n{}", "📋 Operation Summary:".bold());
    println!("   Source file: {}", source_file.cyan());
    println!("   Target file name: {}", target_file_name.cyan());
    println!("   Selected tools ({}):", tools.len());
    for tool in tools {
        let fixed = if tool.is_configurable() {
            String::new()
        } else {
            " (fixed file name)".dimmed().to_string()
        };
        println!(
            "     • {} → {}{}",
            tool.name,
            resolve_target_path(tool, target_file_name),
            fixed
        );
    }
    if !custom_paths.is_empty() {
        println!("   Custom files ({}):", custom_paths.len());
        for path in custom_paths {
            println!("     • {} → {}", path, source_file);
        }
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interrupted_prompt_is_a_cancel() {
        let interrupted = dialoguer::Error::IO(io::Error::new(
            io::ErrorKind::Interrupted,
            "read interrupted",
        ));

        let answer: Option<String> = cancel_on_interrupt(Err(interrupted)).unwrap();

        assert!(answer.is_none());
    }

    #[test]
    fn test_answered_prompt_passes_through() {
        let answer = cancel_on_interrupt(Ok("coding-standards.md".to_string())).unwrap();

        assert_eq!(answer.as_deref(), Some("coding-standards.md"));
    }

    #[test]
    fn test_escape_and_interrupt_both_cancel_selection() {
        let escaped: Option<Option<Vec<usize>>> = cancel_on_interrupt(Ok(None)).unwrap();
        assert_eq!(escaped.flatten(), None);

        let interrupted = dialoguer::Error::IO(io::Error::from(io::ErrorKind::Interrupted));
        let trapped: Option<Option<Vec<usize>>> = cancel_on_interrupt(Err(interrupted)).unwrap();
        assert_eq!(trapped.flatten(), None);
    }

    #[test]
    fn test_other_io_errors_still_fail() {
        let broken = dialoguer::Error::IO(io::Error::from(io::ErrorKind::BrokenPipe));

        let result: Result<Option<String>> = cancel_on_interrupt(Err(broken));

        assert!(result.is_err());
    }

    #[test]
    #[cfg(unix)]
    fn test_interrupt_trap_installs_and_drops() {
        let trap = InterruptTrap::install().unwrap();
        drop(trap);
        assert!(InterruptTrap::install().is_ok());
    }
}
