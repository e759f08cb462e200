//! Deciding which existing targets get replaced

use anyhow::Result;
use colored::Colorize;

use crate::linker::LinkTarget;
use crate::prompt::Prompter;

/// Picks the subset of existing targets to overwrite.
///
/// `Ok(None)` means the user cancelled the whole command.
pub trait OverwriteStrategy {
    fn select(&self, existing: &[LinkTarget]) -> Result<Option<Vec<LinkTarget>>>;
}

/// Overwrites everything, after listing what will be replaced
#[derive(Debug, Default)]
pub struct ForceOverwrite;

impl OverwriteStrategy for ForceOverwrite {
    fn select(&self, existing: &[LinkTarget]) -> Result<Option<Vec<LinkTarget>>> {
        if !existing.is_empty() {
            println!(
                "\n{}",
                "⚠️  The following files already exist and will be overwritten:".yellow()
            );
            for target in existing {
                println!("  - {} ({})", target.name, target.path);
            }
        }
        Ok(Some(existing.to_vec()))
    }
}

/// Lets the user deselect targets that should be left alone
pub struct AskOverwrite<'a> {
    prompter: &'a dyn Prompter,
}

impl<'a> AskOverwrite<'a> {
    pub fn new(prompter: &'a dyn Prompter) -> Self {
        Self { prompter }
    }
}

impl OverwriteStrategy for AskOverwrite<'_> {
    fn select(&self, existing: &[LinkTarget]) -> Result<Option<Vec<LinkTarget>>> {
        if existing.is_empty() {
            return Ok(Some(Vec::new()));
        }
        self.prompter.prompt_overwrite(existing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::{Selection, SelectionDefaults};
    use std::cell::Cell;

    struct KeepFirst {
        calls: Cell<usize>,
    }

    impl Prompter for KeepFirst {
        fn prompt_selection(&self, _: &SelectionDefaults) -> Result<Option<Selection>> {
            Ok(None)
        }

        fn prompt_overwrite(&self, existing: &[LinkTarget]) -> Result<Option<Vec<LinkTarget>>> {
            self.calls.set(self.calls.get() + 1);
            Ok(Some(existing.iter().take(1).cloned().collect()))
        }
    }

    fn targets() -> Vec<LinkTarget> {
        vec![
            LinkTarget::new(".cursor/rules/coding-standards.mdc", "Cursor"),
            LinkTarget::new("GEMINI.md", "Gemini CLI"),
        ]
    }

    #[test]
    fn test_force_overwrite_selects_everything() {
        let selected = ForceOverwrite.select(&targets()).unwrap();
        assert_eq!(selected, Some(targets()));
    }

    #[test]
    fn test_ask_overwrite_delegates_to_prompter() {
        let prompter = KeepFirst { calls: Cell::new(0) };
        let selected = AskOverwrite::new(&prompter).select(&targets()).unwrap();

        assert_eq!(selected, Some(vec![targets()[0].clone()]));
        assert_eq!(prompter.calls.get(), 1);
    }

    #[test]
    fn test_ask_overwrite_skips_prompt_without_conflicts() {
        let prompter = KeepFirst { calls: Cell::new(0) };
        let selected = AskOverwrite::new(&prompter).select(&[]).unwrap();

        assert_eq!(selected, Some(Vec::new()));
        assert_eq!(prompter.calls.get(), 0);
    }
}
