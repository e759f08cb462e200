//! Supported AI tools and their rule file conventions
//!
//! Each tool either reads a fixed file from the project root, or loads any
//! file from a rules directory. The registry is a static table; lookups
//! never allocate new entries.

use regex::Regex;
use std::sync::LazyLock;

/// Default source rule file
pub const DEFAULT_RULE_FILE: &str = "rule.md";

/// Default target file name for configurable tools
pub const DEFAULT_TARGET_FILE: &str = "coding-standards.md";

static NAME_SEPARATORS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-\s]").unwrap());

/// Where a tool expects its rule file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolLayout {
    /// A single file with a name the tool does not let you change
    Fixed { file_name: &'static str },
    /// Any file inside a rules directory, optionally with a forced extension
    Directory {
        template: &'static str,
        extension: Option<&'static str>,
    },
}

/// Rule file convention of one AI coding tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolConfig {
    /// Display name, unique within the registry
    pub name: &'static str,
    pub layout: ToolLayout,
}

impl ToolConfig {
    const fn fixed(name: &'static str, file_name: &'static str) -> Self {
        Self {
            name,
            layout: ToolLayout::Fixed { file_name },
        }
    }

    const fn directory(
        name: &'static str,
        template: &'static str,
        extension: Option<&'static str>,
    ) -> Self {
        Self {
            name,
            layout: ToolLayout::Directory {
                template,
                extension,
            },
        }
    }

    /// Whether the requested target file name affects this tool's path
    pub fn is_configurable(&self) -> bool {
        matches!(self.layout, ToolLayout::Directory { .. })
    }

    pub fn fixed_file_name(&self) -> Option<&'static str> {
        match self.layout {
            ToolLayout::Fixed { file_name } => Some(file_name),
            ToolLayout::Directory { .. } => None,
        }
    }

    pub fn directory_template(&self) -> Option<&'static str> {
        match self.layout {
            ToolLayout::Directory { template, .. } => Some(template),
            ToolLayout::Fixed { .. } => None,
        }
    }

    pub fn file_extension_override(&self) -> Option<&'static str> {
        match self.layout {
            ToolLayout::Directory { extension, .. } => extension,
            ToolLayout::Fixed { .. } => None,
        }
    }
}

/// All supported tools, in display order
pub static SUPPORTED_TOOLS: &[ToolConfig] = &[
    ToolConfig::directory("Cursor", ".cursor/rules", Some(".mdc")),
    ToolConfig::directory("Augment", ".augment/rules", None),
    ToolConfig::directory("Windsurf", ".windsurf/rules", None),
    ToolConfig::fixed("Claude Code", "CLAUDE.md"),
    ToolConfig::fixed("Gemini CLI", "GEMINI.md"),
    ToolConfig::directory("Cline", ".clinerules", None),
    ToolConfig::directory("Roo Code", ".roo/rules", None),
];

fn normalize_tool_name(name: &str) -> String {
    NAME_SEPARATORS_RE.replace_all(name, "").to_lowercase()
}

/// Find a tool by name, ignoring case, spaces and hyphens.
///
/// `"Claude Code"`, `"claude-code"` and `"ClaudeCode"` all resolve to the
/// same entry. No other fuzzy matching is done.
pub fn find_tool_by_name(name: &str) -> Option<&'static ToolConfig> {
    let wanted = normalize_tool_name(name);
    SUPPORTED_TOOLS
        .iter()
        .find(|tool| normalize_tool_name(tool.name) == wanted)
}

/// Display names of all supported tools, in registry order
pub fn supported_tool_names() -> Vec<&'static str> {
    SUPPORTED_TOOLS.iter().map(|tool| tool.name).collect()
}

/// Path at which `tool` expects its rule file, given the requested target name.
///
/// Fixed-name tools ignore `target_name` entirely. Directory tools join the
/// name onto their rules directory, replacing the last extension of the final
/// path segment when the tool forces one (`test.backup.md` -> `test.backup.mdc`).
pub fn resolve_target_path(tool: &ToolConfig, target_name: &str) -> String {
    match tool.layout {
        ToolLayout::Fixed { file_name } => file_name.to_string(),
        ToolLayout::Directory {
            template,
            extension,
        } => {
            let file_name = match extension {
                Some(ext) => format!("{}{}", strip_extension(target_name), ext),
                None => target_name.to_string(),
            };
            format!("{}/{}", template, file_name)
        }
    }
}

/// `"Cursor (.cursor/rules/my-rules.mdc)"`
pub fn display_name(tool: &ToolConfig, target_name: &str) -> String {
    format!("{} ({})", tool.name, resolve_target_path(tool, target_name))
}

fn strip_extension(name: &str) -> &str {
    let segment_start = name.rfind('/').map_or(0, |idx| idx + 1);
    match name[segment_start..].rfind('.') {
        Some(dot) => &name[..segment_start + dot],
        None => name,
    }
}
