//! rule-link CLI
//!
//! Command-line interface for linking AI tool rule files to one source file.

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use is_terminal::IsTerminal;
use std::env;
use std::process::ExitCode;
use tracing::Level;

use rule_link::tools::{DEFAULT_RULE_FILE, DEFAULT_TARGET_FILE};
use rule_link::{CreateOptions, TerminalPrompter, run_create, supported_tool_names};

#[derive(Parser)]
#[command(name = "rule-link")]
#[command(
    author,
    version,
    about = "Unify the management of rule files for multiple AI programming tools"
)]
#[command(propagate_version = true)]
struct Cli {
    /// Show debug logging on stderr
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create symbolic links for AI tool rule files
    #[command(after_help = create_after_help())]
    Create(CreateArgs),
}

#[derive(Args, Debug)]
struct CreateArgs {
    /// Source rule file path
    #[arg(short, long, default_value = DEFAULT_RULE_FILE)]
    file: String,

    /// Target file name for configurable AI tools
    #[arg(short, long, default_value = DEFAULT_TARGET_FILE)]
    target: String,

    /// AI tools to link, skipping interactive selection
    #[arg(short, long, num_args = 1..)]
    list: Option<Vec<String>>,

    /// Custom rule file paths, comma-separated, skipping interactive selection
    #[arg(short, long)]
    custom: Option<String>,
}

impl From<CreateArgs> for CreateOptions {
    fn from(args: CreateArgs) -> Self {
        Self {
            file: Some(args.file),
            target: Some(args.target),
            list: args.list,
            custom: args.custom,
        }
    }
}

fn create_after_help() -> String {
    let tools = supported_tool_names()
        .iter()
        .map(|name| format!("  • {name}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Examples:
  $ rule-link create                                   # Interactively select AI tools
  $ rule-link create --file my-rules.md                # Specify the source rule file
  $ rule-link create --target my-standards.md          # Specify target file name
  $ rule-link create --list Cursor Windsurf            # Directly specify the tool list
  $ rule-link create --target my-rules.md --list Cursor "Claude Code"
  $ rule-link create --custom ".custom/my-rules.md,docs/project-rules.md"

Supported AI tools:
{tools}

Note: Claude Code and Gemini CLI use fixed file names (CLAUDE.md, GEMINI.md) and ignore --target."#
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Create(args) => create(args.into()),
    }
}

fn create(options: CreateOptions) -> ExitCode {
    if options.is_interactive() && !std::io::stdin().is_terminal() {
        eprintln!(
            "{} Interactive mode needs a terminal. Pass --list or --custom to run without prompts.",
            "✘".red()
        );
        return ExitCode::FAILURE;
    }

    let project_root = match env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("{} Cannot read current directory: {}", "✘".red(), e);
            return ExitCode::FAILURE;
        }
    };

    match run_create(&options, &project_root, &TerminalPrompter) {
        Ok(outcome) if outcome.is_success() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{} {}", "✘".red(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
