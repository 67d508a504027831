//! CLI interface for Whisperer.
//!
//! The wizard runs as a line-driven shell. `chat` reads from the terminal;
//! `run` reads the same lines from a script file, which makes a whole
//! walkthrough reproducible. `tools` browses the marketplace without
//! starting a session.

mod command;
mod format;
mod shell;

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::catalog::{CapabilityCatalog, StaticCatalog};
use crate::clock::Timing;
use crate::config::Config;
use crate::model::AgentDraft;

use format::format_capabilities;
use shell::{Flow, Shell};

/// Whisperer: build a custom AI agent, one step at a time.
#[derive(Debug, Parser)]
#[command(name = "whisperer", after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    /// Config file (default: `$WHISPERER_CONFIG`, then `~/.whisperer/config.toml`).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r"Workflow: building an agent
  1. whisperer chat
  2. Describe the agent, then /do 1 to continue
  3. /tools, /toggle <id>, /next
  4. /file <name> <bytes>, /url <url>, /next
  5. /prompt ..., /save-prompts, /max-steps <n>, /save-workflow, /next
  6. /deploy

Scripted:
  whisperer run walkthrough.txt --export ./sessions";

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start an interactive session.
    Chat {
        /// Write the draft and transcript under this directory on exit.
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Run a session from a script: one shell line per line.
    ///
    /// Blank lines and lines starting with `#` are skipped.
    Run {
        /// Script file.
        script: PathBuf,

        /// Write the draft and transcript under this directory when done.
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// List the tool marketplace, optionally filtered.
    Tools {
        /// Matched against name, description, and category.
        query: Option<String>,
    },
}

/// Run the CLI, returning an error message on failure.
pub fn run(cli: Cli, config: &Config) -> Result<(), String> {
    match cli.command {
        Command::Chat { export } => cmd_chat(config.timing(), export.as_deref()),
        Command::Run { script, export } => cmd_run(config.timing(), &script, export.as_deref()),
        Command::Tools { query } => cmd_tools(query.as_deref()),
    }
}

fn cmd_chat(timing: Timing, export: Option<&Path>) -> Result<(), String> {
    let mut shell = Shell::new(timing);
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    shell.start(&mut stdout).map_err(write_failed)?;
    writeln!(stdout, "Type /help for commands.").map_err(write_failed)?;

    let mut line = String::new();
    loop {
        write!(stdout, "> ").map_err(write_failed)?;
        stdout.flush().map_err(write_failed)?;

        line.clear();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .map_err(|e| format!("failed to read input: {e}"))?;
        if read == 0 {
            writeln!(stdout).map_err(write_failed)?;
            break;
        }

        let flow = shell
            .handle_line(line.trim_end_matches(['\n', '\r']), &mut stdout)
            .map_err(write_failed)?;
        if flow == Flow::Quit {
            break;
        }
    }

    finish(&mut shell, export)
}

fn cmd_run(timing: Timing, script: &Path, export: Option<&Path>) -> Result<(), String> {
    let contents = fs::read_to_string(script)
        .map_err(|e| format!("failed to read {}: {e}", script.display()))?;

    let mut shell = Shell::new(timing);
    let mut stdout = io::stdout().lock();
    shell.start(&mut stdout).map_err(write_failed)?;

    for line in contents.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        writeln!(stdout, "> {line}").map_err(write_failed)?;
        let flow = shell.handle_line(line, &mut stdout).map_err(write_failed)?;
        if flow == Flow::Quit {
            break;
        }
    }

    finish(&mut shell, export)
}

fn cmd_tools(query: Option<&str>) -> Result<(), String> {
    let catalog = StaticCatalog::default();
    println!(
        "{}",
        format_capabilities(&catalog.list(query), &AgentDraft::default())
    );
    Ok(())
}

fn finish(shell: &mut Shell, export: Option<&Path>) -> Result<(), String> {
    if let Some(dir) = shell.finish(export)? {
        eprintln!("Session exported → {}", dir.display());
    }
    Ok(())
}

fn write_failed(e: io::Error) -> String {
    format!("failed to write output: {e}")
}
