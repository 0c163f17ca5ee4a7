//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "formguard",
    bin_name = "formguard",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Validate a form's inputs and report their combined status",
    long_about = "formguard mounts a TOML form definition on a validation manager, \
                  applies field values as change events, and reports whether \
                  every field passes its rules.",
    after_help = "EXAMPLES:\n\
        \x20 formguard check signup.toml\n\
        \x20 formguard check signup.toml --set username=ada --set email=ada@example.com\n\
        \x20 formguard check signup.toml --events --output-format json\n\
        \x20 formguard rules",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate a form definition.
    #[command(
        visible_alias = "c",
        about = "Validate a form definition",
        after_help = "EXAMPLES:\n\
            \x20 formguard check signup.toml\n\
            \x20 formguard check signup.toml --set username=ada\n\
            \x20 formguard check signup.toml --set bio= --events"
    )]
    Check(CheckArgs),

    /// List the built-in rule types.
    #[command(
        visible_alias = "ls",
        about = "List built-in rule types",
        after_help = "EXAMPLES:\n\
            \x20 formguard rules\n\
            \x20 formguard rules --output-format json"
    )]
    Rules,

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 formguard completions bash > ~/.local/share/bash-completion/completions/formguard\n\
            \x20 formguard completions zsh  > ~/.zfunc/_formguard\n\
            \x20 formguard completions fish > ~/.config/fish/completions/formguard.fish"
    )]
    Completions(CompletionsArgs),
}

// ── check ─────────────────────────────────────────────────────────────────────

/// Arguments for `formguard check`.
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Path to the TOML form definition.
    #[arg(value_name = "FORM", help = "Form definition file")]
    pub form: PathBuf,

    /// Field edits applied after the initial values, in order.
    #[arg(
        short = 's',
        long = "set",
        value_name = "ID=VALUE",
        value_parser = parse_field_value,
        help = "Set a field's content (repeatable)"
    )]
    pub set: Vec<FieldValue>,

    /// Print every published status, not only the final one.
    #[arg(short = 'e', long = "events", help = "Show every status change")]
    pub events: bool,
}

/// One `--set id=value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue {
    pub id: String,
    pub value: String,
}

fn parse_field_value(raw: &str) -> Result<FieldValue, String> {
    let (id, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ID=VALUE, got '{raw}'"))?;
    let id = id.trim();
    if id.is_empty() {
        return Err(format!("missing field id in '{raw}'"));
    }
    Ok(FieldValue {
        id: id.to_owned(),
        value: value.to_owned(),
    })
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `formguard completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── tests ─────────────────────────────────────────────────────────────────────
