//! Error handling for the formguard CLI.
//!
//! Provides structured errors with:
//! - User-friendly messages
//! - Actionable suggestions
//! - Exit code mapping

use std::error::Error;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use thiserror::Error;

use formguard_adapters::FormLoadError;
use formguard_core::error::FormguardError;

pub use formguard_core::error::ErrorCategory as CoreCategory;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// The form file does not exist.
    #[error("Form file not found: {}", path.display())]
    FormNotFound { path: PathBuf },

    /// The form file exists but could not be loaded.
    #[error("Could not load form '{}'", path.display())]
    FormLoad {
        path: PathBuf,
        #[source]
        source: FormLoadError,
    },

    /// `--set` named a field the form does not declare.
    #[error("Unknown field '{id}'")]
    UnknownField { id: String, available: Vec<String> },

    /// Validation ran and at least one field failed.
    #[error("Form '{form}' is invalid: {} of {total} fields failed validation", invalid.len())]
    FormInvalid {
        form: String,
        invalid: Vec<String>,
        total: usize,
    },

    // ── Config errors ──────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ── Core errors ────────────────────────────────────────────────────────
    /// An error propagated from `formguard-core`.
    #[error("Validation failed: {0}")]
    Core(#[from] FormguardError),

    // ── System errors ──────────────────────────────────────────────────────
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialise output")]
    Serialization(#[from] serde_json::Error),
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    /// Map a loader error for `path`, singling out a missing file.
    pub fn from_load(path: PathBuf, err: FormLoadError) -> Self {
        match &err {
            FormLoadError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                CliError::FormNotFound { path }
            }
            _ => CliError::FormLoad { path, source: err },
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FormNotFound { path } => vec![
                format!("No file at '{}'", path.display()),
                "Check the path, or run from the directory containing the form".into(),
            ],

            Self::FormLoad { source, .. } => match source {
                FormLoadError::Parse(_) => vec![
                    "The file is not valid TOML for a form definition".into(),
                    "A form needs a [form] table with a name and [[fields]] entries".into(),
                    "Run 'formguard rules' to see the supported rule types".into(),
                ],
                FormLoadError::Invalid(reason) => vec![
                    format!("Fix the form definition: {reason}"),
                    "Object fields must declare an 'event'".into(),
                ],
                FormLoadError::Io { .. } => vec!["Check file permissions".into()],
            },

            Self::UnknownField { id, available } => {
                let mut suggestions = vec![format!("The form has no field '{id}'")];
                if available.is_empty() {
                    suggestions.push("The form declares no fields".into());
                } else {
                    suggestions.push(format!("Available fields: {}", available.join(", ")));
                }
                suggestions
            }

            Self::FormInvalid { invalid, .. } => vec![
                format!("Failing fields: {}", invalid.join(", ")),
                "Pass corrected values with --set ID=VALUE".into(),
            ],

            Self::ConfigError { message, .. } => vec![
                format!("Configuration issue: {}", message),
                "Check your config file at ~/.config/formguard/config.toml".into(),
                "Environment overrides use the FORMGUARD__ prefix, e.g. FORMGUARD__OUTPUT__FORMAT=json".into(),
            ],

            Self::Core(core_err) => core_err.suggestions(),

            Self::IoError { message, .. } => vec![
                format!("I/O operation failed: {}", message),
                "Check that stdout is writable".into(),
            ],

            Self::Serialization(_) => vec!["This is a bug, please report it".into()],
        }
    }

    /// Get the error category for styling and exit codes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FormNotFound { .. } => ErrorCategory::NotFound,
            Self::FormLoad { .. } => ErrorCategory::UserError,
            Self::UnknownField { .. } => ErrorCategory::UserError,
            Self::FormInvalid { .. } => ErrorCategory::UserError,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::Core(core) => match core.category() {
                CoreCategory::Validation => ErrorCategory::UserError,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::IoError { .. } => ErrorCategory::Internal,
            Self::Serialization(_) => ErrorCategory::Internal,
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Category      | Code |
    /// |---------------|------|
    /// | User error    |  2   |
    /// | Not found     |  3   |
    /// | Configuration |  4   |
    /// | Internal      |  1   |
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 1,
        }
    }

    /// Format the error for display with colors and suggestions.
    pub fn format_colored(&self, verbose: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{} {}\n\n",
            "✗".red().bold(),
            "Error:".red().bold()
        ));
        output.push_str(&format!("  {}\n", self.to_string().red()));

        if verbose {
            let mut source = self.source();
            while let Some(err) = source {
                output.push_str(&format!(
                    "\n  {} {}\n",
                    "→".dimmed(),
                    err.to_string().dimmed()
                ));
                source = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str(&format!("\n{}\n", "Suggestions:".yellow().bold()));
            for suggestion in suggestions {
                output.push_str(&format!("  {}\n", suggestion));
            }
        }

        if !verbose {
            output.push('\n');
            output.push_str(&format!(
                "{} {}\n",
                "\u{2139}".blue(), // ℹ
                "Use -v / --verbose for more details.".dimmed(),
            ));
        }

        output
    }

    /// Plain-text version of [`Self::format_colored`], without ANSI codes.
    pub fn format_plain(&self, verbose: bool) -> String {
        let mut out = String::new();
        out.push_str(&format!("\nError: {}\n", self));

        if verbose {
            let mut src = self.source();
            while let Some(err) = src {
                out.push_str(&format!("  Caused by: {err}\n"));
                src = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str("\nSuggestions:\n");
            for s in &suggestions {
                out.push_str(&format!("  {s}\n"));
            }
        }

        if !verbose {
            out.push_str("\nUse -v / --verbose for more details.\n");
        }

        out
    }

    /// Log the error using tracing.
    pub fn log(&self) {
        match self.category() {
            ErrorCategory::UserError => tracing::warn!("User error: {}", self),
            ErrorCategory::NotFound => tracing::warn!("Not found: {}", self),
            ErrorCategory::Configuration => tracing::error!("Configuration error: {}", self),
            ErrorCategory::Internal => tracing::error!("Internal error: {}", self),
        }

        if let Some(source) = self.source() {
            tracing::debug!("Caused by: {}", source);
        }
    }
}

/// Error categories for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// User input error, including a form that fails validation.
    UserError,
    /// Resource not found.
    NotFound,
    /// Configuration error.
    Configuration,
    /// Internal/system error.
    Internal,
}
