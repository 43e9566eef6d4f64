//! Helpful error types for CLI commands
//!
//! Every error includes:
//! - What went wrong
//! - Context about the situation
//! - Suggestions for how to fix it

use std::fmt;
use std::path::Path;

/// An error with helpful context and suggestions
#[derive(Debug)]
pub struct HelpfulError {
    /// The main error message
    pub message: String,
    /// Additional context about what was happening
    pub context: Option<String>,
    /// Suggestions for how to fix the error
    pub suggestions: Vec<String>,
}

impl HelpfulError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    #[allow(dead_code)]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_suggestions(mut self, suggestions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.suggestions.extend(suggestions.into_iter().map(|s| s.into()));
        self
    }

    // === Common error constructors ===

    /// No config file at the expected location
    pub fn config_not_found(path: &Path) -> Self {
        Self::new(format!("Config file not found: {}", path.display()))
            .with_context("photolift reads its upload jobs from a TOML config file")
            .with_suggestions([
                format!("TRY: Create one: photolift init --config {}", path.display()),
                "TRY: Point at an existing file with --config PATH".to_string(),
            ])
    }

    /// `init` would overwrite an existing config
    pub fn config_exists(path: &Path) -> Self {
        Self::new(format!("Config file already exists: {}", path.display()))
            .with_context("Refusing to overwrite an existing config")
            .with_suggestions([
                "TRY: Re-run with --force to replace it".to_string(),
                format!("TRY: Edit it directly: $EDITOR {}", path.display()),
            ])
    }

    /// Config could not be parsed or failed validation
    pub fn invalid_config(path: &Path, details: &str) -> Self {
        Self::new(format!("Invalid config: {}", details))
            .with_context(format!("While loading {}", path.display()))
            .with_suggestions([
                "TRY: Every [[jobs]] entry needs a non-empty source_folder".to_string(),
                "TRY: Patterns are globs such as \"*.jpg\", \"2019/**\" or \"Trash\"".to_string(),
            ])
    }

    /// A configured source folder is missing or not a folder
    pub fn source_folder_invalid(path: &Path, reason: &str) -> Self {
        Self::new(format!("Cannot scan source folder: {}", path.display()))
            .with_context(reason.to_string())
            .with_suggestions([
                format!("TRY: Check that the folder exists: ls -la {}", path.display()),
                "TRY: Fix source_folder in the config file".to_string(),
            ])
    }

    /// The completed-upload tracking file could not be opened
    pub fn tracking_store_error(path: &Path, details: &str) -> Self {
        Self::new(format!("Cannot open tracking store: {}", path.display()))
            .with_context(details.to_string())
            .with_suggestions([
                "TRY: Check the file is valid JSON written by photolift".to_string(),
                "TRY: Set tracking_path in the config to a writable location".to_string(),
            ])
    }
}

impl fmt::Display for HelpfulError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ERROR: {}", self.message)?;

        if let Some(ctx) = &self.context {
            writeln!(f, "CONTEXT: {}", ctx)?;
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            for suggestion in &self.suggestions {
                writeln!(f, "  {}", suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for HelpfulError {}

/// Print an error as a single JSON object on stdout.
pub fn print_json_error(err: &anyhow::Error) {
    let payload = match err.downcast_ref::<HelpfulError>() {
        Some(helpful) => serde_json::json!({
            "error": helpful.message,
            "context": helpful.context,
            "suggestions": helpful.suggestions,
        }),
        None => serde_json::json!({ "error": format!("{:#}", err) }),
    };
    println!("{}", payload);
}
