//! Error rendering for the CLI.
//!
//! Human output gets the error, its code, and actionable fix suggestions.
//! JSON output gets a structured object for machine consumption.

use colored::Colorize;

use crate::error::{FixSuggestion, InkwrightError};

// =============================================================================
// Public API
// =============================================================================

/// Render an error for the terminal.
///
/// With `json` set, emits a structured JSON object. Otherwise renders a
/// human-readable block; `no_color` suppresses ANSI codes for pipes and
/// dumb terminals.
#[must_use]
pub fn render_error(error: &InkwrightError, json: bool, no_color: bool) -> String {
    if json {
        return render_error_json(error);
    }
    if no_color {
        render_simple(error)
    } else {
        render_human(error)
    }
}

/// Render error as structured JSON for machine consumption.
#[must_use]
pub fn render_error_json(error: &InkwrightError) -> String {
    let error_json = ErrorJson::from_error(error);
    serde_json::to_string_pretty(&error_json).unwrap_or_else(|_| render_simple(error))
}

// =============================================================================
// Human Rendering
// =============================================================================

/// Render error with colored sections.
fn render_human(error: &InkwrightError) -> String {
    let suggestions = error.fix_suggestions();
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!(
        "{} {} {}",
        "error:".red().bold(),
        error,
        format!("[{}]", error.error_code()).dimmed()
    ));

    if let Some(suggestion) = suggestions.first() {
        if !suggestion.commands.is_empty() {
            lines.push(String::new());
            lines.push(format!("{}", "How to fix:".cyan().bold()));
            for (i, cmd) in suggestion.commands.iter().enumerate() {
                if cmd.starts_with('#') {
                    lines.push(format!("     {}", cmd.dimmed()));
                } else if i == 0 {
                    lines.push(format!("  1. {}", cmd.cyan()));
                } else {
                    lines.push(format!("     {} {}", "Or:".dimmed(), cmd.cyan()));
                }
            }
        }

        if !suggestion.context.is_empty() {
            lines.push(String::new());
            lines.push(format!("{}", "Why this happened:".yellow()));
            for line in wrap_text(&suggestion.context, 72) {
                lines.push(format!("  {line}"));
            }
        }

        if let Some(prevention) = &suggestion.prevention {
            lines.push(String::new());
            lines.push(format!("{}", "Prevention:".green()));
            for line in wrap_text(prevention, 72) {
                lines.push(format!("  {line}"));
            }
        }

        if let Some(doc_url) = &suggestion.doc_url {
            lines.push(String::new());
            lines.push(format!("{} {}", "Docs:".dimmed(), doc_url.underline()));
        }
    }

    lines.join("\n")
}

// =============================================================================
// Simple Text Rendering
// =============================================================================

/// Render error as plain text (no ANSI codes).
fn render_simple(error: &InkwrightError) -> String {
    let suggestions = error.fix_suggestions();
    let mut lines = Vec::new();

    lines.push(format!("Error [{}]: {}", error.error_code(), error));

    if let Some(cmd) = suggestions
        .first()
        .and_then(|s| s.commands.iter().find(|c| !c.starts_with('#')))
    {
        lines.push(format!("Fix: {cmd}"));
    }

    lines.join("\n")
}

// =============================================================================
// JSON Rendering
// =============================================================================

/// JSON representation of an error for machine consumption.
#[derive(serde::Serialize)]
struct ErrorJson {
    error_code: String,
    category: String,
    message: String,
    is_retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    provider: Option<String>,
    suggestions: Vec<SuggestionJson>,
}

#[derive(serde::Serialize)]
struct SuggestionJson {
    commands: Vec<String>,
    context: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    prevention: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    doc_url: Option<String>,
}

impl ErrorJson {
    fn from_error(error: &InkwrightError) -> Self {
        let suggestions: Vec<FixSuggestion> = error.fix_suggestions();

        Self {
            error_code: error.error_code().to_string(),
            category: error.category().to_string(),
            message: error.to_string(),
            is_retryable: error.is_retryable(),
            provider: error.provider().map(String::from),
            suggestions: suggestions
                .into_iter()
                .map(|s| SuggestionJson {
                    commands: s.commands,
                    context: s.context,
                    prevention: s.prevention,
                    doc_url: s.doc_url,
                })
                .collect(),
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Simple whitespace text wrapping.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if current_line.is_empty() {
            current_line = word.to_string();
        } else if current_line.len() + 1 + word.len() <= width {
            current_line.push(' ');
            current_line.push_str(word);
        } else {
            lines.push(current_line);
            current_line = word.to_string();
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

// =============================================================================
// Tests
// =============================================================================
