//! Prompt construction.
//!
//! Maps an abstract writing action plus input text to a provider-agnostic
//! prompt string. Pure and total: no I/O, no randomness, same inputs always
//! produce the same prompt.

use serde::{Deserialize, Serialize};

use crate::error::{InkwrightError, Result};

// =============================================================================
// Actions
// =============================================================================

/// Writing actions the orchestrator can perform on a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    Improve,
    Shorten,
    Expand,
    FixGrammar,
    AnalyzeTone,
    GeneratePlot,
    ContinueStory,
    WritingPrompt,
    ContextSuggestion,
}

impl Action {
    /// All actions in display order.
    pub const ALL: &'static [Self] = &[
        Self::Improve,
        Self::Shorten,
        Self::Expand,
        Self::FixGrammar,
        Self::AnalyzeTone,
        Self::GeneratePlot,
        Self::ContinueStory,
        Self::WritingPrompt,
        Self::ContextSuggestion,
    ];

    /// CLI name for this action.
    #[must_use]
    pub const fn cli_name(self) -> &'static str {
        match self {
            Self::Improve => "improve",
            Self::Shorten => "shorten",
            Self::Expand => "expand",
            Self::FixGrammar => "fix-grammar",
            Self::AnalyzeTone => "analyze-tone",
            Self::GeneratePlot => "generate-plot",
            Self::ContinueStory => "continue-story",
            Self::WritingPrompt => "writing-prompt",
            Self::ContextSuggestion => "context-suggestion",
        }
    }

    /// Parse from CLI argument.
    pub fn from_cli_name(name: &str) -> Result<Self> {
        let lower = name.to_lowercase();
        // "continue" survives as an alias from an earlier naming
        if lower == "continue" {
            return Ok(Self::ContinueStory);
        }
        Self::ALL
            .iter()
            .find(|a| a.cli_name() == lower)
            .copied()
            .ok_or_else(|| InkwrightError::InvalidInput {
                reason: format!("unknown action '{}'", name),
            })
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.cli_name())
    }
}

// =============================================================================
// Prompt Builder
// =============================================================================

/// Build the prompt for an action applied to the given text.
#[must_use]
pub fn build(action: Action, text: &str) -> String {
    match action {
        Action::Improve => format!(
            "Improve this text by making it clearer, more engaging, and better \
             written. Return ONLY the improved text without explanations: \"{}\"",
            text
        ),
        Action::Shorten => format!(
            "Make this text more concise while keeping the same meaning. \
             Return ONLY the shortened text: \"{}\"",
            text
        ),
        Action::Expand => format!(
            "Expand this text with more detail and depth. Return ONLY the \
             expanded text: \"{}\"",
            text
        ),
        Action::FixGrammar => format!(
            "Fix any grammar, spelling, or punctuation errors in this text. \
             Return ONLY the corrected text: \"{}\"",
            text
        ),
        Action::AnalyzeTone => format!("Analyze the tone and style of this text: \"{}\"", text),
        Action::GeneratePlot => format!(
            "Based on this story so far:\n\"{}\"\n\nGenerate 4-6 plot elements \
             that could enhance this narrative. Format as a bulleted list.",
            text
        ),
        Action::ContinueStory => format!(
            "Continue this text naturally in the same style and voice. Return \
             ONLY the continuation text without any introduction or \
             explanation: \"{}\"",
            text
        ),
        Action::WritingPrompt => format!(
            "Create a creative writing prompt inspired by this theme or \
             fragment: \"{}\"\n\nFormat:\nTitle: [engaging title]\nPrompt: \
             [detailed writing prompt with specific elements to include]",
            text
        ),
        Action::ContextSuggestion => format!(
            "Based on this story context:\nContent: \"{}\"\n\nProvide 4-6 \
             context-aware writing suggestions that:\n\
             - Enhance the current narrative flow\n\
             - Suggest character development opportunities\n\
             - Recommend plot advancement strategies\n\
             - Identify areas for improved description or dialogue\n\
             - Consider pacing and tension\n\n\
             Format as a bulleted list of actionable suggestions.",
            text
        ),
    }
}
