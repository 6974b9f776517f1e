//! Test utilities for inkwright.
//!
//! Provides shared helpers, test data factories, and assertion macros
//! for use across all test modules.
//!
//! # Usage
//!
//! ```rust,ignore
//! use inkwright::test_utils::*;
//!
//! let dir = TestDir::new();
//! dir.create_file("ai-settings.json", &settings_json(512, 0.2));
//! let body = openai_reply_json("The improved passage.");
//! ```

use std::fs;
use std::io::{self, Write as IoWrite};
use std::path::{Path, PathBuf};

use crate::core::provider::{Provider, ProviderDescriptor};
use crate::storage::ProcessingSettings;

// =============================================================================
// Test Data Factories
// =============================================================================

/// A descriptor for `provider` pointed at an arbitrary endpoint.
///
/// This is how wiremock-based tests steer dispatch and probe traffic to a
/// local mock server.
#[must_use]
pub fn descriptor_at(provider: Provider, endpoint: &str) -> ProviderDescriptor {
    ProviderDescriptor::builtin(provider).with_endpoint(Some(endpoint.to_string()))
}

/// A descriptor with both an endpoint and a fixed model catalog.
#[must_use]
pub fn descriptor_with_models(
    provider: Provider,
    endpoint: &str,
    models: &[&str],
) -> ProviderDescriptor {
    descriptor_at(provider, endpoint).with_models(models.iter().map(ToString::to_string).collect())
}

/// Processing settings tuned for tests: cache on, no other surprises.
#[must_use]
pub fn test_settings() -> ProcessingSettings {
    ProcessingSettings::default()
}

/// Processing settings with the cache disabled.
#[must_use]
pub fn test_settings_no_cache() -> ProcessingSettings {
    ProcessingSettings {
        cache_enabled: false,
        ..ProcessingSettings::default()
    }
}

// =============================================================================
// Wire Format Bodies
// =============================================================================

/// An OpenAI-style chat completion body carrying `text`.
#[must_use]
pub fn openai_reply_json(text: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-test",
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": text } }
        ]
    })
    .to_string()
}

/// An Anthropic messages body carrying `text`.
#[must_use]
pub fn anthropic_reply_json(text: &str) -> String {
    serde_json::json!({
        "id": "msg-test",
        "content": [ { "type": "text", "text": text } ]
    })
    .to_string()
}

/// A Gemini generateContent body carrying `text`.
#[must_use]
pub fn gemini_reply_json(text: &str) -> String {
    serde_json::json!({
        "candidates": [
            { "content": { "parts": [ { "text": text } ], "role": "model" } }
        ]
    })
    .to_string()
}

/// An Ollama chat body carrying `text`.
#[must_use]
pub fn ollama_reply_json(text: &str) -> String {
    serde_json::json!({
        "model": "llama3.2",
        "message": { "role": "assistant", "content": text },
        "done": true
    })
    .to_string()
}

/// An Ollama `/api/tags` body listing `models`.
#[must_use]
pub fn ollama_tags_json(models: &[&str]) -> String {
    let entries: Vec<serde_json::Value> = models
        .iter()
        .map(|name| serde_json::json!({ "name": name }))
        .collect();
    serde_json::json!({ "models": entries }).to_string()
}

/// An OpenAI-compatible `/v1/models` body listing `models`.
#[must_use]
pub fn openai_models_json(models: &[&str]) -> String {
    let entries: Vec<serde_json::Value> = models
        .iter()
        .map(|id| serde_json::json!({ "id": id, "object": "model" }))
        .collect();
    serde_json::json!({ "object": "list", "data": entries }).to_string()
}

// =============================================================================
// Persisted State Fixtures
// =============================================================================

/// An `ai-api-keys.json` body for the given provider/key pairs.
#[must_use]
pub fn keys_json(pairs: &[(&str, &str)]) -> String {
    let map: serde_json::Map<String, serde_json::Value> = pairs
        .iter()
        .map(|(provider, key)| ((*provider).to_string(), serde_json::json!(key)))
        .collect();
    serde_json::to_string_pretty(&serde_json::Value::Object(map)).unwrap()
}

/// An `ai-settings.json` body with the given token and temperature bounds.
#[must_use]
pub fn settings_json(max_tokens: u32, temperature: f64) -> String {
    serde_json::json!({
        "autoSuggest": true,
        "realTimeProcessing": false,
        "maxTokens": max_tokens,
        "temperature": temperature,
        "cacheEnabled": true,
        "cacheExpiryMs": 3_600_000u64
    })
    .to_string()
}

/// A minimal `config.toml` body for tests.
#[must_use]
pub fn config_toml(timeout_seconds: u64) -> String {
    format!(
        r#"[general]
timeout_seconds = {timeout_seconds}

[offline]
delay_min_ms = 0
delay_max_ms = 0

[output]
color = false
"#
    )
}

// =============================================================================
// Temp Directory Utilities
// =============================================================================

/// A temporary directory for tests with automatic cleanup.
///
/// Creates an isolated directory that is automatically deleted when
/// the `TestDir` is dropped. Uses the `tempfile` crate internally.
///
/// # Examples
///
/// ```rust,ignore
/// use inkwright::test_utils::TestDir;
///
/// let dir = TestDir::new();
/// dir.create_file("config/config.toml", "[general]\ntimeout_seconds = 30");
///
/// let config_path = dir.path().join("config/config.toml");
/// assert!(config_path.exists());
/// ```
pub struct TestDir {
    inner: tempfile::TempDir,
}

impl TestDir {
    /// Create a new isolated temporary directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: tempfile::tempdir().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the temporary directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.inner.path()
    }

    /// Create a file in the temporary directory with the given content.
    ///
    /// Creates parent directories as needed.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be created or written.
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.inner.path().join(name);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }

        let mut file = fs::File::create(&path).expect("Failed to create test file");
        file.write_all(content.as_bytes())
            .expect("Failed to write test file");
    }

    /// Create a subdirectory in the temporary directory.
    ///
    /// # Panics
    ///
    /// Panics if the directory cannot be created.
    pub fn create_dir(&self, name: &str) {
        let path = self.inner.path().join(name);
        fs::create_dir_all(&path).expect("Failed to create test directory");
    }

    /// Read a file from the temporary directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn read_file(&self, name: &str) -> io::Result<String> {
        let path = self.inner.path().join(name);
        fs::read_to_string(path)
    }

    /// Check if a file exists in the temporary directory.
    #[must_use]
    pub fn file_exists(&self, name: &str) -> bool {
        self.inner.path().join(name).exists()
    }

    /// Get the full path to a file in the temporary directory.
    #[must_use]
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.inner.path().join(name)
    }
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Assertion Macros
// =============================================================================

/// Assert that a string contains a substring.
///
/// # Examples
///
/// ```rust,ignore
/// use inkwright::assert_contains;
///
/// let text = "Hello, world!";
/// assert_contains!(text, "world");
/// ```
#[macro_export]
macro_rules! assert_contains {
    ($haystack:expr, $needle:expr) => {
        let haystack = $haystack;
        let needle = $needle;
        assert!(
            haystack.contains(needle),
            "Expected string to contain {:?}\n\nActual string:\n{:?}",
            needle,
            haystack
        );
    };
    ($haystack:expr, $needle:expr, $($arg:tt)*) => {
        let haystack = $haystack;
        let needle = $needle;
        assert!(
            haystack.contains(needle),
            $($arg)*
        );
    };
}

/// Assert that a string does NOT contain a substring.
#[macro_export]
macro_rules! assert_not_contains {
    ($haystack:expr, $needle:expr) => {
        let haystack = $haystack;
        let needle = $needle;
        assert!(
            !haystack.contains(needle),
            "Expected string NOT to contain {:?}\n\nActual string:\n{:?}",
            needle,
            haystack
        );
    };
    ($haystack:expr, $needle:expr, $($arg:tt)*) => {
        let haystack = $haystack;
        let needle = $needle;
        assert!(
            !haystack.contains(needle),
            $($arg)*
        );
    };
}

/// Assert that a string is valid JSON.
#[macro_export]
macro_rules! assert_json_valid {
    ($json:expr) => {
        let json = $json;
        match serde_json::from_str::<serde_json::Value>(json) {
            Ok(_) => {}
            Err(e) => {
                panic!(
                    "Expected valid JSON, but parsing failed: {}\n\nJSON string:\n{}",
                    e, json
                );
            }
        }
    };
}

// =============================================================================
// Test Helpers
// =============================================================================

/// Check if a string contains ANSI escape sequences.
#[must_use]
pub fn has_ansi_codes(text: &str) -> bool {
    text.contains('\x1b') || text.contains('\u{001b}')
}

/// Strip ANSI escape codes from a string.
///
/// Useful for comparing output content without formatting.
#[must_use]
pub fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\x1b' {
            if chars.peek() == Some(&'[') {
                chars.next();
                while let Some(&next) = chars.peek() {
                    chars.next();
                    if next.is_ascii_alphabetic() {
                        break;
                    }
                }
            }
        } else {
            result.push(c);
        }
    }

    result
}

// =============================================================================
// Tests for Test Utilities
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_factory_points_at_endpoint() {
        let descriptor = descriptor_at(Provider::Custom, "http://127.0.0.1:9999");
        assert_eq!(descriptor.endpoint.as_deref(), Some("http://127.0.0.1:9999"));
        assert_eq!(descriptor.id, Provider::Custom);
    }

    #[test]
    fn descriptor_factory_sets_models() {
        let descriptor =
            descriptor_with_models(Provider::Ollama, "http://127.0.0.1:11434", &["llama3.2"]);
        assert_eq!(descriptor.models, vec!["llama3.2".to_string()]);
    }

    #[test]
    fn wire_bodies_are_valid_json() {
        assert_json_valid!(&openai_reply_json("hello"));
        assert_json_valid!(&anthropic_reply_json("hello"));
        assert_json_valid!(&gemini_reply_json("hello"));
        assert_json_valid!(&ollama_reply_json("hello"));
        assert_json_valid!(&ollama_tags_json(&["llama3.2", "mistral"]));
        assert_json_valid!(&openai_models_json(&["gpt-test"]));
    }

    #[test]
    fn wire_bodies_carry_the_reply_text() {
        let body: serde_json::Value =
            serde_json::from_str(&openai_reply_json("the reply")).unwrap();
        assert_eq!(body["choices"][0]["message"]["content"], "the reply");

        let body: serde_json::Value =
            serde_json::from_str(&gemini_reply_json("the reply")).unwrap();
        assert_eq!(body["candidates"][0]["content"]["parts"][0]["text"], "the reply");
    }

    #[test]
    fn keys_fixture_round_trips() {
        let json = keys_json(&[("groq", "gsk_test_123")]);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["groq"], "gsk_test_123");
    }

    #[test]
    fn test_dir_creates_and_cleans_up() {
        let path: PathBuf;
        {
            let dir = TestDir::new();
            path = dir.path().to_path_buf();
            assert!(path.exists());
            dir.create_file("test.txt", "hello");
            assert!(path.join("test.txt").exists());
        }
        // Directory should be cleaned up after drop
        assert!(!path.exists());
    }

    #[test]
    fn test_dir_creates_nested_files() {
        let dir = TestDir::new();
        dir.create_file("data/ai-api-keys.json", "{}");
        assert!(dir.file_exists("data/ai-api-keys.json"));
        assert_eq!(dir.read_file("data/ai-api-keys.json").unwrap(), "{}");
    }

    #[test]
    fn strip_ansi_removes_escape_sequences() {
        let colored = "\x1b[31mred\x1b[0m text";
        assert_eq!(strip_ansi_codes(colored), "red text");
    }

    #[test]
    fn has_ansi_detects_escape_sequences() {
        assert!(has_ansi_codes("\x1b[31mred\x1b[0m"));
        assert!(!has_ansi_codes("plain text"));
    }

    #[test]
    fn assert_contains_macro_works() {
        let text = "Hello, world!";
        assert_contains!(text, "world");
        assert_not_contains!(text, "goodbye");
    }
}
