//! Integration tests for the on-disk state layout.
//!
//! The data files are shared with the desktop writing app, so these tests
//! pin the file names and JSON shapes rather than just round-tripping
//! through our own serializers.

use tempfile::TempDir;

use inkwright::core::Provider;
use inkwright::storage::{AppPaths, Config, CredentialStore, ProcessingSettings};
use inkwright::test_utils::{config_toml, keys_json, settings_json};

fn paths_under(dir: &TempDir) -> AppPaths {
    AppPaths::under_root(dir.path().to_path_buf())
}

// =============================================================================
// Data files
// =============================================================================

#[test]
fn store_mutations_land_in_the_data_directory() {
    let dir = TempDir::new().unwrap();
    let paths = paths_under(&dir);

    let mut store = CredentialStore::open(&paths).unwrap();
    store.set_key(Provider::Groq, "gsk_test_abc").unwrap();
    store
        .set_provider(Provider::Groq, &["llama-3.3-70b-versatile".to_string()])
        .unwrap();

    assert!(paths.api_keys_file().exists());
    assert!(paths.selected_provider_file().exists());
    assert!(paths.selected_model_file().exists());

    let keys: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(paths.api_keys_file()).unwrap()).unwrap();
    assert_eq!(keys["groq"], "gsk_test_abc");

    let provider: String =
        serde_json::from_str(&std::fs::read_to_string(paths.selected_provider_file()).unwrap())
            .unwrap();
    assert_eq!(provider, "groq");
}

#[test]
fn store_reads_key_files_written_by_the_app() {
    let dir = TempDir::new().unwrap();
    let paths = paths_under(&dir);
    paths.ensure_dirs().unwrap();
    std::fs::write(
        paths.api_keys_file(),
        keys_json(&[("openai", "sk-from-app"), ("gemini", "AIza-from-app")]),
    )
    .unwrap();

    let store = CredentialStore::open(&paths).unwrap();
    assert_eq!(store.get_key(Provider::OpenAi), Some("sk-from-app"));
    assert_eq!(store.get_key(Provider::Gemini), Some("AIza-from-app"));
    assert!(store.get_key(Provider::Groq).is_none());
}

#[test]
fn settings_fixture_parses_with_camel_case_fields() {
    let dir = TempDir::new().unwrap();
    let paths = paths_under(&dir);
    paths.ensure_dirs().unwrap();
    std::fs::write(paths.settings_file(), settings_json(512, 0.2)).unwrap();

    let settings = ProcessingSettings::load(&paths);
    assert_eq!(settings.max_tokens, 512);
    assert!((settings.temperature - 0.2).abs() < f64::EPSILON);
    assert!(settings.cache_enabled);
}

#[test]
fn settings_round_trip_through_the_standard_location() {
    let dir = TempDir::new().unwrap();
    let paths = paths_under(&dir);

    let mut settings = ProcessingSettings::default();
    settings.set_field("maxTokens", "1024").unwrap();
    settings.set_field("cacheEnabled", "false").unwrap();
    settings.save(&paths).unwrap();

    let loaded = ProcessingSettings::load(&paths);
    assert_eq!(loaded, settings);
    assert!(paths.settings_file().exists());
}

// =============================================================================
// Config file
// =============================================================================

#[test]
fn config_fixture_parses_and_validates() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, config_toml(45)).unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.general.timeout_seconds, 45);
    assert_eq!(config.offline.delay_min_ms, 0);
    assert!(!config.output.color);
    config.validate().unwrap();
}

#[test]
fn config_round_trips_provider_overrides() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    let mut config = Config::default();
    config.providers.insert(
        "custom".to_string(),
        inkwright::storage::config::ProviderOverride {
            endpoint: Some("https://llm.internal.example/v1/chat/completions".to_string()),
        },
    );
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    let overrides = loaded.endpoint_overrides().unwrap();
    assert_eq!(
        overrides,
        vec![(
            Provider::Custom,
            "https://llm.internal.example/v1/chat/completions".to_string()
        )]
    );
}

#[test]
fn config_missing_file_yields_defaults() {
    let config = Config::load_from(std::path::Path::new("/nonexistent/config.toml")).unwrap();
    assert_eq!(config.general.timeout_seconds, 30);
    assert!(config.output.color);
}

#[test]
fn config_rejects_unparseable_toml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[general\ntimeout_seconds = ").unwrap();
    assert!(Config::load_from(&path).is_err());
}

#[test]
fn config_validation_bounds_the_timeout() {
    let mut config = Config::default();
    config.general.timeout_seconds = 0;
    assert!(config.validate().is_err());
    config.general.timeout_seconds = 301;
    assert!(config.validate().is_err());
    config.general.timeout_seconds = 300;
    assert!(config.validate().is_ok());
}

#[test]
fn unknown_provider_override_is_rejected() {
    let mut config = Config::default();
    config.providers.insert(
        "no-such-provider".to_string(),
        inkwright::storage::config::ProviderOverride {
            endpoint: Some("https://x.example".to_string()),
        },
    );
    assert!(config.endpoint_overrides().is_err());
}
