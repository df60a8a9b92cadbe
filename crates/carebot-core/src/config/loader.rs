//! Config loader — reads `~/.carebot/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.carebot/config.json`
//! 3. Provider credentials `OPENAI_API_KEY`, `ANTHROPIC_API_KEY`, `GROQ_API_KEY`
//! 4. Environment variables `CAREBOT_<SECTION>__<FIELD>` (override everything above)

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::{Config, ProviderConfig};

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    load_config_with(&config_path, |key| std::env::var(key).ok())
}

/// Load config from a specific file path, resolving env vars through `env`.
fn load_config_with(path: &Path, env: impl Fn(&str) -> Option<String>) -> Config {
    apply_env_overrides(read_config_file(path), env)
}

/// Read and parse the JSON file, or return defaults.
fn read_config_file(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return Config::default();
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return Config::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            Config::default()
        }
    }
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    // Ensure parent directory exists
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config).map_err(std::io::Error::other)?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Supported overrides:
/// - `<NAME>_API_KEY` → `providers.<name>.api_key`
/// - `CAREBOT_PROVIDERS__<NAME>__API_KEY` → `providers.<name>.api_key`
/// - `CAREBOT_PROVIDERS__<NAME>__API_BASE` → `providers.<name>.api_base`
/// - `CAREBOT_PROVIDERS__<NAME>__MODEL` → `providers.<name>.model`
/// - `CAREBOT_GATEWAY__HOST` → `gateway.host`
/// - `CAREBOT_GATEWAY__PORT` → `gateway.port`
fn apply_env_overrides(mut config: Config, env: impl Fn(&str) -> Option<String>) -> Config {
    apply_provider_env(&mut config.providers.openai, "OPENAI", &env);
    apply_provider_env(&mut config.providers.anthropic, "ANTHROPIC", &env);
    apply_provider_env(&mut config.providers.groq, "GROQ", &env);

    if let Some(val) = env("CAREBOT_GATEWAY__HOST") {
        config.gateway.host = val;
    }
    if let Some(val) = env("CAREBOT_GATEWAY__PORT") {
        match val.parse::<u16>() {
            Ok(p) => config.gateway.port = p,
            Err(_) => warn!("Ignoring invalid CAREBOT_GATEWAY__PORT={}", val),
        }
    }

    config
}

/// Apply env var overrides for a single provider.
fn apply_provider_env(
    provider: &mut ProviderConfig,
    name: &str,
    env: &impl Fn(&str) -> Option<String>,
) {
    if let Some(val) = env(&format!("{name}_API_KEY")) {
        provider.api_key = val;
    }
    if let Some(val) = env(&format!("CAREBOT_PROVIDERS__{name}__API_KEY")) {
        provider.api_key = val;
    }
    if let Some(val) = env(&format!("CAREBOT_PROVIDERS__{name}__API_BASE")) {
        provider.api_base = Some(val);
    }
    if let Some(val) = env(&format!("CAREBOT_PROVIDERS__{name}__MODEL")) {
        provider.model = Some(val);
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp_json(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_load_missing_file() {
        let config = load_config_with(Path::new("/nonexistent/path/config.json"), no_env);
        assert_eq!(config.gateway.port, 5001);
        assert!(!config.providers.groq.is_configured());
    }

    #[test]
    fn test_load_valid_json() {
        let file = write_temp_json(
            r#"{
            "providers": {
                "anthropic": { "apiKey": "sk-ant-123", "model": "claude-3-haiku" }
            }
        }"#,
        );

        let config = load_config_with(file.path(), no_env);
        assert!(config.providers.anthropic.is_configured());
        assert_eq!(config.providers.anthropic.model.as_deref(), Some("claude-3-haiku"));
        // Default preserved
        assert_eq!(config.gateway.port, 5001);
    }

    #[test]
    fn test_load_invalid_json_returns_defaults() {
        let file = write_temp_json("not valid json {{{");
        let config = load_config_with(file.path(), no_env);
        assert_eq!(config.gateway.port, 5001);
        assert!(!config.providers.openai.is_configured());
    }

    #[test]
    fn test_load_empty_json() {
        let file = write_temp_json("{}");
        let config = load_config_with(file.path(), no_env);
        assert_eq!(config.gateway.host, "0.0.0.0");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.providers.openai.api_key = "sk-test".to_string();
        config.gateway.port = 7000;

        save_config(&config, Some(&path)).unwrap();

        let reloaded = load_config_with(&path, no_env);
        assert_eq!(reloaded.providers.openai.api_key, "sk-test");
        assert_eq!(reloaded.gateway.port, 7000);
    }

    #[test]
    fn test_saved_json_uses_camel_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        save_config(&Config::default(), Some(&path)).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let raw: serde_json::Value = serde_json::from_str(&content).unwrap();

        assert!(raw["providers"]["groq"].get("apiKey").is_some());
        assert!(raw["providers"]["groq"].get("api_key").is_none());
    }

    #[test]
    fn test_plain_credential_env_vars() {
        let env = env_from(&[
            ("OPENAI_API_KEY", "sk-openai"),
            ("ANTHROPIC_API_KEY", "sk-ant"),
            ("GROQ_API_KEY", "gsk"),
        ]);
        let config = apply_env_overrides(Config::default(), env);
        assert_eq!(config.providers.openai.api_key, "sk-openai");
        assert_eq!(config.providers.anthropic.api_key, "sk-ant");
        assert_eq!(config.providers.groq.api_key, "gsk");
    }

    #[test]
    fn test_prefixed_env_wins_over_plain() {
        let env = env_from(&[
            ("GROQ_API_KEY", "plain"),
            ("CAREBOT_PROVIDERS__GROQ__API_KEY", "prefixed"),
            ("CAREBOT_PROVIDERS__GROQ__API_BASE", "http://127.0.0.1:8000/v1"),
            ("CAREBOT_PROVIDERS__GROQ__MODEL", "llama-3.1-8b-instant"),
        ]);
        let config = apply_env_overrides(Config::default(), env);
        assert_eq!(config.providers.groq.api_key, "prefixed");
        assert_eq!(
            config.providers.groq.api_base.as_deref(),
            Some("http://127.0.0.1:8000/v1")
        );
        assert_eq!(
            config.providers.groq.model.as_deref(),
            Some("llama-3.1-8b-instant")
        );
    }

    #[test]
    fn test_env_overrides_file_value() {
        let file = write_temp_json(r#"{"providers": {"openai": {"apiKey": "from-file"}}}"#);
        let config = load_config_with(file.path(), env_from(&[("OPENAI_API_KEY", "from-env")]));
        assert_eq!(config.providers.openai.api_key, "from-env");
    }

    #[test]
    fn test_env_override_gateway() {
        let env = env_from(&[
            ("CAREBOT_GATEWAY__HOST", "127.0.0.1"),
            ("CAREBOT_GATEWAY__PORT", "9999"),
        ]);
        let config = apply_env_overrides(Config::default(), env);
        assert_eq!(config.gateway.host, "127.0.0.1");
        assert_eq!(config.gateway.port, 9999);
    }

    #[test]
    fn test_invalid_port_env_ignored() {
        let env = env_from(&[("CAREBOT_GATEWAY__PORT", "not-a-port")]);
        let config = apply_env_overrides(Config::default(), env);
        assert_eq!(config.gateway.port, 5001);
    }
}
