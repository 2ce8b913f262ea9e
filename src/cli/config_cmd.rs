//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;
use crate::domain::image::PreprocessOptions;
use crate::domain::language;
use crate::domain::prompt::SystemInstruction;
use crate::domain::provider::ProviderKind;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

fn check_key(key: &str) -> Result<(), ConfigError> {
    if !is_valid_config_key(key) {
        return Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        });
    }
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;
    validate_config_value(key, value)?;

    if key == "prompt_file" {
        validate_prompt_file(value).await?;
    }

    let mut config = store.load().await?;
    apply_value(&mut config, key, value)?;
    store.save(&config).await?;

    let shown = if key == "api_key" {
        mask_api_key(value)
    } else {
        value.to_string()
    };
    presenter.success(&format!("{} = {}", key, shown));

    if key == "locale" && !language::is_known(value) {
        presenter.warn(&format!(
            "No language known for '{}'; descriptions will be in {}",
            value,
            language::FALLBACK_LANGUAGE
        ));
    }

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let config = store.load().await?;
    match display_value(&config, key) {
        Some(v) => presenter.output(&v),
        None => presenter.output(NOT_SET),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        let value = display_value(&config, key).unwrap_or_else(|| NOT_SET.to_string());
        presenter.key_value(key, &value);
    }

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

/// Stored value of `key` as shown to the user. The credential is masked.
fn display_value(config: &AppConfig, key: &str) -> Option<String> {
    match key {
        "provider" => config.provider.clone(),
        "base_url" => config.base_url.clone(),
        "account_id" => config.account_id.clone(),
        "api_key" => config.api_key.as_deref().map(mask_api_key),
        "model" => config.model.clone(),
        "max_tokens" => config.max_tokens.map(|n| n.to_string()),
        "locale" => config.locale.clone(),
        "scale" => config.scale.map(|f| f.to_string()),
        "quality" => config.quality.map(|f| f.to_string()),
        "timeout_secs" => config.timeout_secs.map(|n| n.to_string()),
        "prompt_file" => config.prompt_file.clone(),
        _ => None,
    }
}

/// Store an already validated value
fn apply_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "provider" => config.provider = Some(parse_provider(key, value)?.to_string()),
        "base_url" => config.base_url = Some(value.to_string()),
        "account_id" => config.account_id = Some(value.to_string()),
        "api_key" => config.api_key = Some(value.to_string()),
        "model" => config.model = Some(value.to_string()),
        "max_tokens" => config.max_tokens = Some(parse_positive(key, value)?),
        "locale" => config.locale = Some(value.to_string()),
        "scale" => config.scale = Some(parse_factor(key, value)?),
        "quality" => config.quality = Some(parse_factor(key, value)?),
        "timeout_secs" => config.timeout_secs = Some(parse_positive(key, value)?),
        "prompt_file" => config.prompt_file = Some(value.to_string()),
        _ => {
            return Err(ConfigError::ValidationError {
                key: key.to_string(),
                message: "Unknown key".to_string(),
            })
        }
    }
    Ok(())
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        key: key.to_string(),
        message: message.into(),
    }
}

fn parse_provider(key: &str, value: &str) -> Result<ProviderKind, ConfigError> {
    value
        .parse::<ProviderKind>()
        .map_err(|e| invalid(key, e.to_string()))
}

fn parse_positive<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match value.trim().parse::<T>() {
        Ok(n) if n > T::default() => Ok(n),
        _ => Err(invalid(key, "Value must be a positive whole number")),
    }
}

fn parse_factor(key: &str, value: &str) -> Result<f32, ConfigError> {
    let factor: f32 = value
        .trim()
        .parse()
        .map_err(|_| invalid(key, "Value must be a number in (0, 1]"))?;

    // Reuse the codec's own range check on the factor being set
    let options = match key {
        "scale" => PreprocessOptions {
            scale: factor,
            ..PreprocessOptions::default()
        },
        _ => PreprocessOptions {
            quality: factor,
            ..PreprocessOptions::default()
        },
    };
    options.validate().map_err(|e| invalid(key, e.to_string()))?;
    Ok(factor)
}

/// Validate a config value based on key type
fn validate_config_value(key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "provider" => {
            parse_provider(key, value)?;
        }
        "base_url" => {
            if !(value.starts_with("https://") || value.starts_with("http://")) {
                return Err(invalid(key, "Value must be an http(s) URL"));
            }
        }
        "max_tokens" => {
            parse_positive::<u32>(key, value)?;
        }
        "timeout_secs" => {
            parse_positive::<u64>(key, value)?;
        }
        "scale" | "quality" => {
            parse_factor(key, value)?;
        }
        _ => {
            if value.trim().is_empty() {
                return Err(invalid(key, "Value must not be empty"));
            }
        }
    }
    Ok(())
}

async fn validate_prompt_file(path: &str) -> Result<(), ConfigError> {
    let template = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| invalid("prompt_file", format!("Cannot read '{}': {}", path, e)))?;
    SystemInstruction::from_template(template).map_err(|e| invalid("prompt_file", e.to_string()))?;
    Ok(())
}

/// Mask API key for display (show first 4 and last 4 chars)
fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::Mutex;

    struct MemoryStore {
        config: Mutex<AppConfig>,
    }

    impl MemoryStore {
        fn new() -> Self {
            Self {
                config: Mutex::new(AppConfig::empty()),
            }
        }
    }

    #[async_trait]
    impl ConfigStore for MemoryStore {
        async fn load(&self) -> Result<AppConfig, ConfigError> {
            Ok(self.config.lock().unwrap().clone())
        }

        async fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
            *self.config.lock().unwrap() = config.clone();
            Ok(())
        }

        fn path(&self) -> PathBuf {
            PathBuf::from("/memory/config.toml")
        }

        fn exists(&self) -> bool {
            true
        }

        async fn init(&self) -> Result<(), ConfigError> {
            self.save(&AppConfig::defaults()).await
        }
    }

    #[test]
    fn mask_api_key_long() {
        let masked = mask_api_key("abcdefghijklmnop");
        assert_eq!(masked, "abcd...mnop");
    }

    #[test]
    fn mask_api_key_short() {
        let masked = mask_api_key("short");
        assert_eq!(masked, "*****");
    }

    #[test]
    fn mask_api_key_multibyte() {
        assert_eq!(mask_api_key("ключ-очень-длинный"), "ключ...нный");
    }

    #[test]
    fn validate_provider() {
        assert!(validate_config_value("provider", "openrouter").is_ok());
        assert!(validate_config_value("provider", "cloudflare").is_ok());
        assert!(validate_config_value("provider", "gemini").is_err());
    }

    #[test]
    fn validate_factors() {
        assert!(validate_config_value("scale", "0.5").is_ok());
        assert!(validate_config_value("quality", "1").is_ok());
        assert!(validate_config_value("scale", "0").is_err());
        assert!(validate_config_value("quality", "1.5").is_err());
        assert!(validate_config_value("scale", "half").is_err());
    }

    #[test]
    fn validate_positive_numbers() {
        assert!(validate_config_value("max_tokens", "1000").is_ok());
        assert!(validate_config_value("max_tokens", "0").is_err());
        assert!(validate_config_value("timeout_secs", "-5").is_err());
        assert!(validate_config_value("timeout_secs", "30").is_ok());
    }

    #[test]
    fn validate_base_url() {
        assert!(validate_config_value("base_url", "https://example.test/v1").is_ok());
        assert!(validate_config_value("base_url", "example.test").is_err());
    }

    #[test]
    fn validate_strings_not_empty() {
        assert!(validate_config_value("locale", "fr-FR").is_ok());
        assert!(validate_config_value("api_key", "  ").is_err());
    }

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let store = MemoryStore::new();
        let presenter = Presenter::new();

        handle_set(&store, &presenter, "provider", "cloudflare").await.unwrap();
        handle_set(&store, &presenter, "scale", "0.25").await.unwrap();

        let config = store.load().await.unwrap();
        assert_eq!(config.provider, Some("workers-ai".to_string()));
        assert_eq!(config.scale, Some(0.25));
    }

    #[tokio::test]
    async fn set_unknown_key_fails() {
        let store = MemoryStore::new();
        let presenter = Presenter::new();

        let err = handle_set(&store, &presenter, "duration", "30s").await.unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[tokio::test]
    async fn set_prompt_file_requires_placeholder() {
        let dir = tempfile::TempDir::new().unwrap();
        let bad = dir.path().join("bad.txt");
        let good = dir.path().join("good.txt");
        std::fs::write(&bad, "Describe the scene.").unwrap();
        std::fs::write(&good, "Describe the scene. Respond only in {language}.").unwrap();

        let store = MemoryStore::new();
        let presenter = Presenter::new();

        assert!(handle_set(&store, &presenter, "prompt_file", bad.to_str().unwrap())
            .await
            .is_err());
        handle_set(&store, &presenter, "prompt_file", good.to_str().unwrap())
            .await
            .unwrap();
        assert!(store.load().await.unwrap().prompt_file.is_some());
    }

    #[test]
    fn display_value_masks_credential() {
        let config = AppConfig {
            api_key: Some("sk-1234567890abcdef".to_string()),
            max_tokens: Some(500),
            ..AppConfig::empty()
        };

        assert_eq!(display_value(&config, "api_key"), Some("sk-1...cdef".to_string()));
        assert_eq!(display_value(&config, "max_tokens"), Some("500".to_string()));
        assert_eq!(display_value(&config, "locale"), None);
    }
}
