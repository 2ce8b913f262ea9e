//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::image::{PreprocessOptions, DEFAULT_QUALITY, DEFAULT_SCALE};
use crate::domain::provider::{ProviderKind, ProviderSettings, DEFAULT_MAX_TOKENS};

/// Default locale when neither config nor environment provide one
pub const DEFAULT_LOCALE: &str = "en";

/// Default HTTP timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub provider: Option<String>,
    pub base_url: Option<String>,
    pub account_id: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub locale: Option<String>,
    pub scale: Option<f32>,
    pub quality: Option<f32>,
    pub timeout_secs: Option<u64>,
    pub prompt_file: Option<String>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            provider: Some(ProviderKind::default().to_string()),
            base_url: None,
            account_id: None,
            api_key: None,
            model: None,
            max_tokens: Some(DEFAULT_MAX_TOKENS),
            locale: Some(DEFAULT_LOCALE.to_string()),
            scale: Some(DEFAULT_SCALE),
            quality: Some(DEFAULT_QUALITY),
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
            prompt_file: None,
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            provider: other.provider.or(self.provider),
            base_url: other.base_url.or(self.base_url),
            account_id: other.account_id.or(self.account_id),
            api_key: other.api_key.or(self.api_key),
            model: other.model.or(self.model),
            max_tokens: other.max_tokens.or(self.max_tokens),
            locale: other.locale.or(self.locale),
            scale: other.scale.or(self.scale),
            quality: other.quality.or(self.quality),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
            prompt_file: other.prompt_file.or(self.prompt_file),
        }
    }

    /// Get provider as parsed ProviderKind, or default if not set/invalid
    pub fn provider_or_default(&self) -> ProviderKind {
        self.provider
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get locale, or "en" if not set
    pub fn locale_or_default(&self) -> &str {
        self.locale
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_LOCALE)
    }

    /// Get max_tokens, or 1000 if not set
    pub fn max_tokens_or_default(&self) -> u32 {
        self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    }

    /// Get timeout, or 60 seconds if not set
    pub fn timeout_or_default(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Validated resize/re-encode options
    pub fn preprocess_options(&self) -> Result<PreprocessOptions, ConfigError> {
        let scale = self.scale.unwrap_or(DEFAULT_SCALE);
        let quality = self.quality.unwrap_or(DEFAULT_QUALITY);
        PreprocessOptions::new(scale, quality).map_err(|e| ConfigError::ValidationError {
            key: "scale/quality".to_string(),
            message: e.to_string(),
        })
    }

    /// Resolve everything needed to reach the provider.
    ///
    /// Fails when the provider name is invalid, the credential is missing, or
    /// no endpoint can be built.
    pub fn provider_settings(&self) -> Result<ProviderSettings, ConfigError> {
        let kind = match self.provider.as_deref() {
            Some(name) => name.parse::<ProviderKind>().map_err(|e| ConfigError::ValidationError {
                key: "provider".to_string(),
                message: e.to_string(),
            })?,
            None => ProviderKind::default(),
        };

        let api_key = self
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingCredential {
                env_var: kind.api_key_env(),
            })?;

        let base_url = match self.base_url.clone().filter(|u| !u.is_empty()) {
            Some(url) => url,
            None => kind
                .default_base_url(self.account_id.as_deref())
                .ok_or(ConfigError::MissingAccountId)?,
        };

        let mut settings = ProviderSettings::new(kind, base_url, api_key);
        if let Some(model) = self.model.clone() {
            settings.model = Some(model);
        }
        settings.max_tokens = self.max_tokens_or_default();
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert!(config.api_key.is_none());
        assert_eq!(config.provider, Some("workers-ai".to_string()));
        assert_eq!(config.max_tokens, Some(1000));
        assert_eq!(config.locale, Some("en".to_string()));
        assert_eq!(config.scale, Some(0.5));
        assert_eq!(config.quality, Some(0.5));
        assert_eq!(config.timeout_secs, Some(60));
    }

    #[test]
    fn empty_has_all_none() {
        let config = AppConfig::empty();
        assert!(config.provider.is_none());
        assert!(config.api_key.is_none());
        assert!(config.locale.is_none());
        assert!(config.scale.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            api_key: Some("base_key".to_string()),
            locale: Some("en".to_string()),
            provider: Some("workers-ai".to_string()),
            ..Default::default()
        };

        let other = AppConfig {
            api_key: Some("other_key".to_string()),
            locale: None,
            provider: Some("openrouter".to_string()),
            ..Default::default()
        };

        let merged = base.merge(other);

        assert_eq!(merged.api_key, Some("other_key".to_string()));
        assert_eq!(merged.locale, Some("en".to_string()));
        assert_eq!(merged.provider_or_default(), ProviderKind::OpenRouter);
    }

    #[test]
    fn provider_or_default_uses_default_on_invalid() {
        let config = AppConfig {
            provider: Some("invalid".to_string()),
            ..Default::default()
        };
        assert_eq!(config.provider_or_default(), ProviderKind::WorkersAi);
    }

    #[test]
    fn locale_or_default_skips_blank() {
        let config = AppConfig {
            locale: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(config.locale_or_default(), "en");
    }

    #[test]
    fn preprocess_options_validated() {
        let config = AppConfig {
            scale: Some(2.0),
            ..Default::default()
        };
        assert!(config.preprocess_options().is_err());
        assert_eq!(
            AppConfig::empty().preprocess_options().unwrap(),
            PreprocessOptions::default()
        );
    }

    #[test]
    fn provider_settings_requires_credential() {
        let config = AppConfig {
            provider: Some("openrouter".to_string()),
            ..Default::default()
        };
        match config.provider_settings() {
            Err(ConfigError::MissingCredential { env_var }) => {
                assert_eq!(env_var, "OPENROUTER_API_KEY")
            }
            other => panic!("expected missing credential, got {:?}", other),
        }
    }

    #[test]
    fn provider_settings_workers_ai_needs_account_or_url() {
        let config = AppConfig {
            api_key: Some("k".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.provider_settings(),
            Err(ConfigError::MissingAccountId)
        ));

        let with_account = AppConfig {
            account_id: Some("acct".to_string()),
            ..config.clone()
        };
        let settings = with_account.provider_settings().unwrap();
        assert!(settings.base_url.contains("/accounts/acct/"));
        assert_eq!(settings.model, None);

        let with_url = AppConfig {
            base_url: Some("http://localhost:9999".to_string()),
            ..config
        };
        assert_eq!(
            with_url.provider_settings().unwrap().base_url,
            "http://localhost:9999"
        );
    }

    #[test]
    fn provider_settings_applies_overrides() {
        let config = AppConfig {
            provider: Some("openrouter".to_string()),
            api_key: Some("k".to_string()),
            model: Some("custom/model".to_string()),
            max_tokens: Some(200),
            ..Default::default()
        };
        let settings = config.provider_settings().unwrap();
        assert_eq!(settings.kind, ProviderKind::OpenRouter);
        assert_eq!(settings.model.as_deref(), Some("custom/model"));
        assert_eq!(settings.max_tokens, 200);
    }

    #[test]
    fn provider_settings_rejects_unknown_provider() {
        let config = AppConfig {
            provider: Some("nope".to_string()),
            api_key: Some("k".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.provider_settings(),
            Err(ConfigError::ValidationError { .. })
        ));
    }
}
