//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::domain::config::AppConfig;
use crate::domain::provider::ProviderKind;

/// Iris - describes what a camera sees, in the user's own language
#[derive(Parser, Debug)]
#[command(name = "iris")]
#[command(version)]
#[command(about = "Describe a captured image for blind and low-vision users")]
#[command(long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(flatten)]
    pub describe: DescribeArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Describe an image file
    Describe {
        #[command(flatten)]
        args: DescribeArgs,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Options for one description run
#[derive(Args, Debug, Clone, Default)]
pub struct DescribeArgs {
    /// Image file to describe (JPEG or PNG)
    #[arg(value_name = "IMAGE")]
    pub image: Option<PathBuf>,

    /// Vision provider
    #[arg(short = 'p', long, value_name = "PROVIDER")]
    pub provider: Option<ProviderArg>,

    /// Locale used to pick the response language (e.g. fr-FR)
    #[arg(short = 'l', long, value_name = "LOCALE")]
    pub locale: Option<String>,

    /// Downscale factor in (0, 1]
    #[arg(long, value_name = "FACTOR")]
    pub scale: Option<f32>,

    /// JPEG quality in (0, 1]
    #[arg(long, value_name = "FACTOR")]
    pub quality: Option<f32>,

    /// Maximum tokens in the description
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_tokens: Option<u32>,

    /// Model identifier sent to the provider
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// File with a replacement system instruction
    #[arg(long, value_name = "FILE")]
    pub prompt_file: Option<String>,

    /// Log pipeline diagnostics to stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl DescribeArgs {
    /// Overrides from the command line, as a config layer
    pub fn to_config(&self) -> AppConfig {
        AppConfig {
            provider: self.provider.map(|p| ProviderKind::from(p).to_string()),
            locale: self.locale.clone(),
            scale: self.scale,
            quality: self.quality,
            max_tokens: self.max_tokens,
            model: self.model.clone(),
            timeout_secs: self.timeout,
            prompt_file: self.prompt_file.clone(),
            ..AppConfig::empty()
        }
    }
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Provider argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ProviderArg {
    #[value(name = "workers-ai", alias = "cloudflare")]
    WorkersAi,
    #[value(name = "openrouter")]
    OpenRouter,
}

impl From<ProviderArg> for ProviderKind {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::WorkersAi => ProviderKind::WorkersAi,
            ProviderArg::OpenRouter => ProviderKind::OpenRouter,
        }
    }
}

impl From<ProviderKind> for ProviderArg {
    fn from(kind: ProviderKind) -> Self {
        match kind {
            ProviderKind::WorkersAi => ProviderArg::WorkersAi,
            ProviderKind::OpenRouter => ProviderArg::OpenRouter,
        }
    }
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "provider",
    "base_url",
    "account_id",
    "api_key",
    "model",
    "max_tokens",
    "locale",
    "scale",
    "quality",
    "timeout_secs",
    "prompt_file",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_defaults() {
        let cli = Cli::parse_from(["iris"]);
        assert!(cli.describe.image.is_none());
        assert!(cli.describe.provider.is_none());
        assert!(cli.describe.locale.is_none());
        assert!(!cli.describe.verbose);
        assert!(cli.command.is_none());
    }

    #[test]
    fn cli_parses_bare_image() {
        let cli = Cli::parse_from(["iris", "photo.jpg", "-l", "fr-FR"]);
        assert_eq!(cli.describe.image, Some(PathBuf::from("photo.jpg")));
        assert_eq!(cli.describe.locale, Some("fr-FR".to_string()));
    }

    #[test]
    fn cli_parses_describe_subcommand() {
        let cli = Cli::parse_from([
            "iris",
            "describe",
            "photo.png",
            "--provider",
            "openrouter",
            "--scale",
            "0.25",
            "-v",
        ]);
        match cli.command {
            Some(Commands::Describe { args }) => {
                assert_eq!(args.image, Some(PathBuf::from("photo.png")));
                assert_eq!(args.provider, Some(ProviderArg::OpenRouter));
                assert_eq!(args.scale, Some(0.25));
                assert!(args.verbose);
            }
            other => panic!("Expected Describe command, got {:?}", other),
        }
    }

    #[test]
    fn cli_parses_provider_alias() {
        let cli = Cli::parse_from(["iris", "x.jpg", "-p", "cloudflare"]);
        assert_eq!(cli.describe.provider, Some(ProviderArg::WorkersAi));
    }

    #[test]
    fn cli_parses_config_init() {
        let cli = Cli::parse_from(["iris", "config", "init"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                action: ConfigAction::Init
            })
        ));
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["iris", "config", "set", "locale", "de-DE"]);
        if let Some(Commands::Config {
            action: ConfigAction::Set { key, value },
        }) = cli.command
        {
            assert_eq!(key, "locale");
            assert_eq!(value, "de-DE");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn describe_args_become_config_layer() {
        let cli = Cli::parse_from(["iris", "x.jpg", "-p", "openrouter", "--max-tokens", "200"]);
        let config = cli.describe.to_config();

        assert_eq!(config.provider, Some("openrouter".to_string()));
        assert_eq!(config.max_tokens, Some(200));
        assert!(config.api_key.is_none());
        assert!(config.locale.is_none());
    }

    #[test]
    fn zero_limits_are_rejected() {
        assert!(Cli::try_parse_from(["iris", "x.jpg", "--timeout", "0"]).is_err());
        assert!(Cli::try_parse_from(["iris", "x.jpg", "--max-tokens", "0"]).is_err());

        let cli = Cli::try_parse_from(["iris", "x.jpg", "--timeout", "5", "--max-tokens", "1"])
            .unwrap();
        assert_eq!(cli.describe.timeout, Some(5));
        assert_eq!(cli.describe.max_tokens, Some(1));
    }

    #[test]
    fn provider_arg_converts_to_kind() {
        assert_eq!(ProviderKind::from(ProviderArg::WorkersAi), ProviderKind::WorkersAi);
        assert_eq!(ProviderArg::from(ProviderKind::OpenRouter), ProviderArg::OpenRouter);
    }

    #[test]
    fn valid_config_keys() {
        assert!(is_valid_config_key("api_key"));
        assert!(is_valid_config_key("account_id"));
        assert!(is_valid_config_key("prompt_file"));
        assert!(!is_valid_config_key("duration"));
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }
}
