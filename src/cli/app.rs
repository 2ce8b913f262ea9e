//! Main app runner for describe mode

use std::env;
use std::path::Path;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::application::ports::ConfigStore;
use crate::application::{DescriptionService, PipelineController, PipelineOptions, StateObserver};
use crate::domain::config::AppConfig;
use crate::domain::image::CapturedImage;
use crate::domain::language;
use crate::domain::pipeline::PipelineState;
use crate::domain::prompt::SystemInstruction;
use crate::domain::provider::ProviderKind;
use crate::infrastructure::{JpegPreprocessor, ReqwestTransport};

use super::args::DescribeArgs;
use super::presenter::Presenter;
use super::signals::listen_for_interrupt;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;
pub const EXIT_CANCELLED: u8 = 130;

/// Environment variable holding the Cloudflare account id
pub const ACCOUNT_ID_ENV: &str = "CLOUDFLARE_ACCOUNT_ID";

/// Install the stderr diagnostics subscriber.
///
/// `RUST_LOG` wins unless `verbose` is set, which raises this crate to debug.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("iris=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("iris=error"))
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

/// Locale of the environment, from `LC_ALL` then `LANG`
pub fn system_locale() -> Option<String> {
    ["LC_ALL", "LANG"]
        .iter()
        .filter_map(|var| env::var(var).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty() && value != "C" && value != "POSIX")
}

fn non_empty_env(var: &str) -> Option<String> {
    env::var(var).ok().filter(|s| !s.trim().is_empty())
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config<S: ConfigStore>(store: &S, cli_config: AppConfig) -> AppConfig {
    let file_config = store.load_or_empty().await;

    let system_config = AppConfig {
        locale: system_locale(),
        ..AppConfig::empty()
    };

    // Merge: defaults < system locale < file
    let layered = AppConfig::defaults()
        .merge(system_config)
        .merge(file_config);

    // The credential variable depends on the provider finally chosen
    let provider = layered
        .clone()
        .merge(cli_config.clone())
        .provider_or_default();
    let env_config = AppConfig {
        api_key: non_empty_env(provider.api_key_env()),
        account_id: match provider {
            ProviderKind::WorkersAi => non_empty_env(ACCOUNT_ID_ENV),
            ProviderKind::OpenRouter => None,
        },
        ..AppConfig::empty()
    };

    // ... < env < cli
    layered.merge(env_config).merge(cli_config)
}

/// Canonical instruction, or the template named by `prompt_file`
pub async fn load_instruction(config: &AppConfig) -> Result<SystemInstruction, String> {
    let Some(path) = config.prompt_file.as_deref() else {
        return Ok(SystemInstruction::canonical());
    };

    let template = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| format!("Cannot read prompt file '{}': {}", path, e))?;
    SystemInstruction::from_template(template).map_err(|e| format!("{} ('{}')", e, path))
}

/// Describe one image file and print the result
pub async fn run_describe<S: ConfigStore>(args: DescribeArgs, store: &S) -> ExitCode {
    let presenter = Presenter::new();

    let Some(image_path) = args.image.clone() else {
        presenter.error("No image given. Usage: iris <IMAGE> or iris describe <IMAGE>");
        return ExitCode::from(EXIT_USAGE_ERROR);
    };

    let config = load_merged_config(store, args.to_config()).await;

    let settings = match config.provider_settings() {
        Ok(settings) => settings,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let preprocess = match config.preprocess_options() {
        Ok(options) => options,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    let instruction = match load_instruction(&config).await {
        Ok(instruction) => instruction,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let transport = match ReqwestTransport::new(config.timeout_or_default()) {
        Ok(transport) => transport,
        Err(e) => {
            presenter.error(&format!("Failed to create HTTP client: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let image = match read_capture(&image_path).await {
        Ok(image) => image,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let locale = config.locale_or_default().to_string();
    if args.verbose {
        presenter.info(&format!(
            "{} ({}), answering in {}",
            settings.kind.label(),
            settings.model.as_deref().unwrap_or("endpoint model"),
            language::resolve(&locale)
        ));
    }

    let service = DescriptionService::new(transport, settings);
    let options = PipelineOptions {
        locale: locale.clone(),
        preprocess,
        instruction,
    };

    let spinner = Arc::new(Mutex::new(Presenter::new()));
    let observer: StateObserver = {
        let spinner = Arc::clone(&spinner);
        Arc::new(move |state: &PipelineState| {
            if let Ok(mut spinner) = spinner.lock() {
                spinner.pipeline_state(state);
            }
        })
    };

    let controller = Arc::new(
        PipelineController::new(JpegPreprocessor::new(), service, options).with_observer(observer),
    );

    listen_for_interrupt(Arc::clone(&controller));

    let state = controller.capture_received(image).await;

    match state {
        PipelineState::Done(result) => {
            presenter.output(result.text());
            ExitCode::from(EXIT_SUCCESS)
        }
        PipelineState::Failed(reason) => {
            presenter.output(reason.user_message(&locale));
            if args.verbose {
                presenter.error(&reason.to_string());
            }
            ExitCode::from(EXIT_ERROR)
        }
        PipelineState::Cancelled => ExitCode::from(EXIT_CANCELLED),
        other => {
            tracing::warn!(state = %other.phase(), "cycle ended in a non-terminal state");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

async fn read_capture(path: &Path) -> Result<CapturedImage, String> {
    let data = tokio::fs::read(path)
        .await
        .map_err(|e| format!("Cannot read image '{}': {}", path.display(), e))?;
    tracing::debug!(path = %path.display(), bytes = data.len(), "capture loaded");
    Ok(CapturedImage::encoded(data))
}
