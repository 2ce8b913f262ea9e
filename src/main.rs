//! Iris CLI entry point

use std::process::ExitCode;

use clap::Parser;

use iris::cli::{
    app::{init_tracing, run_describe, EXIT_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    presenter::Presenter,
};
use iris::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = Presenter::new();
    let store = XdgConfigStore::new();

    match cli.command {
        Some(Commands::Config { action }) => {
            init_tracing(false);
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::SUCCESS
        }
        Some(Commands::Describe { args }) => {
            init_tracing(args.verbose);
            run_describe(args, &store).await
        }
        None => {
            init_tracing(cli.describe.verbose);
            run_describe(cli.describe, &store).await
        }
    }
}
