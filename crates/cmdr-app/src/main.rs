mod cli;
mod commands;
mod journal;
mod settings;

use std::path::Path;
use std::process::ExitCode;

use cmdr_config::toml_loader;
use tracing_subscriber::EnvFilter;

use crate::cli::Command;

fn init_logging(level_override: Option<&str>, config_path: &Path) {
    let directives = match level_override {
        Some(level) => settings::log_directives(level),
        None => {
            let config = toml_loader::load_from_path(config_path).ok();
            settings::config_log_directives(config.as_ref())
        }
    };

    let mut filter = EnvFilter::from_default_env();
    for directive in directives {
        match directive.parse() {
            Ok(d) => filter = filter.add_directive(d),
            Err(e) => eprintln!("ignoring invalid log directive '{directive}': {e}"),
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();

    let config_path = match args.config.clone() {
        Some(path) => path,
        None => match toml_loader::default_config_path() {
            Ok(path) => path,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        },
    };

    init_logging(args.log_level.as_deref(), &config_path);
    tracing::info!("cmdr v{} starting...", env!("CARGO_PKG_VERSION"));
    tracing::debug!("Using config: {}", config_path.display());

    let result = match args.command() {
        Command::Run {
            journal_dir,
            from_start,
        } => commands::run(config_path, journal_dir, from_start).await,
        Command::Replay { file } => commands::replay(config_path, file).await,
        Command::Disable => commands::set_disabled(&config_path, true),
        Command::Enable => commands::set_disabled(&config_path, false),
        Command::Config => commands::print_config(&config_path),
    };

    match result {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
