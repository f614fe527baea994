mod cli;
mod commands;
mod printer;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crux_common::CruxError;
use crux_config::CruxConfig;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use cli::Command;

const DEFAULT_LOG_DIRECTIVE: &str = "crux=info";

/// Load environment variables from a .env file (KEY=VALUE lines).
///
/// The first file found wins; variables already set are left alone.
fn load_dotenv() {
    let mut candidates = vec![PathBuf::from(".env")];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("crux").join(".env"));
    }

    for path in &candidates {
        if let Ok(contents) = std::fs::read_to_string(path) {
            for (key, value) in parse_dotenv(&contents) {
                if std::env::var(key).is_err() {
                    std::env::set_var(key, value);
                }
            }
            return;
        }
    }
}

fn parse_dotenv(contents: &str) -> Vec<(&str, &str)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| {
            let key = key.trim().trim_start_matches("export ").trim();
            let value = value.trim().trim_matches('"').trim_matches('\'');
            (key, value)
        })
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

/// Logs go to stderr so stdout carries only replies and JSON.
fn init_logging(directive: &str) {
    let directive = directive
        .parse::<Directive>()
        .or_else(|_| DEFAULT_LOG_DIRECTIVE.parse::<Directive>());

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = directive {
        filter = filter.add_directive(directive);
    }

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

async fn run(command: Command, config: &CruxConfig) -> Result<(), CruxError> {
    match command {
        Command::Chat => commands::chat(config).await,
        Command::Ask { message } => commands::ask(config, &message.join(" ")).await,
        Command::Verify { text, url, user } => commands::verify(config, text, url, user).await,
        Command::Explain { text, verdict, lang } => {
            commands::explain(config, &text, &verdict, &lang).await
        }
        Command::Score { text, evidence } => commands::score(config, &text, &evidence).await,
        Command::Crisis { claims, verify } => commands::crisis(config, &claims, verify).await,
        Command::Config => commands::show_config(config),
    }
}

fn main() -> ExitCode {
    // Before the runtime starts any threads.
    load_dotenv();

    let args = cli::parse();

    let config = crux_config::load_config(args.config.as_deref());
    let directive = match (&args.log_level, &config) {
        (Some(directive), _) => directive.as_str(),
        (None, Ok(config)) => config.logging.level.directive(),
        (None, Err(_)) => DEFAULT_LOG_DIRECTIVE,
    };
    init_logging(directive);

    tracing::debug!("crux v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            let path = args.config.as_deref().map(Path::display);
            tracing::error!(error = %e, path = ?path, "config load failed");
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(args.command, &config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotenv_lines() {
        let parsed = parse_dotenv(
            "# keys\nCRUX_API_KEY=\"abc\"\n\nexport LOVABLE_API_KEY = 'xyz'\nnot a pair\n=orphan\n",
        );
        assert_eq!(
            parsed,
            vec![("CRUX_API_KEY", "abc"), ("LOVABLE_API_KEY", "xyz")]
        );
    }

    #[test]
    fn log_directives_parse() {
        assert!("crux=debug".parse::<Directive>().is_ok());
        assert!(DEFAULT_LOG_DIRECTIVE.parse::<Directive>().is_ok());
    }
}
