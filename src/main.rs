//! askframe - ask natural-language questions about a tabular dataset.

use askframe::app::Session;
use askframe::cli::Cli;
use askframe::config::Config;
use askframe::dataset::gold_loans;
use askframe::error::Result;
use askframe::llm::create_client;
use askframe::output::{NoticeLevel, Output};
use askframe::{logging, tui};
use std::process::ExitCode;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is fine; the key may already be exported.
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse_args();

    if cli.is_one_shot() {
        logging::init_stderr_logging();
    } else {
        logging::init_file_logging();
    }
    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{}: {}", e.category(), e);
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Builds the final configuration: CLI flags > config file > environment > defaults.
fn load_config(cli: &Cli) -> Result<Config> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;
    config.apply_env_defaults();
    cli.apply_overrides(&mut config);
    config.validate()?;
    Ok(config)
}

/// Loads the dataset named by the flags and config into the session.
fn load_dataset(cli: &Cli, config: &Config, session: &mut Session) -> Output {
    if cli.sample {
        return session.set_dataset(gold_loans());
    }
    match &config.dataset.path {
        Some(path) => session.load(path, config.dataset.sheet.as_deref()),
        None => Output::error(
            "No dataset given. Pass a file path, set dataset.path in the config file, or use --sample.",
        ),
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(&cli)?;
    let client = create_client(&config.llm, None)?;
    info!(provider = %config.llm.provider, model = config.llm.model(), "LLM client ready");

    let mut session = Session::new(client, Duration::from_secs(config.llm.timeout_secs))
        .with_preview_rows(config.dataset.preview_rows);
    let load_output = load_dataset(&cli, &config, &mut session);

    let Some(question) = cli.question.as_deref() else {
        tui::run(&mut session, load_output).await?;
        return Ok(ExitCode::SUCCESS);
    };

    println!("{}", load_output.to_plain_text());
    if session.dataset().is_none() {
        return Ok(ExitCode::FAILURE);
    }

    let cancel = CancellationToken::new();
    let pending = session.ask(question, cancel.clone());
    tokio::pin!(pending);
    let finished = tokio::select! {
        output = &mut pending => Some(output),
        _ = tokio::signal::ctrl_c() => None,
    };
    let output = match finished {
        Some(output) => output,
        None => {
            warn!("Interrupted; cancelling the request");
            cancel.cancel();
            pending.await
        }
    };
    println!();
    println!("{}", output.to_plain_text());
    if output.level() == Some(NoticeLevel::Error) {
        warn!("Question did not produce an answer");
    }
    Ok(ExitCode::SUCCESS)
}
