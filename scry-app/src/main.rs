use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use futures::future::join_all;
use scry_common::observability::{LogConfig, init_logging};
use scry_common::{ErrorKind, ExtractError};
use scry_config::{NavigationMode, ScryConfig, ScryConfigLoader};
use scry_drivers::scry_browser::driver::ChromeLauncher;
use scry_extract::{AnswerSource, ExtractionPipeline, ExtractionResult};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const DEFAULT_CONFIG: &str = "scry.yaml";

/// Ask a JS-rendered answer engine and print the extracted answers as JSON lines.
#[derive(Parser, Debug)]
#[command(name = "scry", version)]
struct Cli {
    /// YAML config file. Without it `scry.yaml` is read when present.
    #[arg(long, env = "SCRY_CONFIG")]
    config: Option<PathBuf>,

    /// Overall budget per prompt, overriding `pipeline.default_timeout_ms`.
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Override `target.mode`.
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Mirror log events to stderr.
    #[arg(long)]
    stderr_logs: bool,

    /// One or more prompts, each extracted in its own browser session.
    #[arg(required = true, num_args = 1..)]
    prompts: Vec<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    Direct,
    Interactive,
}

impl From<ModeArg> for NavigationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Direct => NavigationMode::Direct,
            ModeArg::Interactive => NavigationMode::Interactive,
        }
    }
}

#[derive(Serialize)]
struct AnswerLine<'a> {
    prompt: &'a str,
    answer: &'a str,
    source: AnswerSource,
    elapsed_ms: u64,
}

#[derive(Serialize)]
struct ErrorBody {
    kind: ErrorKind,
    message: String,
}

#[derive(Serialize)]
struct FailureLine<'a> {
    prompt: &'a str,
    error: ErrorBody,
}

fn load_config(cli: &Cli) -> Result<ScryConfig> {
    let loader = match &cli.config {
        Some(path) => ScryConfigLoader::new().with_file(path),
        None => ScryConfigLoader::new().with_optional_file(DEFAULT_CONFIG),
    };
    let mut cfg = loader.load().context("loading configuration")?;

    if let Some(mode) = cli.mode {
        cfg.target.mode = mode.into();
        cfg.validate()
            .map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;
    }
    Ok(cfg)
}

fn render(prompt: &str, outcome: &Result<ExtractionResult, ExtractError>) -> Result<String> {
    let line = match outcome {
        Ok(result) => serde_json::to_string(&AnswerLine {
            prompt,
            answer: &result.text,
            source: result.source,
            elapsed_ms: result.elapsed_ms,
        })?,
        Err(err) => serde_json::to_string(&FailureLine {
            prompt,
            error: ErrorBody {
                kind: err.kind(),
                message: err.to_string(),
            },
        })?,
    };
    Ok(line)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // 1) Load config (env wins over file)
    let cfg = load_config(&cli)?;

    let log_path = init_logging(LogConfig {
        emit_stderr: cli.stderr_logs,
        ..LogConfig::default()
    })?;
    info!(log = %log_path.display(), prompts = cli.prompts.len(), "scry starting");

    let budget = cli
        .timeout_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| cfg.pipeline.default_timeout());

    let launcher = ChromeLauncher::new(cfg.webdriver.clone());
    let pipeline = ExtractionPipeline::new(launcher, Arc::new(cfg));

    // 2) One session per prompt; the pipeline bounds how many are open at once
    let outcomes = join_all(cli.prompts.iter().map(|prompt| {
        let pipeline = pipeline.clone();
        async move { pipeline.extract_answer(prompt, budget).await }
    }))
    .await;

    let mut failed = false;
    for (prompt, outcome) in cli.prompts.iter().zip(&outcomes) {
        failed |= outcome.is_err();
        println!("{}", render(prompt, outcome)?);
    }

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
