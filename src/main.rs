//! Bench Verdict - command line entry point
//!
//! ## Commands
//!
//! - `run` (default): analyze the benchmark log and post the verdicts
//! - `check`: verify the oracle and the channel credential
//! - `init-config`: write a default configuration file

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, error, info, Level};

use bench_verdict::logging::init_tracing;
use bench_verdict::services::ingest::LogFile;
use bench_verdict::services::notify::{DiscordChannel, MessageChannel};
use bench_verdict::services::orchestrator::{exit_status, EXIT_FAILURE, EXIT_SUCCESS};
use bench_verdict::{AppConfig, ConfigOverrides, ConfigService, Orchestrator};
use bench_verdict_llm::{build_oracle, OracleBackend};

#[derive(Parser)]
#[command(name = "bench-verdict")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Analyze hardware benchmark logs and relay the verdicts", long_about = None)]
struct Cli {
    /// Configuration file (default: ~/.bench-verdict/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines and a JSON run summary
    #[arg(long, global = true)]
    json: bool,

    /// Bot credential for the messaging channel
    #[arg(long, global = true, env = "BENCH_VERDICT_BOT_TOKEN", hide_env_values = true)]
    bot_token: Option<String>,

    /// Parent channel the run thread is created under
    #[arg(long, global = true, env = "BENCH_VERDICT_CHANNEL_ID")]
    channel_id: Option<String>,

    /// User mentioned when a section is anomalous
    #[arg(long, global = true, env = "BENCH_VERDICT_ADMIN_ID")]
    admin_id: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a benchmark log and post the results (default)
    Run(RunArgs),

    /// Check that the oracle and the channel are reachable
    Check(OracleArgs),

    /// Write a default configuration file
    InitConfig {
        /// Destination (default: ~/.bench-verdict/config.json)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Default)]
struct OracleArgs {
    /// Model used for analysis and classification
    #[arg(long)]
    model: Option<String>,

    /// Oracle backend: http or cli
    #[arg(long)]
    backend: Option<OracleBackend>,

    /// Ollama base URL for the http backend
    #[arg(long)]
    oracle_url: Option<String>,
}

#[derive(Args, Default)]
struct RunArgs {
    /// Directory searched for the log file
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Explicit log file, skipping the directory search
    #[arg(long)]
    log: Option<PathBuf>,

    /// Directory the PDF report is written to (default: the log's directory)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    #[command(flatten)]
    oracle: OracleArgs,
}

impl Cli {
    fn overrides(&self, oracle: &OracleArgs, output_dir: Option<PathBuf>) -> ConfigOverrides {
        ConfigOverrides {
            model: oracle.model.clone(),
            backend: oracle.backend,
            oracle_url: oracle.oracle_url.clone(),
            bot_token: self.bot_token.clone(),
            parent_channel_id: self.channel_id.clone(),
            escalation_user_id: self.admin_id.clone(),
            output_dir,
        }
    }

    fn load_config(&self, overrides: ConfigOverrides) -> Result<AppConfig> {
        let service = ConfigService::load(self.config.as_deref()).context("Invalid configuration")?;
        debug!(path = %service.path().display(), "configuration loaded");
        service.into_config(overrides).context("Invalid configuration")
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    init_tracing(cli.json, level);

    ExitCode::from(finish(execute(cli).await))
}

/// Exit status for a command result; errors are logged and fail.
fn finish(result: Result<u8>) -> u8 {
    match result {
        Ok(status) => status,
        Err(e) => {
            error!("{:#}", e);
            EXIT_FAILURE
        }
    }
}

async fn execute(mut cli: Cli) -> Result<u8> {
    match cli.command.take() {
        None => {
            let args = RunArgs {
                dir: PathBuf::from("."),
                ..Default::default()
            };
            cmd_run(&cli, args).await
        }
        Some(Commands::Run(args)) => cmd_run(&cli, args).await,
        Some(Commands::Check(args)) => cmd_check(&cli, &args).await,
        Some(Commands::InitConfig { path, force }) => {
            let written = ConfigService::write_default(path.as_deref(), force)
                .context("Failed to write configuration")?;
            println!("Configuration written to {}", written.display());
            Ok(EXIT_SUCCESS)
        }
    }
}

async fn cmd_run(cli: &Cli, args: RunArgs) -> Result<u8> {
    let config = cli.load_config(cli.overrides(&args.oracle, args.output_dir.clone()))?;
    if let Err(msg) = config.validate_channel() {
        anyhow::bail!("Invalid configuration: {}", msg);
    }

    let suffix = config.input_suffix.clone();
    let orchestrator =
        Orchestrator::from_config(config).context("Failed to initialize the pipeline")?;
    let outcome = match args.log {
        Some(path) => orchestrator.run_log(LogFile::from_path(path, &suffix)).await,
        None => orchestrator.run_in_dir(&args.dir).await,
    };

    match &outcome {
        Ok(summary) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(summary)?);
            } else {
                println!(
                    "{}: {} sections, {} anomalies, thread {}",
                    summary.machine_id,
                    summary.records.len(),
                    summary.anomalies(),
                    summary.thread_id
                );
            }
        }
        Err(e) => error!(error = %e, fatal = e.is_fatal(), "run aborted"),
    }
    Ok(exit_status(&outcome))
}

async fn cmd_check(cli: &Cli, args: &OracleArgs) -> Result<u8> {
    let config = cli.load_config(cli.overrides(args, None))?;
    let mut healthy = true;

    let oracle = build_oracle(&config.oracle).context("Failed to initialize the oracle")?;
    match oracle.health_check().await {
        Ok(()) => info!(oracle = oracle.name(), model = oracle.model(), "oracle ok"),
        Err(e) => {
            error!(oracle = oracle.name(), error = %e, "oracle check failed");
            healthy = false;
        }
    }

    match DiscordChannel::new(&config.channel) {
        Ok(channel) => match channel.test().await {
            Ok(result) if result.success => {
                info!(latency_ms = ?result.latency_ms, "channel ok");
            }
            Ok(result) => {
                error!(error = ?result.error, "channel check failed");
                healthy = false;
            }
            Err(e) => {
                error!(error = %e, "channel check failed");
                healthy = false;
            }
        },
        Err(e) => {
            error!(error = %e, "channel not configured");
            healthy = false;
        }
    }

    Ok(if healthy { EXIT_SUCCESS } else { EXIT_FAILURE })
}
