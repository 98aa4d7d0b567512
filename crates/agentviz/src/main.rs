mod config;
mod ingest;
mod replay;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use agentviz_events::Source;
use agentviz_logging::{init_tracing, EventPrinter, LogFormat};

use crate::config::{parse_duration, AppConfig};
use crate::replay::ReplayOptions;

#[derive(Parser, Debug)]
#[command(
    name = "agentviz",
    about = "Normalize coding-agent session logs into a live activity stream",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Diagnostic log level (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Diagnostic log format
    #[arg(long, global = true, value_enum, default_value = "compact")]
    log_format: LogFormatChoice,

    /// Event output format
    #[arg(short, long, global = true, value_enum, default_value = "pretty")]
    format: LogFormatChoice,

    /// Working directory for agentviz.toml (default: current directory)
    #[arg(short = 'd', long, global = true)]
    working_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay session log files through the pipeline
    Replay {
        /// Log files, main sessions before their sub-agents
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Log source (default: guessed from the path)
        #[arg(short, long, value_enum)]
        source: Option<SourceChoice>,

        /// Project name for every file (default: enclosing directory)
        #[arg(short, long)]
        project: Option<String>,

        /// Print the registry state as JSON when done
        #[arg(long)]
        snapshot: bool,
    },
    /// Read reader signals as JSON lines from stdin until EOF or Ctrl+C
    Ingest {
        /// Idle time before a session is reaped, e.g. 30m
        #[arg(long, value_parser = parse_duration)]
        ttl: Option<Duration>,

        /// Time between reaper sweeps, e.g. 60s
        #[arg(long, value_parser = parse_duration)]
        sweep_interval: Option<Duration>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatChoice {
    Pretty,
    Json,
    Compact,
}

impl From<LogFormatChoice> for LogFormat {
    fn from(choice: LogFormatChoice) -> Self {
        match choice {
            LogFormatChoice::Pretty => LogFormat::Pretty,
            LogFormatChoice::Json => LogFormat::Json,
            LogFormatChoice::Compact => LogFormat::Compact,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SourceChoice {
    Claude,
    Codex,
}

impl From<SourceChoice> for Source {
    fn from(choice: SourceChoice) -> Self {
        match choice {
            SourceChoice::Claude => Source::ClaudeCode,
            SourceChoice::Codex => Source::Codex,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_format.into());

    let printer = EventPrinter::new(cli.format.into());

    match cli.command {
        Commands::Replay {
            files,
            source,
            project,
            snapshot,
        } => {
            let options = ReplayOptions {
                source: source.map(Source::from),
                project,
                snapshot,
            };
            replay::run(&files, &options, &printer)
        }
        Commands::Ingest {
            ttl,
            sweep_interval,
        } => {
            let working_dir = match cli.working_dir {
                Some(dir) => dir,
                None => std::env::current_dir().context("Failed to get current directory")?,
            };
            let config = AppConfig::discover(&working_dir)?.with_overrides(ttl, sweep_interval);
            ingest::run(config.sessions, printer).await
        }
    }
}
