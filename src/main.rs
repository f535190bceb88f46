//! car CLI: evaluate educational practices against the categorical imperative.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};
use serde::Deserialize;

use car_education::config::EngineConfig;
use car_education::engine::{Engine, EvaluationRequest};
use car_education::explain;

#[derive(Parser)]
#[command(name = "car", version, about = "Critical reasoning engine for educational practices")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one request, or an array of requests, read as JSON.
    Evaluate {
        /// JSON file with `{practice, context}`; `-` reads stdin.
        #[arg(long, short, default_value = "-")]
        input: PathBuf,

        /// Engine configuration (TOML). Defaults apply when omitted.
        #[arg(long, short)]
        config: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Run evaluators sequentially.
        #[arg(long)]
        sequential: bool,
    },

    /// Print the default configuration as TOML.
    Config {
        /// Write to this file instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Validate a configuration file.
    CheckConfig {
        path: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Input {
    One(EvaluationRequest),
    Many(Vec<EvaluationRequest>),
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Evaluate {
            input,
            config,
            format,
            sequential,
        } => {
            let mut config = match config {
                Some(path) => EngineConfig::load(&path)?,
                None => EngineConfig::default(),
            };
            if sequential {
                config.parallel = false;
            }
            let engine = Engine::new(config)?;

            let content = if input.as_os_str() == "-" {
                std::io::read_to_string(std::io::stdin()).into_diagnostic()?
            } else {
                std::fs::read_to_string(&input).into_diagnostic()?
            };
            let requests = match serde_json::from_str(&content).into_diagnostic()? {
                Input::One(request) => vec![request],
                Input::Many(requests) => requests,
            };

            let mut plans = Vec::with_capacity(requests.len());
            for result in engine.evaluate_batch(&requests) {
                plans.push(result?);
            }

            match format {
                Format::Json => {
                    let json = if plans.len() == 1 {
                        serde_json::to_string_pretty(&plans[0])
                    } else {
                        serde_json::to_string_pretty(&plans)
                    };
                    println!("{}", json.into_diagnostic()?);
                }
                Format::Text => {
                    for (i, plan) in plans.iter().enumerate() {
                        if i > 0 {
                            println!();
                        }
                        println!("{}", explain::render_plan(plan));
                    }
                }
            }
        }

        Commands::Config { output } => {
            let config = EngineConfig::default();
            match output {
                Some(path) => {
                    config.save(&path)?;
                    println!("Wrote default configuration to {}", path.display());
                }
                None => print!("{}", config.to_toml_string()?),
            }
        }

        Commands::CheckConfig { path } => {
            let config = EngineConfig::load(&path)?;
            println!(
                "{} is valid (strictness: {}, threshold: {:.2}, parallel: {})",
                path.display(),
                config.strictness,
                config.confidence_threshold,
                config.parallel
            );
        }
    }

    Ok(())
}
