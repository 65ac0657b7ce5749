//! `lanewise` - inspect SIMD capabilities, evaluate and benchmark elementwise operations.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lanewise_core::{capability, ElementKind, LanewiseConfig, Op};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

/// Lanewise - runtime-dispatched SIMD reductions and arithmetic
#[derive(Parser, Debug)]
#[command(name = "lanewise")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./lanewise.toml when present)
    #[arg(short, long, global = true, env = "LANEWISE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show processor capabilities and the dispatch path in effect
    Caps {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Evaluate one operation on values given on the command line
    Eval {
        /// Operation: sum, min, max, add, sub, mul, div
        #[arg(value_parser = parse_op)]
        op: Op,

        /// Element kind (u8..u64, i8..i64, f32, f64)
        #[arg(short, long, default_value = "i32", value_parser = parse_kind)]
        kind: ElementKind,

        /// Left operand, or the only input of a reduction
        #[arg(long, num_args = 1.., required = true, allow_negative_numbers = true)]
        lhs: Vec<String>,

        /// Right operand of a paired operation
        #[arg(long, num_args = 1.., allow_negative_numbers = true)]
        rhs: Vec<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Compare scalar and accelerated latency on the canonical sequence
    Bench {
        /// Only this element kind (default: all)
        #[arg(short, long, value_parser = parse_kind)]
        kind: Option<ElementKind>,

        /// Only this operation (default: all)
        #[arg(short, long, value_parser = parse_op)]
        op: Option<Op>,

        /// Elements per call
        #[arg(short, long, default_value_t = 4096)]
        size: usize,

        /// Timed calls per path
        #[arg(short, long, default_value_t = 100)]
        iterations: usize,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn parse_kind(s: &str) -> Result<ElementKind, String> {
    s.parse().map_err(|e: lanewise_core::Error| e.to_string())
}

fn parse_op(s: &str) -> Result<Op, String> {
    s.parse().map_err(|e: lanewise_core::Error| e.to_string())
}

fn load_config(path: Option<&PathBuf>) -> Result<LanewiseConfig> {
    let config = match path {
        Some(path) => LanewiseConfig::load_from(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => LanewiseConfig::load().context("failed to load configuration")?,
    };
    Ok(config)
}

fn init_tracing(config: &LanewiseConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;
    init_tracing(&config);

    let caps = capability::configure(&config.dispatch).context("failed to apply dispatch configuration")?;
    tracing::debug!(capabilities = %caps, "dispatch configured");

    match cli.command {
        Command::Caps { json } => commands::caps(json),
        Command::Eval {
            op,
            kind,
            lhs,
            rhs,
            json,
        } => commands::eval(op, kind, &lhs, &rhs, json),
        Command::Bench {
            kind,
            op,
            size,
            iterations,
            json,
        } => commands::bench(kind, op, size, iterations, json),
        Command::Config => commands::config(&config),
    }
}
