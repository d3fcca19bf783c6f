//! graft CLI.
//!
//! Commands:
//! - `graft run [A] [B]` - Adapt the demo `Target` to `AddNumbers` and call `add`
//! - `graft call <METHOD> <A> <B>` - Call `METHOD(i32, i32) -> i32` through a runtime-described interface
//! - `graft inspect [METHOD...]` - Show the synthesized adapter type

mod commands;
mod config;
mod demo;

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};
use graft_runtime::{AdapterConfig, TypeUniverse};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "graft")]
#[command(about = "Structural adapters synthesized at runtime", long_about = None)]
struct Cli {
    /// Adapter configuration file (TOML). Defaults come from GRAFT_CACHE and GRAFT_AMBIGUITY.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Adapt the demo Target to AddNumbers and print add(A, B)
    Run {
        #[arg(default_value_t = 5, allow_negative_numbers = true)]
        a: i32,
        #[arg(default_value_t = 6, allow_negative_numbers = true)]
        b: i32,
    },

    /// Call METHOD(A, B) on the demo Target through a dynamic interface
    Call {
        /// Method name (add, sub, mul, div)
        method: String,
        #[arg(allow_negative_numbers = true)]
        a: i32,
        #[arg(allow_negative_numbers = true)]
        b: i32,
    },

    /// Print the adapter type synthesized for the given methods
    Inspect {
        /// Interface methods, each taking (i32, i32)
        #[arg(default_values_t = vec!["add".to_string()])]
        methods: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    if let Err(e) = run(cli) {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().with_writer(std::io::stderr).without_time())
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => config::load(path)?,
        None => AdapterConfig::from_env(),
    };
    debug!(?config, "adapter configuration");
    let universe = TypeUniverse::new(config);

    match cli.command {
        Commands::Run { a, b } => println!("{}", commands::run::run(&universe, a, b)?),
        Commands::Call { method, a, b } => println!("{}", commands::call::call(&universe, &method, a, b)?),
        Commands::Inspect { methods } => print!("{}", commands::inspect::inspect(&universe, &methods)?),
    }
    Ok(())
}
