//! kvbench - concurrent load-generation and latency benchmark harness.

use anyhow::{Context, Result};
use clap::Parser;
use kvbench::{
    bench::BenchmarkRunner,
    cli::Cli,
    config::BenchConfig,
    results::{RunSummary, export_json},
};
use kvbench_store::open_store;
use owo_colors::OwoColorize;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG if set, otherwise derive the filter from --verbose.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("info")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    let generate = cli.generate;
    let json_output = cli.json.clone();

    let config = Arc::new(
        cli.into_config()
            .context("failed to build benchmark config")?,
    );
    print_banner(&config);

    let store = open_store(config.backend, config.aerospike.as_ref(), config.threads)
        .context("failed to open store backend")?;

    let runner = BenchmarkRunner::new(Arc::clone(&config), store);
    if generate {
        runner.generate()?;
        return Ok(());
    }

    let reports = runner.run()?;
    if let Some(path) = json_output {
        let summary = RunSummary::new(&config, reports);
        export_json(&summary, &path)?;
        println!("Results exported to: {}", path.display());
    }

    Ok(())
}

/// Print a compact one-line banner with the run shape.
fn print_banner(config: &BenchConfig) {
    let line = format!(
        "{} backend, {} threads, {} keys",
        config.backend, config.threads, config.key_num
    );
    println!();
    if config.color {
        println!("{}: {line}", "kvbench".cyan().bold());
    } else {
        println!("kvbench: {line}");
    }
    println!();
}
