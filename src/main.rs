use alarm_loader::cli::{self, Args, setup_logging};
use alarm_loader::processor::print_summary;
use anyhow::{Context, Result};
use clap::Parser;
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();
    setup_logging(&args);

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        tokio::select! {
            result = run(&args) => result,
            _ = tokio::signal::ctrl_c() => {
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(anyhow::anyhow!("Processing interrupted by user"))
            }
        }
    });

    match result {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

async fn run(args: &Args) -> Result<()> {
    let summary = cli::run(args)
        .await
        .with_context(|| format!("Failed to load {}", args.file.display()))?;

    print_summary(&summary);
    Ok(())
}
