use anyhow::Result;
use clap::Parser;

use financeguru::{
    cli::Cli,
    runtime::{resolve_config, NonInteractiveRunner, Orchestrator},
    utils::init_logger,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Set up logging if verbose
    if cli.verbose {
        init_logger();
    }

    // Check if running in non-interactive mode
    if let Some(prompt) = cli.prompt.clone() {
        run_non_interactive(cli, prompt).await
    } else {
        // Create and run the orchestrator for interactive mode
        let orchestrator = Orchestrator::new(cli)?;
        orchestrator.run().await
    }
}

/// Run in non-interactive mode
async fn run_non_interactive(cli: Cli, prompt: String) -> Result<()> {
    let config = resolve_config(&cli)?;

    let mut runner = NonInteractiveRunner::new(&config)?;
    let result = runner.execute(prompt).await?;

    println!("{}", runner.format_result(&result, cli.output_format));

    // Exit with appropriate code
    if result.fell_back {
        std::process::exit(1);
    }

    Ok(())
}
