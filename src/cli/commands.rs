use anyhow::Result;
use colored::Colorize;

use crate::{app::init_config, app::Config, models::HttpAssistant};

use super::Commands;

/// Handle CLI subcommands. Returns false when the chat should start.
pub async fn handle_command(command: &Commands, config: &Config) -> Result<bool> {
    match command {
        Commands::Init => {
            println!("Initializing FinanceGuru configuration...");
            init_config()?;
            println!("Configuration initialized successfully!");
            Ok(true)
        }
        Commands::Status => {
            show_status(config).await?;
            Ok(true)
        }
        Commands::Tip => {
            show_tip(config).await?;
            Ok(true)
        }
        Commands::Version => {
            show_version();
            Ok(true)
        }
        Commands::Chat => Ok(false), // Continue to chat interface
    }
}

/// Show version information
pub fn show_version() {
    println!("FinanceGuru v{}", env!("CARGO_PKG_VERSION"));
    println!("   Your AI-powered personal finance assistant, in the terminal");
}

/// Report whether the Assistant Service answers its health check
async fn show_status(config: &Config) -> Result<()> {
    let service = HttpAssistant::new(&config.service.base_url, config.service.timeout())?;

    println!("FinanceGuru Status:");
    println!();
    match service.health().await {
        Ok(health) if health.is_healthy() => {
            println!("  [OK] Assistant Service: {}", service.base_url().green());
            if let Some(ts) = health.timestamp {
                println!("      • Server time: {}", ts);
            }
        }
        Ok(health) => {
            println!(
                "  [WARNING] Assistant Service: {} reports '{}'",
                service.base_url().yellow(),
                health.status
            );
        }
        Err(e) => {
            println!("  [ERROR] Assistant Service: {} ({})", service.base_url().red(), e);
        }
    }
    println!("  Request timeout: {}s", config.service.timeout_secs);
    println!();
    Ok(())
}

/// Print one financial tip, or explain why none is available
async fn show_tip(config: &Config) -> Result<()> {
    let service = HttpAssistant::new(&config.service.base_url, config.service.timeout())?;

    match service.financial_tip().await {
        Ok(tip) => println!("💡 {}", tip.tip),
        Err(e) => {
            eprintln!("{} {}", "Could not fetch a tip:".red(), e);
            eprintln!("   Make sure the backend server is running on {}", service.base_url());
        }
    }
    Ok(())
}
