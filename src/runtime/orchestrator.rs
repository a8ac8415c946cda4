use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;

use crate::{
    app::{load_config, load_config_file, Config},
    cli::{handle_command, Cli},
    models::HttpAssistant,
    session::{fallback_message, Session, SessionEvent},
    tui::{run_ui, App},
    utils::{log_debug, log_info, log_warn},
};

/// Load configuration for this invocation and apply CLI overrides
pub fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        load_config_file(config_path)?
    } else {
        match load_config() {
            Ok(cfg) => cfg,
            Err(e) => {
                log_warn("⚠️", format!("Failed to load config: {}. Using defaults.", e));
                Config::default()
            }
        }
    };

    if let Some(url) = &cli.url {
        config.service.base_url = url.clone();
    }

    Ok(config)
}

/// Main runtime orchestrator
pub struct Orchestrator {
    cli: Cli,
    config: Config,
}

impl Orchestrator {
    /// Create a new orchestrator from CLI args
    pub fn new(cli: Cli) -> Result<Self> {
        let config = resolve_config(&cli)?;
        Ok(Self { cli, config })
    }

    /// Run the orchestrator
    pub async fn run(self) -> Result<()> {
        // Handle subcommands
        if let Some(command) = &self.cli.command {
            if handle_command(command, &self.config).await? {
                return Ok(()); // Command handled, exit
            }
            // Continue to chat for Commands::Chat
        }

        let service = HttpAssistant::new(
            &self.config.service.base_url,
            self.config.service.timeout(),
        )?;
        let service_url = service.base_url().to_string();

        println!("Starting FinanceGuru with service: {}", service_url.green());
        log_info("🚀", format!("Assistant Service: {}", service_url));

        let mut session = Session::new(
            self.config.session.greeting.clone(),
            fallback_message(&service_url),
        );
        session.subscribe(Box::new(|event: &SessionEvent| match event {
            SessionEvent::MessageAppended(msg) => log_debug(format!(
                "{} message appended ({} chars)",
                msg.role().as_str(),
                msg.content().len()
            )),
            SessionEvent::InFlightChanged(busy) => log_debug(format!("in flight: {}", busy)),
            SessionEvent::InputChanged(_) => {}
        }));

        let app = App::new(session, service_url, self.config.ui.show_suggestions);
        let tick = self.config.ui.tick();

        run_ui(app, Arc::new(service), tick).await
    }
}
