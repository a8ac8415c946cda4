use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "financeguru")]
#[command(version)]
#[command(about = "Chat with the FinanceGuru personal finance assistant", long_about = None)]
pub struct Cli {
    /// Assistant Service base URL (e.g. http://localhost:5000)
    #[arg(short, long, env = "FINANCEGURU_URL")]
    pub url: Option<String>,

    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Send one message non-interactively and print the answer
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Output format for non-interactive mode
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, requires = "prompt")]
    pub output_format: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Write a default configuration file
    Init,
    /// Start a chat session (default)
    Chat,
    /// Check whether the Assistant Service is reachable
    Status,
    /// Print a random financial tip from the service
    Tip,
    /// Show version information
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Text,
    /// JSON structured output
    Json,
    /// Markdown formatted output
    Markdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_chat() {
        let cli = Cli::try_parse_from(["financeguru"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.prompt.is_none());
        assert_eq!(cli.output_format, OutputFormat::Text);
    }

    #[test]
    fn test_prompt_with_format() {
        let cli = Cli::try_parse_from([
            "financeguru",
            "--url",
            "http://10.0.0.5:5000",
            "-p",
            "budget help",
            "--output-format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.url.as_deref(), Some("http://10.0.0.5:5000"));
        assert_eq!(cli.prompt.as_deref(), Some("budget help"));
        assert_eq!(cli.output_format, OutputFormat::Json);
    }

    #[test]
    fn test_output_format_requires_prompt() {
        assert!(Cli::try_parse_from(["financeguru", "--output-format", "json"]).is_err());
    }

    #[test]
    fn test_subcommands() {
        let cli = Cli::try_parse_from(["financeguru", "tip"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Tip));
    }
}
