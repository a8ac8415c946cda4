use anyhow::Result;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::{
    app::Config,
    cli::OutputFormat,
    models::{AssistantService, HttpAssistant},
    session::{fallback_message, RejectReason, Session, SubmitOutcome},
};

/// Result of a non-interactive run
#[derive(Debug, Serialize, Deserialize)]
pub struct NonInteractiveResult {
    /// The prompt that was sent
    pub prompt: String,
    /// The assistant's reply, or the fallback text
    pub response: String,
    /// True when the service could not be reached
    pub fell_back: bool,
    /// Metadata about the execution
    pub metadata: ExecutionMetadata,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExecutionMetadata {
    /// Assistant Service base URL
    pub service_url: String,
    /// Execution time in milliseconds
    pub duration_ms: u128,
    /// When the exchange finished
    pub finished_at: DateTime<Local>,
}

/// Non-interactive runner for executing single prompts
pub struct NonInteractiveRunner {
    service: Box<dyn AssistantService>,
    session: Session,
    service_url: String,
}

impl NonInteractiveRunner {
    /// Create a runner talking to the configured Assistant Service
    pub fn new(config: &Config) -> Result<Self> {
        let service = HttpAssistant::new(&config.service.base_url, config.service.timeout())?;
        let service_url = service.base_url().to_string();
        Ok(Self::with_service(
            Box::new(service),
            &config.session.greeting,
            service_url,
        ))
    }

    /// Create a runner around any Assistant Service
    pub fn with_service(
        service: Box<dyn AssistantService>,
        greeting: &str,
        service_url: impl Into<String>,
    ) -> Self {
        let service_url = service_url.into();
        Self {
            service,
            session: Session::new(greeting, fallback_message(&service_url)),
            service_url,
        }
    }

    /// Execute a single prompt and return the result
    pub async fn execute(&mut self, prompt: String) -> Result<NonInteractiveResult> {
        let start_time = std::time::Instant::now();

        let outcome = self.session.submit(&prompt, self.service.as_ref()).await;
        let fell_back = match outcome {
            SubmitOutcome::Replied => false,
            SubmitOutcome::FellBack => true,
            SubmitOutcome::Rejected(RejectReason::Blank) => anyhow::bail!("Prompt is empty"),
            SubmitOutcome::Rejected(RejectReason::Busy | RejectReason::Foreign) => {
                anyhow::bail!("A request is already in flight")
            }
        };

        let response = self
            .session
            .transcript()
            .last()
            .map(|m| m.content().to_string())
            .unwrap_or_default();

        Ok(NonInteractiveResult {
            prompt: prompt.trim().to_string(),
            response,
            fell_back,
            metadata: ExecutionMetadata {
                service_url: self.service_url.clone(),
                duration_ms: start_time.elapsed().as_millis(),
                finished_at: Local::now(),
            },
        })
    }

    /// Format the result according to the output format
    pub fn format_result(&self, result: &NonInteractiveResult, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => serde_json::to_string_pretty(result).unwrap_or_else(|e| {
                format!("{{\"error\": \"Failed to serialize result: {}\"}}", e)
            }),
            OutputFormat::Text => result.response.clone(),
            OutputFormat::Markdown => {
                let mut output = String::new();

                output.push_str("## You\n\n");
                output.push_str(&result.prompt);
                output.push_str("\n\n## FinanceGuru\n\n");
                output.push_str(&result.response);
                output.push_str("\n\n---\n");
                output.push_str(&format!(
                    "*Service: {} | Duration: {}ms{}*\n",
                    result.metadata.service_url,
                    result.metadata.duration_ms,
                    if result.fell_back { " | unreachable" } else { "" }
                ));

                output
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::GREETING;
    use crate::models::MockAssistantService;
    use crate::utils::AppError;

    fn runner(reply: Result<&'static str, ()>) -> NonInteractiveRunner {
        let mut mock = MockAssistantService::new();
        mock.expect_reply().returning(move |_, _| match reply {
            Ok(text) => Ok(text.to_string()),
            Err(()) => Err(AppError::AssistantUnreachable("connection refused".to_string())),
        });
        NonInteractiveRunner::with_service(Box::new(mock), GREETING, "http://localhost:5000")
    }

    #[tokio::test]
    async fn test_execute_success() {
        let mut runner = runner(Ok("Here is a plan"));
        let result = runner.execute("budget help".to_string()).await.unwrap();

        assert_eq!(result.response, "Here is a plan");
        assert!(!result.fell_back);
        assert_eq!(runner.format_result(&result, OutputFormat::Text), "Here is a plan");
    }

    #[tokio::test]
    async fn test_execute_fallback() {
        let mut runner = runner(Err(()));
        let result = runner.execute("budget help".to_string()).await.unwrap();

        assert!(result.fell_back);
        assert_eq!(
            result.response,
            "Sorry, I encountered an error. Please make sure the backend server is running on http://localhost:5000"
        );
    }

    #[tokio::test]
    async fn test_blank_prompt_is_an_error() {
        let mut runner = runner(Ok("unused"));
        assert!(runner.execute("   ".to_string()).await.is_err());
    }

    #[tokio::test]
    async fn test_json_and_markdown_output() {
        let mut runner = runner(Ok("Start a SIP"));
        let result = runner.execute("  how to invest?  ".to_string()).await.unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&runner.format_result(&result, OutputFormat::Json)).unwrap();
        assert_eq!(json["prompt"], "how to invest?");
        assert_eq!(json["response"], "Start a SIP");
        assert_eq!(json["fell_back"], false);
        assert_eq!(json["metadata"]["service_url"], "http://localhost:5000");

        let markdown = runner.format_result(&result, OutputFormat::Markdown);
        assert!(markdown.starts_with("## You\n\nhow to invest?"));
        assert!(markdown.contains("## FinanceGuru\n\nStart a SIP"));
    }
}
