use thiserror::Error;

/// Main error type for FinanceGuru
#[derive(Error, Debug)]
pub enum AppError {
    /// Transport failure, timeout, non-2xx status or an undecodable body.
    /// The detail is for logs only; users see the fallback message.
    #[error("Assistant unreachable: {0}")]
    AssistantUnreachable(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("UI error: {0}")]
    UIError(String),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::AssistantUnreachable(format!("request timed out: {}", err))
        } else if err.is_decode() {
            AppError::AssistantUnreachable(format!("invalid response body: {}", err))
        } else {
            AppError::AssistantUnreachable(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_keeps_detail() {
        let err = AppError::AssistantUnreachable("HTTP 500".to_string());
        assert_eq!(err.to_string(), "Assistant unreachable: HTTP 500");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: AppError = io.into();
        assert!(matches!(err, AppError::IoError(_)));
    }
}
