/// Constants module to avoid magic numbers in the codebase

// Network Configuration
pub const DEFAULT_SERVICE_URL: &str = "http://localhost:5000";
pub const CHAT_ENDPOINT: &str = "/api/chat";
pub const HEALTH_ENDPOINT: &str = "/api/health";
pub const TIPS_ENDPOINT: &str = "/api/financial-tips";

// Timeouts
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 120; // Long answers from large models
pub const HEALTH_CHECK_TIMEOUT_MS: u64 = 1500;

// UI Configuration
pub const UI_REFRESH_INTERVAL_MS: u64 = 50;
pub const UI_MIN_TICK_MS: u64 = 10;
pub const UI_SCROLL_LINES: u16 = 3;
pub const UI_PAGE_LINES: u16 = 10;

// Environment
pub const ENV_PREFIX: &str = "FINANCEGURU_";

// Conversation
pub const GREETING: &str = "Hello! I'm FinanceGuru, your AI-powered finance assistant. I can help you with:\n\n\
• Investment advice and portfolio recommendations\n\
• Budget planning and expense management\n\
• Real-time market insights\n\
• Savings strategies\n\
• Financial goal planning\n\n\
How can I help you today?";

pub const FALLBACK_PREFIX: &str =
    "Sorry, I encountered an error. Please make sure the backend server is running on";
