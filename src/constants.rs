use std::time::Duration;

// UI Constants
pub const APP_TITLE: &str = "AI Assistant";
pub const WELCOME_TITLE: &str = "Where should we begin?";
pub const WELCOME_SUBTITLE: &str =
    "Ask me anything, from explaining AI concepts to generating code, or even brainstorming your next big idea.";
pub const INPUT_PLACEHOLDER: &str = "Send a message...";
pub const FOOTER_HINT: &str = "Press Enter to send. AI assistant can make mistakes.";
pub const TICK_RATE: Duration = Duration::from_millis(100);

// Conversation Constants
pub const ERROR_MESSAGE: &str =
    "❌ Sorry, there was an error connecting to the server. Please make sure the backend is running.";
pub const CANCELLED_MESSAGE: &str = "⏹ Request cancelled.";
pub const COPY_ACK_DURATION: Duration = Duration::from_secs(2);

// API Constants
pub const DEFAULT_ENDPOINT: &str = "https://askme-2984.onrender.com/ask";
pub const HEALTH_PATH: &str = "/health";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_REVEAL_MIN_DELAY_MS: u64 = 10;
pub const DEFAULT_REVEAL_MAX_DELAY_MS: u64 = 30;
