/// Configuration for the assist service client
use serde::{Deserialize, Serialize};

/// Upper bound on the per-request timeout. Suggestions render inline while
/// the user types, so anything slower than this is worthless to show.
const MAX_TIMEOUT_SECS: u64 = 120;

/// Configuration for the suggestion and chat endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistConfig {
    /// Endpoint for inline completion lookups ({"text"} -> {"suggestion"})
    pub suggest_url: String,

    /// Endpoint for chat exchanges ({"message"} -> {"reply"})
    pub chat_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            suggest_url: "http://127.0.0.1:3000/api/autocomplete".to_string(),
            chat_url: "http://127.0.0.1:3000/api/chat".to_string(),
            timeout_secs: 15,
        }
    }
}

impl AssistConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.suggest_url.is_empty() {
            return Err("suggest_url cannot be empty".to_string());
        }

        if self.chat_url.is_empty() {
            return Err("chat_url cannot be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(format!(
                "timeout_secs cannot exceed {} (suggestions are only useful while typing pauses)",
                MAX_TIMEOUT_SECS
            ));
        }

        Ok(())
    }
}
