/// Notia Assist Engine - Suggestion and Chat Service Client
///
/// This crate is the network boundary for Notia's assistive features: the
/// debounced inline completion lookup and the free-form chat exchange. The
/// editor core consumes the [`SuggestionClient`] trait; the bundled
/// [`HttpAssistClient`] talks JSON over HTTP to the app server's assist
/// routes.
///
/// # Wire contract
///
/// - Suggestion: POST `{ "text": string }` -> `{ "suggestion": string }`
/// - Chat: POST `{ "message": string }` -> `{ "reply": string }`
///
/// Any non-success status or transport failure maps to [`AssistError`];
/// callers treat all of them the same way (drop the suggestion) and only
/// distinguish cancellation, which never reaches this crate because aborted
/// lookups are torn down on the caller's side.
///
/// # Example
///
/// ```ignore
/// use notia_assist::{AssistConfig, HttpAssistClient, SuggestionClient};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = HttpAssistClient::new(AssistConfig::default())?;
///
///     let suggestion = client.suggest("The quick brown fox ").await?;
///     println!("ghost text: {}", suggestion);
///
///     let reply = client.chat("Summarize my notes").await?;
///     println!("reply: {}", reply);
///
///     Ok(())
/// }
/// ```
pub mod client;
pub mod config;
pub mod error;

// Re-export main types
pub use client::{HttpAssistClient, SuggestionClient};
pub use config::AssistConfig;
pub use error::{AssistError, Result};
