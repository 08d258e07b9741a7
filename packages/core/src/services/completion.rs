//! Inline Completion Assistant
//!
//! Drives ghost-text suggestions for the editor:
//! - Debounces caret activity (600ms) before asking the suggestion service
//! - Single-flight: starting a request cancels the previous one
//! - Fences every response by generation so a stale completion can never
//!   surface after the caret moved on
//!
//! ## Lifecycle
//!
//! The assistant moves through four phases: `Idle` (nothing pending),
//! `Armed` (debounce timer running), `Fetching` (request in flight), and
//! `Showing` (suggestion available). Caret activity while a suggestion is
//! visible re-arms the timer without hiding it; the suggestion stays until
//! it is replaced, cleared, accepted, or dismissed.
//!
//! ## Cancellation
//!
//! Every caret notification bumps a generation counter and aborts the
//! pending task. Abort kills the task at its next await point, so a fetch
//! that was cancelled mid-request dies silently, and the generation check
//! under the state lock catches the narrow window where a response already
//! arrived. Cancelled requests are never logged as failures.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use notia_assist::SuggestionClient;
use tokio::sync::broadcast;
use tokio::task::AbortHandle;

/// Debounce window between the last caret movement and the suggestion
/// request. Long enough to skip mid-word churn, short enough to feel
/// responsive after a pause.
const DEBOUNCE: Duration = Duration::from_millis(600);

/// Broadcast channel capacity for assist events
const ASSIST_EVENT_CHANNEL_CAPACITY: usize = 32;

/// Where the suggestion popup anchors, in editor-local coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SuggestionAnchor {
    pub x: f64,
    pub y: f64,
}

/// A suggestion ready to show, pinned to the caret that requested it
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub text: String,
    pub anchor: SuggestionAnchor,
}

/// Pipeline phase of the assistant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistPhase {
    Idle,
    Armed,
    Fetching,
    Showing,
}

/// Events emitted as suggestions come and go
#[derive(Debug, Clone, PartialEq)]
pub enum AssistEvent {
    /// A fresh suggestion is available for display
    SuggestionShown(Suggestion),

    /// The visible suggestion was accepted; payload is the inserted text
    SuggestionAccepted(String),

    /// No suggestion should be displayed anymore
    SuggestionCleared,
}

impl AssistEvent {
    /// Get a string representation of the event type
    pub fn event_type(&self) -> &str {
        match self {
            AssistEvent::SuggestionShown(_) => "suggestion:shown",
            AssistEvent::SuggestionAccepted(_) => "suggestion:accepted",
            AssistEvent::SuggestionCleared => "suggestion:cleared",
        }
    }
}

struct AssistantInner {
    /// Bumped on every caret notification; responses carrying an older
    /// generation are discarded
    generation: u64,
    phase: AssistPhase,
    /// The pending debounce-then-fetch task, if any
    task: Option<AbortHandle>,
    suggestion: Option<Suggestion>,
}

/// Debounced, cancellable suggestion pipeline.
///
/// The assistant owns no editor state; callers feed it the text before the
/// caret on every caret move and it answers with broadcast events. All
/// failure modes degrade to "no suggestion".
///
/// # Examples
///
/// ```rust,no_run
/// use notia_assist::{AssistConfig, HttpAssistClient};
/// use notia_core::services::{CompletionAssistant, SuggestionAnchor};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let client = Arc::new(HttpAssistClient::new(AssistConfig::default())?);
///     let assistant = CompletionAssistant::new(client);
///
///     let mut rx = assistant.subscribe_to_events();
///     assistant.notify_caret("The quick brown ", SuggestionAnchor::default());
///
///     let event = rx.recv().await?;
///     println!("assist: {:?}", event);
///     Ok(())
/// }
/// ```
pub struct CompletionAssistant {
    client: Arc<dyn SuggestionClient>,
    debounce: Duration,
    inner: Arc<Mutex<AssistantInner>>,
    event_tx: broadcast::Sender<AssistEvent>,
}

impl CompletionAssistant {
    /// Create an assistant with the standard 600ms debounce
    pub fn new(client: Arc<dyn SuggestionClient>) -> Self {
        Self::with_debounce(client, DEBOUNCE)
    }

    /// Create an assistant with a custom debounce window
    pub fn with_debounce(client: Arc<dyn SuggestionClient>, debounce: Duration) -> Self {
        let (event_tx, _) = broadcast::channel(ASSIST_EVENT_CHANNEL_CAPACITY);
        Self {
            client,
            debounce,
            inner: Arc::new(Mutex::new(AssistantInner {
                generation: 0,
                phase: AssistPhase::Idle,
                task: None,
                suggestion: None,
            })),
            event_tx,
        }
    }

    /// Subscribe to assist events
    pub fn subscribe_to_events(&self) -> broadcast::Receiver<AssistEvent> {
        self.event_tx.subscribe()
    }

    /// Report caret activity.
    ///
    /// `text` is the text before the caret within the current run. Empty
    /// text clears any visible suggestion and stands the pipeline down;
    /// non-empty text (re)arms the debounce timer. Must be called from
    /// within a tokio runtime.
    pub fn notify_caret(&self, text: &str, anchor: SuggestionAnchor) {
        let mut inner = self.lock_inner();

        inner.generation += 1;
        let generation = inner.generation;

        if let Some(task) = inner.task.take() {
            task.abort();
        }

        if text.is_empty() {
            Self::clear_locked(&mut inner, &self.event_tx);
            return;
        }

        inner.phase = AssistPhase::Armed;

        let client = Arc::clone(&self.client);
        let state = Arc::clone(&self.inner);
        let event_tx = self.event_tx.clone();
        let debounce = self.debounce;
        let text = text.to_string();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            Self::run_fetch(client, state, event_tx, generation, text, anchor).await;
        });
        inner.task = Some(handle.abort_handle());
    }

    /// Accept the visible suggestion.
    ///
    /// Returns the suggestion text for the caller to insert at the caret,
    /// or `None` when nothing is showing.
    pub fn accept(&self) -> Option<String> {
        let text = {
            let mut inner = self.lock_inner();
            let suggestion = inner.suggestion.take()?;
            inner.phase = AssistPhase::Idle;
            suggestion.text
        };

        self.emit_event(AssistEvent::SuggestionAccepted(text.clone()));
        Some(text)
    }

    /// Hide the visible suggestion.
    ///
    /// Pending work is left alone: a timer armed before the dismissal
    /// still fires and may produce a fresh suggestion.
    pub fn dismiss(&self) {
        let cleared = {
            let mut inner = self.lock_inner();
            let had_suggestion = inner.suggestion.take().is_some();
            if had_suggestion && inner.phase == AssistPhase::Showing {
                inner.phase = AssistPhase::Idle;
            }
            had_suggestion
        };

        if cleared {
            self.emit_event(AssistEvent::SuggestionCleared);
        }
    }

    /// Cancel all pending work and clear any suggestion.
    ///
    /// Called on editor teardown. The assistant is reusable afterwards.
    pub fn shutdown(&self) {
        let mut inner = self.lock_inner();
        inner.generation += 1;
        if let Some(task) = inner.task.take() {
            task.abort();
        }
        Self::clear_locked(&mut inner, &self.event_tx);
    }

    /// Current pipeline phase
    pub fn phase(&self) -> AssistPhase {
        self.lock_inner().phase
    }

    /// The suggestion currently available for display, if any
    pub fn current_suggestion(&self) -> Option<Suggestion> {
        self.lock_inner().suggestion.clone()
    }

    /// Second half of the debounced pipeline, running inside the spawned
    /// task: re-check the fence, call the service, publish the outcome.
    async fn run_fetch(
        client: Arc<dyn SuggestionClient>,
        state: Arc<Mutex<AssistantInner>>,
        event_tx: broadcast::Sender<AssistEvent>,
        generation: u64,
        text: String,
        anchor: SuggestionAnchor,
    ) {
        {
            let mut inner = state.lock().unwrap_or_else(|e| e.into_inner());
            if inner.generation != generation {
                return;
            }
            inner.task = None;

            // Whitespace before the caret is not worth a request
            if text.trim().is_empty() {
                Self::clear_locked(&mut inner, &event_tx);
                return;
            }

            inner.phase = AssistPhase::Fetching;
        }

        let result = client.suggest(&text).await;

        let mut inner = state.lock().unwrap_or_else(|e| e.into_inner());
        if inner.generation != generation {
            // The caret moved on while the request ran
            return;
        }

        match result {
            Ok(completion) if !completion.trim().is_empty() => {
                let suggestion = Suggestion {
                    text: completion,
                    anchor,
                };
                inner.phase = AssistPhase::Showing;
                inner.suggestion = Some(suggestion.clone());
                drop(inner);
                tracing::debug!("Emitting suggestion:shown");
                let _ = event_tx.send(AssistEvent::SuggestionShown(suggestion));
            }
            Ok(_) => {
                Self::clear_locked(&mut inner, &event_tx);
            }
            Err(e) => {
                tracing::warn!("Suggestion request failed: {}", e);
                Self::clear_locked(&mut inner, &event_tx);
            }
        }
    }

    /// Reset to idle, emitting `SuggestionCleared` only when a suggestion
    /// was actually visible
    fn clear_locked(inner: &mut AssistantInner, event_tx: &broadcast::Sender<AssistEvent>) {
        let had_suggestion = inner.suggestion.take().is_some();
        inner.phase = AssistPhase::Idle;
        if had_suggestion {
            let _ = event_tx.send(AssistEvent::SuggestionCleared);
        }
    }

    fn emit_event(&self, event: AssistEvent) {
        tracing::debug!("Emitting {}", event.event_type());
        let _ = self.event_tx.send(event);
    }

    fn lock_inner(&self) -> MutexGuard<'_, AssistantInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for CompletionAssistant {
    fn drop(&mut self) {
        if let Some(task) = self.lock_inner().task.take() {
            task.abort();
        }
    }
}
