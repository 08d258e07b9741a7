//! Business Services
//!
//! This module contains the core business logic services:
//!
//! - `PageService` - Page lifecycle, hierarchy, and current-page tracking
//! - `CompletionAssistant` - Debounced inline suggestions with cancellation
//!
//! Services coordinate between the persistence layer and application logic,
//! implementing business rules and orchestrating background work.

pub mod completion;
pub mod page_service;

pub use completion::{
    AssistEvent, AssistPhase, CompletionAssistant, Suggestion, SuggestionAnchor,
};
pub use page_service::PageService;
