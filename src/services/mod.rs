//! Business logic services.
//!
//! The matcher is a pure function over catalog entries; the chat service
//! wraps it with fallback handling and the synthetic response mode.

mod chat;
mod response_matcher;
pub mod synthetic;

pub use chat::ChatService;
pub use response_matcher::{Match, MatchTier, find_match, normalize};
