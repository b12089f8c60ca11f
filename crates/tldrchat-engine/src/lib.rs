//! tldrchat-engine: Headless core for the tldrchat chat client
//!
//! This crate provides everything a send needs, independent of any UI:
//! - Message records and the append-only conversation store
//! - The reveal engine that replays a complete reply as a typewriter
//! - The send lifecycle state machine and its async driver
//! - The HTTP client for the reply service
//! - Configuration

pub mod client;
pub mod config;
pub mod lifecycle;
pub mod message;
pub mod reveal;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use client::{HttpReplyClient, ReplyError, ReplyRequest, ReplyService};
pub use config::{Config, ConfigError, ThemeName, DEFAULT_CONFIG_PATH, DEFAULT_ENDPOINT};
pub use lifecycle::{run_send, LifecycleObserver, SendOutcome};
pub use message::{Message, Role, SERVER_ERROR_TEXT};
pub use reveal::{Reveal, RevealFrame, RevealTicker, DEFAULT_CADENCE};
pub use session::{ChatSession, RequestOutcome, RevealStep, SendDecision, SessionState};
pub use store::ConversationStore;

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_version() {
        let version = engine_version();
        assert!(!version.is_empty());
        assert!(version.starts_with("0."));
    }
}
