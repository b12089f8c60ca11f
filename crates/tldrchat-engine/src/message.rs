//! Message records for the conversation.
//!
//! A [`Message`] is created once (at submission time for the user, at
//! reveal completion or failure for the bot) and never mutated afterwards.

use serde::{Deserialize, Serialize};

/// Text committed as the bot turn whenever a reply cannot be fetched.
pub const SERVER_ERROR_TEXT: &str = "❌ Server error. Try again later.";

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Text typed by the person at the keyboard.
    User,
    /// Reply produced by the remote service (or the fixed error text).
    Bot,
}

impl Role {
    /// Short label used in exports and plain-text output.
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Bot => "Bot",
        }
    }
}

/// A single committed turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    role: Role,
    text: String,
}

impl Message {
    /// Create a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    /// Create a bot message.
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            role: Role::Bot,
            text: text.into(),
        }
    }

    /// The fixed bot message used for every failed request.
    pub fn server_error() -> Self {
        Self::bot(SERVER_ERROR_TEXT)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether this is the fixed server-error turn.
    pub fn is_server_error(&self) -> bool {
        self.role == Role::Bot && self.text == SERVER_ERROR_TEXT
    }
}
