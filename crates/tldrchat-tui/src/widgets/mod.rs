//! Widgets for the chat screen.

mod header;
mod input_bar;
mod sidebar;
mod status_bar;
mod transcript;

pub use header::{Header, TITLE};
pub use input_bar::{InputBar, TextInputState, PLACEHOLDER};
pub use sidebar::{Sidebar, SIDEBAR_ENTRIES};
pub use status_bar::{KeyHint, StatusBar, CHAT_HINTS};
pub use transcript::{TranscriptState, TranscriptView, EMPTY_HINT, TYPING_TEXT};
