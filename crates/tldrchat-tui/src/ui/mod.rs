//! Layout helpers.

pub mod layout;

pub use layout::{centered_fixed, chat_layout, ChatLayout, MIN_HEIGHT, MIN_WIDTH};
