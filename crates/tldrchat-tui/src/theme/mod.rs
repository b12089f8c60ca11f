//! Color palettes for the TUI.
//!
//! [`Theme`] holds the Catppuccin Mocha (dark) and Latte (light) palettes;
//! [`Theme::for_name`] maps the configured [`ThemeName`] onto one of them.
//!
//! [`ThemeName`]: tldrchat_engine::ThemeName

mod colors;

pub use colors::Theme;
