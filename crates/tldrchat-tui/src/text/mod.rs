//! Text rendering utilities.
//!
//! - [`MarkdownRender`] / [`CmarkRenderer`] turn reply text into styled lines
//! - [`MarkdownStyles`] maps markdown elements to theme styles
//! - [`wrap_lines`] wraps styled lines to a width
//! - [`visual_width`], [`truncate_to_width`] measure terminal cells

mod markdown;
mod styles;
mod width;
mod wrap;

pub use markdown::{render_markdown, CmarkRenderer, MarkdownRender};
pub use styles::MarkdownStyles;
pub use width::{truncate_to_width, visual_width};
pub use wrap::wrap_lines;
