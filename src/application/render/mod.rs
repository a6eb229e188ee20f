//! Block rendering pipeline.
//!
//! Rendering is pure and never fails: malformed input has already been
//! normalised into [`crate::domain::blocks::Block`] at the boundary, and every
//! block kind, known or not, maps to some markup. Layers, leaves first:
//! HTML escaping, rich text, single blocks, then whole articles (list
//! grouping, sanitisation, metrics).

mod article;
mod blocks;
mod escape;
mod rich_text;
mod sanitizer;

pub use article::{ArticleRenderer, RenderedArticle};
pub use blocks::{BlockRenderer, DEFAULT_MAX_DEPTH, RenderStats, TRUNCATED_MARKER};
pub use escape::escape_html;
pub use rich_text::{render_rich_text, render_segment};
