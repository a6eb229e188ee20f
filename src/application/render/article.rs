use std::time::Instant;

use ammonia::Builder as AmmoniaBuilder;
use metrics::{counter, histogram};
use tracing::debug;

use crate::config::RenderSettings;
use crate::domain::blocks::Block;

use super::blocks::{BlockRenderer, RenderStats};
use super::sanitizer::build_article_sanitizer;

const METRIC_RENDER_UNSUPPORTED: &str = "tintero_render_unsupported_blocks_total";
const METRIC_RENDER_TRUNCATED: &str = "tintero_render_truncated_total";
const METRIC_RENDER_MS: &str = "tintero_render_ms";

/// HTML for a whole article body plus what the renderer observed on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArticle {
    pub html: String,
    pub block_count: usize,
    pub contains_code: bool,
    pub truncated: usize,
    pub unsupported_kinds: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Bulleted,
    Numbered,
}

impl ListKind {
    fn of(block: &Block) -> Option<Self> {
        match block {
            Block::BulletedListItem { .. } => Some(ListKind::Bulleted),
            Block::NumberedListItem { .. } => Some(ListKind::Numbered),
            _ => None,
        }
    }

    fn open(self) -> &'static str {
        match self {
            ListKind::Bulleted => r#"<ul class="nb-list">"#,
            ListKind::Numbered => r#"<ol class="nb-list">"#,
        }
    }

    fn close(self) -> &'static str {
        match self {
            ListKind::Bulleted => "</ul>",
            ListKind::Numbered => "</ol>",
        }
    }
}

/// Renders sibling blocks, grouping list runs and optionally sanitising the result.
pub struct ArticleRenderer {
    blocks: BlockRenderer,
    sanitizer: Option<AmmoniaBuilder<'static>>,
}

impl Default for ArticleRenderer {
    fn default() -> Self {
        Self::new(BlockRenderer::default(), true)
    }
}

impl ArticleRenderer {
    pub fn new(blocks: BlockRenderer, sanitize: bool) -> Self {
        Self {
            blocks,
            sanitizer: sanitize.then(build_article_sanitizer),
        }
    }

    pub fn from_settings(settings: &RenderSettings) -> Self {
        Self::new(
            BlockRenderer::new(settings.max_depth.get(), settings.escape_code_blocks),
            settings.sanitize,
        )
    }

    pub fn render(&self, blocks: &[Block]) -> RenderedArticle {
        let started_at = Instant::now();
        let mut stats = RenderStats::default();
        let mut html = String::new();
        let mut open_list: Option<ListKind> = None;

        for block in blocks {
            let kind = ListKind::of(block);
            if open_list != kind {
                if let Some(previous) = open_list {
                    html.push_str(previous.close());
                }
                if let Some(next) = kind {
                    html.push_str(next.open());
                }
                open_list = kind;
            }
            html.push_str(&self.blocks.render_block(block, 0, &mut stats));
        }
        if let Some(previous) = open_list {
            html.push_str(previous.close());
        }

        let html = match self.sanitizer.as_ref() {
            Some(sanitizer) => sanitizer.clean(&html).to_string(),
            None => html,
        };

        for kind in &stats.unsupported_kinds {
            counter!(METRIC_RENDER_UNSUPPORTED, "kind" => kind.clone()).increment(1);
        }
        if stats.truncated > 0 {
            counter!(METRIC_RENDER_TRUNCATED).increment(stats.truncated as u64);
        }
        histogram!(METRIC_RENDER_MS).record(started_at.elapsed().as_secs_f64() * 1000.0);

        debug!(
            blocks = stats.blocks,
            truncated = stats.truncated,
            unsupported = stats.unsupported_kinds.len(),
            "Rendered article body"
        );

        RenderedArticle {
            html,
            block_count: stats.blocks,
            contains_code: stats.contains_code,
            truncated: stats.truncated,
            unsupported_kinds: stats.unsupported_kinds,
        }
    }
}
