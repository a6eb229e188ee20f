use std::fmt::Write as _;

use crate::domain::blocks::{Block, RichTextSegment, TableRow};

use super::escape::escape_html;
use super::rich_text::{render_rich_text, render_segment};

pub const DEFAULT_MAX_DEPTH: u32 = 32;
pub const TRUNCATED_MARKER: &str = r#"<div class="nb-truncated">Content nested too deeply</div>"#;
const DEFAULT_CODE_LANGUAGE: &str = "plain text";
const DEFAULT_CALLOUT_ICON: &str = "💡";

/// Observations collected while rendering, consumed by the article renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub blocks: usize,
    pub truncated: usize,
    pub contains_code: bool,
    pub unsupported_kinds: Vec<String>,
}

/// Turns one block, and its descendants, into HTML. Never fails.
#[derive(Debug, Clone, Copy)]
pub struct BlockRenderer {
    max_depth: u32,
    escape_code: bool,
}

impl Default for BlockRenderer {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            escape_code: false,
        }
    }
}

impl BlockRenderer {
    pub fn new(max_depth: u32, escape_code: bool) -> Self {
        Self {
            max_depth: max_depth.max(1),
            escape_code,
        }
    }

    /// Render a single block. `None` renders as the empty string.
    pub fn render(&self, block: Option<&Block>) -> String {
        let mut stats = RenderStats::default();
        block
            .map(|block| self.render_block(block, 0, &mut stats))
            .unwrap_or_default()
    }

    /// Render a block at `depth`, recording what was seen into `stats`.
    pub fn render_block(&self, block: &Block, depth: u32, stats: &mut RenderStats) -> String {
        stats.blocks += 1;

        match block {
            Block::Paragraph { rich_text } => {
                format!(r#"<p class="nb-paragraph">{}</p>"#, render_rich_text(rich_text))
            }
            Block::Heading { level, rich_text } => {
                let tag = level.tag();
                format!(
                    r#"<{tag} class="nb-heading">{}</{tag}>"#,
                    render_rich_text(rich_text)
                )
            }
            Block::BulletedListItem { rich_text } | Block::NumberedListItem { rich_text } => {
                format!(r#"<li class="nb-list-item">{}</li>"#, render_rich_text(rich_text))
            }
            Block::ToDo { rich_text, checked } => render_todo(rich_text, *checked),
            Block::Toggle {
                rich_text,
                children,
            } => {
                let body = if depth >= self.max_depth {
                    stats.truncated += 1;
                    TRUNCATED_MARKER.to_string()
                } else {
                    children
                        .iter()
                        .map(|child| self.render_block(child, depth + 1, stats))
                        .collect()
                };
                format!(
                    r#"<details class="nb-toggle"><summary class="nb-toggle__summary">{}</summary><div class="nb-toggle__body">{body}</div></details>"#,
                    render_rich_text(rich_text)
                )
            }
            Block::Code {
                rich_text,
                language,
            } => {
                stats.contains_code = true;
                self.render_code(rich_text, language.as_deref())
            }
            Block::Quote { rich_text } => format!(
                r#"<blockquote class="nb-quote">{}</blockquote>"#,
                render_rich_text(rich_text)
            ),
            Block::Divider => r#"<hr class="nb-divider" />"#.to_string(),
            Block::Image { source, caption } => {
                let caption = first_plain_text(caption)
                    .map(escape_html)
                    .unwrap_or_default();
                let figcaption = if caption.is_empty() {
                    String::new()
                } else {
                    format!("<figcaption>{caption}</figcaption>")
                };
                format!(
                    r#"<figure class="nb-image"><img src="{}" alt="{caption}" loading="lazy" />{figcaption}</figure>"#,
                    escape_html(source.url())
                )
            }
            Block::Video { source } => format!(
                r#"<div class="nb-video"><video src="{}" controls></video></div>"#,
                escape_html(source.url())
            ),
            Block::Callout { rich_text, icon } => format!(
                r#"<div class="nb-callout"><div class="nb-callout__icon">{}</div><div class="nb-callout__body">{}</div></div>"#,
                escape_html(icon.as_deref().unwrap_or(DEFAULT_CALLOUT_ICON)),
                render_rich_text(rich_text)
            ),
            Block::Table {
                has_column_header,
                rows,
            } => render_table(rows, *has_column_header),
            Block::Unsupported { kind } => {
                stats.unsupported_kinds.push(kind.clone());
                format!(
                    r#"<div class="nb-unsupported">Unsupported block: {}</div>"#,
                    escape_html(kind)
                )
            }
        }
    }

    fn render_code(&self, rich_text: &[RichTextSegment], language: Option<&str>) -> String {
        let raw = first_plain_text(rich_text).unwrap_or_default();
        let text = if self.escape_code {
            escape_html(raw)
        } else {
            raw.to_string()
        };
        format!(
            r#"<pre class="nb-code"><code class="language-{}">{text}</code></pre>"#,
            escape_html(language.unwrap_or(DEFAULT_CODE_LANGUAGE))
        )
    }
}

fn render_todo(rich_text: &[RichTextSegment], checked: bool) -> String {
    let (checked_attr, done_class) = if checked {
        ("checked ", " nb-todo__text--done")
    } else {
        ("", "")
    };
    format!(
        r#"<div class="nb-todo"><input type="checkbox" class="nb-todo__box" {checked_attr}disabled /><span class="nb-todo__text{done_class}">{}</span></div>"#,
        render_rich_text(rich_text)
    )
}

fn render_table(rows: &[TableRow], has_column_header: bool) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let mut html = String::from(r#"<div class="nb-table"><table>"#);
    for (index, row) in rows.iter().enumerate() {
        let cell_tag = if has_column_header && index == 0 {
            "th"
        } else {
            "td"
        };
        html.push_str("<tr>");
        for cell in &row.cells {
            let text: String = cell.iter().map(render_segment).collect();
            let _ = write!(html, "<{cell_tag}>{text}</{cell_tag}>");
        }
        html.push_str("</tr>");
    }
    html.push_str("</table></div>");
    html
}

fn first_plain_text(segments: &[RichTextSegment]) -> Option<&str> {
    segments.first().map(|segment| segment.plain_text.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::blocks::{Annotations, HeadingLevel, MediaSource};

    fn text(value: &str) -> Vec<RichTextSegment> {
        vec![RichTextSegment::plain(value)]
    }

    fn render(block: Block) -> String {
        BlockRenderer::default().render(Some(&block))
    }

    fn nested_toggles(levels: usize) -> Block {
        let mut block = Block::Paragraph {
            rich_text: text("leaf"),
        };
        for _ in 0..levels {
            block = Block::Toggle {
                rich_text: text("t"),
                children: vec![block],
            };
        }
        block
    }

    #[test]
    fn absent_block_renders_empty() {
        assert_eq!(BlockRenderer::default().render(None), "");
    }

    #[test]
    fn paragraph_with_bold_segment() {
        let block = Block::Paragraph {
            rich_text: vec![RichTextSegment::plain("Hi").with_annotations(Annotations {
                bold: true,
                ..Annotations::default()
            })],
        };
        assert_eq!(
            render(block),
            r#"<p class="nb-paragraph"><strong>Hi</strong></p>"#
        );
    }

    #[test]
    fn headings_use_their_level_tag() {
        let block = Block::Heading {
            level: HeadingLevel::Two,
            rich_text: text("Title"),
        };
        assert_eq!(render(block), r#"<h2 class="nb-heading">Title</h2>"#);
    }

    #[test]
    fn list_items_render_without_container() {
        let html = render(Block::NumberedListItem {
            rich_text: text("one"),
        });
        assert_eq!(html, r#"<li class="nb-list-item">one</li>"#);
    }

    #[test]
    fn checked_todo_is_marked_done() {
        let html = render(Block::ToDo {
            rich_text: text("ship"),
            checked: true,
        });
        assert_eq!(
            html,
            r#"<div class="nb-todo"><input type="checkbox" class="nb-todo__box" checked disabled /><span class="nb-todo__text nb-todo__text--done">ship</span></div>"#
        );
    }

    #[test]
    fn unchecked_todo_has_no_checked_attribute() {
        let html = render(Block::ToDo {
            rich_text: text("later"),
            checked: false,
        });
        assert!(!html.contains("checked"));
        assert!(!html.contains("--done"));
    }

    #[test]
    fn toggle_renders_children_in_body() {
        let html = render(Block::Toggle {
            rich_text: text("More"),
            children: vec![
                Block::Paragraph {
                    rich_text: text("a"),
                },
                Block::Paragraph {
                    rich_text: text("b"),
                },
            ],
        });
        assert_eq!(
            html,
            r#"<details class="nb-toggle"><summary class="nb-toggle__summary">More</summary><div class="nb-toggle__body"><p class="nb-paragraph">a</p><p class="nb-paragraph">b</p></div></details>"#
        );
    }

    #[test]
    fn code_block_defaults_language_and_keeps_first_segment_raw() {
        let html = render(Block::Code {
            rich_text: vec![
                RichTextSegment::plain("<b>x</b>"),
                RichTextSegment::plain("ignored"),
            ],
            language: None,
        });
        assert_eq!(
            html,
            r#"<pre class="nb-code"><code class="language-plain text"><b>x</b></code></pre>"#
        );
    }

    #[test]
    fn code_block_escapes_when_enabled() {
        let renderer = BlockRenderer::new(DEFAULT_MAX_DEPTH, true);
        let html = renderer.render(Some(&Block::Code {
            rich_text: text("a < b"),
            language: Some("rust".to_string()),
        }));
        assert_eq!(
            html,
            r#"<pre class="nb-code"><code class="language-rust">a &lt; b</code></pre>"#
        );
    }

    #[test]
    fn empty_code_block_is_empty() {
        let html = render(Block::Code {
            rich_text: vec![],
            language: Some("js".to_string()),
        });
        assert_eq!(
            html,
            r#"<pre class="nb-code"><code class="language-js"></code></pre>"#
        );
    }

    #[test]
    fn image_without_caption_omits_figcaption() {
        let html = render(Block::Image {
            source: MediaSource {
                file_url: None,
                external_url: Some("https://cdn.example/a.png".to_string()),
            },
            caption: vec![],
        });
        assert_eq!(
            html,
            r#"<figure class="nb-image"><img src="https://cdn.example/a.png" alt="" loading="lazy" /></figure>"#
        );
    }

    #[test]
    fn image_caption_is_escaped_in_both_places() {
        let html = render(Block::Image {
            source: MediaSource::default(),
            caption: text(r#"a "quoted" cap"#),
        });
        assert!(html.contains(r#"alt="a &quot;quoted&quot; cap""#));
        assert!(html.contains("<figcaption>a &quot;quoted&quot; cap</figcaption>"));
        assert!(html.contains(r#"src="""#));
    }

    #[test]
    fn video_uses_resolved_url() {
        let html = render(Block::Video {
            source: MediaSource {
                file_url: Some("https://files.example/v.mp4".to_string()),
                external_url: Some("https://other.example/v.mp4".to_string()),
            },
        });
        assert_eq!(
            html,
            r#"<div class="nb-video"><video src="https://files.example/v.mp4" controls></video></div>"#
        );
    }

    #[test]
    fn callout_defaults_icon() {
        let html = render(Block::Callout {
            rich_text: text("Note"),
            icon: None,
        });
        assert_eq!(
            html,
            r#"<div class="nb-callout"><div class="nb-callout__icon">💡</div><div class="nb-callout__body">Note</div></div>"#
        );
    }

    #[test]
    fn table_with_header_row() {
        let html = render(Block::Table {
            has_column_header: true,
            rows: vec![
                TableRow {
                    cells: vec![text("A"), text("B")],
                },
                TableRow {
                    cells: vec![text("1"), text("2")],
                },
            ],
        });
        assert_eq!(
            html,
            r#"<div class="nb-table"><table><tr><th>A</th><th>B</th></tr><tr><td>1</td><td>2</td></tr></table></div>"#
        );
    }

    #[test]
    fn table_without_rows_renders_nothing() {
        let html = render(Block::Table {
            has_column_header: true,
            rows: vec![],
        });
        assert_eq!(html, "");
    }

    #[test]
    fn unsupported_kind_is_named_and_escaped() {
        let mut stats = RenderStats::default();
        let html = BlockRenderer::default().render_block(
            &Block::Unsupported {
                kind: "<embed>".to_string(),
            },
            0,
            &mut stats,
        );
        assert_eq!(
            html,
            r#"<div class="nb-unsupported">Unsupported block: &lt;embed&gt;</div>"#
        );
        assert_eq!(stats.unsupported_kinds, vec!["<embed>".to_string()]);
    }

    #[test]
    fn nesting_beyond_max_depth_is_truncated() {
        let renderer = BlockRenderer::new(2, false);
        let mut stats = RenderStats::default();
        let html = renderer.render_block(&nested_toggles(3), 0, &mut stats);

        assert_eq!(html.matches("<details").count(), 3);
        assert!(html.contains(TRUNCATED_MARKER));
        assert!(!html.contains("leaf"));
        assert_eq!(stats.truncated, 1);
    }

    #[test]
    fn nesting_within_max_depth_renders_fully() {
        let renderer = BlockRenderer::new(3, false);
        let html = renderer.render(Some(&nested_toggles(3)));

        assert!(html.contains("leaf"));
        assert!(!html.contains(TRUNCATED_MARKER));
    }

    #[test]
    fn very_deep_nesting_does_not_overflow() {
        let html = BlockRenderer::default().render(Some(&nested_toggles(500)));
        assert!(html.contains(TRUNCATED_MARKER));
    }
}
