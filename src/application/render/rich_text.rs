use crate::domain::blocks::{Color, RichTextSegment};

use super::escape::escape_html;

/// Render a rich-text sequence as inline HTML, segments joined without separator.
pub fn render_rich_text(segments: &[RichTextSegment]) -> String {
    segments.iter().map(render_segment).collect()
}

/// Render one segment: escape first, then wrap.
///
/// Nesting is fixed, outermost first: link, color, bold, italic,
/// strikethrough, underline, code.
pub fn render_segment(segment: &RichTextSegment) -> String {
    let mut html = escape_html(&segment.plain_text);

    let Some(annotations) = segment.annotations.as_ref() else {
        return html;
    };

    if annotations.code {
        html = format!(r#"<code class="nb-inline-code">{html}</code>"#);
    }
    if annotations.underline {
        html = format!("<u>{html}</u>");
    }
    if annotations.strikethrough {
        html = format!("<del>{html}</del>");
    }
    if annotations.italic {
        html = format!("<em>{html}</em>");
    }
    if annotations.bold {
        html = format!("<strong>{html}</strong>");
    }
    if annotations.color != Color::Default {
        html = format!(
            r#"<span class="nb-color-{}">{html}</span>"#,
            annotations.color.css_name()
        );
    }

    if let Some(href) = segment.href.as_deref() {
        html = format!(
            r#"<a href="{}" target="_blank" rel="noopener noreferrer">{html}</a>"#,
            escape_html(href)
        );
    }

    html
}
