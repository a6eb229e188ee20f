use std::collections::HashSet;

use ammonia::Builder as AmmoniaBuilder;

/// Sanitiser allowing the markup produced by the block renderer and nothing else.
pub(crate) fn build_article_sanitizer() -> AmmoniaBuilder<'static> {
    let mut builder = AmmoniaBuilder::default();

    let tags: HashSet<&'static str> = HashSet::from([
        "a",
        "blockquote",
        "code",
        "del",
        "details",
        "div",
        "em",
        "figcaption",
        "figure",
        "h1",
        "h2",
        "h3",
        "hr",
        "img",
        "input",
        "li",
        "ol",
        "p",
        "pre",
        "span",
        "strong",
        "summary",
        "table",
        "tbody",
        "td",
        "th",
        "tr",
        "u",
        "ul",
        "video",
    ]);
    builder.tags(tags);

    builder.generic_attributes(HashSet::from(["class"]));
    builder.add_tag_attributes("a", &["target"]);
    builder.add_tag_attributes("img", &["alt", "loading"]);
    builder.add_tag_attributes("video", &["src", "controls"]);
    builder.add_tag_attributes("input", &["type", "checked", "disabled"]);

    builder.add_url_schemes(["http", "https", "mailto", "tel"].iter().copied());

    builder
}
