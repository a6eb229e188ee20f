//! Article and comment records served by the content API.

use serde::Serialize;
use serde_json::Value;

use super::blocks::{Block, RichTextSegment};
use super::slug::derive_slug;

/// Listing entry for an article. The slug is derived, never stored upstream.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub category: String,
    /// Upstream value as received; formatting happens at presentation time.
    pub publish_date: Value,
    pub tags: Vec<String>,
    pub author: String,
    pub seo_keywords: String,
    pub featured_image_url: String,
}

impl ArticleSummary {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            id: id.into(),
            slug: derive_slug(&title),
            title,
            category: String::new(),
            publish_date: Value::Null,
            tags: Vec::new(),
            author: String::new(),
            seo_keywords: String::new(),
            featured_image_url: String::new(),
        }
    }

    /// Parse an upstream article record. Missing fields fall back to empty
    /// values; the upstream `featuredImage` becomes `featured_image_url`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        let text = |key: &str| {
            map.get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        let tags = map
            .get("tags")
            .and_then(Value::as_array)
            .map(|tags| {
                tags.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            category: text("category"),
            publish_date: map.get("publishDate").cloned().unwrap_or(Value::Null),
            tags,
            author: text("author"),
            seo_keywords: text("seoKeywords"),
            featured_image_url: text("featuredImage"),
            ..Self::new(text("id"), text("title"))
        })
    }
}

/// A full article: summary fields, body blocks and comments.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDetail {
    #[serde(flatten)]
    pub summary: ArticleSummary,
    pub content: Vec<Block>,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub created_time: String,
    pub rich_text: Vec<RichTextSegment>,
    pub author: Option<String>,
}

impl Comment {
    /// Parse an upstream comment. Anything that is not an object yields `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        let text = |key: &str| {
            map.get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        let author = map
            .get("author")
            .and_then(Value::as_str)
            .or_else(|| {
                map.get("display_name")
                    .and_then(|name| name.get("resolved_name"))
                    .and_then(Value::as_str)
            })
            .or_else(|| {
                map.get("created_by")
                    .and_then(|user| user.get("name"))
                    .and_then(Value::as_str)
            })
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        Some(Self {
            id: text("id"),
            created_time: text("created_time"),
            rich_text: RichTextSegment::list_from_value(map.get("rich_text")),
            author,
        })
    }

    pub fn list_from_value(value: &Value) -> Vec<Self> {
        value
            .as_array()
            .map(|items| items.iter().filter_map(Comment::from_value).collect())
            .unwrap_or_default()
    }

    /// Concatenated plain text of the comment body.
    pub fn plain_text(&self) -> String {
        self.rich_text
            .iter()
            .map(|segment| segment.plain_text.as_str())
            .collect()
    }
}
