//! Content blocks as delivered by the workspace content API.
//!
//! Upstream JSON is loosely typed: payload objects may be missing, fields may
//! be `null`, and new block kinds appear without notice. Parsing happens once,
//! here, into the closed [`Block`] enum. Absent fields collapse to empty
//! defaults at parse time so the renderer never inspects raw JSON.

use serde::Serialize;
use serde_json::{Map, Value};

const UNKNOWN_KIND: &str = "unknown";

/// Text and background colors a rich-text segment may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    #[default]
    Default,
    Gray,
    Brown,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
    Red,
    GrayBackground,
    BrownBackground,
    OrangeBackground,
    YellowBackground,
    GreenBackground,
    BlueBackground,
    PurpleBackground,
    PinkBackground,
    RedBackground,
}

impl Color {
    /// Parse an upstream color name. Unknown names fall back to [`Color::Default`].
    pub fn parse(value: &str) -> Self {
        match value {
            "gray" => Color::Gray,
            "brown" => Color::Brown,
            "orange" => Color::Orange,
            "yellow" => Color::Yellow,
            "green" => Color::Green,
            "blue" => Color::Blue,
            "purple" => Color::Purple,
            "pink" => Color::Pink,
            "red" => Color::Red,
            "gray_background" => Color::GrayBackground,
            "brown_background" => Color::BrownBackground,
            "orange_background" => Color::OrangeBackground,
            "yellow_background" => Color::YellowBackground,
            "green_background" => Color::GreenBackground,
            "blue_background" => Color::BlueBackground,
            "purple_background" => Color::PurpleBackground,
            "pink_background" => Color::PinkBackground,
            "red_background" => Color::RedBackground,
            _ => Color::Default,
        }
    }

    /// Class-name fragment used by the renderer (`gray-background`, `red`, ...).
    pub fn css_name(self) -> &'static str {
        match self {
            Color::Default => "default",
            Color::Gray => "gray",
            Color::Brown => "brown",
            Color::Orange => "orange",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Purple => "purple",
            Color::Pink => "pink",
            Color::Red => "red",
            Color::GrayBackground => "gray-background",
            Color::BrownBackground => "brown-background",
            Color::OrangeBackground => "orange-background",
            Color::YellowBackground => "yellow-background",
            Color::GreenBackground => "green-background",
            Color::BlueBackground => "blue-background",
            Color::PurpleBackground => "purple-background",
            Color::PinkBackground => "pink-background",
            Color::RedBackground => "red-background",
        }
    }
}

/// Inline formatting flags attached to a segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
    pub color: Color,
}

impl Annotations {
    fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            bold: bool_field(map, "bold"),
            italic: bool_field(map, "italic"),
            strikethrough: bool_field(map, "strikethrough"),
            underline: bool_field(map, "underline"),
            code: bool_field(map, "code"),
            color: map
                .get("color")
                .and_then(Value::as_str)
                .map(Color::parse)
                .unwrap_or_default(),
        }
    }
}

/// A run of text with optional formatting and an optional link target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RichTextSegment {
    pub plain_text: String,
    pub annotations: Option<Annotations>,
    pub href: Option<String>,
}

impl RichTextSegment {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            plain_text: text.into(),
            annotations: None,
            href: None,
        }
    }

    pub fn with_annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = Some(annotations);
        self
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    /// Parse a single upstream segment. Non-object input yields an empty segment.
    pub fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };

        Self {
            plain_text: map
                .get("plain_text")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            annotations: map
                .get("annotations")
                .and_then(Value::as_object)
                .map(Annotations::from_map),
            href: non_empty_str(map.get("href")),
        }
    }

    /// Parse an optional array of segments; anything that is not an array is empty.
    pub fn list_from_value(value: Option<&Value>) -> Vec<Self> {
        value
            .and_then(Value::as_array)
            .map(|items| items.iter().map(Self::from_value).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingLevel {
    One,
    Two,
    Three,
}

impl HeadingLevel {
    pub fn tag(self) -> &'static str {
        match self {
            HeadingLevel::One => "h1",
            HeadingLevel::Two => "h2",
            HeadingLevel::Three => "h3",
        }
    }
}

/// Hosted or external media reference of an image or video block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MediaSource {
    pub file_url: Option<String>,
    pub external_url: Option<String>,
}

impl MediaSource {
    /// Hosted files win over external links; no reference resolves to `""`.
    pub fn url(&self) -> &str {
        self.file_url
            .as_deref()
            .or(self.external_url.as_deref())
            .unwrap_or_default()
    }

    fn from_payload(payload: Option<&Map<String, Value>>) -> Self {
        let nested_url = |key: &str| {
            payload
                .and_then(|map| map.get(key))
                .and_then(Value::as_object)
                .and_then(|media| non_empty_str(media.get("url")))
        };

        Self {
            file_url: nested_url("file"),
            external_url: nested_url("external"),
        }
    }
}

/// One table row: an ordered sequence of cells, each a rich-text sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub cells: Vec<Vec<RichTextSegment>>,
}

impl TableRow {
    fn from_value(value: &Value) -> Self {
        let cells = value
            .get("table_row")
            .and_then(|row| row.get("cells"))
            .and_then(Value::as_array)
            .map(|cells| {
                cells
                    .iter()
                    .map(|cell| RichTextSegment::list_from_value(Some(cell)))
                    .collect()
            })
            .unwrap_or_default();
        Self { cells }
    }
}

/// A node of externally authored content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Paragraph {
        rich_text: Vec<RichTextSegment>,
    },
    Heading {
        level: HeadingLevel,
        rich_text: Vec<RichTextSegment>,
    },
    BulletedListItem {
        rich_text: Vec<RichTextSegment>,
    },
    NumberedListItem {
        rich_text: Vec<RichTextSegment>,
    },
    ToDo {
        rich_text: Vec<RichTextSegment>,
        checked: bool,
    },
    Toggle {
        rich_text: Vec<RichTextSegment>,
        children: Vec<Block>,
    },
    Code {
        rich_text: Vec<RichTextSegment>,
        language: Option<String>,
    },
    Quote {
        rich_text: Vec<RichTextSegment>,
    },
    Divider,
    Image {
        source: MediaSource,
        caption: Vec<RichTextSegment>,
    },
    Video {
        source: MediaSource,
    },
    Callout {
        rich_text: Vec<RichTextSegment>,
        icon: Option<String>,
    },
    Table {
        has_column_header: bool,
        rows: Vec<TableRow>,
    },
    Unsupported {
        kind: String,
    },
}

impl Block {
    /// Parse one upstream block. `null` means "no block"; every other value
    /// produces a block, degrading to [`Block::Unsupported`] when the kind is
    /// unknown or missing.
    pub fn from_value(value: &Value) -> Option<Self> {
        if value.is_null() {
            return None;
        }

        let Some(map) = value.as_object() else {
            return Some(Block::Unsupported {
                kind: UNKNOWN_KIND.to_string(),
            });
        };

        let kind = map
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_KIND);
        let payload = map.get(kind).and_then(Value::as_object);
        let rich_text = || RichTextSegment::list_from_value(payload.and_then(|p| p.get("rich_text")));
        let children = || {
            map.get("children")
                .map(Block::list_from_value)
                .unwrap_or_default()
        };

        let block = match kind {
            "paragraph" => Block::Paragraph {
                rich_text: rich_text(),
            },
            "heading_1" => Block::Heading {
                level: HeadingLevel::One,
                rich_text: rich_text(),
            },
            "heading_2" => Block::Heading {
                level: HeadingLevel::Two,
                rich_text: rich_text(),
            },
            "heading_3" => Block::Heading {
                level: HeadingLevel::Three,
                rich_text: rich_text(),
            },
            "bulleted_list_item" => Block::BulletedListItem {
                rich_text: rich_text(),
            },
            "numbered_list_item" => Block::NumberedListItem {
                rich_text: rich_text(),
            },
            "to_do" => Block::ToDo {
                rich_text: rich_text(),
                checked: payload.is_some_and(|p| bool_field(p, "checked")),
            },
            "toggle" => Block::Toggle {
                rich_text: rich_text(),
                children: children(),
            },
            "code" => Block::Code {
                rich_text: rich_text(),
                language: non_empty_str(payload.and_then(|p| p.get("language"))),
            },
            "quote" => Block::Quote {
                rich_text: rich_text(),
            },
            "divider" => Block::Divider,
            "image" => Block::Image {
                source: MediaSource::from_payload(payload),
                caption: RichTextSegment::list_from_value(payload.and_then(|p| p.get("caption"))),
            },
            "video" => Block::Video {
                source: MediaSource::from_payload(payload),
            },
            "callout" => Block::Callout {
                rich_text: rich_text(),
                icon: non_empty_str(
                    payload
                        .and_then(|p| p.get("icon"))
                        .and_then(|icon| icon.get("emoji")),
                ),
            },
            "table" => Block::Table {
                has_column_header: payload.is_some_and(|p| bool_field(p, "has_column_header")),
                rows: map
                    .get("children")
                    .and_then(Value::as_array)
                    .map(|rows| rows.iter().map(TableRow::from_value).collect())
                    .unwrap_or_default(),
            },
            other => Block::Unsupported {
                kind: other.to_string(),
            },
        };

        Some(block)
    }

    /// Parse an array of blocks, skipping `null` entries. Non-arrays are empty.
    pub fn list_from_value(value: &Value) -> Vec<Self> {
        value
            .as_array()
            .map(|items| items.iter().filter_map(Block::from_value).collect())
            .unwrap_or_default()
    }

    /// Blocks of a JSON document: a bare array, or an object carrying the
    /// array under `results` or `content`. Anything else yields `None`.
    pub fn list_from_document(document: &Value) -> Option<Vec<Self>> {
        match document {
            Value::Array(_) => Some(Block::list_from_value(document)),
            Value::Object(map) => map
                .get("results")
                .or_else(|| map.get("content"))
                .filter(|blocks| blocks.is_array())
                .map(Block::list_from_value),
            _ => None,
        }
    }
}

fn bool_field(map: &Map<String, Value>, key: &str) -> bool {
    map.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
