//! Presentation tree produced by the block renderer

use serde::Serialize;

use super::inline::Inline;
use crate::document::ListStyle;

/// Rendered output for a whole document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "blocks", rename_all = "snake_case")]
pub enum Rendered {
    /// No document, or a document without blocks
    Empty,
    Blocks(Vec<RenderedBlock>),
}

impl Rendered {
    pub fn is_empty(&self) -> bool {
        matches!(self, Rendered::Empty)
    }

    pub fn blocks(&self) -> &[RenderedBlock] {
        match self {
            Rendered::Empty => &[],
            Rendered::Blocks(blocks) => blocks,
        }
    }
}

/// One visual unit, keyed for list stability
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedBlock {
    pub key: String,
    pub node: RenderNode,
}

/// Heading rank with independent styling per level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HeadingRank {
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
}

impl HeadingRank {
    /// Look up the rank for a header level; anything outside 1-6 has none
    pub fn from_level(level: i64) -> Option<Self> {
        match level {
            1 => Some(HeadingRank::H1),
            2 => Some(HeadingRank::H2),
            3 => Some(HeadingRank::H3),
            4 => Some(HeadingRank::H4),
            5 => Some(HeadingRank::H5),
            6 => Some(HeadingRank::H6),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            HeadingRank::H1 => "h1",
            HeadingRank::H2 => "h2",
            HeadingRank::H3 => "h3",
            HeadingRank::H4 => "h4",
            HeadingRank::H5 => "h5",
            HeadingRank::H6 => "h6",
        }
    }
}

/// List presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Numbered,
    Bulleted,
}

impl From<ListStyle> for ListKind {
    fn from(style: ListStyle) -> Self {
        match style {
            ListStyle::Ordered => ListKind::Numbered,
            ListStyle::Unordered => ListKind::Bulleted,
        }
    }
}

/// A table row; only row 0 is a header row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub header: bool,
    pub cells: Vec<Vec<Inline>>,
}

/// An embedded image with independent layout modifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageView {
    pub url: String,
    pub caption: Option<Vec<Inline>>,
    pub stretched: bool,
    pub with_border: bool,
    pub with_background: bool,
}

/// Block-level presentation nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderNode {
    Heading {
        rank: HeadingRank,
        content: Vec<Inline>,
    },
    Paragraph {
        content: Vec<Inline>,
    },
    List {
        kind: ListKind,
        items: Vec<Vec<Inline>>,
    },
    Quote {
        text: Vec<Inline>,
        caption: Option<Vec<Inline>>,
    },
    Delimiter,
    /// Literal code, never interpreted as markup
    Code {
        code: String,
    },
    Table {
        rows: Vec<TableRow>,
    },
    Image(ImageView),
    /// Visible stand-in for a block that could not be rendered
    Unsupported {
        block_type: String,
    },
}

impl RenderNode {
    pub fn unsupported(block_type: impl Into<String>) -> Self {
        RenderNode::Unsupported {
            block_type: block_type.into(),
        }
    }

    /// Label shown for an unsupported block
    pub fn placeholder_label(block_type: &str) -> String {
        if block_type.is_empty() {
            return String::from("Unsupported block");
        }
        format!("Unsupported block: {}", block_type)
    }
}
