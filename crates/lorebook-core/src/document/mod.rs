//! Rich-content document model
//!
//! A document is an ordered list of blocks serialized as a JSON object with a
//! `blocks` array. The model accepts any block `type`: recognition happens in
//! [`BlockData::from_block`], so documents written before a block type existed
//! still load.
//!
//! Parsing is lenient below the top level: a mistyped `time`, `version` or
//! block `id` is dropped, and a block without a string `type` is kept as a
//! typeless block instead of failing the whole document. Only a missing or
//! non-array `blocks` field is a shape error.

mod blocks;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub use blocks::{
    BlockData, BlockError, CodeData, HeaderData, ImageData, ImageFile, ListData, ListStyle,
    ParagraphData, QuoteData, TableData,
};

/// Errors produced when reading a serialized document
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The text is not JSON at all (legacy plain-text content lands here)
    #[error("document is not valid JSON: {0}")]
    Syntax(#[source] serde_json::Error),
    /// Valid JSON that does not have the document shape
    #[error("JSON does not describe a document: {0}")]
    Shape(#[source] serde_json::Error),
}

/// An ordered sequence of blocks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Save timestamp (milliseconds) written by the editor, if any
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub time: Option<i64>,
    pub blocks: Vec<Block>,
    /// Editor version that produced the document, if any
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<String>,
}

/// Metadata field that reads as `None` when it has the wrong JSON type
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// One unit of authored content
///
/// `data` is kept as raw JSON so unknown or partially-formed blocks survive a
/// load/save cycle untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    /// Render-list key only; carries no meaning
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Empty for a block stored without a string `type`
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub kind: String,
    pub data: Value,
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(match raw {
            Value::Object(fields) => Self::from_fields(fields),
            _ => Self::new(String::new(), Value::Null),
        })
    }
}

impl Block {
    pub fn new(kind: impl Into<String>, data: Value) -> Self {
        Self {
            id: None,
            kind: kind.into(),
            data,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    fn from_fields(mut fields: Map<String, Value>) -> Self {
        // Numeric ids still serve as render keys
        let id = match fields.remove("id") {
            Some(Value::String(id)) => Some(id),
            Some(Value::Number(id)) => Some(id.to_string()),
            _ => None,
        };
        let kind = match fields.remove("type") {
            Some(Value::String(kind)) => kind,
            _ => String::new(),
        };
        Self {
            id,
            kind,
            data: fields.remove("data").unwrap_or(Value::Null),
        }
    }

    /// Whether the block was stored without a usable `type`
    pub fn is_typeless(&self) -> bool {
        self.kind.is_empty()
    }

    /// Interpret this block's data for its type
    pub fn parse_data(&self) -> Result<BlockData, BlockError> {
        BlockData::from_block(self)
    }
}

impl Document {
    /// A new, block-free document
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self {
            blocks,
            ..Self::default()
        }
    }

    /// Parse the transport form of a document
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_str(text).map_err(DocumentError::Syntax)?;
        Self::from_value(value)
    }

    /// Interpret an already-decoded JSON value as a document
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        serde_json::from_value(value).map_err(DocumentError::Shape)
    }

    /// Serialize to the transport form
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Check whether `text` is a well-formed document without keeping it
    pub fn is_well_formed(text: &str) -> bool {
        Self::parse(text).is_ok()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }
}

/// True when there is no document at all or it has no blocks
pub fn is_blank(document: Option<&Document>) -> bool {
    document.map_or(true, Document::is_empty)
}
