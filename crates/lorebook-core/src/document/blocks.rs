//! Typed per-variant block data

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use super::Block;

/// A recognized block type whose `data` does not match its schema
#[derive(Debug, Error)]
#[error("malformed `{kind}` block: {source}")]
pub struct BlockError {
    pub kind: String,
    #[source]
    pub source: serde_json::Error,
}

/// Block data interpreted for its `type`
#[derive(Debug, Clone, PartialEq)]
pub enum BlockData {
    Header(HeaderData),
    Paragraph(ParagraphData),
    List(ListData),
    Quote(QuoteData),
    Delimiter,
    Code(CodeData),
    Table(TableData),
    Image(ImageData),
    /// Any `type` this crate does not know about
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HeaderData {
    /// Heading rank; only 1 through 6 are renderable
    pub level: i64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParagraphData {
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListStyle {
    Ordered,
    /// Also covers any unrecognized or missing style
    #[default]
    Unordered,
}

impl ListStyle {
    pub fn from_name(name: &str) -> Self {
        match name {
            "ordered" => ListStyle::Ordered,
            _ => ListStyle::Unordered,
        }
    }
}

impl<'de> Deserialize<'de> for ListStyle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(value.as_str().map(Self::from_name).unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListData {
    #[serde(default)]
    pub style: ListStyle,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QuoteData {
    pub text: String,
    #[serde(default)]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CodeData {
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TableData {
    /// Rows of cells; row 0 is the header row by position only
    pub content: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageFile {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageData {
    pub file: ImageFile,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub stretched: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub with_border: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub with_background: bool,
}

/// Optional flags: absent and `null` both mean off
fn null_as_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

impl BlockData {
    /// Interpret `block.data` according to `block.kind`
    ///
    /// Unknown kinds are never an error; malformed data for a known kind is.
    pub fn from_block(block: &Block) -> Result<Self, BlockError> {
        let data = match block.kind.as_str() {
            "header" => BlockData::Header(decode(block)?),
            "paragraph" => BlockData::Paragraph(decode(block)?),
            "list" => BlockData::List(decode(block)?),
            "quote" => BlockData::Quote(decode(block)?),
            "delimiter" => BlockData::Delimiter,
            "code" => BlockData::Code(decode(block)?),
            "table" => BlockData::Table(decode(block)?),
            "image" => BlockData::Image(decode(block)?),
            other => BlockData::Unknown(other.to_string()),
        };
        Ok(data)
    }
}

fn decode<T: DeserializeOwned>(block: &Block) -> Result<T, BlockError> {
    T::deserialize(&block.data).map_err(|source| BlockError {
        kind: block.kind.clone(),
        source,
    })
}
