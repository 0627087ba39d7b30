//! Attachment extraction
//!
//! Collects the image URLs a document references. Only `image` blocks count.
//! Extraction reads `data.file.url` directly rather than requiring the whole
//! image schema to parse, so an image block with a malformed caption still
//! protects its file from reclamation. URLs are trimmed once here, so the set
//! difference, the domain check and the deletion all see the same string.

use std::collections::BTreeSet;

use tracing::debug;

use crate::document::{Block, Document};

/// Set of attachment URLs referenced by a document
pub type AttachmentSet = BTreeSet<String>;

/// URLs referenced by the document's image blocks
pub fn referenced_attachments(document: &Document) -> AttachmentSet {
    document
        .blocks
        .iter()
        .filter_map(image_url)
        .map(str::to_string)
        .collect()
}

/// URLs referenced by a serialized document
///
/// Text that is not a document (legacy plain-text content) references nothing.
pub fn referenced_attachments_in(serialized: &str) -> AttachmentSet {
    match Document::parse(serialized) {
        Ok(document) => referenced_attachments(&document),
        Err(e) => {
            debug!("No attachments extracted from unparseable content: {}", e);
            AttachmentSet::new()
        }
    }
}

fn image_url(block: &Block) -> Option<&str> {
    if block.kind != "image" {
        return None;
    }
    block
        .data
        .pointer("/file/url")
        .and_then(|url| url.as_str())
        .map(str::trim)
        .filter(|url| !url.is_empty())
}
