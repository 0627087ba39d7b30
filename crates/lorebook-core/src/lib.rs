//! Lorebook core library
//!
//! Rich-content documents for story-bible entries:
//! - [`document`]: the block-list format and its typed block data
//! - [`render`]: pure rendering to a presentation tree and sanitized HTML
//! - [`attachments`]: referenced-image extraction and reclamation of images
//!   an edit no longer uses
//! - [`config`]: storage configuration

pub mod attachments;
pub mod config;
pub mod document;
pub mod render;

pub use attachments::{
    referenced_attachments, referenced_attachments_in, AttachmentReclaimer, OwnedDomain,
    ReclaimReport, StorageClient,
};
pub use config::{Config, StorageConfig};
pub use document::{Block, BlockData, Document, DocumentError};
pub use render::{render, render_html, render_str, RenderNode, Rendered};
