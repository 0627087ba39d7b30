//! Attachment tracking and reclamation
//!
//! Image blocks reference objects in an external bucket. When an edit drops
//! an image, the object it pointed at becomes garbage; this module finds those
//! objects and deletes the ones that live on the owned storage domain.

mod domain;
mod extract;
mod reclaim;
mod storage;

use std::sync::Arc;

pub use domain::OwnedDomain;
pub use extract::{referenced_attachments, referenced_attachments_in, AttachmentSet};
pub use reclaim::{
    reclaim_after_save, AttachmentReclaimer, DeletionOutcome, DeletionResult, ReclaimPlan,
    ReclaimReport,
};
pub use storage::{HttpStorageClient, StorageClient, StorageError};

use crate::config::StorageConfig;

impl AttachmentReclaimer {
    /// Reclaimer backed by the configured HTTP storage endpoint
    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        let storage = HttpStorageClient::from_config(config)?;
        Ok(Self::new(Arc::new(storage), config.owned_domain()))
    }
}
