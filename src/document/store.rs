//! Narrow contracts toward the external collaborators.
//!
//! The core never performs I/O; persistence and authority transmission
//! plug in behind these types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::FiscalDocument;
use crate::core::AccessKey;

/// Persistence failures surfaced to the core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("document '{0}' not found")]
    NotFound(String),

    /// Optimistic-lock failure: the stored version moved past the one
    /// being saved.
    #[error("version conflict on '{id}': stored {stored}, saving {saving}")]
    VersionConflict { id: String, stored: u64, saving: u64 },
}

/// Persistence collaborator. Implementations compare the document's
/// `version` counter before writing and call
/// [`FiscalDocument::bump_version`] on success.
pub trait DocumentStore {
    fn load(&self, id: &str) -> Result<FiscalDocument, StoreError>;
    fn save(&mut self, document: &mut FiscalDocument) -> Result<(), StoreError>;
}

/// Outcome returned by the tax-authority transmission collaborator,
/// consumed by [`FiscalDocument::apply_outcome`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthorityOutcome {
    Authorized {
        access_key: AccessKey,
        protocol: String,
    },
    Rejected {
        code: String,
        reason: String,
    },
}
