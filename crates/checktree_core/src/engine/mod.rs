//! Checkbox propagation engine.
//!
//! # Responsibility
//! - Derive statuses bottom-up, guard manual toggles, and refresh subtask
//!   counters top-down.
//! - Expose the driver entry points hosts call after an edit.
//!
//! # Invariants
//! - Every entry point works on a forest freshly built from the document.
//! - Absence of a heading or checkbox is an outcome, never an error.

use crate::document::DocumentError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod aggregator;
pub mod counter;
pub mod driver;
pub mod toggle;

pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by engine entry points.
#[derive(Debug)]
pub enum EngineError {
    /// Document collaborator failed to persist a change.
    Document(DocumentError),
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Document(err) => write!(f, "document write failed: {err}"),
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Document(err) => Some(err),
        }
    }
}

impl From<DocumentError> for EngineError {
    fn from(value: DocumentError) -> Self {
        Self::Document(value)
    }
}
