//! Document collaborator contracts and the org outline implementation.
//!
//! # Responsibility
//! - Define the capability traits the engine uses to read and persist
//!   checkbox state.
//! - Provide one concrete host: an org-mode style outline held in memory.
//!
//! # Invariants
//! - The document owns the canonical text; forests are snapshots rebuilt
//!   from it on demand.
//! - Writes never add or remove lines, except `insert_checkbox`.

use crate::model::checkbox::{CheckboxNode, NodeId, SubtaskCounters};
use crate::model::forest::CheckboxForest;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod org;
pub mod syntax;

pub use org::{OrgDocument, OrgHeading};

pub type DocumentResult<T> = Result<T, DocumentError>;

/// Errors raised by the document collaborator.
#[derive(Debug)]
pub enum DocumentError {
    /// Line index does not exist in the document.
    LineOutOfRange { line: usize, line_count: usize },
    /// Target line is not a list item.
    NotAListItem(usize),
    /// Target line is not a heading.
    NotAHeading(usize),
    /// File read/write failure.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for DocumentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LineOutOfRange { line, line_count } => write!(
                f,
                "line {line} is out of range for a document with {line_count} lines"
            ),
            Self::NotAListItem(line) => write!(f, "line {line} is not a list item"),
            Self::NotAHeading(line) => write!(f, "line {line} is not a heading"),
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
        }
    }
}

impl Error for DocumentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Persists node-level changes back into document text.
pub trait CheckboxWriter {
    /// Rewrites the status marker on the node's line.
    fn write_checkbox(&mut self, node: &CheckboxNode) -> DocumentResult<()>;

    /// Rewrites statistics cookies on the node's line.
    ///
    /// Returns whether the line text changed.
    fn update_node_counters(
        &mut self,
        node: &CheckboxNode,
        counters: SubtaskCounters,
    ) -> DocumentResult<bool>;
}

/// Snapshot of one heading and the list items in its body.
pub trait HeadingContext {
    /// 0-based line of the heading itself.
    fn line(&self) -> usize;

    /// Builds the checkbox forest from the heading body. Idempotent.
    fn init_checkboxes(&self) -> CheckboxForest;

    /// The item at or under the current position, if any.
    fn current_checkbox(&self, forest: &CheckboxForest) -> Option<NodeId>;
}

/// Document handle passed through every engine entry point.
pub trait DocumentContext: CheckboxWriter {
    type Heading: HeadingContext;

    /// Heading that owns the current position, if any.
    fn current_heading(&self) -> Option<Self::Heading>;

    /// Rewrites statistics cookies on the heading line.
    ///
    /// Returns whether the line text changed.
    fn update_heading_counters(
        &mut self,
        heading: &Self::Heading,
        counters: SubtaskCounters,
    ) -> DocumentResult<bool>;

    /// Inserts an empty `OFF` checkbox relative to `anchor` and returns its line.
    ///
    /// Without an anchor the box goes right below the heading line.
    fn insert_checkbox(
        &mut self,
        heading: &Self::Heading,
        forest: &CheckboxForest,
        anchor: Option<NodeId>,
        place_below: bool,
    ) -> DocumentResult<usize>;
}

impl<T: CheckboxWriter + ?Sized> CheckboxWriter for &mut T {
    fn write_checkbox(&mut self, node: &CheckboxNode) -> DocumentResult<()> {
        (**self).write_checkbox(node)
    }

    fn update_node_counters(
        &mut self,
        node: &CheckboxNode,
        counters: SubtaskCounters,
    ) -> DocumentResult<bool> {
        (**self).update_node_counters(node, counters)
    }
}

impl<T: DocumentContext + ?Sized> DocumentContext for &mut T {
    type Heading = T::Heading;

    fn current_heading(&self) -> Option<Self::Heading> {
        (**self).current_heading()
    }

    fn update_heading_counters(
        &mut self,
        heading: &Self::Heading,
        counters: SubtaskCounters,
    ) -> DocumentResult<bool> {
        (**self).update_heading_counters(heading, counters)
    }

    fn insert_checkbox(
        &mut self,
        heading: &Self::Heading,
        forest: &CheckboxForest,
        anchor: Option<NodeId>,
        place_below: bool,
    ) -> DocumentResult<usize> {
        (**self).insert_checkbox(heading, forest, anchor, place_below)
    }
}
