//! Guarded manual toggle.
//!
//! # Responsibility
//! - Decide whether a user flip of one checkbox is consistent with its children.
//! - Apply and persist accepted flips.
//!
//! # Invariants
//! - `Off -> On` requires no children or all children `On`.
//! - `On -> Off` requires no children or at least one child `Off`.
//! - `Intermediate` and `Unmarked` are never flipped.

use crate::document::CheckboxWriter;
use crate::engine::EngineResult;
use crate::model::checkbox::{CheckboxStatus, NodeId};
use crate::model::forest::CheckboxForest;
use log::{debug, info};
use std::fmt::{Display, Formatter};

/// Why a toggle request left the node unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleRejection {
    /// Intermediate state has no manual transition.
    Intermediate,
    /// Line has no checkbox marker.
    NotACheckbox,
    /// `Off -> On` with at least one child not `On`.
    ChildrenNotAllOn,
    /// `On -> Off` with children but none `Off`.
    NoChildOff,
}

impl ToggleRejection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Intermediate => "intermediate",
            Self::NotACheckbox => "not_a_checkbox",
            Self::ChildrenNotAllOn => "children_not_all_on",
            Self::NoChildOff => "no_child_off",
        }
    }
}

impl Display for ToggleRejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one toggle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Status flipped and persisted.
    Toggled {
        line: usize,
        from: CheckboxStatus,
        to: CheckboxStatus,
    },
    /// Guard refused the flip.
    Rejected {
        line: usize,
        reason: ToggleRejection,
    },
    /// No checkbox under the current position.
    NoCheckbox,
    /// No heading owns the current position.
    NoHeading,
}

impl ToggleOutcome {
    pub fn is_toggled(&self) -> bool {
        matches!(self, Self::Toggled { .. })
    }
}

/// Returns the status a manual toggle of `id` would produce.
pub fn check(forest: &CheckboxForest, id: NodeId) -> Result<CheckboxStatus, ToggleRejection> {
    let node = &forest[id];
    match node.status {
        CheckboxStatus::Off => {
            if !node.has_children() || forest.are_children_all(id, CheckboxStatus::On) {
                Ok(CheckboxStatus::On)
            } else {
                Err(ToggleRejection::ChildrenNotAllOn)
            }
        }
        CheckboxStatus::On => {
            if !node.has_children() || forest.is_any_child(id, CheckboxStatus::Off) {
                Ok(CheckboxStatus::Off)
            } else {
                Err(ToggleRejection::NoChildOff)
            }
        }
        CheckboxStatus::Intermediate => Err(ToggleRejection::Intermediate),
        CheckboxStatus::Unmarked => Err(ToggleRejection::NotACheckbox),
    }
}

/// Flips `id` when the guard allows it and persists the node.
pub fn toggle<W: CheckboxWriter + ?Sized>(
    forest: &mut CheckboxForest,
    id: NodeId,
    writer: &mut W,
) -> EngineResult<ToggleOutcome> {
    let line = forest[id].line;
    let from = forest[id].status;

    match check(forest, id) {
        Ok(to) => {
            forest[id].status = to;
            writer.write_checkbox(&forest[id])?;
            info!(
                "event=checkbox_toggle module=engine status=ok line={} from={} to={}",
                line, from, to
            );
            Ok(ToggleOutcome::Toggled { line, from, to })
        }
        Err(reason) => {
            debug!(
                "event=checkbox_toggle module=engine status=skip line={} checkbox={} reason={}",
                line, from, reason
            );
            Ok(ToggleOutcome::Rejected { line, reason })
        }
    }
}
