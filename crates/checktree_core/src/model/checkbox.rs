//! Checkbox node and status model.
//!
//! # Responsibility
//! - Define the tri-state checkbox status plus the "no marker" passenger state.
//! - Define the per-node record used by aggregation, toggling and counters.
//!
//! # Invariants
//! - `CheckboxStatus::Unmarked` nodes are never assigned a real status.
//! - `CheckboxStatus::Intermediate` is only ever derived, never toggled into.

use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Arena index of one node inside a `CheckboxForest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Raw arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Completion state carried by one list line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckboxStatus {
    /// Unchecked box, `[ ]`.
    Off,
    /// Checked box, `[X]`.
    On,
    /// Partially complete box, `[-]`. Derived from mixed children.
    Intermediate,
    /// Plain list item without any checkbox marker.
    Unmarked,
}

impl CheckboxStatus {
    /// Returns whether the line carries a real checkbox marker.
    pub fn is_checkbox(self) -> bool {
        !matches!(self, Self::Unmarked)
    }

    /// Marker character written between the brackets, if any.
    pub fn marker_char(self, checked_marker: char) -> Option<char> {
        match self {
            Self::Off => Some(' '),
            Self::On => Some(checked_marker),
            Self::Intermediate => Some('-'),
            Self::Unmarked => None,
        }
    }

    /// Parses the character found between checkbox brackets.
    ///
    /// Returns `None` for characters that do not form a checkbox.
    pub fn from_marker_char(value: char) -> Option<Self> {
        match value {
            ' ' => Some(Self::Off),
            'x' | 'X' => Some(Self::On),
            '-' => Some(Self::Intermediate),
            _ => None,
        }
    }

    /// Stable lowercase name used in logs and CLI output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::On => "on",
            Self::Intermediate => "intermediate",
            Self::Unmarked => "none",
        }
    }
}

impl Display for CheckboxStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `(done, total)` summary of one sibling group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct SubtaskCounters {
    /// Members whose status is `On`.
    pub done: usize,
    /// Members that carry a real checkbox.
    pub total: usize,
}

impl SubtaskCounters {
    pub fn new(done: usize, total: usize) -> Self {
        Self { done, total }
    }

    /// Integer completion percentage; `0` for an empty group.
    pub fn percent(self) -> usize {
        if self.total == 0 {
            0
        } else {
            self.done * 100 / self.total
        }
    }
}

impl Display for SubtaskCounters {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}/{}]", self.done, self.total)
    }
}

/// One list line inside a heading's checkbox forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckboxNode {
    /// Arena id of this node.
    pub id: NodeId,
    /// 0-based document line holding the item.
    pub line: usize,
    /// Indent depth, `>= 1`.
    pub level: usize,
    /// Current status; mutated in place by the engine passes.
    pub status: CheckboxStatus,
    /// Parent node, `None` for top-level items under the heading.
    pub parent: Option<NodeId>,
    /// Children in document order.
    pub children: Vec<NodeId>,
    /// Last counters computed for this node. Only set when `children` is non-empty.
    pub counters: Option<SubtaskCounters>,
}

impl CheckboxNode {
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{CheckboxStatus, SubtaskCounters};

    #[test]
    fn marker_chars_map_both_ways() {
        for status in [
            CheckboxStatus::Off,
            CheckboxStatus::On,
            CheckboxStatus::Intermediate,
        ] {
            let marker = status.marker_char('X').expect("real status has marker");
            assert_eq!(CheckboxStatus::from_marker_char(marker), Some(status));
        }
        assert_eq!(CheckboxStatus::Unmarked.marker_char('X'), None);
        assert_eq!(
            CheckboxStatus::from_marker_char('x'),
            Some(CheckboxStatus::On)
        );
        assert_eq!(CheckboxStatus::from_marker_char('?'), None);
    }

    #[test]
    fn only_unmarked_is_not_a_checkbox() {
        assert!(CheckboxStatus::Off.is_checkbox());
        assert!(CheckboxStatus::Intermediate.is_checkbox());
        assert!(!CheckboxStatus::Unmarked.is_checkbox());
    }

    #[test]
    fn percent_handles_empty_group() {
        assert_eq!(SubtaskCounters::new(0, 0).percent(), 0);
        assert_eq!(SubtaskCounters::new(1, 3).percent(), 33);
        assert_eq!(SubtaskCounters::new(2, 2).to_string(), "[2/2]");
    }
}
