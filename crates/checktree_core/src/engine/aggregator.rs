//! Bottom-up status aggregation.
//!
//! # Responsibility
//! - Derive every non-leaf node's status from its children, post-order.
//! - Persist each node whose stored status disagrees with the derived one.
//!
//! # Invariants
//! - `Unmarked` nodes never count toward a group and never get a real status.
//! - A group without real checkboxes has no aggregate status.
//! - A node whose children yield no aggregate keeps its own status.

use crate::document::CheckboxWriter;
use crate::engine::EngineResult;
use crate::model::checkbox::{CheckboxStatus, NodeId};
use crate::model::forest::CheckboxForest;
use log::debug;

/// Per-group status buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusTally {
    /// Members that carry a real checkbox.
    pub total: usize,
    pub off: usize,
    pub on: usize,
    pub intermediate: usize,
}

impl StatusTally {
    /// Records one member given its stored and derived statuses.
    pub fn record(&mut self, stored: CheckboxStatus, derived: CheckboxStatus) {
        if stored.is_checkbox() {
            self.total += 1;
        }
        match derived {
            CheckboxStatus::Off => self.off += 1,
            CheckboxStatus::On => self.on += 1,
            CheckboxStatus::Intermediate => self.intermediate += 1,
            CheckboxStatus::Unmarked => {}
        }
    }

    /// Status the group implies for its parent, if any.
    pub fn resolve(&self) -> Option<CheckboxStatus> {
        if self.total == 0 {
            None
        } else if self.off == self.total {
            Some(CheckboxStatus::Off)
        } else if self.on == self.total {
            Some(CheckboxStatus::On)
        } else if self.on != 0 || self.intermediate != 0 {
            Some(CheckboxStatus::Intermediate)
        } else {
            None
        }
    }
}

/// Runs the post-order aggregation and counts the status writes it makes.
pub struct StatusAggregator<'w, W: CheckboxWriter + ?Sized> {
    writer: &'w mut W,
    writes: usize,
}

impl<'w, W: CheckboxWriter + ?Sized> StatusAggregator<'w, W> {
    pub fn new(writer: &'w mut W) -> Self {
        Self { writer, writes: 0 }
    }

    /// Number of `write_checkbox` calls made so far.
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Aggregates the whole forest starting from its outermost group.
    pub fn aggregate_forest(
        &mut self,
        forest: &mut CheckboxForest,
    ) -> EngineResult<Option<CheckboxStatus>> {
        let roots = forest.roots().to_vec();
        self.aggregate(forest, &roots)
    }

    /// Aggregates one sibling group, recursing into children first.
    pub fn aggregate(
        &mut self,
        forest: &mut CheckboxForest,
        group: &[NodeId],
    ) -> EngineResult<Option<CheckboxStatus>> {
        let mut tally = StatusTally::default();

        for id in group {
            let stored = forest[*id].status;
            let children = forest[*id].children.clone();

            let mut derived = if children.is_empty() {
                stored
            } else {
                // Why: children that are all plain items carry no status, so the
                // node's own mark is the only state left to count.
                self.aggregate(forest, &children)?.unwrap_or(stored)
            };
            if !stored.is_checkbox() {
                derived = CheckboxStatus::Unmarked;
            }
            tally.record(stored, derived);

            if derived.is_checkbox() && derived != stored {
                forest[*id].status = derived;
                self.writer.write_checkbox(&forest[*id])?;
                self.writes += 1;
                debug!(
                    "event=status_derived module=engine status=ok line={} from={} to={}",
                    forest[*id].line, stored, derived
                );
            }
        }

        Ok(tally.resolve())
    }
}
