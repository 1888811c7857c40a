//! Propagation driver: the entry points hosts call after an edit.
//!
//! # Responsibility
//! - Sequence guarded toggle, status aggregation and counter refresh.
//! - Turn missing heading/checkbox context into skipped steps.
//!
//! # Invariants
//! - Every toggle request is followed by a full refresh, accepted or not.
//! - Each step rebuilds its forest from the document; nothing is cached
//!   between calls.
//! - Inserting a checkbox never triggers propagation.

use crate::document::{DocumentContext, HeadingContext};
use crate::engine::aggregator::StatusAggregator;
use crate::engine::counter::refresh_counters;
use crate::engine::toggle::{self, ToggleOutcome};
use crate::engine::EngineResult;
use crate::model::checkbox::{NodeId, SubtaskCounters};
use crate::model::forest::CheckboxForest;
use log::{debug, info};
use std::time::Instant;

/// What one refresh pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    /// Heading the pass ran under; `None` when there was no heading context.
    pub heading_line: Option<usize>,
    /// Nodes whose status was rewritten by aggregation.
    pub status_writes: usize,
    /// Counter writes issued, heading included.
    pub counter_writes: usize,
    /// Counter writes that changed document text.
    pub counters_changed: usize,
    /// Counters of the outermost group, written to the heading.
    pub heading_counters: Option<SubtaskCounters>,
    /// Forest state after the pass.
    pub forest: CheckboxForest,
}

/// Toggle outcome plus the refresh that followed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleReport {
    pub outcome: ToggleOutcome,
    pub refresh: RefreshReport,
}

/// Engine facade over one document handle.
pub struct PropagationDriver<D: DocumentContext> {
    document: D,
}

impl<D: DocumentContext> PropagationDriver<D> {
    pub fn new(document: D) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn into_document(self) -> D {
        self.document
    }

    /// Inserts an unchecked box next to the current checkbox.
    ///
    /// Returns the inserted line, or `None` without a heading context.
    pub fn insert_new_checkbox(&mut self, place_below: bool) -> EngineResult<Option<usize>> {
        let Some(heading) = self.document.current_heading() else {
            debug!("event=checkbox_insert module=engine status=skip reason=no_heading");
            return Ok(None);
        };
        let forest = heading.init_checkboxes();
        let anchor = heading.current_checkbox(&forest);
        let line = self
            .document
            .insert_checkbox(&heading, &forest, anchor, place_below)?;
        Ok(Some(line))
    }

    /// Toggles the checkbox under the current position, then refreshes.
    pub fn toggle_current(&mut self) -> EngineResult<ToggleReport> {
        self.toggle_with(|heading, forest| heading.current_checkbox(forest))
    }

    /// Toggles the checkbox starting at `line` in the current heading, then refreshes.
    pub fn toggle_at_line(&mut self, line: usize) -> EngineResult<ToggleReport> {
        self.toggle_with(|_, forest| forest.find_by_line(line))
    }

    /// Re-derives all statuses and counters under the current heading.
    pub fn refresh_all(&mut self) -> EngineResult<RefreshReport> {
        let started_at = Instant::now();
        let Some(heading) = self.document.current_heading() else {
            debug!("event=refresh module=engine status=skip reason=no_heading");
            return Ok(RefreshReport::default());
        };

        let mut forest = heading.init_checkboxes();
        let mut aggregator = StatusAggregator::new(&mut self.document);
        aggregator.aggregate_forest(&mut forest)?;
        let status_writes = aggregator.writes();

        let pass = refresh_counters(&mut forest, &mut self.document)?;
        let mut report = RefreshReport {
            heading_line: Some(heading.line()),
            status_writes,
            counter_writes: pass.writes,
            counters_changed: pass.changed,
            heading_counters: None,
            forest: CheckboxForest::new(),
        };

        if let Some(first) = forest.first_checkbox() {
            let counters = forest.all_siblings_status(first);
            report.counter_writes += 1;
            if self.document.update_heading_counters(&heading, counters)? {
                report.counters_changed += 1;
            }
            report.heading_counters = Some(counters);
        }

        info!(
            "event=refresh module=engine status=ok heading_line={} nodes={} status_writes={} counters_changed={} duration_ms={}",
            heading.line(),
            forest.len(),
            report.status_writes,
            report.counters_changed,
            started_at.elapsed().as_millis()
        );
        report.forest = forest;
        Ok(report)
    }

    fn toggle_with(
        &mut self,
        locate: impl FnOnce(&D::Heading, &CheckboxForest) -> Option<NodeId>,
    ) -> EngineResult<ToggleReport> {
        let outcome = match self.document.current_heading() {
            None => ToggleOutcome::NoHeading,
            Some(heading) => {
                let mut forest = heading.init_checkboxes();
                match locate(&heading, &forest) {
                    Some(id) => toggle::toggle(&mut forest, id, &mut self.document)?,
                    None => ToggleOutcome::NoCheckbox,
                }
            }
        };
        match outcome {
            ToggleOutcome::NoHeading => {
                debug!("event=checkbox_toggle module=engine status=skip reason=no_heading");
            }
            ToggleOutcome::NoCheckbox => {
                debug!("event=checkbox_toggle module=engine status=skip reason=no_checkbox");
            }
            _ => {}
        }

        let refresh = self.refresh_all()?;
        Ok(ToggleReport { outcome, refresh })
    }
}
