//! Top-down subtask counter refresh.
//!
//! # Responsibility
//! - Compute `(done, total)` for every node with children, from immediate
//!   children only.
//! - Write the counters through the document on every pass.
//!
//! # Invariants
//! - Leaves never get counters.
//! - Recursion visits every child group, whatever the child's own status.

use crate::document::CheckboxWriter;
use crate::engine::EngineResult;
use crate::model::checkbox::NodeId;
use crate::model::forest::CheckboxForest;
use log::debug;

/// Write statistics for one counter pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterPass {
    /// Counter writes issued, changed or not.
    pub writes: usize,
    /// Writes that changed document text.
    pub changed: usize,
}

/// Refreshes counters for the whole forest, pre-order.
pub fn refresh_counters<W: CheckboxWriter + ?Sized>(
    forest: &mut CheckboxForest,
    writer: &mut W,
) -> EngineResult<CounterPass> {
    let mut pass = CounterPass::default();
    let roots = forest.roots().to_vec();
    refresh_group(forest, &roots, writer, &mut pass)?;
    Ok(pass)
}

fn refresh_group<W: CheckboxWriter + ?Sized>(
    forest: &mut CheckboxForest,
    group: &[NodeId],
    writer: &mut W,
    pass: &mut CounterPass,
) -> EngineResult<()> {
    for id in group {
        let children = forest[*id].children.clone();
        if children.is_empty() {
            continue;
        }

        let counters = forest.group_counters(&children);
        forest[*id].counters = Some(counters);
        pass.writes += 1;
        if writer.update_node_counters(&forest[*id], counters)? {
            pass.changed += 1;
            debug!(
                "event=counters_write module=engine status=ok line={} done={} total={}",
                forest[*id].line, counters.done, counters.total
            );
        }

        refresh_group(forest, &children, writer, pass)?;
    }
    Ok(())
}
