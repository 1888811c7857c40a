use checktree_core::CheckboxStatus::{Intermediate, Off, On, Unmarked};
use checktree_core::{
    refresh_counters, CheckboxForest, CheckboxNode, CheckboxWriter, DocumentError, DocumentResult,
    EngineError, StatusAggregator, SubtaskCounters,
};

#[derive(Default)]
struct RecordingWriter {
    status_lines: Vec<usize>,
    counter_lines: Vec<(usize, SubtaskCounters)>,
    fail_writes: bool,
}

impl CheckboxWriter for RecordingWriter {
    fn write_checkbox(&mut self, node: &CheckboxNode) -> DocumentResult<()> {
        if self.fail_writes {
            return Err(DocumentError::NotAListItem(node.line));
        }
        self.status_lines.push(node.line);
        Ok(())
    }

    fn update_node_counters(
        &mut self,
        node: &CheckboxNode,
        counters: SubtaskCounters,
    ) -> DocumentResult<bool> {
        self.counter_lines.push((node.line, counters));
        Ok(false)
    }
}

#[test]
fn all_off_and_all_on_groups_keep_their_status() {
    let mut forest = CheckboxForest::new();
    forest.push_item(0, 1, Off);
    forest.push_item(1, 1, Off);
    let mut writer = RecordingWriter::default();

    let status = StatusAggregator::new(&mut writer)
        .aggregate_forest(&mut forest)
        .unwrap();
    assert_eq!(status, Some(Off));

    let mut forest = CheckboxForest::new();
    forest.push_item(0, 1, On);
    forest.push_item(1, 1, On);
    let status = StatusAggregator::new(&mut writer)
        .aggregate_forest(&mut forest)
        .unwrap();
    assert_eq!(status, Some(On));
    assert!(writer.status_lines.is_empty());
}

#[test]
fn stale_parents_are_rewritten_post_order() {
    let mut forest = CheckboxForest::new();
    let root = forest.push_item(0, 1, Off);
    let middle = forest.push_item(1, 3, Off);
    forest.push_item(2, 5, On);
    forest.push_item(3, 5, On);
    forest.push_item(4, 3, Off);
    let mut writer = RecordingWriter::default();

    let mut aggregator = StatusAggregator::new(&mut writer);
    let status = aggregator.aggregate_forest(&mut forest).unwrap();
    assert_eq!(aggregator.writes(), 2);

    assert_eq!(status, Some(Intermediate));
    assert_eq!(forest[middle].status, On);
    assert_eq!(forest[root].status, Intermediate);
    assert_eq!(writer.status_lines, vec![1, 0]);
}

#[test]
fn unmarked_node_is_never_promoted_but_its_subtree_is_fixed() {
    let mut forest = CheckboxForest::new();
    let plain = forest.push_item(0, 1, Unmarked);
    let nested = forest.push_item(1, 3, Off);
    forest.push_item(2, 5, On);
    let mut writer = RecordingWriter::default();

    let status = StatusAggregator::new(&mut writer)
        .aggregate_forest(&mut forest)
        .unwrap();

    assert_eq!(status, None);
    assert_eq!(forest[plain].status, Unmarked);
    assert_eq!(forest[nested].status, On);
    assert_eq!(writer.status_lines, vec![1]);
}

#[test]
fn children_without_checkboxes_leave_parent_status_alone() {
    let mut forest = CheckboxForest::new();
    let parent = forest.push_item(0, 1, On);
    forest.push_item(1, 3, Unmarked);
    forest.push_item(2, 1, Off);
    let mut writer = RecordingWriter::default();

    let status = StatusAggregator::new(&mut writer)
        .aggregate_forest(&mut forest)
        .unwrap();

    assert_eq!(forest[parent].status, On);
    assert_eq!(status, Some(Intermediate));
    assert!(writer.status_lines.is_empty());
}

#[test]
fn write_failures_surface_as_engine_errors() {
    let mut forest = CheckboxForest::new();
    forest.push_item(7, 1, Off);
    forest.push_item(8, 3, On);
    let mut writer = RecordingWriter {
        fail_writes: true,
        ..RecordingWriter::default()
    };

    let err = StatusAggregator::new(&mut writer)
        .aggregate_forest(&mut forest)
        .unwrap_err();

    assert!(matches!(
        err,
        EngineError::Document(DocumentError::NotAListItem(7))
    ));
    assert!(err.to_string().contains("line 7"));
}

#[test]
fn counters_use_immediate_children_only() {
    let mut forest = CheckboxForest::new();
    forest.push_item(0, 1, Intermediate);
    forest.push_item(1, 3, On);
    forest.push_item(2, 3, Intermediate);
    forest.push_item(3, 5, On);
    forest.push_item(4, 5, Off);
    forest.push_item(5, 3, Unmarked);
    forest.push_item(6, 5, Off);
    forest.push_item(7, 1, On);
    let mut writer = RecordingWriter::default();

    let pass = refresh_counters(&mut forest, &mut writer).unwrap();

    assert_eq!(pass.writes, 3);
    assert_eq!(pass.changed, 0);
    assert_eq!(
        writer.counter_lines,
        vec![
            (0, SubtaskCounters::new(1, 2)),
            (2, SubtaskCounters::new(1, 2)),
            (5, SubtaskCounters::new(0, 1)),
        ]
    );
    let leaf = forest.find_by_line(7).unwrap();
    assert_eq!(forest[leaf].counters, None);
}
