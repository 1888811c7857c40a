use checktree_core::{
    CheckboxStatus, CheckboxWriter, DocumentContext, DocumentError, EngineConfig, HeadingContext,
    OrgDocument, PropagationDriver, SubtaskCounters,
};

const TASKS: &str = "* Tasks [/]\n\
- [ ] one\n\
\x20 - [ ] child\n\
\x20   continuation of child\n\
- [ ] two\n\
\n\
* Next\n";

fn document_at(text: &str, cursor: usize) -> OrgDocument {
    let mut document = OrgDocument::parse(text);
    document.set_cursor(cursor);
    document
}

#[test]
fn init_checkboxes_builds_forest_from_heading_body() {
    let document = document_at(TASKS, 1);
    let heading = document.current_heading().unwrap();

    let forest = heading.init_checkboxes();

    assert_eq!(forest.len(), 3);
    let lines: Vec<_> = forest.nodes().iter().map(|node| node.line).collect();
    assert_eq!(lines, vec![1, 2, 4]);
    let one = forest.find_by_line(1).unwrap();
    assert_eq!(forest.children(one).len(), 1);
    assert_eq!(forest.roots().len(), 2);
    assert_eq!(forest[forest.children(one)[0]].level, 3);
    assert_eq!(heading.init_checkboxes(), forest);
}

#[test]
fn current_checkbox_covers_continuation_lines() {
    let document = document_at(TASKS, 3);
    let heading = document.current_heading().unwrap();
    let forest = heading.init_checkboxes();

    let current = heading.current_checkbox(&forest).unwrap();

    assert_eq!(forest[current].line, 2);
}

#[test]
fn current_checkbox_is_none_on_heading_line() {
    let document = document_at(TASKS, 0);
    let heading = document.current_heading().unwrap();
    let forest = heading.init_checkboxes();

    assert_eq!(heading.current_checkbox(&forest), None);
}

#[test]
fn tab_width_changes_levels() {
    let text = "* H\n- [ ] a\n\t- [ ] b\n";
    let config = EngineConfig {
        tab_width: 2,
        ..EngineConfig::default()
    };
    let document = OrgDocument::parse_with_config(text, config);
    let forest = document.heading_at(0).unwrap().init_checkboxes();

    let b = forest.find_by_line(2).unwrap();
    assert_eq!(forest[b].level, 3);
    assert!(forest[b].parent.is_some());
}

#[test]
fn write_checkbox_uses_configured_marker() {
    let config = EngineConfig {
        checked_marker: 'x',
        ..EngineConfig::default()
    };
    let mut document = OrgDocument::parse_with_config("* H\n- [ ] a\n", config);
    document.set_cursor(1);

    let mut driver = PropagationDriver::new(document);
    driver.toggle_current().unwrap();

    assert_eq!(driver.document().line(1), Some("- [x] a"));
}

#[test]
fn writes_to_non_item_lines_fail() {
    let mut document = document_at(TASKS, 1);
    let heading = document.current_heading().unwrap();
    let mut forest = heading.init_checkboxes();
    let one = forest.find_by_line(1).unwrap();
    forest[one].line = 3;
    forest[one].status = CheckboxStatus::On;

    let err = document.write_checkbox(&forest[one]).unwrap_err();
    assert!(matches!(err, DocumentError::NotAListItem(3)));

    forest[one].line = 42;
    let err = document.write_checkbox(&forest[one]).unwrap_err();
    assert!(matches!(
        err,
        DocumentError::LineOutOfRange {
            line: 42,
            line_count: 7
        }
    ));
}

#[test]
fn heading_counters_rewrite_only_existing_cookies() {
    let mut document = document_at(TASKS, 1);
    let heading = document.current_heading().unwrap();

    let changed = document
        .update_heading_counters(&heading, SubtaskCounters::new(1, 2))
        .unwrap();
    assert!(changed);
    assert_eq!(document.line(0), Some("* Tasks [1/2]"));

    let next = document.heading_at(6).unwrap();
    let changed = document
        .update_heading_counters(&next, SubtaskCounters::new(1, 2))
        .unwrap();
    assert!(!changed);
    assert_eq!(document.line(6), Some("* Next"));
}

#[test]
fn percent_cookies_can_be_left_alone() {
    let config = EngineConfig {
        update_percent_cookies: false,
        ..EngineConfig::default()
    };
    let mut document =
        OrgDocument::parse_with_config("* H [/] [%]\n- [X] a\n- [ ] b\n", config);
    let mut driver = PropagationDriver::new(&mut document);

    driver.refresh_all().unwrap();

    assert_eq!(document.line(0), Some("* H [1/2] [%]"));
}

#[test]
fn insert_below_goes_after_last_descendant() {
    let mut driver = PropagationDriver::new(document_at(TASKS, 1));

    let line = driver.insert_new_checkbox(true).unwrap();

    assert_eq!(line, Some(4));
    assert_eq!(driver.document().line(4), Some("- [ ] "));
    assert_eq!(driver.document().line(5), Some("- [ ] two"));
    assert_eq!(driver.document().cursor(), 4);
}

#[test]
fn insert_below_last_item_skips_trailing_blank_lines() {
    let mut driver = PropagationDriver::new(document_at(TASKS, 4));

    let line = driver.insert_new_checkbox(true).unwrap();

    assert_eq!(line, Some(5));
    assert_eq!(driver.document().line(6), Some(""));
    assert_eq!(driver.document().line(7), Some("* Next"));
}

#[test]
fn insert_above_uses_anchor_line_and_level() {
    let mut driver = PropagationDriver::new(document_at(TASKS, 2));

    let line = driver.insert_new_checkbox(false).unwrap();

    assert_eq!(line, Some(2));
    assert_eq!(driver.document().line(2), Some("  - [ ] "));
    assert_eq!(driver.document().line(3), Some("  - [ ] child"));
}

#[test]
fn insert_without_anchor_goes_below_heading() {
    let mut driver = PropagationDriver::new(document_at(TASKS, 0));
    assert_eq!(driver.insert_new_checkbox(false).unwrap(), Some(1));
    assert_eq!(driver.document().line(1), Some("- [ ] "));

    let mut driver = PropagationDriver::new(document_at("** Empty\n", 0));
    assert_eq!(driver.insert_new_checkbox(true).unwrap(), Some(1));
    assert_eq!(driver.document().to_string(), "** Empty\n  - [ ] \n");

    let mut driver = PropagationDriver::new(document_at("no heading\n", 0));
    assert_eq!(driver.insert_new_checkbox(true).unwrap(), None);
}

#[test]
fn inserting_does_not_propagate() {
    let text = "* H [/]\n- [ ] a\n  - [X] b\n";
    let mut driver = PropagationDriver::new(document_at(text, 2));

    driver.insert_new_checkbox(true).unwrap();

    assert_eq!(driver.document().line(0), Some("* H [/]"));
    assert_eq!(driver.document().line(1), Some("- [ ] a"));
}

#[test]
fn load_and_save_round_trip_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todo.org");
    std::fs::write(&path, "* H [/]\n- [ ] a\n").unwrap();

    let mut document = OrgDocument::load(&path, EngineConfig::default()).unwrap();
    document.set_cursor(1);
    let mut driver = PropagationDriver::new(document);
    driver.toggle_current().unwrap();
    driver.document().save(&path).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "* H [1/1]\n- [X] a\n");

    let missing = dir.path().join("missing.org");
    let err = OrgDocument::load(&missing, EngineConfig::default()).unwrap_err();
    assert!(matches!(err, DocumentError::Io { .. }));
}
