//! Line-level org outline syntax.
//!
//! # Responsibility
//! - Recognize heading lines and list item lines.
//! - Rewrite checkbox markers and statistics cookies without touching the
//!   rest of the line.
//!
//! # Invariants
//! - An unindented `*` bullet is a heading, never a list item.
//! - Cookie rewriting on an item line only applies after the checkbox marker.

use crate::model::checkbox::{CheckboxStatus, SubtaskCounters};
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};
use std::ops::Range;

static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\*+)[ \t]+").expect("valid heading regex"));
static LIST_ITEM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<indent>[ \t]*)(?P<bullet>[-+*]|\d+[.)])(?:[ \t]+\[(?P<mark>[ xX-])\](?:[ \t]+|$)|[ \t]+|$)",
    )
    .expect("valid list item regex")
});
static COUNT_COOKIE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\d*/\d*\]").expect("valid count cookie regex"));
static PERCENT_COOKIE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\d*%\]").expect("valid percent cookie regex"));

/// Parsed shape of a heading line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingSyntax {
    /// Number of leading stars.
    pub level: usize,
    /// Byte offset where the title starts.
    pub title_start: usize,
}

/// Parsed shape of a list item line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItemSyntax {
    /// Indentation width in columns.
    pub indent_width: usize,
    /// Status implied by the marker, `Unmarked` when there is none.
    pub status: CheckboxStatus,
    /// Byte range of the character between the checkbox brackets.
    pub marker: Option<Range<usize>>,
    /// Byte offset where the item text starts.
    pub text_start: usize,
}

impl ListItemSyntax {
    /// Node level derived from indentation; always `>= 1`.
    pub fn level(&self) -> usize {
        self.indent_width + 1
    }
}

pub fn parse_heading(line: &str) -> Option<HeadingSyntax> {
    let captures = HEADING_RE.captures(line)?;
    let stars = captures.get(1)?;
    let whole = captures.get(0)?;
    Some(HeadingSyntax {
        level: stars.len(),
        title_start: whole.end(),
    })
}

pub fn is_heading(line: &str) -> bool {
    HEADING_RE.is_match(line)
}

pub fn parse_list_item(line: &str, tab_width: usize) -> Option<ListItemSyntax> {
    if is_heading(line) {
        return None;
    }
    let captures = LIST_ITEM_RE.captures(line)?;
    let indent = captures.name("indent")?.as_str();
    let bullet = captures.name("bullet")?.as_str();
    if indent.is_empty() && bullet == "*" {
        return None;
    }

    let (status, marker) = match captures.name("mark") {
        Some(mark) => {
            let status = mark
                .as_str()
                .chars()
                .next()
                .and_then(CheckboxStatus::from_marker_char)?;
            (status, Some(mark.range()))
        }
        None => (CheckboxStatus::Unmarked, None),
    };

    Some(ListItemSyntax {
        indent_width: indent_width(indent, tab_width),
        status,
        marker,
        text_start: captures.get(0)?.end(),
    })
}

/// Measures leading whitespace in columns, expanding tabs to the next stop.
pub fn indent_width(indent: &str, tab_width: usize) -> usize {
    let tab_width = tab_width.max(1);
    indent.chars().fold(0, |column, ch| match ch {
        '\t' => column + tab_width - column % tab_width,
        _ => column + 1,
    })
}

/// Returns `line` with its checkbox marker set to `status`.
///
/// Items without a marker get one inserted in front of their text.
/// `Unmarked` leaves the line untouched.
pub fn with_status(
    line: &str,
    item: &ListItemSyntax,
    status: CheckboxStatus,
    checked_marker: char,
) -> String {
    let Some(marker_char) = status.marker_char(checked_marker) else {
        return line.to_string();
    };

    match &item.marker {
        Some(range) => {
            let mut rewritten = String::with_capacity(line.len());
            rewritten.push_str(&line[..range.start]);
            rewritten.push(marker_char);
            rewritten.push_str(&line[range.end..]);
            rewritten
        }
        None => {
            let (head, tail) = line.split_at(item.text_start);
            let separator = if head.ends_with([' ', '\t']) { "" } else { " " };
            format!("{head}{separator}[{marker_char}] {tail}")
        }
    }
}

/// Rewrites every statistics cookie found in `text`.
pub fn with_counters(text: &str, counters: SubtaskCounters, update_percent: bool) -> String {
    let count = format!("[{}/{}]", counters.done, counters.total);
    let rewritten = COUNT_COOKIE_RE.replace_all(text, NoExpand(&count));
    if !update_percent {
        return rewritten.into_owned();
    }
    let percent = format!("[{}%]", counters.percent());
    PERCENT_COOKIE_RE
        .replace_all(&rewritten, NoExpand(&percent))
        .into_owned()
}

/// Renders a fresh unchecked item line at `level`.
pub fn render_new_checkbox(level: usize, bullet: &str) -> String {
    format!("{}{bullet} [ ] ", " ".repeat(level.saturating_sub(1)))
}
