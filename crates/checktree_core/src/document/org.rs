//! In-memory org outline document.
//!
//! # Responsibility
//! - Hold outline text as lines plus the host's cursor position.
//! - Implement the engine's document capabilities over that text.
//!
//! # Invariants
//! - `to_string()` reproduces the parsed text, trailing newline included.
//! - Lines are rejoined with the separator the text was parsed with
//!   (`\r\n` when any line used it, `\n` otherwise).
//! - A heading's body runs until the next heading of any level.
//! - Heading snapshots are detached copies; re-fetch after any write.

use crate::config::EngineConfig;
use crate::document::syntax::{
    is_heading, parse_heading, parse_list_item, render_new_checkbox, with_counters, with_status,
};
use crate::document::{
    CheckboxWriter, DocumentContext, DocumentError, DocumentResult, HeadingContext,
};
use crate::model::checkbox::{CheckboxNode, NodeId, SubtaskCounters};
use crate::model::forest::CheckboxForest;
use log::{debug, info};
use std::fmt::{Display, Formatter};
use std::ops::Range;
use std::path::Path;

/// Org outline text with a cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgDocument {
    lines: Vec<String>,
    trailing_newline: bool,
    line_ending: &'static str,
    cursor: usize,
    config: EngineConfig,
}

impl OrgDocument {
    /// Parses text with the default configuration.
    pub fn parse(text: &str) -> Self {
        Self::parse_with_config(text, EngineConfig::default())
    }

    pub fn parse_with_config(text: &str, config: EngineConfig) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
            trailing_newline: text.ends_with('\n'),
            line_ending: if text.contains("\r\n") { "\r\n" } else { "\n" },
            cursor: 0,
            config,
        }
    }

    /// Reads and parses an outline file.
    pub fn load(path: impl AsRef<Path>, config: EngineConfig) -> DocumentResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let document = Self::parse_with_config(&text, config);
        info!(
            "event=document_load module=document status=ok lines={}",
            document.lines.len()
        );
        Ok(document)
    }

    /// Writes the current text back to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> DocumentResult<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_string()).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            "event=document_save module=document status=ok lines={}",
            self.lines.len()
        );
        Ok(())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Separator used between lines when the text is written back.
    pub fn line_ending(&self) -> &str {
        self.line_ending
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// 0-based cursor line.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_cursor(&mut self, line: usize) {
        self.cursor = line;
    }

    /// Snapshot of the heading owning `line`, if one precedes it.
    pub fn heading_at(&self, line: usize) -> Option<OrgHeading> {
        let last = self.lines.len().checked_sub(1)?;
        let start = line.min(last);
        let heading_line = (0..=start).rev().find(|index| is_heading(&self.lines[*index]))?;
        let syntax = parse_heading(&self.lines[heading_line])?;

        let body_start = heading_line + 1;
        let body_end = self.lines[body_start..]
            .iter()
            .position(|text| is_heading(text))
            .map_or(self.lines.len(), |offset| body_start + offset);

        Some(OrgHeading {
            line: heading_line,
            level: syntax.level,
            title: self.lines[heading_line][syntax.title_start..].to_string(),
            body_start,
            body: self.lines[body_start..body_end].to_vec(),
            cursor: self.cursor,
            tab_width: self.config.tab_width,
        })
    }

    fn line_mut(&mut self, index: usize) -> DocumentResult<&mut String> {
        let line_count = self.lines.len();
        self.lines
            .get_mut(index)
            .ok_or(DocumentError::LineOutOfRange {
                line: index,
                line_count,
            })
    }
}

impl Display for OrgDocument {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.lines.join(self.line_ending))?;
        if self.trailing_newline {
            f.write_str(self.line_ending)?;
        }
        Ok(())
    }
}

impl CheckboxWriter for OrgDocument {
    fn write_checkbox(&mut self, node: &CheckboxNode) -> DocumentResult<()> {
        let tab_width = self.config.tab_width;
        let checked_marker = self.config.checked_marker;
        let line = self.line_mut(node.line)?;
        let item = parse_list_item(line, tab_width).ok_or(DocumentError::NotAListItem(node.line))?;

        *line = with_status(line, &item, node.status, checked_marker);
        debug!(
            "event=checkbox_write module=document status=ok line={} checkbox={}",
            node.line, node.status
        );
        Ok(())
    }

    fn update_node_counters(
        &mut self,
        node: &CheckboxNode,
        counters: SubtaskCounters,
    ) -> DocumentResult<bool> {
        let tab_width = self.config.tab_width;
        let update_percent = self.config.update_percent_cookies;
        let line = self.line_mut(node.line)?;
        let item = parse_list_item(line, tab_width).ok_or(DocumentError::NotAListItem(node.line))?;

        Ok(rewrite_tail(line, item.text_start, counters, update_percent))
    }
}

impl DocumentContext for OrgDocument {
    type Heading = OrgHeading;

    fn current_heading(&self) -> Option<OrgHeading> {
        self.heading_at(self.cursor)
    }

    fn update_heading_counters(
        &mut self,
        heading: &OrgHeading,
        counters: SubtaskCounters,
    ) -> DocumentResult<bool> {
        let update_percent = self.config.update_percent_cookies;
        let line = self.line_mut(heading.line)?;
        let syntax = parse_heading(line).ok_or(DocumentError::NotAHeading(heading.line))?;

        Ok(rewrite_tail(line, syntax.title_start, counters, update_percent))
    }

    fn insert_checkbox(
        &mut self,
        heading: &OrgHeading,
        forest: &CheckboxForest,
        anchor: Option<NodeId>,
        place_below: bool,
    ) -> DocumentResult<usize> {
        let (insert_at, level) = match anchor {
            None => {
                let level = forest
                    .first_checkbox()
                    .map_or(heading.level + 1, |first| forest[first].level);
                (heading.line + 1, level)
            }
            Some(id) if !place_below => (forest[id].line, forest[id].level),
            Some(id) => {
                let tail = forest.last_descendant(id);
                let tail_line = forest[tail].line;
                let mut insert_at = forest
                    .next_in_document(tail)
                    .map_or(heading.body_range().end, |next| forest[next].line);
                // Why: blank lines separating the subtree from what follows stay
                // after the new item so the list is not split away from its block.
                while insert_at > tail_line + 1
                    && self
                        .lines
                        .get(insert_at - 1)
                        .is_some_and(|text| text.trim().is_empty())
                {
                    insert_at -= 1;
                }
                (insert_at, forest[id].level)
            }
        };

        if insert_at > self.lines.len() {
            return Err(DocumentError::LineOutOfRange {
                line: insert_at,
                line_count: self.lines.len(),
            });
        }
        self.lines
            .insert(insert_at, render_new_checkbox(level, &self.config.bullet));
        self.cursor = insert_at;
        info!(
            "event=checkbox_insert module=document status=ok line={} level={}",
            insert_at, level
        );
        Ok(insert_at)
    }
}

/// Rewrites cookies after `start`; returns whether the line changed.
fn rewrite_tail(
    line: &mut String,
    start: usize,
    counters: SubtaskCounters,
    update_percent: bool,
) -> bool {
    let tail = with_counters(&line[start..], counters, update_percent);
    if tail == line[start..] {
        return false;
    }
    line.truncate(start);
    line.push_str(&tail);
    true
}

/// Detached snapshot of one heading and its body lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgHeading {
    line: usize,
    level: usize,
    title: String,
    body_start: usize,
    body: Vec<String>,
    cursor: usize,
    tab_width: usize,
}

impl OrgHeading {
    /// Number of leading stars.
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Document lines belonging to the heading body.
    pub fn body_range(&self) -> Range<usize> {
        self.body_start..self.body_start + self.body.len()
    }
}

impl HeadingContext for OrgHeading {
    fn line(&self) -> usize {
        self.line
    }

    fn init_checkboxes(&self) -> CheckboxForest {
        let mut forest = CheckboxForest::new();
        for (offset, text) in self.body.iter().enumerate() {
            if let Some(item) = parse_list_item(text, self.tab_width) {
                forest.push_item(self.body_start + offset, item.level(), item.status);
            }
        }
        forest
    }

    fn current_checkbox(&self, forest: &CheckboxForest) -> Option<NodeId> {
        if !self.body_range().contains(&self.cursor) {
            return None;
        }
        forest
            .nodes()
            .iter()
            .rev()
            .find(|node| node.line <= self.cursor)
            .map(|node| node.id)
    }
}
