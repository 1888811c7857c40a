//! Arena-backed checkbox forest for one heading.
//!
//! # Responsibility
//! - Store nodes in document order with explicit parent/child indices.
//! - Provide sibling-group navigation and status predicates used by the engine.
//!
//! # Invariants
//! - Nodes are appended in document order; `NodeId` order equals line order.
//! - A node's parent is the closest preceding node with a smaller level.
//! - Sibling order is never changed after construction.

use crate::model::checkbox::{CheckboxNode, CheckboxStatus, NodeId, SubtaskCounters};
use serde::Serialize;
use std::ops::{Index, IndexMut};

/// All list items found under one heading, as a forest of sibling groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckboxForest {
    nodes: Vec<CheckboxNode>,
    roots: Vec<NodeId>,
}

impl CheckboxForest {
    /// Creates an empty forest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one item that follows every node already in the forest.
    ///
    /// The parent is resolved by walking up from the previously appended node
    /// until a node with a smaller level is found.
    pub fn push_item(&mut self, line: usize, level: usize, status: CheckboxStatus) -> NodeId {
        let level = level.max(1);
        let id = NodeId(self.nodes.len());

        let mut cursor = self.nodes.last().map(|node| node.id);
        while let Some(candidate) = cursor {
            if self[candidate].level < level {
                break;
            }
            cursor = self[candidate].parent;
        }

        self.nodes.push(CheckboxNode {
            id,
            line,
            level,
            status,
            parent: cursor,
            children: Vec::new(),
            counters: None,
        });
        match cursor {
            Some(parent) => self[parent].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Looks up a node, returning `None` for ids from another forest.
    pub fn get(&self, id: NodeId) -> Option<&CheckboxNode> {
        self.nodes.get(id.0)
    }

    /// All nodes in document order.
    pub fn nodes(&self) -> &[CheckboxNode] {
        &self.nodes
    }

    /// Outermost sibling group.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// First top-level item, if the heading has any.
    pub fn first_checkbox(&self) -> Option<NodeId> {
        self.roots.first().copied()
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self[id].children
    }

    /// Finds the node starting at the given document line.
    pub fn find_by_line(&self, line: usize) -> Option<NodeId> {
        self.nodes
            .binary_search_by_key(&line, |node| node.line)
            .ok()
            .map(NodeId)
    }

    /// The sibling group containing `id`, `id` included.
    pub fn all_siblings(&self, id: NodeId) -> &[NodeId] {
        match self[id].parent {
            Some(parent) => &self[parent].children,
            None => &self.roots,
        }
    }

    /// Counters for the sibling group containing `id`.
    pub fn all_siblings_status(&self, id: NodeId) -> SubtaskCounters {
        self.group_counters(self.all_siblings(id))
    }

    /// Counts real checkboxes (`total`) and checked ones (`done`) in a group.
    pub fn group_counters(&self, group: &[NodeId]) -> SubtaskCounters {
        group
            .iter()
            .map(|id| self[*id].status)
            .fold(SubtaskCounters::default(), |mut acc, status| {
                if status.is_checkbox() {
                    acc.total += 1;
                }
                if status == CheckboxStatus::On {
                    acc.done += 1;
                }
                acc
            })
    }

    /// Returns whether every child of `id` has `status`. Vacuously true for leaves.
    pub fn are_children_all(&self, id: NodeId, status: CheckboxStatus) -> bool {
        self.children(id)
            .iter()
            .all(|child| self[*child].status == status)
    }

    /// Returns whether at least one child of `id` has `status`.
    pub fn is_any_child(&self, id: NodeId, status: CheckboxStatus) -> bool {
        self.children(id)
            .iter()
            .any(|child| self[*child].status == status)
    }

    /// Deepest last descendant of `id`, or `id` itself for leaves.
    pub fn last_descendant(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(last) = self[current].children.last() {
            current = *last;
        }
        current
    }

    /// The node that follows `id` in document order, if any.
    pub fn next_in_document(&self, id: NodeId) -> Option<NodeId> {
        let next = id.0 + 1;
        (next < self.nodes.len()).then_some(NodeId(next))
    }
}

/// Panics when `id` was produced by a different forest.
impl Index<NodeId> for CheckboxForest {
    type Output = CheckboxNode;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.0]
    }
}

impl IndexMut<NodeId> for CheckboxForest {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        &mut self.nodes[id.0]
    }
}
