//! Node module for phylogenetic tree representation.

use crate::model::annotation::{self, AnnotationValue};
use std::collections::HashMap;

/// Index of a node in a [Tree](crate::model::Tree) (arena).
pub type NodeIndex = usize;

// =#========================================================================#=
// NODE
// =#========================================================================$=
/// Represents a node (vertex) of a phylogenetic tree.
///
/// Nodes live in the arena of their [Tree](crate::model::Tree) and refer to
/// each other by [NodeIndex] only. Any node may carry a label, a comment,
/// and a branch length; the number of children is unbounded.
///
/// # Invariants
/// - `index` is the position of this node in the arena
/// - `parent` is `None` only for the root (and, during construction,
///   for the top-level frame)
/// - `children` are in declaration order and each child points back
///   to this node as its parent
/// - `length` is `None` if the Newick string had no `:length`, which is
///   distinct from `Some(0.0)`
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    index: NodeIndex,
    label: String,
    comment: String,
    length: Option<f64>,
    parent: Option<NodeIndex>,
    children: Vec<NodeIndex>,
}

impl Node {
    /// Creates a new node without label, comment, length, or children.
    pub(crate) fn new(index: NodeIndex, parent: Option<NodeIndex>) -> Self {
        Node {
            index,
            label: String::new(),
            comment: String::new(),
            length: None,
            parent,
            children: Vec::new(),
        }
    }

    /// Returns the index of this node in its tree.
    pub fn index(&self) -> NodeIndex {
        self.index
    }

    /// Returns the label (possibly empty).
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the text collected from `[...]` comments (possibly empty).
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Returns the branch length, i.e. the distance to the parent, if given.
    pub fn length(&self) -> Option<f64> {
        self.length
    }

    /// Returns whether a branch length was given.
    pub fn has_length(&self) -> bool {
        self.length.is_some()
    }

    /// Returns the index of the parent, or `None` for the root.
    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    /// Returns the indices of the children in declaration order.
    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }

    /// Returns `true` if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns `true` if this node has no parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Returns the extended Newick annotations stored in the comment,
    /// e.g. `[&rate=0.5,color=blue]` or `[&&NHX:S=human:E=1.1]`.
    ///
    /// # Returns
    /// `None` if the comment is not an annotation block,
    /// otherwise the parsed key-value pairs.
    pub fn annotations(&self) -> Option<HashMap<String, AnnotationValue>> {
        annotation::parse_annotations(&self.comment)
    }

    // --- construction (crate) ---

    pub(crate) fn push_label(&mut self, text: &str) {
        self.label.push_str(text);
    }

    pub(crate) fn push_label_char(&mut self, c: char) {
        self.label.push(c);
    }

    pub(crate) fn push_comment(&mut self, text: &str) {
        self.comment.push_str(text);
    }

    pub(crate) fn push_comment_char(&mut self, c: char) {
        self.comment.push(c);
    }

    pub(crate) fn set_length(&mut self, length: f64) {
        self.length = Some(length);
    }

    pub(crate) fn set_parent(&mut self, parent: NodeIndex) {
        self.parent = Some(parent);
    }

    pub(crate) fn add_child(&mut self, child: NodeIndex) {
        self.children.push(child);
    }

    /// Rewrites all indices of this node via `new_index[old] = new`.
    pub(crate) fn remap(&mut self, new_index: &[NodeIndex]) {
        self.index = new_index[self.index];
        self.parent = self.parent.map(|p| new_index[p]);
        for child in &mut self.children {
            *child = new_index[*child];
        }
    }
}
