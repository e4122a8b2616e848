//! Frame-based construction of [Tree]s.
//!
//! [TreeBuilder] is what the [Newick parser](crate::newick::NewickParser)
//! drives while consuming tokens, but it can also be used directly to build
//! trees programmatically.
//!
//! # Frames and closure order
//! The builder keeps a stack of open *frames*: nodes whose subtree is still
//! being read, innermost on top. A node is linked into its parent's children
//! as soon as its frame is opened, and it is *closed* once its subtree is
//! complete. The finished [Tree] stores nodes in the order they were closed,
//! so children always come before their parent and the root comes last.
//!
//! # Example
//! ```
//! use newick_arena::model::TreeBuilder;
//!
//! // ((A,B)C)D
//! let mut builder = TreeBuilder::new();
//! builder.open_child();       // D (top-level frame)
//! builder.open_child();       // C
//! builder.open_child();       // A
//! builder.push_label("A");
//! builder.close_and_open_sibling();
//! builder.push_label("B");
//! builder.close();            // B done, C on top
//! builder.push_label("C");
//! builder.close();
//! builder.push_label("D");
//! let tree = builder.finish();
//!
//! assert_eq!(tree.len(), 4);
//! assert_eq!(tree.to_newick(), "((A,B)C)D;");
//! ```

use crate::model::node::{Node, NodeIndex};
use crate::model::tree::Tree;
use tracing::trace;

/// Builder that constructs a [Tree] from open/close events.
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    /// Nodes in creation order
    nodes: Vec<Node>,
    /// Creation indices in closure order
    closed: Vec<NodeIndex>,
    /// Open frames, innermost last
    frames: Vec<NodeIndex>,
}

// ============================================================================
// New, Getters (pub)
// ============================================================================
impl TreeBuilder {
    /// Creates a new builder without any nodes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new builder with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            closed: Vec::with_capacity(capacity),
            frames: Vec::new(),
        }
    }

    /// Returns the number of nodes created so far.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of open frames.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` if at least one frame is open.
    pub fn has_open_frames(&self) -> bool {
        !self.frames.is_empty()
    }

    /// Returns the node of the innermost open frame.
    pub fn current(&self) -> Option<&Node> {
        self.frames.last().map(|&index| &self.nodes[index])
    }

    fn current_mut(&mut self) -> Option<&mut Node> {
        let index = *self.frames.last()?;
        Some(&mut self.nodes[index])
    }
}

// ============================================================================
// Frame operations (pub)
// ============================================================================
impl TreeBuilder {
    /// Opens a frame for a new child of the current node and returns its
    /// creation index.
    ///
    /// Without any open frame, a parentless top-level frame is opened
    /// instead. If a top-level node was already closed, an implicit root
    /// adopts it first and the new node becomes its sibling, so that the
    /// builder always yields a single tree.
    pub fn open_child(&mut self) -> NodeIndex {
        let parent = match self.frames.last().copied() {
            Some(top) => Some(top),
            None => self
                .closed
                .last()
                .copied()
                .filter(|&closed| self.nodes[closed].parent().is_none())
                .map(|closed| self.adopt_under_implicit_root(closed)),
        };
        let index = self.create_node(parent);
        self.frames.push(index);
        index
    }

    /// Closes the innermost frame and returns its creation index,
    /// or `None` if no frame is open.
    pub fn close(&mut self) -> Option<NodeIndex> {
        let index = self.frames.pop()?;
        self.closed.push(index);
        Some(index)
    }

    /// Closes the innermost frame and opens a frame for its next sibling.
    ///
    /// If the closed node has no parent (it was the top-level frame), an
    /// implicit root is created first and adopts the closed node as its
    /// first child, so that `A,B` is read as the children of one root.
    ///
    /// # Returns
    /// Creation index of the sibling, or `None` if no frame was open.
    pub fn close_and_open_sibling(&mut self) -> Option<NodeIndex> {
        let closed = self.close()?;

        let parent = match self.nodes[closed].parent() {
            Some(parent) => parent,
            None => self.adopt_under_implicit_root(closed),
        };

        let sibling = self.create_node(Some(parent));
        self.frames.push(sibling);
        Some(sibling)
    }

    /// Closes all open frames, innermost first.
    pub fn close_all(&mut self) {
        while self.close().is_some() {}
    }

    /// Appends text to the label of the current node (no-op without frame).
    pub fn push_label(&mut self, text: &str) {
        if let Some(node) = self.current_mut() {
            node.push_label(text);
        }
    }

    /// Appends a character to the label of the current node.
    pub fn push_label_char(&mut self, c: char) {
        if let Some(node) = self.current_mut() {
            node.push_label_char(c);
        }
    }

    /// Appends text to the comment of the current node.
    pub fn push_comment(&mut self, text: &str) {
        if let Some(node) = self.current_mut() {
            node.push_comment(text);
        }
    }

    /// Appends a character to the comment of the current node.
    pub fn push_comment_char(&mut self, c: char) {
        if let Some(node) = self.current_mut() {
            node.push_comment_char(c);
        }
    }

    /// Sets the branch length of the current node, replacing any previous one.
    pub fn set_length(&mut self, length: f64) {
        if let Some(node) = self.current_mut() {
            node.set_length(length);
        }
    }

    /// Closes all open frames and returns the finished [Tree], with nodes
    /// renumbered into closure order.
    pub fn finish(mut self) -> Tree {
        self.close_all();
        let TreeBuilder { nodes, closed, .. } = self;

        // new_index[creation index] = closure position
        let mut new_index = vec![0; nodes.len()];
        for (position, &created) in closed.iter().enumerate() {
            new_index[created] = position;
        }

        let mut slots: Vec<Option<Node>> = nodes.into_iter().map(Some).collect();
        let mut ordered = Vec::with_capacity(closed.len());
        for &created in &closed {
            if let Some(mut node) = slots[created].take() {
                node.remap(&new_index);
                ordered.push(node);
            }
        }

        Tree::from_nodes(ordered)
    }
}

// ============================================================================
// Helpers (private)
// ============================================================================
impl TreeBuilder {
    /// Creates a root above the closed top-level node `closed` and opens its
    /// frame. Returns the root's creation index.
    fn adopt_under_implicit_root(&mut self, closed: NodeIndex) -> NodeIndex {
        let root = self.create_node(None);
        self.nodes[root].add_child(closed);
        self.nodes[closed].set_parent(root);
        self.frames.push(root);
        trace!(closed, root, "adopted top-level node under implicit root");
        root
    }

    /// Creates a node, links it into `parent`'s children, returns its index.
    fn create_node(&mut self, parent: Option<NodeIndex>) -> NodeIndex {
        let index = self.nodes.len();
        self.nodes.push(Node::new(index, parent));
        if let Some(parent) = parent {
            self.nodes[parent].add_child(index);
        }
        index
    }
}
