//! Provides the arena tree representation.
//!
//! Provides core data structures for representing phylogenetic trees:
//! * [Tree] - arena of [Node]s in closure order
//! * [BreadthFirstIter], [DepthFirstIter], [PostOrderIter], [AncestorIter]
//!   as lazy traversals over a tree

use crate::model::node::{Node, NodeIndex};
use crate::newick::writer::{self, NewickStyle};
use crate::parser::ParsingError;
use std::collections::VecDeque;
use std::fmt;

// =$========================================================================$=
// TREE
// =$========================================================================$=
/// A phylogenetic tree represented using the arena pattern on [Node].
///
/// Nodes are stored in a contiguous vector and reference each other by
/// [NodeIndex], so the parent/children links never form ownership cycles.
///
/// # Structure
/// - Nodes are stored in *closure order*: the order in which their subtree
///   finished parsing. Thus children come before their parent and, for a
///   single well-formed tree, the root is the last node.
/// - `tree[i].index() == i` for every node.
/// - Branch degree is unbounded; any node may be labelled.
/// - An empty input yields an empty tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tree {
    /// Nodes of this tree in closure order (arena pattern)
    nodes: Vec<Node>,
}

// ============================================================================
// New, Getters / Accessors, etc. (pub)
// ============================================================================
impl Tree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps nodes that are already in closure order with consistent indices.
    pub(crate) fn from_nodes(nodes: Vec<Node>) -> Self {
        Tree { nodes }
    }

    /// Returns the number of nodes (leaves and internal nodes).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns all nodes in closure order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Returns the node at `index`, or `None` if out of bounds.
    pub fn node(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// Returns the index of the root, i.e. the last node, or `None` if empty.
    pub fn root_index(&self) -> Option<NodeIndex> {
        self.nodes.len().checked_sub(1)
    }

    /// Returns the root, i.e. the last node, or `None` if empty.
    pub fn root(&self) -> Option<&Node> {
        self.nodes.last()
    }

    /// Returns the first node in closure order with the given label.
    ///
    /// # Errors
    /// [ParsingError::LabelNotFound] if no node has this label.
    pub fn find(&self, label: &str) -> Result<&Node, ParsingError> {
        self.nodes
            .iter()
            .find(|node| node.label() == label)
            .ok_or_else(|| ParsingError::LabelNotFound(label.to_string()))
    }

    /// Returns the index of the first node with the given label.
    ///
    /// # Errors
    /// [ParsingError::LabelNotFound] if no node has this label.
    pub fn find_index(&self, label: &str) -> Result<NodeIndex, ParsingError> {
        self.find(label).map(Node::index)
    }

    /// Returns an iterator over all leaves in closure order.
    pub fn leaves(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|node| node.is_leaf())
    }

    /// Returns an iterator over all non-empty labels in closure order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.nodes
            .iter()
            .map(Node::label)
            .filter(|label| !label.is_empty())
    }

    /// Returns the number of leaves.
    pub fn num_leaves(&self) -> usize {
        self.leaves().count()
    }

    /// Returns the number of nodes with children (including the root).
    pub fn num_internal(&self) -> usize {
        self.nodes.iter().filter(|node| !node.is_leaf()).count()
    }

    /// Returns the sum of all given branch lengths.
    pub fn total_branch_length(&self) -> f64 {
        self.nodes.iter().filter_map(Node::length).sum()
    }

    /// Checks if all non-root nodes have branch lengths set.
    pub fn nodes_have_branch_lengths(&self) -> bool {
        self.nodes
            .iter()
            .all(|node| node.is_root() || node.has_length())
    }

    /// Returns the number of edges between the node at `index` and the root
    /// (0 for an out-of-bounds `index`).
    pub fn depth_of(&self, index: NodeIndex) -> usize {
        self.ancestors(index).count()
    }

    /// Returns the sum of branch lengths on the path from the node at
    /// `index` up to the root (missing lengths count as zero, the root's own
    /// length is not included).
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn distance_to_root(&self, index: NodeIndex) -> f64 {
        let mut distance = 0.0;
        let mut current = &self[index];
        while let Some(parent) = current.parent() {
            distance += current.length().unwrap_or(0.0);
            current = &self[parent];
        }
        distance
    }

    /// Validates the tree structure and all index references.
    ///
    /// Checks:
    /// - All node indices match their position in the arena
    /// - All child indices are valid and point back to correct parent
    /// - All parent indices are valid and include this node as a child
    /// - Exactly one node has no parent and it is the last node
    /// - Children come before their parent (closure order, hence acyclic)
    ///
    /// # Returns
    /// `true` if tree is valid (an empty tree is valid), `false` otherwise
    pub fn is_valid(&self) -> bool {
        let len = self.nodes.len();
        let mut num_roots = 0;

        for (index, node) in self.nodes.iter().enumerate() {
            if node.index() != index {
                return false;
            }

            for &child in node.children() {
                if child >= index || self.nodes[child].parent() != Some(index) {
                    return false;
                }
            }

            match node.parent() {
                None => num_roots += 1,
                Some(parent) => {
                    if parent >= len || !self.nodes[parent].children().contains(&index) {
                        return false;
                    }
                }
            }
        }

        len == 0 || (num_roots == 1 && self.nodes[len - 1].is_root())
    }
}

impl std::ops::Index<NodeIndex> for Tree {
    type Output = Node;

    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.nodes[index]
    }
}

// ============================================================================
// Printing (pub)
// ============================================================================
impl Tree {
    /// Returns the Newick string of this tree in [NewickStyle::Plain],
    /// terminated by `;`, or an empty string for an empty tree.
    pub fn to_newick(&self) -> String {
        writer::to_newick(NewickStyle::Plain, self)
    }

    /// Returns the Newick string of this tree in the given style.
    pub fn to_newick_with_style(&self, style: NewickStyle) -> String {
        writer::to_newick(style, self)
    }

    /// Returns the Newick string of the subtree rooted at `index`
    /// in [NewickStyle::Plain], without terminating `;`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn to_newick_at(&self, index: NodeIndex) -> String {
        writer::subtree_to_newick(NewickStyle::Plain, self, index)
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_newick())
    }
}

// =$========================================================================$=
// ITERATORS
// =$========================================================================$=
impl Tree {
    /// Returns an iterator over the subtree of `start` in breadth-first order.
    ///
    /// Children are visited in declaration order. An out-of-bounds `start`
    /// yields nothing.
    ///
    /// # Example
    /// ```
    /// use newick_arena::parse_str;
    ///
    /// let tree = parse_str("((A1,A2)B,(C,D)E)F;")?;
    /// let root = tree.root_index().unwrap();
    /// let labels: Vec<_> = tree.breadth_first_iter(root).map(|n| n.label()).collect();
    /// assert_eq!(labels, ["F", "B", "E", "A1", "A2", "C", "D"]);
    /// # Ok::<(), newick_arena::ParsingError>(())
    /// ```
    pub fn breadth_first_iter(&self, start: NodeIndex) -> BreadthFirstIter<'_> {
        BreadthFirstIter::new(self, start)
    }

    /// Returns an iterator over the subtree of `start` in depth-first
    /// pre-order, visiting siblings in *reverse* declaration order.
    ///
    /// # Example
    /// ```
    /// use newick_arena::parse_str;
    ///
    /// let tree = parse_str("((A1,A2)B,(C,D)E)F;")?;
    /// let root = tree.root_index().unwrap();
    /// let labels: Vec<_> = tree.depth_first_iter(root).map(|n| n.label()).collect();
    /// assert_eq!(labels, ["F", "E", "D", "C", "B", "A2", "A1"]);
    /// # Ok::<(), newick_arena::ParsingError>(())
    /// ```
    pub fn depth_first_iter(&self, start: NodeIndex) -> DepthFirstIter<'_> {
        DepthFirstIter::new(self, start)
    }

    /// Returns an iterator over the tree in post-order (children before
    /// parents, siblings in declaration order), starting from the root.
    pub fn post_order_iter(&self) -> PostOrderIter<'_> {
        PostOrderIter::new(self)
    }

    /// Returns an iterator over the ancestors of the node at `index`,
    /// from its parent up to the root.
    pub fn ancestors(&self, index: NodeIndex) -> AncestorIter<'_> {
        AncestorIter {
            tree: self,
            next: self.node(index).and_then(Node::parent),
        }
    }
}

/// Iterator for breadth-first traversal.
///
/// Uses a FIFO queue: the front node is yielded and its children are
/// appended in declaration order.
pub struct BreadthFirstIter<'a> {
    tree: &'a Tree,
    queue: VecDeque<NodeIndex>,
}

impl<'a> BreadthFirstIter<'a> {
    fn new(tree: &'a Tree, start: NodeIndex) -> Self {
        let mut queue = VecDeque::new();
        if start < tree.len() {
            queue.push_back(start);
        }
        BreadthFirstIter { tree, queue }
    }
}

impl<'a> Iterator for BreadthFirstIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.queue.pop_front()?;
        let node = &self.tree[index];
        self.queue.extend(node.children());
        Some(node)
    }
}

/// Iterator for depth-first traversal.
///
/// A double-ended queue used as a stack at its front: the front node is
/// yielded and its children are pushed to the front one after the other in
/// declaration order. The last child thus ends up in front, so sibling
/// subtrees are visited last-to-first.
pub struct DepthFirstIter<'a> {
    tree: &'a Tree,
    deque: VecDeque<NodeIndex>,
}

impl<'a> DepthFirstIter<'a> {
    fn new(tree: &'a Tree, start: NodeIndex) -> Self {
        let mut deque = VecDeque::new();
        if start < tree.len() {
            deque.push_front(start);
        }
        DepthFirstIter { tree, deque }
    }
}

impl<'a> Iterator for DepthFirstIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.deque.pop_front()?;
        let node = &self.tree[index];
        for &child in node.children() {
            self.deque.push_front(child);
        }
        Some(node)
    }
}

/// Iterator for post-order traversal (children before parents).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
/// Each node is visited after all its descendants have been visited.
pub struct PostOrderIter<'a> {
    tree: &'a Tree,
    stack: Vec<(NodeIndex, bool)>, // (index, children_visited)
}

impl<'a> PostOrderIter<'a> {
    fn new(tree: &'a Tree) -> Self {
        let stack = tree.root_index().map(|root| (root, false)).into_iter().collect();
        PostOrderIter { tree, stack }
    }
}

impl<'a> Iterator for PostOrderIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((index, children_visited)) = self.stack.pop() {
            let node = &self.tree[index];

            if children_visited || node.is_leaf() {
                return Some(node);
            }

            self.stack.push((index, true));
            // Push children last-to-first, so the first child is processed first
            for &child in node.children().iter().rev() {
                self.stack.push((child, false));
            }
        }
        None
    }
}

/// Iterator over the ancestors of a node, nearest first.
pub struct AncestorIter<'a> {
    tree: &'a Tree,
    next: Option<NodeIndex>,
}

impl<'a> Iterator for AncestorIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.tree.node(self.next?)?;
        self.next = node.parent();
        Some(node)
    }
}
