//! Data model for phylogenetic trees of arbitrary degree.
//!
//! # Tree representation
//! Trees are represented by [Tree], which uses the arena pattern to store
//! [Node]s, referenced by [NodeIndex]. Parent links are plain indices used
//! for navigation only; the tree owns every node.
//!
//! Nodes are kept in *closure order*, the order in which their subtrees were
//! completed while parsing. Children therefore precede their parents, and
//! the root is the last node.
//!
//! # Building trees
//! Trees are constructed by the [Newick parser](crate::newick::NewickParser)
//! through a [TreeBuilder], which maintains the stack of open frames. The
//! builder may also be used directly.
//!
//! # Annotations
//! Comments in extended Newick style (`[&key=value]`, `[&&NHX:key=value]`)
//! can be read as typed key-value pairs, see [annotation].

pub mod annotation;
pub mod node;
pub mod tree;
pub mod tree_builder;

pub use annotation::AnnotationValue;
pub use node::{Node, NodeIndex};
pub use tree::{AncestorIter, BreadthFirstIter, DepthFirstIter, PostOrderIter, Tree};
pub use tree_builder::TreeBuilder;
