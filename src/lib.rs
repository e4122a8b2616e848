//! Newick-arena is a library to parse phylogenetic trees of arbitrary degree
//! from Newick strings, traverse them, and write them back.
//!
//! Core functionality provided:
//! - Newick parsing: A single pass over the tokens of a Newick string with an
//!   explicit stack of open frames, so deeply nested trees are no problem.
//!   Quoted labels (with `''` escapes), bracketed comments, and branch
//!   lengths are supported.
//! - Tree model: [Tree] stores its [Node]s in an arena in *closure order*
//!   (children before parents, root last) and links them by [NodeIndex].
//!   See [crate::model] for more details.
//! - Traversal: Lazy breadth-first, depth-first, post-order, and ancestor
//!   iterators from any node.
//! - Writing: Render trees or subtrees to Newick, plain or with escaped
//!   labels and comments.
//! - Configurability:
//!   - Strict (default) or lenient handling of malformed input
//!   - Underscores in unquoted labels read as spaces or kept
//!   - Eager parsing of all trees of a string or lazy via an iterator
//!
//! # Usage patterns
//! 1. Quick functions parse with default settings, see below and
//!    [crate::newick].
//! 2. Configure a [NewickParser](crate::newick::NewickParser) for full
//!    control.
//!
//! ## Example Default Configuration
//! ```
//! use newick_arena::parse_str;
//!
//! let tree = parse_str("((A1,A2)B,(C,D)E)F;")?;
//! assert_eq!(tree.len(), 7);
//! assert_eq!(tree.num_leaves(), 4);
//!
//! let e = tree.find_index("E")?;
//! assert_eq!(tree.to_newick_at(e), "(C,D)E");
//! # Ok::<(), newick_arena::ParsingError>(())
//! ```
//!
//! ## Example Parser Configuration
//! ```
//! use newick_arena::newick::{MalformedPolicy, NewickParser};
//!
//! let parser = NewickParser::new()
//!     .with_policy(MalformedPolicy::Lenient) // Skip malformed parts
//!     .with_underscores_as_spaces(false);    // Keep "_" in labels
//!
//! let labels: Vec<String> = parser
//!     .into_tree_iter("(Homo_sapiens,Pan);(Gorilla,Pongo));")
//!     .flatten()
//!     .flat_map(|tree| tree.labels().map(String::from).collect::<Vec<_>>())
//!     .collect();
//! assert_eq!(labels, ["Homo_sapiens", "Pan", "Gorilla", "Pongo"]);
//! ```

pub mod model;
pub mod newick;
pub mod parser;

pub use crate::model::{Node, NodeIndex, Tree, TreeBuilder};
pub use crate::parser::{MalformedReason, ParsingError};

use std::io::Read;

// ============================================================================
// Quick Newick API
// ============================================================================
/// Parse a single Newick string using default settings.
///
/// See [`newick::parse_str`] for full documentation of this convenience function.
pub fn parse_str<S: AsRef<str>>(newick: S) -> Result<Tree, ParsingError> {
    newick::parse_str(newick)
}

/// Read a stream fully and parse a single Newick tree using default settings.
///
/// See [`newick::parse_reader`] for full documentation of this convenience function.
pub fn parse_reader<R: Read>(reader: R) -> Result<Tree, ParsingError> {
    newick::parse_reader(reader)
}

/// Parse all `;`-terminated Newick trees of a string using default settings.
///
/// See [`newick::parse_all`] for full documentation of this convenience function.
pub fn parse_all<S: AsRef<str>>(newick: S) -> Result<Vec<Tree>, ParsingError> {
    newick::parse_all(newick)
}
