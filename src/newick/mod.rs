//! Newick format parser and writer for phylogenetic trees.
//!
//! This module provides [`NewickParser`] to parse Newick format strings
//! into [`Tree`]s of arbitrary degree. The parser drives a
//! [`TreeBuilder`](crate::model::TreeBuilder) through an explicit stack of
//! open frames, so nesting depth is not bound by the call stack.
//!
//! # Quick API
//! For simple use cases with default settings:
//! * [`parse_str`] - parses a single string
//! * [`parse_reader`] - reads a stream fully and parses a single tree
//! * [`parse_all`] - parses all `;`-terminated trees of a string
//!
//! # Full API
//! For more control, configure a [`NewickParser`]:
//! * [`NewickParser::parse_str`] - parse a single tree
//! * [`NewickParser::parse_all`] - parse all trees until the end
//! * [`NewickParser::into_tree_iter`] - obtain an iterator over trees
//!
//! # Format
//! The Newick format has the following grammar:
//! * `tree ::= [node] [';']`
//! * `node ::= ['(' node (',' node)* ')'] [label] [comment] [':' number]`
//!
//! Furthermore:
//! * Whitespace, tabs and line breaks are dropped from unquoted labels, and
//!   `_` in unquoted labels is read as a space
//! * Labels in single quotes may contain separators and spaces; `''` stands
//!   for a literal quote
//! * Comments are in square brackets and are kept per node
//! * Commas at the top level make the preceding nodes children of an
//!   implicit root, so `(A,B),C` has five nodes
//!
//! In the extended Newick format, comments carry annotations such as
//! `[&rate=0.5,pop={1,2}]` or `[&&NHX:S=human]`. They are kept verbatim and
//! can be read with [`Node::annotations`](crate::model::Node::annotations).

mod defs;
pub mod parser;
pub mod writer;

pub use self::parser::{MalformedPolicy, NewickIterator, NewickParser};
pub use self::writer::{NewickStyle, to_newick, write_newick};

use crate::model::Tree;
use crate::parser::ParsingError;
use std::io::Read;

// ============================================================================
// QUICK PARSING API (pub)
// ============================================================================
/// Parses a single Newick string with default settings.
///
/// # Returns
/// * `Tree` - The parsed tree; empty for blank input
/// * [`ParsingError`] - If a branch length is not a number or the string is
///   malformed
///
/// # Example
/// ```
/// use newick_arena::newick::parse_str;
///
/// let tree = parse_str("((A:0.1,B:0.2):0.3,C:0.4);")?;
/// assert_eq!(tree.num_leaves(), 3);
/// assert_eq!(tree.root().map(|root| root.children().len()), Some(2));
/// # Ok::<(), newick_arena::ParsingError>(())
/// ```
pub fn parse_str<S: AsRef<str>>(newick: S) -> Result<Tree, ParsingError> {
    NewickParser::new().parse_str(newick.as_ref())
}

/// Reads the stream to its end and parses a single Newick tree with default
/// settings.
///
/// # Example
/// ```
/// use newick_arena::newick::parse_reader;
///
/// let tree = parse_reader("(Kea,Kaka)Nestor;".as_bytes())?;
/// assert_eq!(tree.root().map(|root| root.label()), Some("Nestor"));
/// # Ok::<(), newick_arena::ParsingError>(())
/// ```
pub fn parse_reader<R: Read>(reader: R) -> Result<Tree, ParsingError> {
    NewickParser::new().parse_reader(reader)
}

/// Parses all `;`-terminated Newick trees of a string with default settings.
///
/// Trees may be spread over several lines or share one line.
///
/// # Example
/// ```
/// use newick_arena::newick::parse_all;
///
/// let trees = parse_all("(A,B);\n(A,(B,C));\n")?;
/// assert_eq!(trees.len(), 2);
/// assert_eq!(trees[1].num_leaves(), 3);
/// # Ok::<(), newick_arena::ParsingError>(())
/// ```
pub fn parse_all<S: AsRef<str>>(newick: S) -> Result<Vec<Tree>, ParsingError> {
    NewickParser::new().parse_all(newick.as_ref())
}
