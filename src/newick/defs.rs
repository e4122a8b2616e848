//! Constants and definitions for Newick parsing and writing.

/// Newick separators: grouping, sibling, length, terminator, quote, comment
pub(crate) const NEWICK_SEPARATORS: &[u8] = b"(),:;'[]";

/// Characters dropped from unquoted labels
pub(crate) const UNQUOTED_LABEL_STRIPPED: &[char] = &[' ', '\t', '\n', '\r'];

/// Characters dropped from quoted labels and comments
pub(crate) const LINE_BREAKS: &[char] = &['\n', '\r'];

/// Default guess for number of nodes in a tree, when unknown
pub(crate) const DEFAULT_CAPACITY_HINT: usize = 16;
