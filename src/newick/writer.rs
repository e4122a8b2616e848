//! Newick format writing for [Tree]s.
//!
//! Rendering is iterative, so arbitrarily deep trees can be written.

use crate::model::{NodeIndex, Tree};
use crate::newick::defs::NEWICK_SEPARATORS;
use std::borrow::Cow;
use std::io::{self, Write};

/// Extra buffer in Newick string length/capacity estimate
const BUFFER_CHARS: usize = 10;

/// Style for serializing a tree to Newick format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NewickStyle {
    /// Labels verbatim, followed by `:length` if present; comments are
    /// dropped. Re-parses to the same tree for labels without separators,
    /// whitespace, or underscores.
    #[default]
    Plain,
    /// Labels escaped (see [escape_label]) and comments written back as
    /// `[...]`, so that labels re-parse to the same strings.
    ///
    /// Newick cannot express line breaks in labels or comments, nor `]` in
    /// comments. Parsed trees never contain them; for trees built with a
    /// [TreeBuilder](crate::model::TreeBuilder), `]` is left out of written
    /// comments and line breaks are lost when reading the output back.
    Escaped,
}

/// Writes given list of trees to a writer in Newick format, one tree per line.
///
/// Empty trees are written as empty lines.
///
/// # Errors
/// Returns an I/O error if writing fails.
///
/// # Example
/// ```
/// use newick_arena::newick::{NewickStyle, write_newick};
/// use newick_arena::parse_str;
///
/// let trees = vec![parse_str("(A,B)C;")?, parse_str("('x y',z);")?];
/// let mut out = Vec::new();
/// write_newick(&mut out, &trees, NewickStyle::Escaped)?;
/// assert_eq!(String::from_utf8(out).unwrap(), "(A,B)C;\n(x_y,z);\n");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn write_newick<W: Write>(writer: W, trees: &[Tree], style: NewickStyle) -> io::Result<()> {
    let mut writer = io::BufWriter::new(writer);
    for tree in trees {
        writer.write_all(to_newick(style, tree).as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

/// Returns the Newick representation of a tree with closing semicolon.
///
/// # Returns
/// The root's rendering followed by `;`, or an empty string for an empty tree.
///
/// # Example
/// ```
/// use newick_arena::newick::{NewickStyle, to_newick};
/// use newick_arena::parse_str;
///
/// let tree = parse_str("((B:0.2,(C:0.3,D:0.4)E:0.5)F:0.1)A;")?;
/// assert_eq!(to_newick(NewickStyle::Plain, &tree), "((B:0.2,(C:0.3,D:0.4)E:0.5)F:0.1)A;");
/// # Ok::<(), newick_arena::ParsingError>(())
/// ```
pub fn to_newick(style: NewickStyle, tree: &Tree) -> String {
    let Some(root) = tree.root_index() else {
        return String::new();
    };
    let mut newick = subtree_to_newick(style, tree, root);
    newick.push(';');
    newick
}

/// Returns the Newick representation of the subtree rooted at `index`,
/// without closing semicolon.
///
/// A leaf is rendered as its label plus optional `:length`; an inner node as
/// `(` + its children's renderings joined by `,` + `)` + label + optional
/// `:length`.
///
/// # Panics
/// Panics if `index` is out of bounds.
pub fn subtree_to_newick(style: NewickStyle, tree: &Tree, index: NodeIndex) -> String {
    /// Pending output steps, processed from the top of the stack
    enum Step {
        Enter(NodeIndex),
        Comma,
        Close(NodeIndex),
    }

    let mut newick = String::with_capacity(estimate_newick_len(tree));
    let mut stack = vec![Step::Enter(index)];

    while let Some(step) = stack.pop() {
        match step {
            Step::Enter(index) => {
                let node = &tree[index];
                if node.is_leaf() {
                    push_node_suffix(&mut newick, style, tree, index);
                } else {
                    newick.push('(');
                    stack.push(Step::Close(index));
                    for (k, &child) in node.children().iter().enumerate().rev() {
                        stack.push(Step::Enter(child));
                        if k > 0 {
                            stack.push(Step::Comma);
                        }
                    }
                }
            }
            Step::Comma => newick.push(','),
            Step::Close(index) => {
                newick.push(')');
                push_node_suffix(&mut newick, style, tree, index);
            }
        }
    }

    newick
}

/// Appends label, comment (escaped style only), and branch length of a node.
fn push_node_suffix(newick: &mut String, style: NewickStyle, tree: &Tree, index: NodeIndex) {
    let node = &tree[index];
    match style {
        NewickStyle::Plain => newick.push_str(node.label()),
        NewickStyle::Escaped => {
            newick.push_str(&escape_label(node.label()));
            if !node.comment().is_empty() {
                newick.push('[');
                newick.extend(node.comment().chars().filter(|&c| c != ']'));
                newick.push(']');
            }
        }
    }

    if let Some(length) = node.length() {
        newick.push(':');
        newick.push_str(&length.to_string());
    }
}

/// Estimates the length of a Newick string for a given tree.
///
/// # Returns
/// Estimated number of characters needed for the Newick representation
fn estimate_newick_len(tree: &Tree) -> usize {
    // Each node: "(", ")" or "," ~= 2 chars
    const STRUCTURE_CHARS: usize = 2;
    // Branch lengths: ~8 chars each (e.g., ":0.00953")
    const BRANCH_LENGTH_CHARS: usize = 8;

    tree.nodes()
        .iter()
        .map(|node| {
            let length_chars = if node.has_length() { BRANCH_LENGTH_CHARS } else { 0 };
            STRUCTURE_CHARS + node.label().len() + length_chars
        })
        .sum::<usize>()
        + BUFFER_CHARS
}

/// Escapes a label so that the Newick parser reads it back unchanged.
///
/// Labels containing separators, underscores, tabs, or line breaks are
/// wrapped in single quotes, with internal single quotes doubled. Otherwise,
/// spaces are replaced with underscores (read back as spaces).
///
/// # Examples
/// ```
/// use newick_arena::newick::writer::escape_label;
///
/// assert_eq!(escape_label("Pukeko"), "Pukeko");
/// assert_eq!(escape_label("Australasian Swamphen"), "Australasian_Swamphen");
/// assert_eq!(escape_label("Pu[ke]ko"), "'Pu[ke]ko'");
/// assert_eq!(escape_label("Baillon's Crake"), "'Baillon''s Crake'");
/// assert_eq!(escape_label("Porphyrio_melanotus"), "'Porphyrio_melanotus'");
/// ```
pub fn escape_label(label: &str) -> Cow<'_, str> {
    let needs_quotes = label.chars().any(|c| {
        matches!(c, '_' | '\t' | '\n' | '\r') || (c.is_ascii() && NEWICK_SEPARATORS.contains(&(c as u8)))
    });

    if needs_quotes {
        Cow::Owned(format!("'{}'", label.replace('\'', "''")))
    } else if label.contains(' ') {
        Cow::Owned(label.replace(' ', "_"))
    } else {
        Cow::Borrowed(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_label_leaves_plain_labels() {
        assert!(matches!(escape_label("Kiwi"), Cow::Borrowed("Kiwi")));
        assert_eq!(escape_label(""), "");
    }

    #[test]
    fn test_escape_label_quotes_separators() {
        assert_eq!(escape_label("a,b"), "'a,b'");
        assert_eq!(escape_label("x:1"), "'x:1'");
        assert_eq!(escape_label("semi;colon"), "'semi;colon'");
        assert_eq!(escape_label("tab\there"), "'tab\there'");
    }

    #[test]
    fn test_escape_label_doubles_quotes() {
        assert_eq!(escape_label("'"), "''''");
        assert_eq!(escape_label("it's"), "'it''s'");
    }

    #[test]
    fn test_estimate_is_at_least_buffer() {
        assert_eq!(estimate_newick_len(&Tree::new()), BUFFER_CHARS);
    }
}
