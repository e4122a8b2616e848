//! Structs and logic to parse Newick strings.
//!
//! This module provides the [NewickParser] struct, which offers methods
//! to parse single trees or all trees of a string, as well as lazy parsing
//! via a [NewickIterator].
//!
//! # State machine
//! Tokens from the [Tokenizer] are consumed once. Besides the stack of open
//! frames (kept by the [TreeBuilder]), the parser tracks a lexical mode and
//! whether a branch length is pending after `:`. For each separator
//! character, in priority order:
//! 1. In a comment, everything but `]` is comment text.
//! 2. In a quoted label, everything but `'` is label text; `''` is a
//!    literal quote.
//! 3. Otherwise the character is dispatched: `(` opens a child frame, `)`
//!    closes one, `,` closes one and opens its sibling, `;` closes the tree,
//!    `:` announces a length, `'` starts quoting, `[` starts a comment.

use crate::model::{Tree, TreeBuilder};
use crate::newick::defs::{
    DEFAULT_CAPACITY_HINT, LINE_BREAKS, NEWICK_SEPARATORS, UNQUOTED_LABEL_STRIPPED,
};
use crate::parser::tokenizer::{Token, TokenKind, Tokenizer};
use crate::parser::{MalformedReason, ParsingError};
use std::io::Read;
use tracing::{debug, trace, warn};

// =#========================================================================#=
// MALFORMED POLICY
// =#========================================================================$=
/// How the parser reacts to structurally invalid input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedPolicy {
    /// Fail with [ParsingError::MalformedTree] at the first irregularity.
    #[default]
    Strict,
    /// Skip irregularities (logging a warning) and build whatever tree
    /// results: stray `)` and `]` are ignored, a `(` after a label, length,
    /// or group adds children to that node, a `:` without value stays
    /// pending, later lengths overwrite earlier ones, open frames are closed
    /// at `;` or end of input, and content after the first `;` is ignored.
    Lenient,
}

// =#========================================================================#=
// NEWICK PARSER
// =#========================================================================$=
/// Parser (configuration) for Newick trees.
///
/// # Configuration
/// * [`with_policy(policy)`](Self::with_policy)
///     - How to handle malformed input, see [MalformedPolicy].
/// * [`with_underscores_as_spaces(bool)`](Self::with_underscores_as_spaces)
///     - Whether `_` in unquoted labels is read as a space (default `true`).
/// * [`with_capacity_hint(num_nodes)`](Self::with_capacity_hint)
///     - Expected number of nodes per tree, for pre-allocation. If not set,
///       it is taken from the last parsed tree.
///
/// # Parsing
/// * [`parse_str`](Self::parse_str) - Parse a single tree
/// * [`parse_reader`](Self::parse_reader) - Read a stream fully, parse a single tree
/// * [`parse_all`](Self::parse_all) - Parse all `;`-terminated trees eagerly
/// * [`into_tree_iter`](Self::into_tree_iter) - Parse trees lazily
///
/// # Example
/// ```
/// use newick_arena::newick::{MalformedPolicy, NewickParser};
///
/// let mut parser = NewickParser::new().with_policy(MalformedPolicy::Lenient);
/// let tree = parser.parse_str("((Anas_platyrhynchos:1.0,Aythya_fuligula:1.0))):0.5;")?;
/// assert_eq!(tree.num_leaves(), 2);
/// assert!(tree.find("Anas platyrhynchos").is_ok());
/// # Ok::<(), newick_arena::ParsingError>(())
/// ```
#[derive(Debug, Clone)]
pub struct NewickParser {
    policy: MalformedPolicy,
    underscores_as_spaces: bool,
    know_capacity: bool,
    capacity_hint: usize,
}

// ============================================================================
// Construction & Configuration (pub)
// ============================================================================
impl NewickParser {
    /// Creates a new [NewickParser] with default settings:
    /// - [MalformedPolicy::Strict]
    /// - Underscores in unquoted labels are read as spaces
    /// - Capacity is inferred from parsed trees
    pub fn new() -> Self {
        Self {
            policy: MalformedPolicy::Strict,
            underscores_as_spaces: true,
            know_capacity: false,
            capacity_hint: DEFAULT_CAPACITY_HINT,
        }
    }

    /// Sets the policy for malformed input.
    pub fn with_policy(mut self, policy: MalformedPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets whether `_` in unquoted labels is read as a space.
    pub fn with_underscores_as_spaces(mut self, underscores_as_spaces: bool) -> Self {
        self.underscores_as_spaces = underscores_as_spaces;
        self
    }

    /// Sets the expected number of nodes in each parsed tree.
    ///
    /// This allows pre-allocation of data structures for better performance.
    pub fn with_capacity_hint(mut self, num_nodes: usize) -> Self {
        self.capacity_hint = num_nodes;
        self.know_capacity = true;
        self
    }

    /// Returns the configured [MalformedPolicy].
    pub fn policy(&self) -> MalformedPolicy {
        self.policy
    }
}

impl Default for NewickParser {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// API Parsing (pub)
// ============================================================================
impl NewickParser {
    /// Parses a single Newick tree.
    ///
    /// The terminating `;` is optional. Under [MalformedPolicy::Strict],
    /// anything but whitespace after the `;` is an error; under
    /// [MalformedPolicy::Lenient] it is ignored. Empty or blank input yields
    /// an empty tree.
    ///
    /// # Returns
    /// * `Ok(Tree)` - The parsed tree
    /// * `Err(ParsingError)` - If a branch length is not a number or,
    ///   under the strict policy, the string is malformed
    pub fn parse_str(&mut self, input: &str) -> Result<Tree, ParsingError> {
        let (tree, end) = self.parse_tree_at(input, 0)?;

        if let Some(end) = end {
            let rest = &input[end..];
            let trimmed = rest.trim_start();
            if !trimmed.is_empty() {
                let position = end + (rest.len() - trimmed.len());
                self.irregular(MalformedReason::TrailingContent, input, position)?;
            }
        }

        Ok(tree)
    }

    /// Reads the stream to its end and parses a single Newick tree from it.
    ///
    /// # Errors
    /// Additionally to [`parse_str`](Self::parse_str), fails with
    /// [ParsingError::Io] if reading fails or the input is not UTF-8.
    pub fn parse_reader<R: Read>(&mut self, mut reader: R) -> Result<Tree, ParsingError> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        self.parse_str(&input)
    }

    /// Parses all `;`-separated Newick trees of the input.
    ///
    /// # Returns
    /// * `Ok(Vec<Tree>)` - All parsed trees
    /// * `Err(ParsingError)` - If any tree fails to parse
    pub fn parse_all(&mut self, input: &str) -> Result<Vec<Tree>, ParsingError> {
        let mut trees = Vec::new();
        let mut offset = 0;
        while !input[offset..].trim().is_empty() {
            let (tree, end) = self.parse_tree_at(input, offset)?;
            trees.push(tree);
            match end {
                Some(end) => offset = end,
                None => break,
            }
        }
        Ok(trees)
    }

    /// Consumes the parser and returns an iterator over the trees of `input`.
    ///
    /// The parser can be retrieved again via [NewickIterator::into_parser].
    pub fn into_tree_iter(self, input: &str) -> NewickIterator<'_> {
        NewickIterator {
            parser: self,
            input,
            offset: 0,
            done: false,
        }
    }
}

// ============================================================================
// Parsing
// ============================================================================
impl NewickParser {
    /// Parses one tree starting at byte `offset`.
    ///
    /// # Returns
    /// The tree and, if it was terminated by `;`, the offset just past it.
    fn parse_tree_at(
        &mut self,
        input: &str,
        offset: usize,
    ) -> Result<(Tree, Option<usize>), ParsingError> {
        let mut machine = StateMachine::new(self, input);
        let mut end = None;

        for token in Tokenizer::starting_at(input, NEWICK_SEPARATORS, offset) {
            let terminated = match token.kind() {
                TokenKind::Separators => machine.on_separators(&token)?,
                TokenKind::Value => {
                    machine.on_value(&token)?;
                    None
                }
            };
            if terminated.is_some() {
                end = terminated;
                break;
            }
        }

        if end.is_none() {
            machine.on_end_of_input()?;
        }

        let tree = machine.finish();
        debug!(nodes = tree.len(), terminated = end.is_some(), "parsed Newick tree");

        // Having parsed a full tree, its size is a good guess for the next
        if !self.know_capacity {
            self.capacity_hint = tree.len().max(DEFAULT_CAPACITY_HINT);
        }

        Ok((tree, end))
    }

    /// Reports an irregularity according to the policy.
    fn irregular(
        &self,
        reason: MalformedReason,
        input: &str,
        position: usize,
    ) -> Result<(), ParsingError> {
        report(self.policy, reason, input, position)
    }
}

fn report(
    policy: MalformedPolicy,
    reason: MalformedReason,
    input: &str,
    position: usize,
) -> Result<(), ParsingError> {
    match policy {
        MalformedPolicy::Strict => Err(ParsingError::malformed(reason, input, position)),
        MalformedPolicy::Lenient => {
            warn!(%reason, position, "ignoring malformed Newick input");
            Ok(())
        }
    }
}

// =#========================================================================#=
// STATE MACHINE
// =#========================================================================$=
/// Lexical mode of the parser; quoting and comments exclude each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    Quoted,
    Comment,
}

/// Parsing state for a single tree.
struct StateMachine<'a> {
    input: &'a str,
    policy: MalformedPolicy,
    underscores_as_spaces: bool,
    builder: TreeBuilder,
    mode: Mode,
    length_pending: bool,
    /// Number of `(` not yet closed
    open_groups: usize,
}

impl<'a> StateMachine<'a> {
    fn new(config: &NewickParser, input: &'a str) -> Self {
        Self {
            input,
            policy: config.policy,
            underscores_as_spaces: config.underscores_as_spaces,
            builder: TreeBuilder::with_capacity(config.capacity_hint),
            mode: Mode::Normal,
            length_pending: false,
            open_groups: 0,
        }
    }

    /// Processes a separator run character by character.
    ///
    /// # Returns
    /// `Some(offset)` just past the `;` if the tree was terminated.
    fn on_separators(&mut self, token: &Token) -> Result<Option<usize>, ParsingError> {
        // Separators are ASCII, so bytes are chars
        let bytes = token.text().as_bytes();
        let mut i = 0;

        while i < bytes.len() {
            let c = bytes[i];
            let position = token.position() + i;
            i += 1;

            match self.mode {
                Mode::Comment if c != b']' => {
                    self.builder.push_comment_char(c as char);
                    continue;
                }
                Mode::Quoted if c != b'\'' => {
                    self.builder.push_label_char(c as char);
                    continue;
                }
                Mode::Quoted => {
                    if bytes.get(i) == Some(&b'\'') {
                        // Escaped quote
                        self.builder.push_label_char('\'');
                        i += 1;
                    } else {
                        self.mode = Mode::Normal;
                    }
                    continue;
                }
                _ => {}
            }

            match c {
                b'(' => self.open_group(position)?,
                b')' => self.close_group(position)?,
                b',' => self.next_sibling(position)?,
                b';' => {
                    self.terminate(position)?;
                    return Ok(Some(position + 1));
                }
                b':' => self.announce_length(position)?,
                b'\'' => {
                    self.ensure_frame();
                    self.mode = Mode::Quoted;
                }
                b'[' => {
                    self.ensure_frame();
                    self.mode = Mode::Comment;
                }
                b']' => {
                    if self.mode == Mode::Comment {
                        self.mode = Mode::Normal;
                    } else {
                        self.irregular(MalformedReason::UnmatchedCommentClose, position)?;
                    }
                }
                _ => {}
            }
        }

        Ok(None)
    }

    /// Processes a value token: comment text, branch length, or label text.
    fn on_value(&mut self, token: &Token) -> Result<(), ParsingError> {
        let text = token.text();
        match self.mode {
            Mode::Comment => {
                self.builder.push_comment(&text.replace(LINE_BREAKS, ""));
            }
            Mode::Quoted => {
                self.builder.push_label(&text.replace(LINE_BREAKS, ""));
            }
            Mode::Normal if self.length_pending => {
                let value = text.trim();
                if value.is_empty() {
                    return Ok(());
                }
                let length: f64 = value.parse().map_err(|source| {
                    ParsingError::invalid_branch_length(value, token.position(), source)
                })?;
                if self.builder.current().is_some_and(|node| node.has_length()) {
                    self.irregular(MalformedReason::DuplicateBranchLength, token.position())?;
                }
                self.builder.set_length(length);
                self.length_pending = false;
            }
            Mode::Normal => {
                let label: String = text
                    .chars()
                    .filter(|c| !UNQUOTED_LABEL_STRIPPED.contains(c))
                    .map(|c| {
                        if c == '_' && self.underscores_as_spaces {
                            ' '
                        } else {
                            c
                        }
                    })
                    .collect();
                if label.is_empty() {
                    return Ok(());
                }
                self.ensure_frame();
                self.builder.push_label(&label);
            }
        }
        Ok(())
    }

    /// Checks for unterminated constructs once the input is exhausted.
    fn on_end_of_input(&mut self) -> Result<(), ParsingError> {
        let position = self.input.len();
        match self.mode {
            Mode::Quoted => self.irregular(MalformedReason::UnterminatedQuote, position)?,
            Mode::Comment => self.irregular(MalformedReason::UnterminatedComment, position)?,
            Mode::Normal => {}
        }
        self.check_no_pending_length(position)?;
        if self.open_groups > 0 {
            self.irregular(MalformedReason::UnclosedGroup, position)?;
        }
        self.builder.close_all();
        Ok(())
    }

    fn finish(self) -> Tree {
        self.builder.finish()
    }

    // --- dispatch ---

    fn open_group(&mut self, position: usize) -> Result<(), ParsingError> {
        self.check_no_pending_length(position)?;
        self.ensure_frame();
        // Children must come before label and length, and only once
        if self.builder.current().is_some_and(|node| {
            !node.label().is_empty() || node.has_length() || !node.is_leaf()
        }) {
            self.irregular(MalformedReason::UnexpectedGroup, position)?;
        }
        self.builder.open_child();
        self.open_groups += 1;
        Ok(())
    }

    fn close_group(&mut self, position: usize) -> Result<(), ParsingError> {
        self.check_no_pending_length(position)?;
        if self.open_groups == 0 {
            return self.irregular(MalformedReason::UnmatchedClose, position);
        }
        self.builder.close();
        self.open_groups -= 1;
        Ok(())
    }

    fn next_sibling(&mut self, position: usize) -> Result<(), ParsingError> {
        self.check_no_pending_length(position)?;
        self.ensure_frame();
        self.builder.close_and_open_sibling();
        Ok(())
    }

    fn terminate(&mut self, position: usize) -> Result<(), ParsingError> {
        self.check_no_pending_length(position)?;
        if self.open_groups > 0 {
            self.irregular(MalformedReason::UnclosedGroup, position)?;
        }
        self.ensure_frame();
        self.builder.close_all();
        trace!(position, "tree terminated by ';'");
        Ok(())
    }

    fn announce_length(&mut self, position: usize) -> Result<(), ParsingError> {
        self.check_no_pending_length(position)?;
        self.ensure_frame();
        self.length_pending = true;
        Ok(())
    }

    // --- helpers ---

    /// Opens the top-level frame if nothing is open yet.
    fn ensure_frame(&mut self) {
        if !self.builder.has_open_frames() {
            self.builder.open_child();
        }
    }

    fn check_no_pending_length(&self, position: usize) -> Result<(), ParsingError> {
        if self.length_pending {
            self.irregular(MalformedReason::MissingBranchLength, position)?;
        }
        Ok(())
    }

    fn irregular(&self, reason: MalformedReason, position: usize) -> Result<(), ParsingError> {
        report(self.policy, reason, self.input, position)
    }
}

// =#========================================================================#=
// NEWICK ITERATOR (lazy parser)
// =#========================================================================$=
/// Iterator to parse the `;`-separated Newick trees of a string.
///
/// Created by [NewickParser::into_tree_iter()].
/// Yields `Result<Tree, ParsingError>` for each tree. After the first error,
/// iteration stops; trees yielded before are unaffected.
pub struct NewickIterator<'a> {
    parser: NewickParser,
    input: &'a str,
    offset: usize,
    done: bool,
}

impl NewickIterator<'_> {
    /// Consumes the iterator and returns the underlying [NewickParser].
    pub fn into_parser(self) -> NewickParser {
        self.parser
    }

    /// Returns the byte offset at which the next tree starts.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl Iterator for NewickIterator<'_> {
    type Item = Result<Tree, ParsingError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.input[self.offset..].trim().is_empty() {
            self.done = true;
            return None;
        }

        match self.parser.parse_tree_at(self.input, self.offset) {
            Ok((tree, Some(end))) => {
                trace!(from = self.offset, to = end, "resuming after ';'");
                self.offset = end;
                Some(Ok(tree))
            }
            Ok((tree, None)) => {
                self.offset = self.input.len();
                self.done = true;
                Some(Ok(tree))
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
