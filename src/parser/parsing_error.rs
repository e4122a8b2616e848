//! Error types for the Newick parser and tree lookups.
//!
//! This module provides [ParsingError], the error type shared by all
//! operations of this crate, and [MalformedReason] describing why a Newick
//! string was rejected under the
//! [strict policy](crate::newick::MalformedPolicy::Strict).

use std::num::ParseFloatError;
use thiserror::Error;

/// Default length of context provided by error from parser
pub(crate) const DEFAULT_CONTEXT_LENGTH: usize = 50;

// =#========================================================================#=
// PARSING ERROR
// =#========================================================================$=
/// Errors that can occur while parsing Newick strings or querying a
/// [Tree](crate::model::Tree).
#[derive(Debug, Error)]
pub enum ParsingError {
    /// Text following a `:` could not be read as a floating point number.
    #[error("Invalid branch length {value:?} at position {position}")]
    InvalidBranchLength {
        /// Offending text (trimmed)
        value: String,
        /// Byte offset of the value token in the input
        position: usize,
        /// Underlying float parsing error
        #[source]
        source: ParseFloatError,
    },

    /// No node carries the requested label.
    #[error("No node labelled {0:?}")]
    LabelNotFound(String),

    /// Structurally invalid separator sequence.
    #[error("Invalid newick string: {reason} at position {position}{ctx}", ctx = context_suffix(.context))]
    MalformedTree {
        /// What exactly was wrong
        reason: MalformedReason,
        /// Byte offset where the problem was detected
        position: usize,
        /// Input following `position`, for error messages
        context: String,
    },

    /// Reading the input stream failed.
    #[error("IO error - {0}")]
    Io(#[from] std::io::Error),
}

impl ParsingError {
    /// Creates a [ParsingError::MalformedTree] with context taken from `input`
    /// starting at `position`.
    pub(crate) fn malformed(reason: MalformedReason, input: &str, position: usize) -> Self {
        let context = input
            .get(position..)
            .unwrap_or_default()
            .chars()
            .take(DEFAULT_CONTEXT_LENGTH)
            .collect();
        Self::MalformedTree {
            reason,
            position,
            context,
        }
    }

    /// Creates a [ParsingError::InvalidBranchLength].
    pub(crate) fn invalid_branch_length(
        value: &str,
        position: usize,
        source: ParseFloatError,
    ) -> Self {
        Self::InvalidBranchLength {
            value: value.to_string(),
            position,
            source,
        }
    }

    /// Returns the byte offset in the input where the error occurred,
    /// if the error is tied to a position.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::InvalidBranchLength { position, .. } | Self::MalformedTree { position, .. } => {
                Some(*position)
            }
            Self::LabelNotFound(_) | Self::Io(_) => None,
        }
    }

    /// Returns the [MalformedReason] if this is a [ParsingError::MalformedTree].
    pub fn malformed_reason(&self) -> Option<MalformedReason> {
        match self {
            Self::MalformedTree { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}

fn context_suffix(context: &str) -> String {
    if context.is_empty() {
        String::new()
    } else {
        format!("\n  Context (next {} bytes): {}", context.len(), context)
    }
}

// =#========================================================================#=
// MALFORMED REASON
// =#========================================================================$=
/// Reasons for rejecting a Newick string as structurally invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MalformedReason {
    /// `)` without a matching `(`
    #[error("unmatched ')'")]
    UnmatchedClose,
    /// `(` for a node that already has a label, a length, or children
    #[error("unexpected '(' after label, length or group")]
    UnexpectedGroup,
    /// `;` or end of input while a `(` is still open
    #[error("unclosed '('")]
    UnclosedGroup,
    /// `]` outside of a comment
    #[error("unmatched ']'")]
    UnmatchedCommentClose,
    /// End of input inside a `[...]` comment
    #[error("unterminated comment")]
    UnterminatedComment,
    /// End of input inside a quoted label
    #[error("unterminated quoted label")]
    UnterminatedQuote,
    /// `:` not followed by a number
    #[error("missing branch length after ':'")]
    MissingBranchLength,
    /// Second `:length` for the same node
    #[error("duplicate branch length")]
    DuplicateBranchLength,
    /// Non-blank content after the terminating `;`
    #[error("unexpected content after ';'")]
    TrailingContent,
}
