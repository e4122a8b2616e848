//! Low-level parsing infrastructure.
//!
//! This module provides the [Tokenizer](tokenizer::Tokenizer) that the
//! [Newick parser](crate::newick::NewickParser) is built on, along with the
//! [ParsingError] type used throughout the crate.

pub mod parsing_error;
pub mod tokenizer;

pub use parsing_error::{MalformedReason, ParsingError};
