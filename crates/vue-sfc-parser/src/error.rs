//! Parse error types.

use text_size::TextRange;
use thiserror::Error;

/// An error that occurred while splitting a component file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct ParseError {
    /// The kind of error.
    pub kind: ParseErrorKind,
    /// The location in the source where the error occurred.
    pub span: TextRange,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(kind: ParseErrorKind, span: TextRange) -> Self {
        Self { kind, span }
    }
}

/// The kind of parse error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// A start tag was never terminated with `>`.
    #[error("unclosed start tag: <{tag_name}")]
    UnclosedTag {
        /// The name of the tag.
        tag_name: String,
    },

    /// A top-level block has no matching end tag.
    #[error("unclosed block: <{tag_name}> has no matching </{tag_name}>")]
    UnclosedBlock {
        /// The name of the block.
        tag_name: String,
    },

    /// A block that may only appear once was repeated.
    #[error("duplicate block: a component may contain only one {description}")]
    DuplicateBlock {
        /// Human readable name of the block (`<template>`, `<script setup>`, ...).
        description: String,
    },

    /// An HTML comment was never closed.
    #[error("unclosed comment")]
    UnclosedComment,

    /// An attribute value was opened with a quote but never closed.
    #[error("unterminated attribute value for `{name}`")]
    UnterminatedAttribute {
        /// The attribute name.
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use text_size::TextSize;

    #[test]
    fn test_error_display() {
        let error = ParseError::new(
            ParseErrorKind::UnclosedBlock {
                tag_name: "script".to_string(),
            },
            TextRange::new(TextSize::from(0), TextSize::from(8)),
        );
        assert_eq!(
            error.to_string(),
            "unclosed block: <script> has no matching </script>"
        );
    }

    #[test]
    fn test_duplicate_display() {
        let error = ParseError::new(
            ParseErrorKind::DuplicateBlock {
                description: "<template>".to_string(),
            },
            TextRange::default(),
        );
        assert_eq!(
            error.to_string(),
            "duplicate block: a component may contain only one <template>"
        );
    }
}
