//! Vue single-file component splitter for vue-setup-rs.
//!
//! This crate locates the top-level blocks of a `.vue` file:
//! - `<template>` (with balanced nested `<template>` elements)
//! - `<script>` and `<script setup>`, including the `lang` attribute
//! - `<style>` blocks and custom blocks
//!
//! Block contents are returned verbatim together with their byte ranges so a
//! caller can splice a rewritten block back into the original file.
//!
//! # Example
//!
//! ```
//! use vue_sfc_parser::parse;
//!
//! let source = r#"
//! <template>
//!   <button @click="inc">{{ count }}</button>
//! </template>
//!
//! <script>
//! export default { data() { return { count: 0 } } }
//! </script>
//! "#;
//!
//! let result = parse(source);
//! assert!(result.errors.is_empty());
//! assert!(result.descriptor.script.is_some());
//! ```

mod ast;
mod error;
mod parser;

pub use ast::*;
pub use error::{ParseError, ParseErrorKind};
pub use text_size::{TextRange, TextSize};

/// The result of splitting a component file.
#[derive(Debug)]
pub struct ParseResult {
    /// The blocks found in the file.
    pub descriptor: SfcDescriptor,
    /// Any errors encountered while scanning.
    pub errors: Vec<ParseError>,
}

/// Splits a component file into its top-level blocks.
///
/// Scanning stops at the first unrecoverable error (an unclosed tag or block);
/// blocks found before that point are still returned.
pub fn parse(source: &str) -> ParseResult {
    parser::Parser::new(source).parse()
}
