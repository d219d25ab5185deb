//! Block types for Vue single-file components.
//!
//! A component file is a flat list of top-level blocks. Only the block
//! boundaries and start-tag attributes are modelled here; block contents are
//! kept as raw text.

use smol_str::SmolStr;
use text_size::TextRange;

/// A split single-file component.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SfcDescriptor {
    /// The `<template>` block.
    pub template: Option<Block>,
    /// The classic `<script>` block.
    pub script: Option<Script>,
    /// The `<script setup>` block.
    pub script_setup: Option<Script>,
    /// All `<style>` blocks, in source order.
    pub styles: Vec<Block>,
    /// Any other top-level blocks (`<i18n>`, `<docs>`, ...), in source order.
    pub custom_blocks: Vec<Block>,
    /// The span of the entire document.
    pub span: TextRange,
}

/// A generic top-level block.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Block {
    /// The tag name as written.
    pub tag: SmolStr,
    /// The span of the entire block including tags.
    pub span: TextRange,
    /// The span of just the block content.
    pub content_span: TextRange,
    /// The raw content of the block.
    pub content: String,
    /// Attributes on the start tag.
    pub attributes: Vec<Attribute>,
}

impl Block {
    /// Returns the value of an attribute, if present.
    ///
    /// Boolean attributes (`<style scoped>`) return an empty string.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        find_attribute(&self.attributes, name)
    }
}

/// A script block.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Script {
    /// The span of the entire script block including tags.
    pub span: TextRange,
    /// The span of just the script content.
    pub content_span: TextRange,
    /// The raw content of the script.
    pub content: String,
    /// The script language.
    pub lang: ScriptLang,
    /// Whether this is a `<script setup>` block.
    pub setup: bool,
    /// Attributes on the script tag.
    pub attributes: Vec<Attribute>,
}

impl Script {
    /// Returns the value of an attribute, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        find_attribute(&self.attributes, name)
    }
}

/// The language of a script block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ScriptLang {
    /// JavaScript (default).
    #[default]
    JavaScript,
    /// JavaScript with JSX.
    Jsx,
    /// TypeScript.
    TypeScript,
    /// TypeScript with JSX.
    Tsx,
}

impl ScriptLang {
    /// Maps a `lang` attribute value to a script language.
    ///
    /// Unknown values fall back to JavaScript.
    pub fn from_attribute(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("ts") | Some("typescript") => ScriptLang::TypeScript,
            Some("tsx") => ScriptLang::Tsx,
            Some("jsx") => ScriptLang::Jsx,
            _ => ScriptLang::JavaScript,
        }
    }

    /// Returns true for the TypeScript flavours.
    pub fn is_typescript(self) -> bool {
        matches!(self, ScriptLang::TypeScript | ScriptLang::Tsx)
    }

    /// Returns true when JSX syntax is allowed.
    pub fn is_jsx(self) -> bool {
        matches!(self, ScriptLang::Jsx | ScriptLang::Tsx)
    }
}

/// An attribute on a block start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Attribute {
    /// The attribute name.
    pub name: SmolStr,
    /// The unquoted value, or `None` for boolean attributes.
    pub value: Option<String>,
    /// The span of the whole attribute.
    pub span: TextRange,
}

fn find_attribute<'a>(attributes: &'a [Attribute], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|attr| attr.name.eq_ignore_ascii_case(name))
        .map(|attr| attr.value.as_deref().unwrap_or(""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_lang_from_attribute() {
        assert_eq!(ScriptLang::from_attribute(None), ScriptLang::JavaScript);
        assert_eq!(ScriptLang::from_attribute(Some("ts")), ScriptLang::TypeScript);
        assert_eq!(ScriptLang::from_attribute(Some("TSX")), ScriptLang::Tsx);
        assert_eq!(ScriptLang::from_attribute(Some("jsx")), ScriptLang::Jsx);
        assert_eq!(
            ScriptLang::from_attribute(Some("coffee")),
            ScriptLang::JavaScript
        );
    }

    #[test]
    fn test_lang_flags() {
        assert!(ScriptLang::Tsx.is_typescript());
        assert!(ScriptLang::Tsx.is_jsx());
        assert!(!ScriptLang::TypeScript.is_jsx());
        assert!(!ScriptLang::Jsx.is_typescript());
    }
}
