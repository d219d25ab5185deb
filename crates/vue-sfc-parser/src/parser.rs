//! Top-level block scanner.
//!
//! Only the outermost tags of a component file are interpreted. Everything
//! between a start tag and its end tag is opaque content, with the exception
//! of `<template>`, whose nested `<template>` elements must be balanced.

use crate::ast::{Attribute, Block, Script, ScriptLang, SfcDescriptor};
use crate::error::{ParseError, ParseErrorKind};
use crate::ParseResult;
use smol_str::SmolStr;
use text_size::{TextRange, TextSize};

/// A scanner over the top level of a component file.
pub struct Parser<'a> {
    source: &'a str,
    /// ASCII-lowercased copy of `source`; byte offsets are identical.
    lower: String,
    pos: usize,
    descriptor: SfcDescriptor,
    errors: Vec<ParseError>,
}

/// A parsed start tag.
struct StartTag {
    name: SmolStr,
    attributes: Vec<Attribute>,
    /// Offset just past the closing `>`.
    end: usize,
    self_closing: bool,
}

impl<'a> Parser<'a> {
    /// Creates a new parser.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            lower: source.to_ascii_lowercase(),
            pos: 0,
            descriptor: SfcDescriptor {
                span: range(0, source.len()),
                ..Default::default()
            },
            errors: Vec::new(),
        }
    }

    /// Splits the whole file into blocks.
    pub fn parse(mut self) -> ParseResult {
        while let Some(offset) = self.source[self.pos..].find('<') {
            let start = self.pos + offset;
            let rest = &self.source[start..];

            if rest.starts_with("<!--") {
                match rest[4..].find("-->") {
                    Some(end) => self.pos = start + 4 + end + 3,
                    None => {
                        self.errors.push(ParseError::new(
                            ParseErrorKind::UnclosedComment,
                            range(start, self.source.len()),
                        ));
                        break;
                    }
                }
                continue;
            }

            // Stray end tags, doctypes and processing instructions are skipped.
            if rest.starts_with("</") || rest.starts_with("<!") || rest.starts_with("<?") {
                self.pos = match rest.find('>') {
                    Some(end) => start + end + 1,
                    None => self.source.len(),
                };
                continue;
            }

            let name_len = tag_name_len(&rest[1..]);
            if name_len == 0 {
                self.pos = start + 1;
                continue;
            }

            let Some(tag) = self.parse_start_tag(start, name_len) else {
                break;
            };

            if tag.self_closing {
                let span = range(start, tag.end);
                self.pos = tag.end;
                self.push_block(tag, span, range(span.end().into(), span.end().into()));
                continue;
            }

            let Some((content_end, block_end)) = self.find_end_tag(&tag.name, tag.end) else {
                self.errors.push(ParseError::new(
                    ParseErrorKind::UnclosedBlock {
                        tag_name: tag.name.to_string(),
                    },
                    range(start, tag.end),
                ));
                break;
            };

            self.pos = block_end;
            let content_span = range(tag.end, content_end);
            self.push_block(tag, range(start, block_end), content_span);
        }

        ParseResult {
            descriptor: self.descriptor,
            errors: self.errors,
        }
    }

    /// Parses the attributes of a start tag beginning at `start`.
    fn parse_start_tag(&mut self, start: usize, name_len: usize) -> Option<StartTag> {
        let source = self.source;
        let bytes = source.as_bytes();
        let name = SmolStr::new(&source[start + 1..start + 1 + name_len]);
        let mut pos = start + 1 + name_len;
        let mut attributes = Vec::new();

        loop {
            while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }

            if pos >= bytes.len() {
                self.errors.push(ParseError::new(
                    ParseErrorKind::UnclosedTag {
                        tag_name: name.to_string(),
                    },
                    range(start, source.len()),
                ));
                return None;
            }

            match bytes[pos] {
                b'>' => {
                    return Some(StartTag {
                        name,
                        attributes,
                        end: pos + 1,
                        self_closing: false,
                    });
                }
                b'/' if bytes.get(pos + 1) == Some(&b'>') => {
                    return Some(StartTag {
                        name,
                        attributes,
                        end: pos + 2,
                        self_closing: true,
                    });
                }
                b'/' => {
                    pos += 1;
                    continue;
                }
                _ => {}
            }

            let attr_start = pos;
            while pos < bytes.len()
                && !bytes[pos].is_ascii_whitespace()
                && !matches!(bytes[pos], b'=' | b'>' | b'/')
            {
                pos += 1;
            }
            let attr_name = SmolStr::new(&source[attr_start..pos]);

            let mut lookahead = pos;
            while lookahead < bytes.len() && bytes[lookahead].is_ascii_whitespace() {
                lookahead += 1;
            }

            let mut value = None;
            if bytes.get(lookahead) == Some(&b'=') {
                pos = lookahead + 1;
                while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                    pos += 1;
                }
                match bytes.get(pos) {
                    Some(&(quote @ (b'"' | b'\''))) => {
                        let value_start = pos + 1;
                        let Some(len) = source[value_start..].find(quote as char) else {
                            self.errors.push(ParseError::new(
                                ParseErrorKind::UnterminatedAttribute {
                                    name: attr_name.to_string(),
                                },
                                range(attr_start, source.len()),
                            ));
                            return None;
                        };
                        value = Some(source[value_start..value_start + len].to_string());
                        pos = value_start + len + 1;
                    }
                    _ => {
                        let value_start = pos;
                        while pos < bytes.len()
                            && !bytes[pos].is_ascii_whitespace()
                            && bytes[pos] != b'>'
                        {
                            pos += 1;
                        }
                        value = Some(source[value_start..pos].to_string());
                    }
                }
            }

            attributes.push(Attribute {
                name: attr_name,
                value,
                span: range(attr_start, pos),
            });
        }
    }

    /// Finds the end tag matching `name`, returning the content end and the
    /// offset just past the end tag.
    fn find_end_tag(&self, name: &str, from: usize) -> Option<(usize, usize)> {
        let name = name.to_ascii_lowercase();
        let open = format!("<{}", name);
        let close = format!("</{}", name);
        let nests = name == "template";
        let mut depth = 0usize;
        let mut pos = from;

        loop {
            let next_close = find_tag(&self.lower, &close, pos)?;
            if nests {
                if let Some(next_open) = find_tag(&self.lower, &open, pos) {
                    if next_open < next_close {
                        depth += 1;
                        pos = next_open + open.len();
                        continue;
                    }
                }
            }

            let after_name = next_close + close.len();
            let gt = self.lower[after_name..].find('>')? + after_name;
            if depth == 0 {
                return Some((next_close, gt + 1));
            }
            depth -= 1;
            pos = gt + 1;
        }
    }

    fn push_block(&mut self, tag: StartTag, span: TextRange, content_span: TextRange) {
        let content = self.source[content_span].to_string();
        let lowered = tag.name.to_ascii_lowercase();
        log::trace!("found <{}> block at {:?}", tag.name, span);

        match lowered.as_str() {
            "template" => {
                if self.descriptor.template.is_some() {
                    self.duplicate("<template>", span);
                    return;
                }
                self.descriptor.template = Some(Block {
                    tag: tag.name,
                    span,
                    content_span,
                    content,
                    attributes: tag.attributes,
                });
            }
            "script" => {
                let setup = tag
                    .attributes
                    .iter()
                    .any(|attr| attr.name.eq_ignore_ascii_case("setup"));
                let lang = ScriptLang::from_attribute(
                    tag.attributes
                        .iter()
                        .find(|attr| attr.name.eq_ignore_ascii_case("lang"))
                        .and_then(|attr| attr.value.as_deref()),
                );
                let script = Script {
                    span,
                    content_span,
                    content,
                    lang,
                    setup,
                    attributes: tag.attributes,
                };
                if setup {
                    if self.descriptor.script_setup.is_some() {
                        self.duplicate("<script setup>", span);
                        return;
                    }
                    self.descriptor.script_setup = Some(script);
                } else {
                    if self.descriptor.script.is_some() {
                        self.duplicate("<script>", span);
                        return;
                    }
                    self.descriptor.script = Some(script);
                }
            }
            "style" => self.descriptor.styles.push(Block {
                tag: tag.name,
                span,
                content_span,
                content,
                attributes: tag.attributes,
            }),
            _ => self.descriptor.custom_blocks.push(Block {
                tag: tag.name,
                span,
                content_span,
                content,
                attributes: tag.attributes,
            }),
        }
    }

    fn duplicate(&mut self, description: &str, span: TextRange) {
        self.errors.push(ParseError::new(
            ParseErrorKind::DuplicateBlock {
                description: description.to_string(),
            },
            span,
        ));
    }
}

/// Returns the length of the tag name at the start of `s`.
fn tag_name_len(s: &str) -> usize {
    let mut chars = s.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_alphabetic() => {}
        _ => return 0,
    }
    chars
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_' || *c == ':'))
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Finds `needle` (`<name` or `</name`) at or after `from`, requiring that the
/// tag name ends right after the match.
fn find_tag(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let mut pos = from;
    while let Some(offset) = haystack[pos..].find(needle) {
        let found = pos + offset;
        let after = found + needle.len();
        match haystack.as_bytes().get(after) {
            Some(b) if b.is_ascii_whitespace() || *b == b'>' || *b == b'/' => return Some(found),
            None => return Some(found),
            _ => pos = after,
        }
    }
    None
}

fn range(start: usize, end: usize) -> TextRange {
    TextRange::new(TextSize::from(start as u32), TextSize::from(end as u32))
}
