//! `this`-reference rewriting.
//!
//! Statement bodies are treated as opaque text. A small scanner walks the text
//! and rewrites `this.<name>` / `this.$<name>` accesses in code positions,
//! leaving strings, regex literals and comments untouched. Template-literal
//! `${...}` expressions are code and are rewritten too.

use crate::statement::ConvertedStatement;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;

/// Replacement for `this.$refs`; template refs need manual migration.
pub const REFS_MARKER: &str = "__MANUAL_REFS__";

/// `this.$<name>` accesses that map onto the setup context.
const CONTEXT_PROPERTIES: &[&str] = &["attrs", "slots", "parent", "root", "listeners"];

/// Keywords after which a `/` starts a regex literal.
const REGEX_KEYWORDS: &[&str] = &[
    "return", "typeof", "instanceof", "in", "of", "new", "delete", "void", "throw", "case",
    "do", "else", "yield", "await",
];

/// Which names resolve to `.value` and which to `props.`.
#[derive(Debug, Default, Clone)]
pub(crate) struct NameMaps {
    refs: FxHashSet<SmolStr>,
    props: FxHashSet<SmolStr>,
}

impl NameMaps {
    /// Builds the maps from every statement of a run. A name bound as a prop
    /// is never treated as a ref.
    pub fn from_statements(statements: &[ConvertedStatement]) -> Self {
        let mut maps = NameMaps::default();
        for statement in statements {
            match statement.primitive {
                Some(crate::statement::ReactivePrimitive::Props) => {
                    maps.props.extend(statement.names.iter().cloned());
                }
                Some(primitive) if primitive.is_ref_like() => {
                    maps.refs.extend(statement.names.iter().cloned());
                }
                _ => {}
            }
        }
        let props = &maps.props;
        maps.refs.retain(|name| !props.contains(name));
        maps
    }

    pub fn is_ref(&self, name: &str) -> bool {
        self.refs.contains(name)
    }

    pub fn is_prop(&self, name: &str) -> bool {
        self.props.contains(name)
    }
}

/// Rewritten text, and whether a `$refs` marker was inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RewriteOutcome {
    pub text: String,
    pub refs_marker: bool,
}

/// Rewrites every `this` member access in `text`.
pub(crate) fn rewrite_references(text: &str, names: &NameMaps) -> RewriteOutcome {
    ReferenceScanner::new(text, names).scan().0
}

/// `this` accesses found in code positions of a text.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct ThisReferences {
    /// Plain member names, in order of appearance.
    pub members: Vec<SmolStr>,
    /// Events of `this.$emit('<name>'` calls with a literal name.
    pub events: Vec<String>,
}

/// Collects the `this` accesses of `text` without rewriting it.
pub(crate) fn find_references(text: &str) -> ThisReferences {
    let names = NameMaps::default();
    ReferenceScanner::new(text, &names).scan().1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanContext {
    Code,
    SingleQuoteString,
    DoubleQuoteString,
    TemplateLiteral,
    LineComment,
    BlockComment,
}

struct ReferenceScanner<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    output: String,
    context: ScanContext,
    /// Open template literals.
    template_depth: usize,
    /// Brace depth inside each open `${` expression.
    brace_depth: Vec<usize>,
    names: &'a NameMaps,
    refs_marker: bool,
    /// Output length after the last significant code character.
    last_code: usize,
    found: ThisReferences,
}

impl<'a> ReferenceScanner<'a> {
    fn new(source: &'a str, names: &'a NameMaps) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            output: String::with_capacity(source.len()),
            context: ScanContext::Code,
            template_depth: 0,
            brace_depth: Vec::new(),
            names,
            refs_marker: false,
            last_code: 0,
            found: ThisReferences::default(),
        }
    }

    fn scan(mut self) -> (RewriteOutcome, ThisReferences) {
        while let Some((pos, ch)) = self.chars.next() {
            let before = self.context;
            match self.context {
                ScanContext::Code => self.handle_code(pos, ch),
                ScanContext::SingleQuoteString => self.handle_string(ch, '\''),
                ScanContext::DoubleQuoteString => self.handle_string(ch, '"'),
                ScanContext::TemplateLiteral => self.handle_template_literal(ch),
                ScanContext::LineComment => self.handle_line_comment(ch),
                ScanContext::BlockComment => self.handle_block_comment(ch),
            }
            let from_comment = matches!(
                before,
                ScanContext::LineComment | ScanContext::BlockComment
            );
            if self.context == ScanContext::Code && !from_comment && !ch.is_whitespace() {
                self.last_code = self.output.len();
            }
        }

        let outcome = RewriteOutcome {
            text: self.output,
            refs_marker: self.refs_marker,
        };
        (outcome, self.found)
    }

    fn handle_code(&mut self, pos: usize, ch: char) {
        match ch {
            '\'' => {
                self.output.push(ch);
                self.context = ScanContext::SingleQuoteString;
            }
            '"' => {
                self.output.push(ch);
                self.context = ScanContext::DoubleQuoteString;
            }
            '`' => {
                self.output.push(ch);
                self.context = ScanContext::TemplateLiteral;
                self.template_depth += 1;
            }
            '/' => {
                self.output.push(ch);
                match self.chars.peek().copied() {
                    Some((_, '/')) => {
                        self.advance_one();
                        self.context = ScanContext::LineComment;
                    }
                    Some((_, '*')) => {
                        self.advance_one();
                        self.context = ScanContext::BlockComment;
                    }
                    _ if self.regex_allowed() => self.copy_regex(),
                    _ => {}
                }
            }
            't' => {
                if !self.try_rewrite_this(pos) {
                    self.output.push(ch);
                }
            }
            '{' => {
                self.output.push(ch);
                if let Some(depth) = self.brace_depth.last_mut() {
                    *depth += 1;
                }
            }
            '}' => {
                self.output.push(ch);
                if let Some(depth) = self.brace_depth.last_mut() {
                    if *depth == 0 {
                        self.brace_depth.pop();
                        self.context = ScanContext::TemplateLiteral;
                    } else {
                        *depth -= 1;
                    }
                }
            }
            _ => self.output.push(ch),
        }
    }

    fn handle_string(&mut self, ch: char, quote: char) {
        self.output.push(ch);
        if ch == quote {
            self.context = ScanContext::Code;
        } else if ch == '\\' {
            self.advance_one();
        }
    }

    fn handle_template_literal(&mut self, ch: char) {
        self.output.push(ch);
        match ch {
            '`' => {
                self.template_depth = self.template_depth.saturating_sub(1);
                if self.template_depth == 0 || !self.brace_depth.is_empty() {
                    self.context = ScanContext::Code;
                }
            }
            '$' => {
                if let Some((_, '{')) = self.chars.peek().copied() {
                    self.advance_one();
                    self.brace_depth.push(0);
                    self.context = ScanContext::Code;
                }
            }
            '\\' => self.advance_one(),
            _ => {}
        }
    }

    fn handle_line_comment(&mut self, ch: char) {
        self.output.push(ch);
        if ch == '\n' {
            self.context = ScanContext::Code;
        }
    }

    fn handle_block_comment(&mut self, ch: char) {
        self.output.push(ch);
        if ch == '*' {
            if let Some((_, '/')) = self.chars.peek().copied() {
                self.advance_one();
                self.context = ScanContext::Code;
            }
        }
    }

    /// Whether a `/` in code position starts a regex literal rather than a
    /// division, judged by the token before it.
    fn regex_allowed(&self) -> bool {
        let before = &self.output[..self.last_code];
        let Some(last) = before.chars().next_back() else {
            return true;
        };
        if before.ends_with("++") || before.ends_with("--") {
            return false;
        }
        if is_ident_char(last) {
            let word = &before[before.trim_end_matches(is_ident_char).len()..];
            return REGEX_KEYWORDS.contains(&word);
        }
        !matches!(last, ')' | ']' | '}' | '\'' | '"' | '`')
    }

    /// Copies a regex literal body through its closing `/`. The opening `/`
    /// is already in the output.
    fn copy_regex(&mut self) {
        let mut in_class = false;
        while let Some((_, ch)) = self.chars.next() {
            self.output.push(ch);
            match ch {
                '\\' => self.advance_one(),
                '[' => in_class = true,
                ']' => in_class = false,
                '/' if !in_class => return,
                '\n' => return,
                _ => {}
            }
        }
    }

    /// Copies the next character through unchanged.
    fn advance_one(&mut self) {
        if let Some((_, next)) = self.chars.next() {
            self.output.push(next);
        }
    }

    /// Rewrites `this.<name>` starting at `pos`. Returns false when `pos` does
    /// not start a `this` member access.
    fn try_rewrite_this(&mut self, pos: usize) -> bool {
        let rest = &self.source[pos..];
        if !rest.starts_with("this.") {
            return false;
        }
        let before = &self.source[..pos];
        if before.chars().next_back().is_some_and(is_ident_char) || ends_with_member_dot(before)
        {
            return false;
        }

        let member_start = pos + "this.".len();
        let dollar = self.source[member_start..].starts_with('$');
        let name_start = if dollar { member_start + 1 } else { member_start };
        let name_len = self.source[name_start..]
            .find(|c: char| !is_ident_char(c))
            .unwrap_or(self.source.len() - name_start);
        if name_len == 0 {
            return false;
        }
        let name = &self.source[name_start..name_start + name_len];
        let end = name_start + name_len;

        if dollar && name == "emit" {
            if let Some(event) = emitted_event(&self.source[end..]) {
                self.found.events.push(event.to_string());
            }
        } else if !dollar {
            self.found.members.push(SmolStr::new(name));
        }

        let replacement = if dollar {
            match name {
                "refs" => {
                    self.refs_marker = true;
                    REFS_MARKER.to_string()
                }
                "emit" => "emit".to_string(),
                _ if CONTEXT_PROPERTIES.contains(&name) => format!("ctx.{}", name),
                _ => format!("ctx.root.${}", name),
            }
        } else if self.names.is_prop(name) {
            format!("props.{}", name)
        } else if self.names.is_ref(name) {
            format!("{}.value", name)
        } else {
            name.to_string()
        };

        log::trace!("rewrote `{}` -> `{}`", &self.source[pos..end], replacement);
        self.output.push_str(&replacement);
        while self.chars.peek().is_some_and(|&(index, _)| index < end) {
            self.chars.next();
        }
        true
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// `a.` ends in a member-access dot; a spread `...` does not.
fn ends_with_member_dot(text: &str) -> bool {
    text.ends_with('.') && !text.ends_with("...")
}

/// The event name of an emit call whose arguments start at `rest`, when the
/// first argument is a plain string literal.
fn emitted_event(rest: &str) -> Option<&str> {
    let rest = rest.trim_start().strip_prefix('(')?.trim_start();
    let quote = rest.chars().next().filter(|c| matches!(c, '\'' | '"' | '`'))?;
    let body = &rest[1..];
    let name = &body[..body.find(quote)?];
    if name.is_empty() || name.contains('\\') || (quote == '`' && name.contains("${")) {
        return None;
    }
    Some(name)
}
