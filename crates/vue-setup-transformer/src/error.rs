//! Conversion errors and warnings.

use text_size::{TextRange, TextSize};
use thiserror::Error;
use vue_sfc_parser::ParseError;

/// A fatal conversion error. Nothing is produced for a file that fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct TransformError {
    /// The kind of error.
    pub kind: TransformErrorKind,
    /// Where in the input the problem was detected, when known.
    pub span: Option<TextRange>,
}

impl TransformError {
    /// Creates an error pointing at a source range.
    pub fn new(kind: TransformErrorKind, span: TextRange) -> Self {
        Self {
            kind,
            span: Some(span),
        }
    }

    /// Creates an error without location information.
    pub fn unlocated(kind: TransformErrorKind) -> Self {
        Self { kind, span: None }
    }

    /// Moves the span by `offset` bytes (script offsets to file offsets).
    pub fn shifted(mut self, offset: TextSize) -> Self {
        self.span = self.span.map(|span| span + offset);
        self
    }

    /// Stable identifier for reporting.
    pub fn code(&self) -> &'static str {
        match self.kind {
            TransformErrorKind::NoConvertibleExport => "no-convertible-export",
            TransformErrorKind::InvalidOptions { .. } => "invalid-options",
            TransformErrorKind::FunctionMappingArgument { .. } => "function-mapping-argument",
            TransformErrorKind::FunctionMappingValue { .. } => "function-mapping-value",
            TransformErrorKind::NonStringMappingValue { .. } => "non-string-mapping-value",
            TransformErrorKind::ArrowFunctionMethod { .. } => "arrow-function-method",
            TransformErrorKind::ScopeConflict { .. } => "scope-conflict",
            TransformErrorKind::Syntax { .. } => "syntax-error",
            TransformErrorKind::NoScriptBlock => "no-script-block",
            TransformErrorKind::AlreadyComposition => "already-composition",
            TransformErrorKind::Sfc(_) => "sfc-parse-error",
            TransformErrorKind::InvalidGeneratedCode { .. } => "invalid-generated-code",
        }
    }
}

/// The kind of conversion error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformErrorKind {
    /// Neither an options-object default export nor a component class was found.
    #[error("no convertible export found: expected an object-literal default export or a component class")]
    NoConvertibleExport,

    /// The component definition exists but cannot be read.
    #[error("invalid options object: {message}")]
    InvalidOptions {
        /// A description of the problem.
        message: String,
    },

    /// A mapping helper received a function instead of a static list of names.
    #[error("`{helper}` requires a static array or object of names, found a function")]
    FunctionMappingArgument {
        /// The helper name (`mapState`, `mapGetters`, ...).
        helper: String,
    },

    /// A mapping object maps a name to a function.
    #[error("function value for `{name}` in a `{helper}` mapping object is not supported")]
    FunctionMappingValue {
        /// The helper name.
        helper: String,
        /// The local name whose value is a function.
        name: String,
    },

    /// A mapping helper name list contains something other than string literals.
    #[error("values of a `{helper}` mapping must be string literals")]
    NonStringMappingValue {
        /// The helper name.
        helper: String,
    },

    /// An entry of `methods` is an arrow function.
    #[error("method `{name}` is an arrow function; arrow functions cannot be converted as methods")]
    ArrowFunctionMethod {
        /// The method name.
        name: String,
    },

    /// A parameter name is also accessed through `this` inside the same body.
    #[error("`{method}` declares a parameter `{param}` and also reads `this.{param}`; rewriting would change its meaning")]
    ScopeConflict {
        /// The method or hook name.
        method: String,
        /// The conflicting parameter name.
        param: String,
    },

    /// The script could not be parsed.
    #[error("syntax error: {message}")]
    Syntax {
        /// The parser message.
        message: String,
    },

    /// The component file has no classic `<script>` block.
    #[error("no <script> block found")]
    NoScriptBlock,

    /// The component already uses `<script setup>` or a `setup()` option.
    #[error("component already uses the Composition API")]
    AlreadyComposition,

    /// The component file could not be split into blocks.
    #[error("{0}")]
    Sfc(ParseError),

    /// The rewritten script no longer parses.
    #[error("generated code does not parse: {message}")]
    InvalidGeneratedCode {
        /// The parser message.
        message: String,
    },
}

/// A non-fatal problem: part of the input was skipped or needs manual work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformWarning {
    /// The kind of warning.
    pub kind: WarningKind,
    /// Where in the input the problem was detected, when known.
    pub span: Option<TextRange>,
}

impl TransformWarning {
    /// Creates a warning.
    pub fn new(kind: WarningKind, span: Option<TextRange>) -> Self {
        Self { kind, span }
    }

    /// Moves the span by `offset` bytes.
    pub fn shifted(mut self, offset: TextSize) -> Self {
        self.span = self.span.map(|span| span + offset);
        self
    }

    /// Stable identifier for reporting.
    pub fn code(&self) -> &'static str {
        match self.kind {
            WarningKind::DataNotObject => "data-not-object",
            WarningKind::UnsupportedDataEntry { .. } => "unsupported-data-entry",
            WarningKind::WatchEntrySkipped { .. } => "watch-entry-skipped",
            WarningKind::SetterWithoutGetter { .. } => "setter-without-getter",
            WarningKind::UnsupportedDecorator { .. } => "unsupported-decorator",
            WarningKind::UnsupportedSpread { .. } => "unsupported-spread",
            WarningKind::RefsNeedManualMigration => "manual-refs",
        }
    }
}

impl std::fmt::Display for TransformWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)
    }
}

/// The kind of warning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WarningKind {
    /// `data` does not return an object literal; no state was generated.
    #[error("`data` does not return an object literal and was skipped")]
    DataNotObject,

    /// An entry of the data object could not be converted.
    #[error("data entry `{name}` is not a plain property and was skipped")]
    UnsupportedDataEntry {
        /// The entry name.
        name: String,
    },

    /// A watcher is neither a function nor a handler object.
    #[error("watcher for `{target}` is neither a function nor a handler object and was skipped")]
    WatchEntrySkipped {
        /// The watch target.
        target: String,
    },

    /// A class setter has no matching getter.
    #[error("setter `{name}` has no matching getter and was skipped")]
    SetterWithoutGetter {
        /// The accessor name.
        name: String,
    },

    /// A decorator other than `@Prop` / `@Watch` was ignored.
    #[error("decorator `@{name}` on `{member}` is not supported and was ignored")]
    UnsupportedDecorator {
        /// The decorator name.
        name: String,
        /// The decorated member.
        member: String,
    },

    /// A spread inside `computed` or `methods` is not a known mapping helper.
    #[error("spread `{text}` is not a mapping helper and was skipped")]
    UnsupportedSpread {
        /// The spread source text.
        text: String,
    },

    /// `this.$refs` was replaced with a marker that needs manual migration.
    #[error("`this.$refs` has no automatic equivalent; replace the `__MANUAL_REFS__` marker with template refs")]
    RefsNeedManualMigration,
}
