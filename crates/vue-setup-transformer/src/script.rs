//! Script parsing and source slicing.

use crate::error::{TransformError, TransformErrorKind};
use std::sync::Arc;
use swc_common::{BytePos, FileName, SourceMap, Span, Spanned};
use swc_ecma_ast::Module;
use swc_ecma_parser::{EsSyntax, Parser, StringInput, Syntax, TsSyntax};
use text_size::{TextRange, TextSize};
use vue_sfc_parser::ScriptLang;

/// A parsed script together with the text it was parsed from.
///
/// All swc spans are relative to `file_start`; the helpers here translate them
/// into byte offsets of `source`.
pub(crate) struct ParsedScript<'a> {
    pub source: &'a str,
    pub module: Module,
    file_start: BytePos,
}

impl<'a> ParsedScript<'a> {
    /// Byte offset of `pos` in `source`.
    pub fn offset(&self, pos: BytePos) -> usize {
        pos.0.saturating_sub(self.file_start.0) as usize
    }

    /// Source text covered by `span`.
    pub fn text(&self, span: Span) -> &'a str {
        self.text_between(span.lo, span.hi)
    }

    /// Source text between two positions.
    pub fn text_between(&self, lo: BytePos, hi: BytePos) -> &'a str {
        let start = self.offset(lo);
        let end = self.offset(hi).max(start);
        self.source.get(start..end).unwrap_or("")
    }

    /// `span` as a range of `source`.
    pub fn range(&self, span: Span) -> TextRange {
        let start = self.offset(span.lo) as u32;
        let end = (self.offset(span.hi) as u32).max(start);
        TextRange::new(TextSize::from(start), TextSize::from(end))
    }
}

/// Parser settings for a script language. Decorators are always enabled.
pub(crate) fn syntax_for(lang: ScriptLang) -> Syntax {
    if lang.is_typescript() {
        Syntax::Typescript(TsSyntax {
            tsx: lang.is_jsx(),
            decorators: true,
            no_early_errors: true,
            ..Default::default()
        })
    } else {
        Syntax::Es(EsSyntax {
            jsx: lang.is_jsx(),
            decorators: true,
            decorators_before_export: true,
            ..Default::default()
        })
    }
}

/// Parses a script block as an ES module.
pub(crate) fn parse_script(source: &str, lang: ScriptLang) -> Result<ParsedScript<'_>, TransformError> {
    let cm: Arc<SourceMap> = Default::default();
    let fm = cm.new_source_file(
        FileName::Custom("component-script".into()).into(),
        source.to_string(),
    );
    let file_start = fm.start_pos;

    let mut parser = Parser::new(syntax_for(lang), StringInput::from(&*fm), None);
    match parser.parse_module() {
        Ok(module) => Ok(ParsedScript {
            source,
            module,
            file_start,
        }),
        Err(err) => {
            let lo = err.span().lo.0.saturating_sub(file_start.0);
            let hi = err.span().hi.0.saturating_sub(file_start.0).max(lo);
            Err(TransformError::new(
                TransformErrorKind::Syntax {
                    message: err.kind().msg().to_string(),
                },
                TextRange::new(TextSize::from(lo), TextSize::from(hi)),
            ))
        }
    }
}

/// Checks that `source` parses; returns the parser message otherwise.
pub(crate) fn check_parses(source: &str, lang: ScriptLang) -> Result<(), String> {
    parse_script(source, lang)
        .map(|_| ())
        .map_err(|err| match err.kind {
            TransformErrorKind::Syntax { message } => message,
            other => other.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use swc_ecma_ast::{ModuleDecl, ModuleItem};

    #[test]
    fn test_parse_and_slice() {
        let source = "const a = 1;\nexport default { name: 'x' };\n";
        let script = parse_script(source, ScriptLang::JavaScript).expect("parses");
        assert_eq!(script.module.body.len(), 2);

        let ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(export)) = &script.module.body[1]
        else {
            panic!("expected export default");
        };
        assert_eq!(script.text(export.expr.span()), "{ name: 'x' }");
    }

    #[test]
    fn test_decorators_in_typescript() {
        let source = "@Component\nexport default class Foo extends Vue {\n  @Prop() title!: string\n}\n";
        assert!(parse_script(source, ScriptLang::TypeScript).is_ok());
    }

    #[test]
    fn test_decorators_before_export_in_javascript() {
        let source = "@Component\nexport default class Foo extends Vue {}\n";
        assert!(parse_script(source, ScriptLang::JavaScript).is_ok());
    }

    #[test]
    fn test_syntax_error() {
        let err = parse_script("export default {", ScriptLang::JavaScript)
            .err()
            .expect("syntax error");
        assert!(matches!(err.kind, TransformErrorKind::Syntax { .. }));
        assert!(err.span.is_some());
    }
}
