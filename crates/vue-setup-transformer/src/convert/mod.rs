//! Per-bucket converters.
//!
//! Every converter turns classified entries into [`ConvertedStatement`]s.
//! Statement text still refers to `this`; references are rewritten during
//! assembly, once every name of the run is known.

mod computed;
mod data;
pub(crate) mod lifecycle;
mod mapping;
mod methods;
mod props;
mod watch;

use crate::classify::Buckets;
use crate::error::{TransformError, TransformErrorKind, TransformWarning};
use crate::member::FunctionSource;
use crate::printer::dedent_tail;
use crate::rewrite::find_references;
use crate::statement::ConvertedStatement;
use crate::transform::TransformOptions;
use indexmap::IndexSet;
use text_size::TextRange;

/// Output of all converters for one component.
#[derive(Debug, Default)]
pub(crate) struct Conversion {
    pub statements: Vec<ConvertedStatement>,
    /// Type names imported from the core package besides primitives.
    pub core_types: IndexSet<&'static str>,
    /// The rebuilt `props` member of a class component.
    pub props_member: Option<String>,
}

/// Runs every converter over `buckets`.
pub(crate) fn convert(
    buckets: &Buckets,
    options: &TransformOptions,
    warnings: &mut Vec<TransformWarning>,
) -> Result<Conversion, TransformError> {
    let mut conversion = Conversion::default();

    let props = props::convert_props(&buckets.props, &mut conversion.core_types);
    conversion.statements.extend(props.statement);
    conversion.props_member = props.member;

    conversion
        .statements
        .extend(data::convert_data(&buckets.data, warnings));
    conversion
        .statements
        .extend(computed::convert_computed(&buckets.computed, options, warnings)?);
    conversion
        .statements
        .extend(methods::convert_methods(&buckets.methods, options, warnings)?);
    conversion
        .statements
        .extend(watch::convert_watch(&buckets.watch, warnings));
    conversion
        .statements
        .extend(lifecycle::convert_lifecycle(&buckets.lifecycle)?);

    log::debug!("converted {} statements", conversion.statements.len());
    Ok(conversion)
}

/// `(params): T => body` for a function, keeping `async`.
pub(crate) fn arrow_text(function: &FunctionSource) -> String {
    let body = if function.expression_body {
        function.body.clone()
    } else {
        dedent_tail(&function.body)
    };
    format!(
        "{}({}){} => {}",
        if function.is_async { "async " } else { "" },
        function.param_list(),
        function.return_annotation(),
        body
    )
}

/// Fails when a parameter of `function` is also read as `this.<param>` in
/// its body; rewriting `this.<param>` to `<param>` would then bind to the
/// parameter.
pub(crate) fn check_scope_conflict(
    name: &str,
    function: &FunctionSource,
    range: TextRange,
) -> Result<(), TransformError> {
    let members = find_references(&function.body).members;
    for param in &function.param_names {
        if members.contains(param) {
            return Err(TransformError::new(
                TransformErrorKind::ScopeConflict {
                    method: name.to_string(),
                    param: param.to_string(),
                },
                range,
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use smol_str::SmolStr;

    fn function(params: &[&str], body: &str) -> FunctionSource {
        FunctionSource {
            params: params.iter().map(|p| p.to_string()).collect(),
            param_names: params.iter().map(|p| SmolStr::new(p)).collect(),
            body: body.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_scope_conflict() {
        let conflicting = function(&["count"], "{ this.count = count }");
        let err = check_scope_conflict("setCount", &conflicting, TextRange::default())
            .expect_err("conflict");
        assert!(matches!(err.kind, TransformErrorKind::ScopeConflict { .. }));

        let fine = function(
            &["count"],
            "{ this.counter = count; other.this.count; log('this.count') }",
        );
        assert!(check_scope_conflict("setCount", &fine, TextRange::default()).is_ok());

        let spread = function(&["form"], "{ return { ...this.form, ...form } }");
        assert!(check_scope_conflict("merge", &spread, TextRange::default()).is_err());
    }

    #[test]
    fn test_arrow_text() {
        let mut source = function(&["a", "b"], "{\n      return a + b\n    }");
        source.is_async = true;
        assert_eq!(arrow_text(&source), "async (a, b) => {\n  return a + b\n}");
    }
}
