//! Methods to function declarations.

use super::check_scope_conflict;
use super::mapping::expand_mapping;
use crate::classify::MethodEntry;
use crate::error::{TransformError, TransformErrorKind, TransformWarning};
use crate::printer::dedent_tail;
use crate::statement::ConvertedStatement;
use crate::transform::TransformOptions;

pub(super) fn convert_methods(
    entries: &[MethodEntry],
    options: &TransformOptions,
    warnings: &mut Vec<TransformWarning>,
) -> Result<Vec<ConvertedStatement>, TransformError> {
    let mut statements = Vec::new();

    for entry in entries {
        match entry {
            MethodEntry::Function {
                name,
                function,
                range,
            } => {
                if function.is_arrow {
                    return Err(TransformError::new(
                        TransformErrorKind::ArrowFunctionMethod {
                            name: name.to_string(),
                        },
                        *range,
                    ));
                }
                check_scope_conflict(name, function, *range)?;
                let text = format!(
                    "{}function {}({}){} {}",
                    if function.is_async { "async " } else { "" },
                    name,
                    function.param_list(),
                    function.return_annotation(),
                    dedent_tail(&function.body)
                );
                statements.push(ConvertedStatement::new(text).with_name(name.clone()));
            }
            MethodEntry::Value { name, text } => {
                statements.push(
                    ConvertedStatement::new(format!("const {} = {};", name, dedent_tail(text)))
                        .with_name(name.clone()),
                );
            }
            MethodEntry::Mapping(value) => {
                statements.extend(expand_mapping(value, false, options, warnings)?);
            }
        }
    }

    Ok(statements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::FunctionSource;
    use pretty_assertions::assert_eq;
    use smol_str::SmolStr;
    use text_size::TextRange;

    fn method(name: &str, function: FunctionSource) -> MethodEntry {
        MethodEntry::Function {
            name: SmolStr::new(name),
            function,
            range: TextRange::default(),
        }
    }

    fn convert(entries: &[MethodEntry]) -> Result<Vec<ConvertedStatement>, TransformError> {
        convert_methods(entries, &TransformOptions::default(), &mut Vec::new())
    }

    #[test]
    fn test_function_declaration() {
        let statements = convert(&[method(
            "load",
            FunctionSource {
                is_async: true,
                params: vec!["id: number".to_string()],
                param_names: vec![SmolStr::new("id")],
                return_type: Some("Promise<void>".to_string()),
                body: "{\n      await this.fetch(id)\n    }".to_string(),
                ..Default::default()
            },
        )])
        .expect("converts");
        assert_eq!(
            statements[0].text,
            "async function load(id: number): Promise<void> {\n  await this.fetch(id)\n}"
        );
        assert_eq!(statements[0].names, vec![SmolStr::new("load")]);
        assert_eq!(statements[0].primitive, None);
    }

    #[test]
    fn test_non_function_value() {
        let statements = convert(&[MethodEntry::Value {
            name: SmolStr::new("search"),
            text: "debounce(this.query, 300)".to_string(),
        }])
        .expect("converts");
        assert_eq!(statements[0].text, "const search = debounce(this.query, 300);");
    }

    #[test]
    fn test_arrow_method_is_rejected() {
        let err = convert(&[method(
            "inc",
            FunctionSource {
                is_arrow: true,
                body: "this.count++".to_string(),
                expression_body: true,
                ..Default::default()
            },
        )])
        .expect_err("arrow");
        assert_eq!(
            err.kind,
            TransformErrorKind::ArrowFunctionMethod {
                name: "inc".to_string()
            }
        );
    }
}
