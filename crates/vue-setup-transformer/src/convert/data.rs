//! `data` to `ref` declarations.

use crate::classify::DataEntry;
use crate::error::{TransformWarning, WarningKind};
use crate::member::{Member, MemberKind, Value, ValueKind};
use crate::statement::{ConvertedStatement, ReactivePrimitive};

pub(super) fn convert_data(
    entries: &[DataEntry],
    warnings: &mut Vec<TransformWarning>,
) -> Vec<ConvertedStatement> {
    let mut statements = Vec::new();

    for entry in entries {
        match entry {
            DataEntry::Options(member) => {
                let Some(state) = data_object(member) else {
                    warnings.push(TransformWarning::new(
                        WarningKind::DataNotObject,
                        Some(member.range),
                    ));
                    continue;
                };
                for field in state {
                    match &field.kind {
                        MemberKind::Property(value) => {
                            statements.push(ref_statement(&field.name, None, Some(&value.text)));
                        }
                        _ => warnings.push(TransformWarning::new(
                            WarningKind::UnsupportedDataEntry {
                                name: field.name.to_string(),
                            },
                            Some(field.range),
                        )),
                    }
                }
            }
            DataEntry::Field {
                name,
                type_ann,
                init,
            } => statements.push(ref_statement(name, type_ann.as_deref(), init.as_deref())),
        }
    }

    statements
}

/// The state object of a `data` member, in any supported shape.
fn data_object(member: &Member) -> Option<&[Member]> {
    match &member.kind {
        MemberKind::Method(function) => function.returned_object.as_deref(),
        MemberKind::Property(Value {
            kind: ValueKind::Function(function),
            ..
        }) => function.returned_object.as_deref(),
        MemberKind::Property(Value {
            kind: ValueKind::Object(members),
            ..
        }) => Some(members),
        _ => None,
    }
}

fn ref_statement(name: &str, type_ann: Option<&str>, init: Option<&str>) -> ConvertedStatement {
    let type_args = type_ann.map(|ty| format!("<{}>", ty)).unwrap_or_default();
    ConvertedStatement::new(format!(
        "const {} = ref{}({});",
        name,
        type_args,
        init.unwrap_or_default()
    ))
    .with_name(name)
    .with_primitive(ReactivePrimitive::Ref)
}
