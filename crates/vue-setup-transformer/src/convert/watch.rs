//! Watchers.

use super::arrow_text;
use crate::classify::WatchEntry;
use crate::error::{TransformWarning, WarningKind};
use crate::member::{Member, MemberKind, Value, ValueKind};
use crate::statement::{ConvertedStatement, ReactivePrimitive};

/// Handler-object flags carried into the watch options.
const WATCH_FLAGS: &[&str] = &["immediate", "deep"];

pub(super) fn convert_watch(
    entries: &[WatchEntry],
    warnings: &mut Vec<TransformWarning>,
) -> Vec<ConvertedStatement> {
    let mut statements = Vec::new();

    for entry in entries {
        let text = match entry {
            WatchEntry::Callback {
                target, function, ..
            } => watch_call(target, &arrow_text(function), None),
            WatchEntry::Handler {
                target,
                options,
                range,
            } => match handler_callback(options) {
                Some(callback) => watch_call(target, &callback, watch_flags(options).as_deref()),
                None => {
                    warnings.push(skipped(target, *range));
                    continue;
                }
            },
            WatchEntry::Named { target, method } => watch_call(target, method, None),
            WatchEntry::Decorated {
                target,
                method,
                options,
            } => {
                let source = match target.as_str() {
                    Some(path) => watch_source(path),
                    None => target.text.clone(),
                };
                format_watch(&source, method, options.as_deref())
            }
            WatchEntry::Skipped { target, range } => {
                warnings.push(skipped(target, *range));
                continue;
            }
        };
        statements.push(ConvertedStatement::new(text).with_primitive(ReactivePrimitive::Watch));
    }

    statements
}

/// What to watch: a bare binding name, or a getter for member paths and
/// instance properties (`'user.name'`, `$route`).
fn watch_source(target: &str) -> String {
    if target.contains('.') || target.starts_with('$') {
        format!("() => this.{}", target)
    } else {
        target.to_string()
    }
}

fn watch_call(target: &str, callback: &str, options: Option<&str>) -> String {
    format_watch(&watch_source(target), callback, options)
}

fn format_watch(source: &str, callback: &str, options: Option<&str>) -> String {
    match options {
        Some(options) => format!("watch({}, {}, {});", source, callback, options),
        None => format!("watch({}, {});", source, callback),
    }
}

/// The callback of a `{ handler, immediate, deep }` object.
fn handler_callback(options: &[Member]) -> Option<String> {
    let handler = options.iter().find(|member| member.name == "handler")?;
    match &handler.kind {
        MemberKind::Method(function) => Some(arrow_text(function)),
        MemberKind::Property(value) => match &value.kind {
            ValueKind::Function(function) => Some(arrow_text(function)),
            ValueKind::Str(method) => Some(method.clone()),
            _ => None,
        },
        _ => None,
    }
}

/// `{ immediate: true }` from boolean-literal flags; `None` when there are none.
fn watch_flags(options: &[Member]) -> Option<String> {
    let flags: Vec<String> = options
        .iter()
        .filter(|member| WATCH_FLAGS.contains(&member.name.as_str()))
        .filter_map(|member| match &member.kind {
            MemberKind::Property(Value {
                kind: ValueKind::Bool(flag),
                ..
            }) => Some(format!("{}: {}", member.name, flag)),
            _ => None,
        })
        .collect();
    if flags.is_empty() {
        None
    } else {
        Some(format!("{{ {} }}", flags.join(", ")))
    }
}

fn skipped(target: &str, range: text_size::TextRange) -> TransformWarning {
    TransformWarning::new(
        WarningKind::WatchEntrySkipped {
            target: target.to_string(),
        },
        Some(range),
    )
}
