//! Lifecycle hooks.

use super::{arrow_text, check_scope_conflict};
use crate::classify::LifecycleEntry;
use crate::error::TransformError;
use crate::statement::{ConvertedStatement, ReactivePrimitive};

/// Where a legacy lifecycle option goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LifecycleTarget {
    /// Runs inline at the top of `setup`.
    Inline,
    /// Registered with the named hook.
    Hook(&'static str),
}

/// Looks up a legacy lifecycle option name.
pub(crate) fn lifecycle_target(name: &str) -> Option<LifecycleTarget> {
    let hook = match name {
        "beforeCreate" | "created" => return Some(LifecycleTarget::Inline),
        "beforeMount" => "onBeforeMount",
        "mounted" => "onMounted",
        "beforeUpdate" => "onBeforeUpdate",
        "updated" => "onUpdated",
        "beforeUnmount" | "beforeDestroy" => "onBeforeUnmount",
        "unmounted" | "destroyed" => "onUnmounted",
        "activated" => "onActivated",
        "deactivated" => "onDeactivated",
        "errorCaptured" => "onErrorCaptured",
        "renderTracked" => "onRenderTracked",
        "renderTriggered" => "onRenderTriggered",
        "serverPrefetch" => "onServerPrefetch",
        _ => return None,
    };
    Some(LifecycleTarget::Hook(hook))
}

pub(super) fn convert_lifecycle(
    entries: &[LifecycleEntry],
) -> Result<Vec<ConvertedStatement>, TransformError> {
    let mut statements = Vec::with_capacity(entries.len());
    for entry in entries {
        check_scope_conflict(&entry.name, &entry.function, entry.range)?;
        let callback = arrow_text(&entry.function);
        statements.push(match entry.target {
            LifecycleTarget::Inline => ConvertedStatement::new(format!("({})();", callback)),
            LifecycleTarget::Hook(hook) => {
                ConvertedStatement::new(format!("{}({});", hook, callback))
                    .with_primitive(ReactivePrimitive::Lifecycle(hook))
            }
        });
    }
    Ok(statements)
}
