//! Locating the component definition in a script.

use crate::error::{TransformError, TransformErrorKind};
use crate::member::{last_segment, unwrap_expr, Member, MemberReader};
use crate::script::ParsedScript;
use smol_str::SmolStr;
use swc_common::{BytePos, Span, Spanned};
use swc_ecma_ast::{
    CallExpr, Callee, Class, Decl, DefaultDecl, Expr, ModuleDecl, ModuleItem, ObjectLit, Stmt,
};
use text_size::{TextRange, TextSize};

/// Which syntax the component was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ComponentForm {
    /// An options object (`export default { ... }`).
    Options,
    /// A class extending `Vue`, usually decorated with `@Component`.
    Class,
}

/// How the rewritten definition is bound in the module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Binding {
    /// `export default defineComponent({ ... })`
    ExportDefault,
    /// `const Name = defineComponent({ ... })`, optionally exported.
    Const { name: SmolStr, exported: bool },
}

/// The component found in a script.
#[derive(Debug)]
pub(crate) struct Component {
    pub form: ComponentForm,
    /// Members of the options object, or of the class decorator's options.
    pub options: Vec<Member>,
    /// Instance members of the class (class form only).
    pub class_members: Vec<Member>,
    pub binding: Binding,
    /// The source range replaced by the new definition.
    pub replace: TextRange,
}

/// Finds the default-exported options object or the component class.
pub(crate) fn locate_component(script: &ParsedScript) -> Result<Component, TransformError> {
    let reader = MemberReader::new(script);
    let mut default_name: Option<SmolStr> = None;

    for item in &script.module.body {
        let ModuleItem::ModuleDecl(decl) = item else {
            continue;
        };
        match decl {
            ModuleDecl::ExportDefaultExpr(export) => {
                let replace = replace_range(script, export.span, &[]);
                match unwrap_expr(&export.expr) {
                    Expr::Object(object) => {
                        log::debug!("found options-object default export");
                        return Ok(options_component(&reader, object, replace));
                    }
                    Expr::Call(call) => {
                        let Some(object) = unroll_options_call(call) else {
                            return Err(TransformError::new(
                                TransformErrorKind::InvalidOptions {
                                    message: format!(
                                        "default export calls `{}` without an options object",
                                        callee_text(script, call)
                                    ),
                                },
                                script.range(export.expr.span()),
                            ));
                        };
                        log::debug!("found wrapped options-object default export");
                        return Ok(options_component(&reader, object, replace));
                    }
                    Expr::Ident(ident) => {
                        default_name = Some(SmolStr::new(ident.sym.as_str()));
                    }
                    Expr::Class(class_expr) => {
                        return Ok(class_component(
                            &reader,
                            &class_expr.class,
                            Binding::ExportDefault,
                            replace_range(script, export.span, &class_expr.class.decorators),
                        ));
                    }
                    _ => {
                        return Err(TransformError::new(
                            TransformErrorKind::InvalidOptions {
                                message: "default export is not an object literal".to_string(),
                            },
                            script.range(export.expr.span()),
                        ));
                    }
                }
            }
            ModuleDecl::ExportDefaultDecl(export) => {
                if let DefaultDecl::Class(class_expr) = &export.decl {
                    log::debug!("found default-exported component class");
                    return Ok(class_component(
                        &reader,
                        &class_expr.class,
                        Binding::ExportDefault,
                        replace_range(script, export.span, &class_expr.class.decorators),
                    ));
                }
            }
            _ => {}
        }
    }

    // No inline default export: look for a component class declaration.
    for item in &script.module.body {
        let (class_decl, span, exported) = match item {
            ModuleItem::Stmt(Stmt::Decl(Decl::Class(class_decl))) => {
                (class_decl, class_decl.class.span, false)
            }
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => match &export.decl {
                Decl::Class(class_decl) => (class_decl, export.span, true),
                _ => continue,
            },
            _ => continue,
        };

        let name = SmolStr::new(class_decl.ident.sym.as_str());
        let matches = match &default_name {
            Some(default_name) => *default_name == name,
            None => is_component_class(&class_decl.class),
        };
        if matches {
            log::debug!("found component class `{}`", name);
            return Ok(class_component(
                &reader,
                &class_decl.class,
                Binding::Const { name, exported },
                replace_range(script, span, &class_decl.class.decorators),
            ));
        }
    }

    Err(TransformError::unlocated(
        TransformErrorKind::NoConvertibleExport,
    ))
}

fn options_component(reader: &MemberReader, object: &ObjectLit, replace: TextRange) -> Component {
    Component {
        form: ComponentForm::Options,
        options: reader.read_object(object),
        class_members: Vec::new(),
        binding: Binding::ExportDefault,
        replace,
    }
}

fn class_component(
    reader: &MemberReader,
    class: &Class,
    binding: Binding,
    replace: TextRange,
) -> Component {
    // The first decorator taking an object literal carries the options.
    let options = reader
        .read_decorators(&class.decorators)
        .into_iter()
        .find_map(|decorator| {
            decorator
                .args
                .into_iter()
                .next()
                .and_then(|arg| match arg.kind {
                    crate::member::ValueKind::Object(members) => Some(members),
                    _ => None,
                })
        })
        .unwrap_or_default();

    Component {
        form: ComponentForm::Class,
        options,
        class_members: reader.read_class(class),
        binding,
        replace,
    }
}

/// A class counts as a component when it is decorated or extends something.
fn is_component_class(class: &Class) -> bool {
    !class.decorators.is_empty() || class.super_class.is_some()
}

/// Unwraps `defineComponent({ ... })`, `Vue.extend({ ... })` and
/// `Vue.component('name', { ... })` to the options object.
fn unroll_options_call(call: &CallExpr) -> Option<&ObjectLit> {
    let Callee::Expr(callee) = &call.callee else {
        return None;
    };
    let name = match callee.as_ref() {
        Expr::Ident(ident) => ident.sym.as_str(),
        Expr::Member(member) => member.prop.as_ident()?.sym.as_str(),
        _ => return None,
    };
    if !matches!(name, "defineComponent" | "extend" | "component") {
        return None;
    }

    let last = call.args.last()?;
    if last.spread.is_some() {
        return None;
    }
    match unwrap_expr(&last.expr) {
        Expr::Object(object) => Some(object),
        _ => None,
    }
}

fn callee_text<'a>(script: &ParsedScript<'a>, call: &CallExpr) -> &'a str {
    match &call.callee {
        Callee::Expr(callee) => last_segment(script.text(callee.span())),
        _ => "",
    }
}

/// Range of a module item, widened to leading decorators and a trailing `;`.
fn replace_range(
    script: &ParsedScript,
    span: Span,
    decorators: &[swc_ecma_ast::Decorator],
) -> TextRange {
    let lo = decorators
        .iter()
        .map(|decorator| decorator.span.lo)
        .fold(span.lo, BytePos::min);
    let start = script.offset(lo);
    let mut end = script.offset(span.hi).max(start);
    if script.source[end..].starts_with(';') {
        end += 1;
    }
    TextRange::new(TextSize::from(start as u32), TextSize::from(end as u32))
}
