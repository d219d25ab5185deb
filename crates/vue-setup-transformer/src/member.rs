//! Owned views of component members.
//!
//! The swc tree is read exactly once. Every member keeps its verbatim source
//! text, so later stages work on strings and never need the tree again.

use crate::script::ParsedScript;
use smol_str::SmolStr;
use swc_common::{BytePos, Spanned};
use swc_ecma_ast::{
    ArrowExpr, BlockStmtOrExpr, Callee, Class, ClassMember, Decorator, Expr, Function, Lit,
    MethodKind, ObjectLit, ObjectPatProp, Pat, Prop, PropName, PropOrSpread, Stmt,
};
use text_size::TextRange;

/// A declaration inside a component body: an options-object property or a
/// class member.
#[derive(Debug, Clone)]
pub struct Member {
    /// The declared name. Spreads use the spread callee (`mapState`).
    pub name: SmolStr,
    /// What kind of declaration this is.
    pub kind: MemberKind,
    /// Verbatim text, usable as an object-literal member.
    pub text: String,
    /// Location in the script.
    pub range: TextRange,
    /// Decorators attached to a class member.
    pub decorators: Vec<DecoratorInfo>,
    /// Type annotation text of a class field, without the colon.
    pub type_ann: Option<String>,
}

/// The syntactic role of a member.
#[derive(Debug, Clone)]
pub enum MemberKind {
    /// `key: value` or shorthand `key`.
    Property(Value),
    /// A class field, with its initializer if any.
    Field(Option<Value>),
    /// `key() {}`.
    Method(FunctionSource),
    /// `get key() {}`.
    Getter(FunctionSource),
    /// `set key(v) {}`.
    Setter(FunctionSource),
    /// `...expr`.
    Spread(Value),
}

/// A decorator and its arguments.
#[derive(Debug, Clone)]
pub struct DecoratorInfo {
    /// The decorator name (`Prop`, `Watch`, `Component`).
    pub name: SmolStr,
    /// Call arguments; empty for a bare decorator.
    pub args: Vec<Value>,
    /// Location in the script.
    pub range: TextRange,
}

/// A small owned view of an expression.
#[derive(Debug, Clone)]
pub struct Value {
    pub kind: ValueKind,
    /// Verbatim text of the expression.
    pub text: String,
    pub range: TextRange,
}

#[derive(Debug, Clone)]
pub enum ValueKind {
    Object(Vec<Member>),
    Array(Vec<Value>),
    Str(String),
    Bool(bool),
    Ident(SmolStr),
    Call { callee: String, args: Vec<Value> },
    Function(FunctionSource),
    Other,
}

impl Value {
    /// The object members, if this is an object literal.
    pub fn as_object(&self) -> Option<&[Member]> {
        match &self.kind {
            ValueKind::Object(members) => Some(members),
            _ => None,
        }
    }

    /// The string contents, if this is a string literal.
    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            ValueKind::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// The pieces of a function needed to re-emit it in another form.
#[derive(Debug, Clone, Default)]
pub struct FunctionSource {
    pub is_async: bool,
    pub is_arrow: bool,
    /// Parameter texts including type annotations and defaults.
    pub params: Vec<String>,
    /// Every identifier bound by the parameters.
    pub param_names: Vec<SmolStr>,
    /// Return type text, without the colon.
    pub return_type: Option<String>,
    /// Block text including braces, or the expression of an arrow body.
    pub body: String,
    pub expression_body: bool,
    /// The object literal returned at the top level of the body, if any.
    pub returned_object: Option<Vec<Member>>,
}

impl FunctionSource {
    /// Parameters joined for a parameter list.
    pub fn param_list(&self) -> String {
        self.params.join(", ")
    }

    /// `: T` when a return type is present.
    pub fn return_annotation(&self) -> String {
        self.return_type
            .as_ref()
            .map(|ty| format!(": {}", ty))
            .unwrap_or_default()
    }

    /// The body as a block, wrapping an expression body in `{ return ... }`.
    pub fn block(&self) -> String {
        if self.expression_body {
            format!("{{ return {}; }}", self.body)
        } else {
            self.body.clone()
        }
    }
}

/// Reads swc nodes into [`Member`] and [`Value`] records.
pub(crate) struct MemberReader<'s, 'a> {
    script: &'s ParsedScript<'a>,
}

impl<'s, 'a> MemberReader<'s, 'a> {
    pub fn new(script: &'s ParsedScript<'a>) -> Self {
        Self { script }
    }

    /// Reads all members of an object literal in source order.
    pub fn read_object(&self, object: &ObjectLit) -> Vec<Member> {
        object
            .props
            .iter()
            .filter_map(|prop| self.read_prop(prop))
            .collect()
    }

    fn read_prop(&self, prop: &PropOrSpread) -> Option<Member> {
        let prop = match prop {
            PropOrSpread::Spread(spread) => {
                let value = self.read_value(&spread.expr);
                let name = match &value.kind {
                    ValueKind::Call { callee, .. } => SmolStr::new(last_segment(callee)),
                    _ => SmolStr::new_static("..."),
                };
                let lo = spread.dot3_token.lo;
                let hi = spread.expr.span().hi;
                return Some(Member {
                    name,
                    kind: MemberKind::Spread(value),
                    text: self.script.text_between(lo, hi).to_string(),
                    range: self.range_between(lo, hi),
                    decorators: Vec::new(),
                    type_ann: None,
                });
            }
            PropOrSpread::Prop(prop) => prop,
        };

        match prop.as_ref() {
            Prop::Shorthand(ident) => {
                let name = SmolStr::new(ident.sym.as_str());
                Some(Member {
                    kind: MemberKind::Property(self.read_value(&Expr::Ident(ident.clone()))),
                    text: name.to_string(),
                    range: self.script.range(ident.span),
                    name,
                    decorators: Vec::new(),
                    type_ann: None,
                })
            }
            Prop::KeyValue(kv) => {
                let lo = kv.key.span().lo;
                let hi = kv.value.span().hi;
                Some(Member {
                    name: self.prop_name(&kv.key),
                    kind: MemberKind::Property(self.read_value(&kv.value)),
                    text: self.script.text_between(lo, hi).to_string(),
                    range: self.range_between(lo, hi),
                    decorators: Vec::new(),
                    type_ann: None,
                })
            }
            Prop::Method(method) => {
                let function = self.read_function(&method.function);
                let hi = function_end(&method.function);
                let text = format!(
                    "{}{}",
                    modifiers(method.function.is_async, method.function.is_generator),
                    self.script.text_between(method.key.span().lo, hi)
                );
                Some(Member {
                    name: self.prop_name(&method.key),
                    kind: MemberKind::Method(function),
                    text,
                    range: self.range_between(method.key.span().lo, hi),
                    decorators: Vec::new(),
                    type_ann: None,
                })
            }
            Prop::Getter(getter) => {
                let body = getter
                    .body
                    .as_ref()
                    .map(|b| self.script.text(b.span).to_string())
                    .unwrap_or_else(|| "{}".to_string());
                let function = FunctionSource {
                    return_type: getter
                        .type_ann
                        .as_ref()
                        .map(|ann| self.script.text(ann.type_ann.span()).to_string()),
                    returned_object: getter
                        .body
                        .as_ref()
                        .and_then(|b| self.returned_object(&b.stmts)),
                    body,
                    ..Default::default()
                };
                Some(Member {
                    name: self.prop_name(&getter.key),
                    kind: MemberKind::Getter(function),
                    text: format!(
                        "get {}",
                        self.script.text_between(getter.key.span().lo, getter.span.hi)
                    ),
                    range: self.script.range(getter.span),
                    decorators: Vec::new(),
                    type_ann: None,
                })
            }
            Prop::Setter(setter) => {
                let mut param_names = Vec::new();
                collect_binding_names(&setter.param, &mut param_names);
                let function = FunctionSource {
                    params: vec![self.pat_text(&setter.param).to_string()],
                    param_names,
                    body: setter
                        .body
                        .as_ref()
                        .map(|b| self.script.text(b.span).to_string())
                        .unwrap_or_else(|| "{}".to_string()),
                    ..Default::default()
                };
                Some(Member {
                    name: self.prop_name(&setter.key),
                    kind: MemberKind::Setter(function),
                    text: format!(
                        "set {}",
                        self.script.text_between(setter.key.span().lo, setter.span.hi)
                    ),
                    range: self.script.range(setter.span),
                    decorators: Vec::new(),
                    type_ann: None,
                })
            }
            Prop::Assign(_) => None,
        }
    }

    /// Reads the instance members of a class. Static members, constructors
    /// and private members have no options-API counterpart and are skipped.
    pub fn read_class(&self, class: &Class) -> Vec<Member> {
        let mut members = Vec::new();

        for member in &class.body {
            match member {
                ClassMember::Method(method) if !method.is_static => {
                    let function = self.read_function(&method.function);
                    let lo = method.key.span().lo;
                    let hi = function_end(&method.function);
                    let (kind, prefix) = match method.kind {
                        MethodKind::Method => (MemberKind::Method(function), String::new()),
                        MethodKind::Getter => (MemberKind::Getter(function), "get ".to_string()),
                        MethodKind::Setter => (MemberKind::Setter(function), "set ".to_string()),
                    };
                    let modifiers =
                        modifiers(method.function.is_async, method.function.is_generator);
                    members.push(Member {
                        name: self.prop_name(&method.key),
                        kind,
                        text: format!(
                            "{}{}{}",
                            modifiers,
                            prefix,
                            self.script.text_between(lo, hi)
                        ),
                        range: self.script.range(method.span),
                        decorators: self.read_decorators(&method.function.decorators),
                        type_ann: None,
                    });
                }
                ClassMember::ClassProp(prop) if !prop.is_static => {
                    members.push(Member {
                        name: self.prop_name(&prop.key),
                        kind: MemberKind::Field(prop.value.as_ref().map(|v| self.read_value(v))),
                        text: self.script.text(prop.span).to_string(),
                        range: self.script.range(prop.span),
                        decorators: self.read_decorators(&prop.decorators),
                        type_ann: prop
                            .type_ann
                            .as_ref()
                            .map(|ann| self.script.text(ann.type_ann.span()).to_string()),
                    });
                }
                other => {
                    log::debug!(
                        "skipping class member at {:?}",
                        self.script.range(other.span())
                    );
                }
            }
        }

        members
    }

    pub fn read_decorators(&self, decorators: &[Decorator]) -> Vec<DecoratorInfo> {
        decorators
            .iter()
            .map(|decorator| {
                let (name, args) = match decorator.expr.as_ref() {
                    Expr::Call(call) => {
                        let callee = match &call.callee {
                            Callee::Expr(callee) => self.script.text(callee.span()),
                            _ => "",
                        };
                        let args = call
                            .args
                            .iter()
                            .map(|arg| self.read_value(&arg.expr))
                            .collect();
                        (last_segment(callee), args)
                    }
                    expr => (last_segment(self.script.text(expr.span())), Vec::new()),
                };
                DecoratorInfo {
                    name: SmolStr::new(name),
                    args,
                    range: self.script.range(decorator.span),
                }
            })
            .collect()
    }

    /// Reads an expression. Parentheses and TypeScript casts are looked
    /// through for the kind, while `text` keeps the expression as written.
    pub fn read_value(&self, expr: &Expr) -> Value {
        let kind = match unwrap_expr(expr) {
            Expr::Object(object) => ValueKind::Object(self.read_object(object)),
            Expr::Array(array) => ValueKind::Array(
                array
                    .elems
                    .iter()
                    .flatten()
                    .map(|elem| self.read_value(&elem.expr))
                    .collect(),
            ),
            Expr::Lit(Lit::Str(s)) => ValueKind::Str(match s.value.as_str() {
                Some(value) => value.to_string(),
                None => unquote(self.script.text(s.span)).to_string(),
            }),
            Expr::Lit(Lit::Bool(b)) => ValueKind::Bool(b.value),
            Expr::Tpl(tpl) if tpl.exprs.is_empty() && tpl.quasis.len() == 1 => {
                ValueKind::Str(tpl.quasis[0].raw.to_string())
            }
            Expr::Ident(ident) => ValueKind::Ident(SmolStr::new(ident.sym.as_str())),
            Expr::Call(call) => match &call.callee {
                Callee::Expr(callee) => ValueKind::Call {
                    callee: self.script.text(callee.span()).to_string(),
                    args: call
                        .args
                        .iter()
                        .map(|arg| self.read_value(&arg.expr))
                        .collect(),
                },
                _ => ValueKind::Other,
            },
            Expr::Fn(fn_expr) => ValueKind::Function(self.read_function(&fn_expr.function)),
            Expr::Arrow(arrow) => ValueKind::Function(self.read_arrow(arrow)),
            _ => ValueKind::Other,
        };

        Value {
            kind,
            text: self.script.text(expr.span()).to_string(),
            range: self.script.range(expr.span()),
        }
    }

    pub fn read_function(&self, function: &Function) -> FunctionSource {
        let mut param_names = Vec::new();
        for param in &function.params {
            collect_binding_names(&param.pat, &mut param_names);
        }

        FunctionSource {
            is_async: function.is_async,
            is_arrow: false,
            params: function
                .params
                .iter()
                .map(|param| {
                    let hi = param.span.hi.max(pat_end(&param.pat));
                    self.script.text_between(param.span.lo, hi).to_string()
                })
                .collect(),
            param_names,
            return_type: function
                .return_type
                .as_ref()
                .map(|ann| self.script.text(ann.type_ann.span()).to_string()),
            body: function
                .body
                .as_ref()
                .map(|b| self.script.text(b.span).to_string())
                .unwrap_or_else(|| "{}".to_string()),
            expression_body: false,
            returned_object: function
                .body
                .as_ref()
                .and_then(|b| self.returned_object(&b.stmts)),
        }
    }

    fn read_arrow(&self, arrow: &ArrowExpr) -> FunctionSource {
        let mut param_names = Vec::new();
        for pat in &arrow.params {
            collect_binding_names(pat, &mut param_names);
        }

        let (body, expression_body, returned_object) = match arrow.body.as_ref() {
            BlockStmtOrExpr::BlockStmt(block) => (
                self.script.text(block.span).to_string(),
                false,
                self.returned_object(&block.stmts),
            ),
            BlockStmtOrExpr::Expr(expr) => {
                let returned = match unwrap_expr(expr) {
                    Expr::Object(object) => Some(self.read_object(object)),
                    _ => None,
                };
                (self.script.text(expr.span()).to_string(), true, returned)
            }
        };

        FunctionSource {
            is_async: arrow.is_async,
            is_arrow: true,
            params: arrow
                .params
                .iter()
                .map(|pat| self.pat_text(pat).to_string())
                .collect(),
            param_names,
            return_type: arrow
                .return_type
                .as_ref()
                .map(|ann| self.script.text(ann.type_ann.span()).to_string()),
            body,
            expression_body,
            returned_object,
        }
    }

    /// The object literal of the first top-level `return { ... }`.
    fn returned_object(&self, stmts: &[Stmt]) -> Option<Vec<Member>> {
        stmts.iter().find_map(|stmt| match stmt {
            Stmt::Return(ret) => match ret.arg.as_deref().map(unwrap_expr) {
                Some(Expr::Object(object)) => Some(self.read_object(object)),
                _ => None,
            },
            _ => None,
        })
    }

    fn prop_name(&self, key: &PropName) -> SmolStr {
        match key {
            PropName::Ident(ident) => SmolStr::new(ident.sym.as_str()),
            PropName::Str(s) => match s.value.as_str() {
                Some(value) => SmolStr::new(value),
                None => SmolStr::new(unquote(self.script.text(s.span))),
            },
            other => SmolStr::new(self.script.text(other.span())),
        }
    }

    fn pat_text(&self, pat: &Pat) -> &'a str {
        self.script.text_between(pat.span().lo, pat_end(pat))
    }

    fn range_between(&self, lo: BytePos, hi: BytePos) -> TextRange {
        self.script.range(swc_common::Span::new(lo, hi))
    }
}

/// Looks through parentheses and TypeScript casts.
pub(crate) fn unwrap_expr(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(paren) => unwrap_expr(&paren.expr),
        Expr::TsAs(cast) => unwrap_expr(&cast.expr),
        Expr::TsSatisfies(cast) => unwrap_expr(&cast.expr),
        Expr::TsConstAssertion(cast) => unwrap_expr(&cast.expr),
        Expr::TsTypeAssertion(cast) => unwrap_expr(&cast.expr),
        other => other,
    }
}

/// `Vuex.mapState` -> `mapState`.
pub(crate) fn last_segment(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path).trim()
}

fn modifiers(is_async: bool, is_generator: bool) -> &'static str {
    match (is_async, is_generator) {
        (true, true) => "async *",
        (true, false) => "async ",
        (false, true) => "*",
        (false, false) => "",
    }
}

fn unquote(text: &str) -> &str {
    let trimmed = text.trim();
    if trimmed.len() >= 2 {
        let first = trimmed.as_bytes()[0];
        if matches!(first, b'\'' | b'"' | b'`') && trimmed.as_bytes()[trimmed.len() - 1] == first
        {
            return &trimmed[1..trimmed.len() - 1];
        }
    }
    trimmed
}

fn function_end(function: &Function) -> BytePos {
    function
        .body
        .as_ref()
        .map(|body| body.span.hi)
        .unwrap_or(function.span.hi)
}

/// End of a pattern including its type annotation.
fn pat_end(pat: &Pat) -> BytePos {
    let ann = match pat {
        Pat::Ident(binding) => binding.type_ann.as_ref().map(|ann| ann.span.hi),
        Pat::Array(array) => array.type_ann.as_ref().map(|ann| ann.span.hi),
        Pat::Object(object) => object.type_ann.as_ref().map(|ann| ann.span.hi),
        Pat::Rest(rest) => rest.type_ann.as_ref().map(|ann| ann.span.hi),
        _ => None,
    };
    let hi = pat.span().hi;
    ann.map_or(hi, |ann| ann.max(hi))
}

fn collect_binding_names(pat: &Pat, names: &mut Vec<SmolStr>) {
    match pat {
        Pat::Ident(binding) => names.push(SmolStr::new(binding.id.sym.as_str())),
        Pat::Assign(assign) => collect_binding_names(&assign.left, names),
        Pat::Rest(rest) => collect_binding_names(&rest.arg, names),
        Pat::Array(array) => {
            for elem in array.elems.iter().flatten() {
                collect_binding_names(elem, names);
            }
        }
        Pat::Object(object) => {
            for prop in &object.props {
                match prop {
                    ObjectPatProp::KeyValue(kv) => collect_binding_names(&kv.value, names),
                    ObjectPatProp::Assign(assign) => {
                        names.push(SmolStr::new(assign.key.id.sym.as_str()))
                    }
                    ObjectPatProp::Rest(rest) => collect_binding_names(&rest.arg, names),
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::parse_script;
    use swc_ecma_ast::{ModuleDecl, ModuleItem};
    use vue_sfc_parser::ScriptLang;

    fn read_default_export(source: &str, lang: ScriptLang) -> Vec<Member> {
        let script = parse_script(source, lang).expect("parses");
        let reader = MemberReader::new(&script);
        for item in &script.module.body {
            if let ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(export)) = item {
                if let Expr::Object(object) = unwrap_expr(&export.expr) {
                    return reader.read_object(object);
                }
            }
        }
        panic!("no default export object");
    }

    #[test]
    fn test_reads_members_in_order() {
        let members = read_default_export(
            "export default { name: 'A', data() { return { a: 1 } }, ...mapState(['x']) }",
            ScriptLang::JavaScript,
        );
        let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["name", "data", "mapState"]);
        assert_eq!(members[0].text, "name: 'A'");
        assert_eq!(members[2].text, "...mapState(['x'])");
    }

    #[test]
    fn test_method_text_keeps_async() {
        let members = read_default_export(
            "export default { async load(id) { await fetch(id) } }",
            ScriptLang::JavaScript,
        );
        assert_eq!(members[0].text, "async load(id) { await fetch(id) }");
        let MemberKind::Method(function) = &members[0].kind else {
            panic!("expected method");
        };
        assert!(function.is_async);
        assert_eq!(function.params, vec!["id".to_string()]);
        assert_eq!(function.body, "{ await fetch(id) }");
    }

    #[test]
    fn test_typed_params_and_return_type() {
        let members = read_default_export(
            "export default { sum(a: number, b = 2): number { return a + b } }",
            ScriptLang::TypeScript,
        );
        let MemberKind::Method(function) = &members[0].kind else {
            panic!("expected method");
        };
        assert_eq!(function.params, vec!["a: number", "b = 2"]);
        assert_eq!(function.return_type.as_deref(), Some("number"));
        assert_eq!(function.param_names, vec![SmolStr::new("a"), SmolStr::new("b")]);
    }

    #[test]
    fn test_arrow_data_returns_object() {
        let members = read_default_export(
            "export default { data: () => ({ count: 0, items: [] }) }",
            ScriptLang::JavaScript,
        );
        let MemberKind::Property(value) = &members[0].kind else {
            panic!("expected property");
        };
        let ValueKind::Function(function) = &value.kind else {
            panic!("expected function value");
        };
        assert!(function.is_arrow);
        let returned = function.returned_object.as_ref().expect("object body");
        assert_eq!(returned.len(), 2);
        assert_eq!(returned[1].name, "items");
    }

    #[test]
    fn test_string_keys_are_unquoted() {
        let members = read_default_export(
            "export default { watch: { 'user.name'(v) {} } }",
            ScriptLang::JavaScript,
        );
        let MemberKind::Property(value) = &members[0].kind else {
            panic!("expected property");
        };
        let inner = value.as_object().expect("object");
        assert_eq!(inner[0].name, "user.name");
    }

    #[test]
    fn test_reads_class_members() {
        let source = "export default class Foo extends Vue {\n  @Prop() title!: string\n  count = 0\n  static skip = 1\n  get double(): number { return this.count * 2 }\n  inc() { this.count++ }\n}\n";
        let script = parse_script(source, ScriptLang::TypeScript).expect("parses");
        let reader = MemberReader::new(&script);
        let ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(export)) = &script.module.body[0]
        else {
            panic!("expected class export");
        };
        let swc_ecma_ast::DefaultDecl::Class(class) = &export.decl else {
            panic!("expected class");
        };
        let members = reader.read_class(&class.class);
        let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["title", "count", "double", "inc"]);
        assert_eq!(members[0].decorators[0].name, "Prop");
        assert_eq!(members[0].type_ann.as_deref(), Some("string"));
        assert!(matches!(members[2].kind, MemberKind::Getter(_)));
    }

    #[test]
    fn test_last_segment() {
        assert_eq!(last_segment("Vuex.mapState"), "mapState");
        assert_eq!(last_segment("mapGetters"), "mapGetters");
    }
}
