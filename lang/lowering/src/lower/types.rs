//! Lowering of GIR type references to surface type expressions.

use girts_parser::cst::decls::{Callable, Direction, Parameter};
use girts_parser::cst::types::{AnyType, TypeNode};

use crate::ctx::Ctx;
use crate::ident::transform_parameter_name;

use super::tables;

/// Lowers a type reference to a surface type expression.
///
/// `out` selects the read-position mapping tables; it is set for return
/// values and out parameters. The nullability suffix is appended after the
/// array suffix.
pub fn resolve_type(ctx: &Ctx, typ: &AnyType, nullable: bool, out: bool) -> String {
    match typ {
        AnyType::Type(node) => resolve_type_node(ctx, node, false, nullable, out),
        AnyType::List(node) => resolve_type_node(ctx, node, true, nullable, out),
        AnyType::Array(array) => match array.element.as_ref() {
            AnyType::Type(node) => resolve_type_node(ctx, node, true, nullable, out),
            element => {
                let inner = resolve_type(ctx, element, false, out);
                let null_suffix = if nullable { " | null" } else { "" };
                format!("({inner})[]{null_suffix}")
            }
        },
        AnyType::Callback(callback) => {
            let arrow = arrow_signature(ctx, &callback.callable);
            // Parenthesize whenever a suffix follows the function type
            if nullable { format!("({arrow}) | null") } else { arrow }
        }
        AnyType::Varargs => "any".to_owned(),
    }
}

fn resolve_type_node(
    ctx: &Ctx,
    node: &TypeNode,
    is_array: bool,
    nullable: bool,
    out: bool,
) -> String {
    let array_suffix = if is_array { "[]" } else { "" };
    let null_suffix = if nullable { " | null" } else { "" };
    let environment = ctx.opts.environment;

    if let Some(c_type) = &node.c_type {
        if let Some(mapped) = tables::c_type(&ctx.resolve_namespace, c_type) {
            return format!("{mapped}{array_suffix}{null_suffix}");
        }
    }

    if is_array {
        if let Some(name) = &node.name {
            // Array-specific mappings already denote the whole array
            if let Some(mapped) = tables::array_plain_type(name, environment, out) {
                return format!("{mapped}{null_suffix}");
            }
        }
    }

    let Some(name) = &node.name else {
        ctx.warn("Missing type reference, falling back to any");
        return format!("any{array_suffix}");
    };

    if let Some(mapped) = tables::plain_type(name, environment, out) {
        return format!("{mapped}{array_suffix}{null_suffix}");
    }

    let qualified = ctx.qualify(name);
    if let Some(mapped) = tables::full_type(&qualified, environment, out) {
        return format!("{mapped}{array_suffix}{null_suffix}");
    }

    if let Some(entry) = ctx.symbols.lookup(&qualified) {
        let local = ctx.strip_local_prefix(&entry.qualified_name);
        return format!("{local}{array_suffix}{null_suffix}");
    }

    ctx.warn(format!("Could not resolve type {name}"));
    format!("any{array_suffix}")
}

/// Renders the surface parameter list of a callable.
///
/// Out parameters are omitted; they surface through the return expression.
/// A nullable parameter becomes optional only when no required parameter
/// follows it.
pub fn parameter_list(ctx: &Ctx, callable: &Callable) -> String {
    let params: Vec<&Parameter> =
        callable.parameters.iter().filter(|p| p.direction != Direction::Out).collect();
    let mut rendered = Vec::with_capacity(params.len());
    for (position, param) in params.iter().enumerate() {
        if matches!(param.typ, AnyType::Varargs) {
            rendered.push("...args: any[]".to_owned());
            continue;
        }
        let required_follows = params[position + 1..]
            .iter()
            .any(|later| !later.is_nullable() && !matches!(later.typ, AnyType::Varargs));
        let optional = param.is_nullable() && !required_follows;
        let name = transform_parameter_name(&param.name);
        let typ = resolve_type(ctx, &param.typ, false, false);
        if optional {
            rendered.push(format!("{name}?: {typ}"));
        } else {
            rendered.push(format!("{name}: {typ}"));
        }
    }
    rendered.join(", ")
}

/// Renders the surface return type of a callable, packing out parameters.
///
/// A void return with exactly one out parameter turns into that parameter;
/// any other combination becomes a positional tuple with the return first.
pub fn return_expression(ctx: &Ctx, callable: &Callable) -> String {
    let ret = callable
        .return_value
        .as_ref()
        .map(|rv| resolve_type(ctx, &rv.typ, rv.nullable || rv.allow_none, true))
        .unwrap_or_else(|| "void".to_owned());

    let outs: Vec<(String, String)> = callable
        .parameters
        .iter()
        .filter(|p| p.direction != Direction::In)
        .map(|p| {
            (
                transform_parameter_name(&p.name),
                resolve_type(ctx, &p.typ, p.is_nullable(), true),
            )
        })
        .collect();

    if outs.is_empty() {
        return ret;
    }
    if ret == "void" && outs.len() == 1 {
        return outs.into_iter().next().map(|(_, typ)| typ).unwrap_or_default();
    }

    let mut parts = Vec::with_capacity(outs.len() + 1);
    if ret != "void" {
        parts.push(format!("/* returnType */ {ret}"));
    }
    for (name, typ) in outs {
        parts.push(format!("/* {name} */ {typ}"));
    }
    format!("[ {} ]", parts.join(", "))
}

/// `(a: number) => string` — used for inline callbacks
pub fn arrow_signature(ctx: &Ctx, callable: &Callable) -> String {
    format!("({}) => {}", parameter_list(ctx, callable), return_expression(ctx, callable))
}

/// `(a: number): string` — used for callback interfaces
pub fn call_signature(ctx: &Ctx, callable: &Callable) -> String {
    format!("({}): {}", parameter_list(ctx, callable), return_expression(ctx, callable))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use girts_parser::parse_module;
    use url::Url;

    use crate::ctx::EmitOptions;
    use crate::inheritance::build_inheritance_index;
    use crate::symbol_table::build::build_symbol_table;

    use super::*;

    fn fixture() -> Vec<Arc<girts_parser::cst::decls::Module>> {
        let source = r#"<repository version="1.2"
             xmlns="http://www.gtk.org/introspection/core/1.0"
             xmlns:c="http://www.gtk.org/introspection/c/1.0"
             xmlns:glib="http://www.gtk.org/introspection/glib/1.0">
             <namespace name="Test" version="1.0">
               <class name="Widget"/>
               <function name="f" c:identifier="test_f">
                 <return-value><type name="none"/></return-value>
                 <parameters>
                   <parameter name="a" nullable="1"><type name="gint"/></parameter>
                   <parameter name="b"><type name="gint"/></parameter>
                 </parameters>
               </function>
               <function name="g" c:identifier="test_g">
                 <return-value><type name="none"/></return-value>
                 <parameters>
                   <parameter name="a"><type name="gint"/></parameter>
                   <parameter name="b" nullable="1"><type name="gint"/></parameter>
                 </parameters>
               </function>
               <function name="h" c:identifier="test_h">
                 <return-value><type name="none"/></return-value>
                 <parameters>
                   <parameter name="out_str" direction="out"><type name="utf8"/></parameter>
                 </parameters>
               </function>
               <function name="k" c:identifier="test_k">
                 <return-value><type name="gboolean"/></return-value>
                 <parameters>
                   <parameter name="count" direction="out"><type name="gint"/></parameter>
                 </parameters>
               </function>
             </namespace></repository>"#;
        let uri = Url::parse("file:///Test-1.0.gir").unwrap();
        vec![Arc::new(parse_module(uri, source).unwrap())]
    }

    fn with_ctx<R>(f: impl FnOnce(&Ctx) -> R) -> R {
        let modules = fixture();
        let symbols = build_symbol_table(&modules);
        let inheritance = build_inheritance_index(&modules, &symbols);
        let opts = EmitOptions::default();
        let ctx = Ctx::new(&symbols, &inheritance, &opts, &modules[0].namespace);
        f(&ctx)
    }

    fn plain(name: &str) -> AnyType {
        AnyType::Type(TypeNode { span: 0..0, name: Some(name.to_owned()), c_type: None })
    }

    #[test]
    fn built_ins_resolve_through_the_plain_table() {
        with_ctx(|ctx| {
            assert_eq!(resolve_type(ctx, &plain("utf8"), false, false), "string");
            assert_eq!(resolve_type(ctx, &plain("gint"), false, false), "number");
            assert_eq!(resolve_type(ctx, &plain("none"), false, false), "void");
        });
    }

    #[test]
    fn suffixes_concatenate_array_then_nullable() {
        with_ctx(|ctx| {
            assert_eq!(resolve_type(ctx, &plain("utf8"), true, false), "string | null");
            let array = AnyType::Array(girts_parser::cst::types::ArrayNode {
                span: 0..0,
                element: Box::new(plain("utf8")),
                length: None,
                c_type: None,
            });
            assert_eq!(resolve_type(ctx, &array, true, false), "string[] | null");
        });
    }

    #[test]
    fn same_module_references_lose_their_prefix() {
        with_ctx(|ctx| {
            assert_eq!(resolve_type(ctx, &plain("Widget"), false, false), "Widget");
            assert_eq!(resolve_type(ctx, &plain("Test.Widget"), false, false), "Widget");
        });
    }

    #[test]
    fn resolution_is_idempotent_on_qualified_names() {
        with_ctx(|ctx| {
            let once = resolve_type(ctx, &plain("Test.Widget"), false, false);
            assert_eq!(resolve_type(ctx, &plain(&once), false, false), once);
        });
    }

    #[test]
    fn unresolved_types_fall_back_to_any() {
        with_ctx(|ctx| {
            assert_eq!(resolve_type(ctx, &plain("Nowhere.ToBeFound"), false, false), "any");
        });
    }

    #[test]
    fn nullable_parameter_followed_by_required_stays_required() {
        with_ctx(|ctx| {
            let f = &ctx.namespace.functions[0];
            assert_eq!(parameter_list(ctx, &f.callable), "a: number, b: number");
            let g = &ctx.namespace.functions[1];
            assert_eq!(parameter_list(ctx, &g.callable), "a: number, b?: number");
        });
    }

    #[test]
    fn single_out_with_void_return_becomes_the_return() {
        with_ctx(|ctx| {
            let h = &ctx.namespace.functions[2];
            assert_eq!(return_expression(ctx, &h.callable), "string");
            assert_eq!(parameter_list(ctx, &h.callable), "");
        });
    }

    #[test]
    fn outs_pack_into_a_tuple_with_the_return_first() {
        with_ctx(|ctx| {
            let k = &ctx.namespace.functions[3];
            assert_eq!(
                return_expression(ctx, &k.callable),
                "[ /* returnType */ boolean, /* count */ number ]"
            );
        });
    }
}
