//! Assembly of class and interface views: ordered member fragments for one
//! GIR class, interface, record or union.

use girts_ast::{ClassKind, Fragment, HashSet, Item, TsClass};
use girts_parser::cst::decls::{
    Class, Compound, Decl, Field, Function, Interface, Property, Signal,
};

use crate::ctx::Ctx;
use crate::ident::{
    transform_field_name, transform_function_name, transform_property_name, transform_signal_name,
    transform_type_name,
};
use crate::inheritance::OBJECT_CLASS;
use crate::symbol_table::Entry;

use super::overloads::{self, Collation, RenderedMethod};
use super::types::{parameter_list, resolve_type, return_expression};

type LocalNameSet = HashSet<String>;

fn decl_properties(decl: &Decl) -> &[Property] {
    match decl {
        Decl::Class(class) => &class.properties,
        Decl::Interface(interface) => &interface.properties,
        _ => &[],
    }
}

fn decl_fields(decl: &Decl) -> &[Field] {
    match decl {
        Decl::Class(class) => &class.fields,
        _ => &[],
    }
}

fn decl_methods(decl: &Decl) -> &[std::sync::Arc<Function>] {
    match decl {
        Decl::Class(class) => &class.methods,
        Decl::Interface(interface) => &interface.methods,
        _ => &[],
    }
}

fn decl_virtual_methods(decl: &Decl) -> &[std::sync::Arc<Function>] {
    match decl {
        Decl::Class(class) => &class.virtual_methods,
        Decl::Interface(interface) => &interface.virtual_methods,
        _ => &[],
    }
}

fn decl_signals(decl: &Decl) -> &[Signal] {
    match decl {
        Decl::Class(class) => &class.signals,
        Decl::Interface(interface) => &interface.signals,
        _ => &[],
    }
}

/// The emitted name of a function, honouring the `shadows` override.
fn function_name(function: &Function) -> String {
    transform_function_name(function.shadows.as_deref().unwrap_or(&function.name))
}

fn method_line(ctx: &Ctx, function: &Function) -> String {
    format!(
        "{}({}): {}",
        function_name(function),
        parameter_list(ctx, &function.callable),
        return_expression(ctx, &function.callable)
    )
}

/// Emits one class: the construct-props carrier followed by the class view.
pub fn emit_class(ctx: &Ctx, class: &Class, signal_helpers: &[String]) -> Vec<Item> {
    let qualified_name = format!("{}.{}", ctx.namespace.name, class.name);
    let name = transform_type_name(&class.name);
    let derives_object = ctx.inheritance.derives_from_object(ctx.symbols, &qualified_name);
    let is_root_object = qualified_name == OBJECT_CLASS;

    // The inheritance closure: ancestors first, then every interface
    // reachable from the class or one of its ancestors.
    let mut ancestors: Vec<&Entry> = Vec::new();
    ctx.inheritance.closure_walk(ctx.symbols, &ctx.package_name, &qualified_name, &mut |entry| {
        ancestors.push(entry);
    });
    let mut interfaces: Vec<&Entry> = Vec::new();
    let mut seen_interfaces: HashSet<String> = HashSet::default();
    // Ancestors are walked explicitly, so class prerequisites need no
    // recursion here
    for start in std::iter::once(qualified_name.as_str())
        .chain(ancestors.iter().map(|entry| entry.qualified_name.as_str()))
    {
        ctx.inheritance.for_each_interface(ctx.symbols, start, false, &mut |entry| {
            if seen_interfaces.insert(entry.qualified_name.clone()) {
                interfaces.push(entry);
            }
        });
    }
    let inherited: Vec<&Entry> = ancestors.iter().chain(interfaces.iter()).copied().collect();

    let mut local_names = LocalNameSet::default();
    let mut collation = Collation::default();
    collect_inherited_members(ctx, &inherited, &mut collation);

    let mut items = Vec::new();

    // Construct-props carrier
    let parent_display = ctx
        .inheritance
        .parent_class(ctx.symbols, &qualified_name)
        .map(|parent| ctx.strip_local_prefix(&parent).to_owned());
    let construct_props_name = format!("{name}_ConstructProps");
    if derives_object {
        items.push(Item::Class(construct_props_carrier(
            ctx,
            class,
            &construct_props_name,
            parent_display.as_deref(),
        )));
    }

    let mut members: Vec<Fragment> = Vec::new();
    let mut view_property_names: Vec<String> = Vec::new();

    // Fields
    push_fields(ctx, &qualified_name, &class.fields, &mut local_names, &mut members);
    for entry in &inherited {
        let scoped = ctx.resolving_in(&entry.namespace);
        push_fields(
            &scoped,
            &entry.qualified_name,
            decl_fields(&entry.decl),
            &mut local_names,
            &mut members,
        );
    }

    // Properties, own first; inherited properties also feed the collation
    push_properties(
        ctx,
        &qualified_name,
        &class.properties,
        false,
        &mut local_names,
        &mut members,
        &mut view_property_names,
        &mut collation,
    );
    for entry in &inherited {
        let scoped = ctx.resolving_in(&entry.namespace);
        push_properties(
            &scoped,
            &entry.qualified_name,
            decl_properties(&entry.decl),
            true,
            &mut local_names,
            &mut members,
            &mut view_property_names,
            &mut collation,
        );
    }

    // Instance methods
    let direct: Vec<RenderedMethod> = class
        .methods
        .iter()
        .filter(|m| m.introspectable && m.shadowed_by.is_none())
        .map(|m| RenderedMethod { name: function_name(m), lines: vec![method_line(ctx, m)] })
        .collect();
    if !direct.is_empty() {
        members.push(Fragment::line(format!("/* Methods of {qualified_name} */")));
    }
    members.extend(overloads::reconcile_direct_methods(
        &ctx.package_name,
        direct,
        &mut collation,
        &mut local_names,
    ));

    // Virtual methods
    let direct_virtuals: Vec<RenderedMethod> = class
        .virtual_methods
        .iter()
        .filter(|m| m.introspectable && m.shadowed_by.is_none())
        .map(|m| {
            let vfunc_name = format!("vfunc_{}", function_name(m));
            RenderedMethod {
                name: vfunc_name,
                lines: vec![format!("vfunc_{}", method_line(ctx, m))],
            }
        })
        .collect();
    if !direct_virtuals.is_empty() {
        members.push(Fragment::line(format!("/* Virtual methods of {qualified_name} */")));
    }
    members.extend(overloads::reconcile_direct_methods(
        &ctx.package_name,
        direct_virtuals,
        &mut collation,
        &mut local_names,
    ));

    // Inherited names that were not redeclared
    members.extend(overloads::reconcile_inherited(
        &ctx.package_name,
        collation,
        &mut local_names,
        is_root_object,
    ));

    // Signals
    push_signals(ctx, &qualified_name, &name, &class.signals, &mut members);
    for entry in &inherited {
        let scoped = ctx.resolving_in(&entry.namespace);
        push_signals(
            &scoped,
            &entry.qualified_name,
            &name,
            decl_signals(&entry.decl),
            &mut members,
        );
    }

    // Signal helpers: notify overloads for the view's properties, then the
    // general helper block
    if derives_object {
        let pspec = ctx.strip_local_prefix("GObject.ParamSpec").to_owned();
        let mut notify = Fragment::default();
        for raw in &view_property_names {
            let sig = transform_signal_name(raw);
            notify.push(format!(
                "connect(sigName: \"notify::{sig}\", callback: (($obj: {name}, pspec: {pspec}) => void)): number"
            ));
            notify.push(format!(
                "connect_after(sigName: \"notify::{sig}\", callback: (($obj: {name}, pspec: {pspec}) => void)): number"
            ));
        }
        if !notify.is_empty() {
            members.push(notify);
        }
        members.push(Fragment(signal_helpers.to_vec()));
    }

    // Constructors and static methods
    let (static_lines, carrier_lines) = static_members(
        ctx,
        class,
        &name,
        derives_object.then_some(construct_props_name.as_str()),
    );
    let mut statics = Vec::new();
    if !carrier_lines.is_empty() {
        statics.push(Fragment(carrier_lines));
    }
    if ctx.opts.inheritance && !static_lines.is_empty() {
        members.push(Fragment(static_lines));
    }

    let implements: Vec<String> = ctx
        .inheritance
        .parents(&qualified_name)
        .iter()
        .filter(|candidate| {
            matches!(ctx.symbols.lookup(candidate).map(|e| &e.decl), Some(Decl::Interface(_)))
        })
        .map(|candidate| ctx.strip_local_prefix(candidate).to_owned())
        .collect();

    let kind = if ctx.opts.inheritance { ClassKind::Class } else { ClassKind::Decomposed };
    items.push(Item::Class(TsClass {
        name,
        extends: parent_display,
        implements,
        members,
        statics,
        kind,
    }));
    items
}

fn collect_inherited_members(ctx: &Ctx, inherited: &[&Entry], collation: &mut Collation) {
    for entry in inherited {
        let scoped = ctx.resolving_in(&entry.namespace);
        for method in decl_methods(&entry.decl)
            .iter()
            .filter(|m| m.introspectable && m.shadowed_by.is_none())
        {
            let name = function_name(method);
            let line = method_line(&scoped, method);
            collation.add_inherited(&name, &entry.qualified_name, vec![line], false);
        }
        for method in decl_virtual_methods(&entry.decl)
            .iter()
            .filter(|m| m.introspectable && m.shadowed_by.is_none())
        {
            let name = format!("vfunc_{}", function_name(method));
            let line = format!("vfunc_{}", method_line(&scoped, method));
            collation.add_inherited(&name, &entry.qualified_name, vec![line], true);
        }
    }
}

fn construct_props_carrier(
    ctx: &Ctx,
    class: &Class,
    name: &str,
    parent_display: Option<&str>,
) -> TsClass {
    let mut members = Vec::new();
    for property in class
        .properties
        .iter()
        .filter(|p| p.introspectable && !p.private && (p.writable || p.construct_only))
    {
        let property_name = transform_property_name(&property.name, ctx.opts.allow_quotes);
        let typ = resolve_type(ctx, &property.typ, property.nullable, false);
        members.push(Fragment::line(format!("{property_name}?: {typ}")));
    }
    TsClass {
        name: name.to_owned(),
        extends: parent_display.map(|parent| format!("{parent}_ConstructProps")),
        implements: Vec::new(),
        members,
        statics: Vec::new(),
        kind: ClassKind::Interface,
    }
}

fn push_fields(
    ctx: &Ctx,
    owner: &str,
    fields: &[Field],
    local_names: &mut LocalNameSet,
    members: &mut Vec<Fragment>,
) {
    let mut fragment = Fragment::default();
    for field in fields.iter().filter(|f| f.introspectable && !f.private) {
        let field_name = transform_field_name(&field.name, ctx.opts.allow_quotes);
        if !local_names.insert(field_name.clone()) {
            continue;
        }
        let typ = field
            .typ
            .as_ref()
            .map(|t| resolve_type(ctx, t, false, false))
            .unwrap_or_else(|| "any".to_owned());
        fragment.push(format!("{field_name}: {typ}"));
    }
    if !fragment.is_empty() {
        members.push(Fragment::line(format!("/* Fields of {owner} */")));
        members.push(fragment);
    }
}

#[allow(clippy::too_many_arguments)]
fn push_properties(
    ctx: &Ctx,
    owner: &str,
    properties: &[Property],
    inherited: bool,
    local_names: &mut LocalNameSet,
    members: &mut Vec<Fragment>,
    view_property_names: &mut Vec<String>,
    collation: &mut Collation,
) {
    let mut fragment = Fragment::default();
    for property in properties.iter().filter(|p| p.introspectable && !p.private) {
        let property_name = transform_property_name(&property.name, ctx.opts.allow_quotes);
        if inherited {
            collation.add_property_name(&property_name);
        }
        // Construct-only properties live in the construct-props carrier
        if property.construct_only {
            continue;
        }
        if !local_names.insert(property_name.clone()) {
            continue;
        }
        view_property_names.push(property.name.clone());
        let typ = resolve_type(ctx, &property.typ, property.nullable, false);
        if property.writable {
            fragment.push(format!("{property_name}: {typ}"));
        } else {
            fragment.push(format!("readonly {property_name}: {typ}"));
        }
    }
    if !fragment.is_empty() {
        members.push(Fragment::line(format!("/* Properties of {owner} */")));
        members.push(fragment);
    }
}

fn push_signals(
    ctx: &Ctx,
    owner: &str,
    view_name: &str,
    signals: &[Signal],
    members: &mut Vec<Fragment>,
) {
    let mut fragment = Fragment::default();
    for signal in signals.iter().filter(|s| s.introspectable) {
        let signal_name = transform_signal_name(&signal.name);
        let params = parameter_list(ctx, &signal.callable);
        let ret = return_expression(ctx, &signal.callable);
        let callback_params =
            if params.is_empty() { format!("$obj: {view_name}") } else { format!("$obj: {view_name}, {params}") };
        fragment.push(format!(
            "connect(sigName: \"{signal_name}\", callback: (({callback_params}) => {ret})): number"
        ));
        fragment.push(format!(
            "connect_after(sigName: \"{signal_name}\", callback: (({callback_params}) => {ret})): number"
        ));
        let emit_params = if params.is_empty() { String::new() } else { format!(", {params}") };
        fragment.push(format!("emit(sigName: \"{signal_name}\"{emit_params}): void"));
    }
    if !fragment.is_empty() {
        members.push(Fragment::line(format!("/* Signals of {owner} */")));
        members.push(fragment);
    }
}

/// Renders the constructor and static-method members.
///
/// Returns the class-mode `static` lines and the arrow-style carrier lines
/// for the decomposed form.
fn static_members(
    ctx: &Ctx,
    class: &Class,
    view_name: &str,
    construct_props: Option<&str>,
) -> (Vec<String>, Vec<String>) {
    let mut static_lines = Vec::new();
    let mut carrier_lines = Vec::new();

    if let Some(construct_props) = construct_props {
        static_lines.push(format!("constructor(config?: {construct_props})"));
        carrier_lines.push(format!("new(config?: {construct_props}): {view_name}"));
    }

    for constructor in class.constructors.iter().filter(|c| c.introspectable) {
        let ctor_name = function_name(constructor);
        let params = parameter_list(ctx, &constructor.callable);
        static_lines.push(format!("static {ctor_name}({params}): {view_name}"));
        carrier_lines.push(format!("{ctor_name}: ({params}) => {view_name}"));
    }

    for function in
        class.functions.iter().filter(|f| f.introspectable && f.shadowed_by.is_none())
    {
        let fname = function_name(function);
        let params = parameter_list(ctx, &function.callable);
        let ret = return_expression(ctx, &function.callable);
        static_lines.push(format!("static {fname}({params}): {ret}"));
        carrier_lines.push(format!("{fname}: ({params}) => {ret}"));
    }

    // Class methods contributed by the matching GType struct record
    for record in ctx
        .namespace
        .records
        .iter()
        .filter(|r| r.is_gtype_struct_for.as_deref() == Some(class.name.as_str()))
    {
        for method in record.methods.iter().filter(|m| m.introspectable && m.shadowed_by.is_none())
        {
            let method_name = function_name(method);
            let params = parameter_list(ctx, &method.callable);
            let ret = return_expression(ctx, &method.callable);
            static_lines.push(format!("static {method_name}({params}): {ret}"));
            carrier_lines.push(format!("{method_name}: ({params}) => {ret}"));
        }
    }

    (static_lines, carrier_lines)
}

/// Emits one interface view.
pub fn emit_interface(ctx: &Ctx, interface: &Interface) -> Item {
    let qualified_name = format!("{}.{}", ctx.namespace.name, interface.name);
    let name = transform_type_name(&interface.name);

    let mut prerequisites: Vec<&Entry> = Vec::new();
    ctx.inheritance.for_each_interface(ctx.symbols, &qualified_name, true, &mut |entry| {
        prerequisites.push(entry);
    });

    let mut local_names = LocalNameSet::default();
    let mut collation = Collation::default();
    collect_inherited_members(ctx, &prerequisites, &mut collation);

    let mut members: Vec<Fragment> = Vec::new();
    let mut view_property_names: Vec<String> = Vec::new();

    push_properties(
        ctx,
        &qualified_name,
        &interface.properties,
        false,
        &mut local_names,
        &mut members,
        &mut view_property_names,
        &mut collation,
    );
    for entry in &prerequisites {
        let scoped = ctx.resolving_in(&entry.namespace);
        push_properties(
            &scoped,
            &entry.qualified_name,
            decl_properties(&entry.decl),
            true,
            &mut local_names,
            &mut members,
            &mut view_property_names,
            &mut collation,
        );
    }

    let direct: Vec<RenderedMethod> = interface
        .methods
        .iter()
        .filter(|m| m.introspectable && m.shadowed_by.is_none())
        .map(|m| RenderedMethod { name: function_name(m), lines: vec![method_line(ctx, m)] })
        .collect();
    if !direct.is_empty() {
        members.push(Fragment::line(format!("/* Methods of {qualified_name} */")));
    }
    members.extend(overloads::reconcile_direct_methods(
        &ctx.package_name,
        direct,
        &mut collation,
        &mut local_names,
    ));

    let direct_virtuals: Vec<RenderedMethod> = interface
        .virtual_methods
        .iter()
        .filter(|m| m.introspectable && m.shadowed_by.is_none())
        .map(|m| {
            let vfunc_name = format!("vfunc_{}", function_name(m));
            RenderedMethod {
                name: vfunc_name,
                lines: vec![format!("vfunc_{}", method_line(ctx, m))],
            }
        })
        .collect();
    if !direct_virtuals.is_empty() {
        members.push(Fragment::line(format!("/* Virtual methods of {qualified_name} */")));
    }
    members.extend(overloads::reconcile_direct_methods(
        &ctx.package_name,
        direct_virtuals,
        &mut collation,
        &mut local_names,
    ));

    members.extend(overloads::reconcile_inherited(
        &ctx.package_name,
        collation,
        &mut local_names,
        false,
    ));

    push_signals(ctx, &qualified_name, &name, &interface.signals, &mut members);
    for entry in &prerequisites {
        let scoped = ctx.resolving_in(&entry.namespace);
        push_signals(
            &scoped,
            &entry.qualified_name,
            &name,
            decl_signals(&entry.decl),
            &mut members,
        );
    }

    let mut statics = Vec::new();
    let mut carrier_lines = Vec::new();
    for function in
        interface.functions.iter().filter(|f| f.introspectable && f.shadowed_by.is_none())
    {
        let fname = function_name(function);
        let params = parameter_list(ctx, &function.callable);
        let ret = return_expression(ctx, &function.callable);
        if ctx.opts.inheritance {
            members.push(Fragment::line(format!("static {fname}({params}): {ret}")));
        }
        carrier_lines.push(format!("{fname}: ({params}) => {ret}"));
    }
    if !carrier_lines.is_empty() {
        statics.push(Fragment(carrier_lines));
    }

    let kind = if ctx.opts.inheritance {
        ClassKind::Class
    } else if statics.is_empty() {
        ClassKind::Interface
    } else {
        ClassKind::Decomposed
    };
    Item::Class(TsClass { name, extends: None, implements: Vec::new(), members, statics, kind })
}

/// Emits one record or union view.
pub fn emit_compound(ctx: &Ctx, compound: &Compound) -> Item {
    let qualified_name = format!("{}.{}", ctx.namespace.name, compound.name);
    let name = transform_type_name(&compound.name);

    let mut local_names = LocalNameSet::default();
    let mut members: Vec<Fragment> = Vec::new();

    push_fields(ctx, &qualified_name, &compound.fields, &mut local_names, &mut members);

    let direct: Vec<RenderedMethod> = compound
        .methods
        .iter()
        .filter(|m| m.introspectable && m.shadowed_by.is_none())
        .map(|m| RenderedMethod { name: function_name(m), lines: vec![method_line(ctx, m)] })
        .collect();
    if !direct.is_empty() {
        members.push(Fragment::line(format!("/* Methods of {qualified_name} */")));
    }
    let mut collation = Collation::default();
    members.extend(overloads::reconcile_direct_methods(
        &ctx.package_name,
        direct,
        &mut collation,
        &mut local_names,
    ));

    let mut static_lines = Vec::new();
    let mut carrier_lines = Vec::new();
    for constructor in compound.constructors.iter().filter(|c| c.introspectable) {
        let ctor_name = function_name(constructor);
        let params = parameter_list(ctx, &constructor.callable);
        static_lines.push(format!("static {ctor_name}({params}): {name}"));
        carrier_lines.push(format!("{ctor_name}: ({params}) => {name}"));
    }
    for function in
        compound.functions.iter().filter(|f| f.introspectable && f.shadowed_by.is_none())
    {
        let fname = function_name(function);
        let params = parameter_list(ctx, &function.callable);
        let ret = return_expression(ctx, &function.callable);
        static_lines.push(format!("static {fname}({params}): {ret}"));
        carrier_lines.push(format!("{fname}: ({params}) => {ret}"));
    }
    let mut statics = Vec::new();
    if !carrier_lines.is_empty() {
        statics.push(Fragment(carrier_lines));
    }
    if ctx.opts.inheritance && !static_lines.is_empty() {
        members.push(Fragment(static_lines));
    }

    let kind = if ctx.opts.inheritance {
        ClassKind::Class
    } else if statics.is_empty() {
        ClassKind::Interface
    } else {
        ClassKind::Decomposed
    };
    Item::Class(TsClass { name, extends: None, implements: Vec::new(), members, statics, kind })
}
