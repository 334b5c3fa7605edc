//! Emission of one namespace: sequencing of all declaration kinds into a
//! printable module.

mod class;
mod overloads;
mod tables;
mod types;

use girts_ast::{HashSet, Import, Item, TsAlias, TsCallback, TsConst, TsEnum, TsFunction};
use girts_parser::cst::decls::{Enumeration, Module};

use crate::ctx::{BuildType, Ctx, EmitOptions, ModuleExtras};
use crate::ident::{
    transform_constant, transform_enum_name, transform_enum_value, transform_function_name,
    transform_module_namespace, transform_type_name,
};
use crate::inheritance::InheritanceIndex;
use crate::result::{LoweringError, LoweringResult};
use crate::symbol_table::SymbolTable;

use types::{call_signature, parameter_list, resolve_type, return_expression};

/// The package name of the module defining the root object class
const OBJECT_PACKAGE: &str = "GObject-2.0";
const OBJECT_NAMESPACE: &str = "GObject";

/// Emits the declaration file tree for one module.
///
/// The symbol table and inheritance index must be fully populated; they are
/// only read here.
pub fn emit_namespace(
    module: &Module,
    symbols: &SymbolTable,
    inheritance: &InheritanceIndex,
    opts: &EmitOptions,
    extras: &ModuleExtras,
) -> LoweringResult<girts_ast::Module> {
    let namespace = &module.namespace;
    if namespace.name.is_empty() || namespace.version.is_empty() {
        return Err(Box::new(LoweringError::MissingNamespaceIdentity {
            package_name: namespace.package_name(),
        }));
    }
    let ctx = Ctx::new(symbols, inheritance, opts, namespace);

    let mut items = Vec::new();

    for enumeration in namespace.enumerations.iter().filter(|e| e.introspectable) {
        items.push(emit_enumeration(&ctx, enumeration));
    }
    for bitfield in namespace.bitfields.iter().filter(|e| e.introspectable) {
        items.push(emit_enumeration(&ctx, bitfield));
    }

    // A constant is exported at most once per module
    let mut constant_names: HashSet<String> = HashSet::default();
    for constant in namespace.constants.iter().filter(|c| c.introspectable) {
        let name = transform_constant(&constant.name);
        if !constant_names.insert(name.clone()) {
            ctx.warn(format!("Constant {name} exported twice, skipping"));
            continue;
        }
        let typ = constant
            .typ
            .as_ref()
            .map(|t| resolve_type(&ctx, t, false, false))
            .unwrap_or_else(|| "any".to_owned());
        items.push(Item::Const(TsConst { name, typ }));
    }

    for function in
        namespace.functions.iter().filter(|f| f.introspectable && f.shadowed_by.is_none())
    {
        let name = transform_function_name(function.shadows.as_deref().unwrap_or(&function.name));
        let signature = format!(
            "{name}({}): {}",
            parameter_list(&ctx, &function.callable),
            return_expression(&ctx, &function.callable)
        );
        items.push(Item::Function(TsFunction { name, signature }));
    }

    for callback in namespace.callbacks.iter().filter(|c| c.introspectable) {
        items.push(Item::Callback(TsCallback {
            name: transform_type_name(&callback.name),
            call_signature: call_signature(&ctx, &callback.callable),
        }));
    }

    for interface in namespace.interfaces.iter().filter(|i| i.introspectable) {
        items.push(class::emit_interface(&ctx, interface));
    }

    // Per-module template override, spliced between interfaces and classes
    if let Some(patch) = &extras.patch {
        items.push(Item::Patch(patch.clone()));
    }

    for class in namespace.classes.iter().filter(|c| c.introspectable) {
        items.extend(class::emit_class(&ctx, class, &extras.signal_helpers));
    }

    for record in namespace.records.iter().filter(|r| r.introspectable) {
        items.push(class::emit_compound(&ctx, record));
    }
    for union in namespace.unions.iter().filter(|u| u.introspectable) {
        items.push(class::emit_compound(&ctx, union));
    }

    for alias in namespace.aliases.iter().filter(|a| a.introspectable) {
        // The type handle of the root object module is a plain number; its
        // alias is suppressed
        if namespace.name == OBJECT_NAMESPACE && alias.name == "Type" {
            continue;
        }
        let target = alias
            .target
            .as_ref()
            .map(|t| resolve_type(&ctx, t, false, false))
            .unwrap_or_else(|| "any".to_owned());
        items.push(Item::Alias(TsAlias { name: transform_type_name(&alias.name), target }));
    }

    let mut imports = Vec::new();
    let mut has_object_module = namespace.name == OBJECT_NAMESPACE;
    for include in &namespace.includes {
        let package_name = include.package_name();
        if include.name == OBJECT_NAMESPACE {
            has_object_module = true;
        }
        if extras.missing_dependencies.contains(&package_name) {
            imports.push(Import::Missing { package_name });
        } else {
            imports.push(Import::Resolved {
                alias: transform_module_namespace(&include.name),
                package_name,
            });
        }
    }
    if !has_object_module {
        imports.insert(
            0,
            Import::Resolved {
                alias: OBJECT_NAMESPACE.to_owned(),
                package_name: OBJECT_PACKAGE.to_owned(),
            },
        );
    }

    Ok(girts_ast::Module {
        package_name: ctx.package_name.clone(),
        namespace: transform_module_namespace(&namespace.name),
        header: extras.header.clone(),
        imports,
        wrap_namespace: opts.build_type == BuildType::Types,
        items,
    })
}

fn emit_enumeration(ctx: &Ctx, enumeration: &Enumeration) -> Item {
    let name = transform_enum_name(&enumeration.name);
    let mut members = Vec::new();
    for member in &enumeration.members {
        let value = transform_enum_value(&member.name);
        if value.starts_with(|c: char| c.is_ascii_digit()) {
            ctx.warn(format!("Enum member {value} of {name} starts with a number"));
            members.push(format!("// {value} (invalid, starts with a number)"));
        } else {
            members.push(format!("{value},"));
        }
    }
    Item::Enum(TsEnum { name, members })
}
