use std::sync::Arc;

use girts_parser::cst::decls::*;

use super::{Entry, SymbolTable};

/// Populates the global symbol table from every loaded module.
///
/// Only introspectable constructs are inserted; the order of the modules
/// decides which declaration wins on duplicate names.
pub fn build_symbol_table(modules: &[Arc<Module>]) -> SymbolTable {
    let mut symbol_table = SymbolTable::default();
    for module in modules {
        populate(&mut symbol_table, &module.namespace);
    }
    symbol_table
}

fn populate(symbol_table: &mut SymbolTable, namespace: &Namespace) {
    for decl in declarations(namespace) {
        insert(symbol_table, namespace, decl);
    }
}

/// All declarations of a namespace in document order, filtered down to the
/// introspectable ones.
fn declarations(namespace: &Namespace) -> Vec<Decl> {
    let mut decls = Vec::new();
    decls.extend(
        namespace.enumerations.iter().filter(|e| e.introspectable).cloned().map(Decl::Enumeration),
    );
    decls.extend(
        namespace.bitfields.iter().filter(|e| e.introspectable).cloned().map(Decl::Bitfield),
    );
    decls.extend(
        namespace.constants.iter().filter(|c| c.introspectable).cloned().map(Decl::Constant),
    );
    decls.extend(namespace.aliases.iter().filter(|a| a.introspectable).cloned().map(Decl::Alias));
    decls.extend(
        namespace.callbacks.iter().filter(|c| c.introspectable).cloned().map(Decl::Callback),
    );
    decls.extend(
        namespace.functions.iter().filter(|f| f.introspectable).cloned().map(Decl::Function),
    );
    decls.extend(namespace.records.iter().filter(|r| r.introspectable).cloned().map(Decl::Record));
    decls.extend(namespace.unions.iter().filter(|u| u.introspectable).cloned().map(Decl::Union));
    decls.extend(namespace.classes.iter().filter(|c| c.introspectable).cloned().map(Decl::Class));
    decls.extend(
        namespace.interfaces.iter().filter(|i| i.introspectable).cloned().map(Decl::Interface),
    );
    decls
}

fn insert(symbol_table: &mut SymbolTable, namespace: &Namespace, decl: Decl) {
    let qualified_name = format!("{}.{}", namespace.name, decl.name());
    symbol_table.insert(Entry {
        qualified_name,
        namespace: namespace.name.clone(),
        package_name: namespace.package_name(),
        decl,
    });
}

#[cfg(test)]
mod tests {
    use girts_parser::parse_module;
    use url::Url;

    use super::*;

    fn module(name: &str, version: &str, body: &str) -> Arc<Module> {
        let source = format!(
            r#"<repository version="1.2"
                 xmlns="http://www.gtk.org/introspection/core/1.0"
                 xmlns:c="http://www.gtk.org/introspection/c/1.0"
                 xmlns:glib="http://www.gtk.org/introspection/glib/1.0">
                 <namespace name="{name}" version="{version}">{body}</namespace>
               </repository>"#
        );
        let uri = Url::parse(&format!("file:///{name}-{version}.gir")).unwrap();
        Arc::new(parse_module(uri, &source).unwrap())
    }

    #[test]
    fn stamps_qualified_name_and_owner() {
        let modules = vec![module("Test", "1.0", r#"<class name="Widget"/>"#)];
        let symbol_table = build_symbol_table(&modules);
        let entry = symbol_table.lookup("Test.Widget").unwrap();
        assert_eq!(entry.namespace, "Test");
        assert_eq!(entry.package_name, "Test-1.0");
    }

    #[test]
    fn duplicate_symbols_keep_the_first_entry() {
        let modules = vec![
            module("Test", "1.0", r#"<class name="Widget" parent="First"/>"#),
            module("Test", "2.0", r#"<class name="Widget" parent="Second"/>"#),
        ];
        let symbol_table = build_symbol_table(&modules);
        assert_eq!(symbol_table.len(), 1);
        let entry = symbol_table.lookup("Test.Widget").unwrap();
        match &entry.decl {
            Decl::Class(class) => assert_eq!(class.parent.as_deref(), Some("First")),
            other => panic!("expected class, got {other:?}"),
        }
    }

    #[test]
    fn non_introspectable_constructs_are_skipped() {
        let modules = vec![module(
            "Test",
            "1.0",
            r#"<record name="Hidden" introspectable="0"/><record name="Visible"/>"#,
        )];
        let symbol_table = build_symbol_table(&modules);
        assert!(symbol_table.lookup("Test.Hidden").is_none());
        assert!(symbol_table.lookup("Test.Visible").is_some());
    }
}
