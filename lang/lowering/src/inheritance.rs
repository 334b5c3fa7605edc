use std::sync::Arc;

use girts_ast::{HashMap, HashSet};
use girts_parser::cst::decls::{Decl, Module};

use crate::symbol_table::{Entry, SymbolTable};

/// The root object class every GObject class derives from
pub const OBJECT_CLASS: &str = "GObject.Object";

/// Upper bound on the depth of an inheritance walk
pub const MAX_RECURSION: usize = 100;

/// Parent-and-interface adjacency for every class and interface.
///
/// For classes the parent comes first, followed by the implemented
/// interfaces; interfaces carry their single prerequisite. Built after the
/// symbol table and read-only during emission.
#[derive(Debug, Default, Clone)]
pub struct InheritanceIndex {
    map: HashMap<String, Vec<String>>,
}

pub fn build_inheritance_index(
    modules: &[Arc<Module>],
    symbol_table: &SymbolTable,
) -> InheritanceIndex {
    let mut index = InheritanceIndex::default();
    for module in modules {
        let namespace = &module.namespace;
        let package_name = namespace.package_name();
        for class in namespace.classes.iter().filter(|c| c.introspectable) {
            let qualified_name = format!("{}.{}", namespace.name, class.name);
            let mut parents = Vec::new();
            if let Some(parent) = &class.parent {
                parents.push(resolve_reference(
                    symbol_table,
                    &package_name,
                    &namespace.name,
                    parent,
                ));
            }
            for implemented in &class.implements {
                parents.push(resolve_reference(
                    symbol_table,
                    &package_name,
                    &namespace.name,
                    implemented,
                ));
            }
            index.map.insert(qualified_name, parents);
        }
        for interface in namespace.interfaces.iter().filter(|i| i.introspectable) {
            let qualified_name = format!("{}.{}", namespace.name, interface.name);
            let mut parents = Vec::new();
            if let Some(prerequisite) = &interface.prerequisite {
                parents.push(resolve_reference(
                    symbol_table,
                    &package_name,
                    &namespace.name,
                    prerequisite,
                ));
            }
            index.map.insert(qualified_name, parents);
        }
    }
    index
}

/// Qualifies a raw parent reference and checks that it resolves.
///
/// Unresolvable references fall back to the root object class.
fn resolve_reference(
    symbol_table: &SymbolTable,
    package_name: &str,
    namespace: &str,
    reference: &str,
) -> String {
    let qualified =
        if reference.contains('.') { reference.to_owned() } else { format!("{namespace}.{reference}") };
    if symbol_table.lookup(&qualified).is_none() {
        log::warn!("[{package_name}] Unresolved parent {qualified}, falling back to {OBJECT_CLASS}");
        return OBJECT_CLASS.to_owned();
    }
    qualified
}

impl InheritanceIndex {
    pub fn parents(&self, qualified_name: &str) -> &[String] {
        self.map.get(qualified_name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Depth-first walk up the parent chain, starting at the parent of
    /// `start`.
    ///
    /// The walk stops at the recursion bound, on a cycle back to `start`,
    /// and on classes that have no parent.
    pub fn closure_walk<'a>(
        &self,
        symbol_table: &'a SymbolTable,
        package_name: &str,
        start: &str,
        visit: &mut dyn FnMut(&'a Entry),
    ) {
        let mut visited: HashSet<String> = HashSet::default();
        let mut current = start.to_owned();
        for _ in 0..MAX_RECURSION {
            let Some(next) = self.parent_of(symbol_table, &current) else {
                return;
            };
            if next == start {
                log::warn!("[{package_name}] Circular dependency found: {start}");
                return;
            }
            if !visited.insert(next.clone()) {
                return;
            }
            let Some(entry) = symbol_table.lookup(&next) else {
                return;
            };
            visit(entry);
            current = next;
        }
        log::warn!("[{package_name}] Maximum inheritance depth of {MAX_RECURSION} reached at {start}");
    }

    /// The parent class of a class, skipping over implemented interfaces.
    ///
    /// The root object class counts as a parent even when its module is not
    /// loaded, since unresolved references fall back to it.
    pub fn parent_class(&self, symbol_table: &SymbolTable, qualified_name: &str) -> Option<String> {
        self.parent_of(symbol_table, qualified_name)
    }

    fn parent_of(&self, symbol_table: &SymbolTable, qualified_name: &str) -> Option<String> {
        self.parents(qualified_name)
            .iter()
            .find(|candidate| {
                candidate.as_str() == OBJECT_CLASS
                    || matches!(
                        symbol_table.lookup(candidate).map(|entry| &entry.decl),
                        Some(Decl::Class(_))
                    )
            })
            .cloned()
    }

    /// Visits every interface implemented by `start`, recursing through
    /// interface prerequisites.
    ///
    /// Prerequisites that are object classes are only followed when
    /// `recurse_objects` is set.
    pub fn for_each_interface<'a>(
        &self,
        symbol_table: &'a SymbolTable,
        start: &str,
        recurse_objects: bool,
        visit: &mut dyn FnMut(&'a Entry),
    ) {
        let mut visited: HashSet<String> = HashSet::default();
        self.for_each_interface_inner(symbol_table, start, recurse_objects, &mut visited, 0, visit);
    }

    fn for_each_interface_inner<'a>(
        &self,
        symbol_table: &'a SymbolTable,
        current: &str,
        recurse_objects: bool,
        visited: &mut HashSet<String>,
        depth: usize,
        visit: &mut dyn FnMut(&'a Entry),
    ) {
        if depth >= MAX_RECURSION {
            return;
        }
        for candidate in self.parents(current) {
            let Some(entry) = symbol_table.lookup(candidate) else {
                continue;
            };
            match &entry.decl {
                Decl::Interface(_) => {
                    if visited.insert(candidate.clone()) {
                        visit(entry);
                        self.for_each_interface_inner(
                            symbol_table,
                            candidate,
                            recurse_objects,
                            visited,
                            depth + 1,
                            visit,
                        );
                    }
                }
                Decl::Class(_) if recurse_objects => {
                    // An object-class prerequisite of an interface
                    if visited.insert(candidate.clone()) {
                        self.for_each_interface_inner(
                            symbol_table,
                            candidate,
                            recurse_objects,
                            visited,
                            depth + 1,
                            visit,
                        );
                    }
                }
                _ => {}
            }
        }
    }

    /// Whether `start` derives, transitively, from the root object class.
    pub fn derives_from_object(&self, symbol_table: &SymbolTable, start: &str) -> bool {
        if start == OBJECT_CLASS {
            return true;
        }
        let mut visited: HashSet<String> = HashSet::default();
        let mut current = start.to_owned();
        for _ in 0..MAX_RECURSION {
            let Some(next) = self.parent_of(symbol_table, &current) else {
                return false;
            };
            if next == OBJECT_CLASS {
                return true;
            }
            if next == start || !visited.insert(next.clone()) {
                return false;
            }
            current = next;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use girts_parser::parse_module;
    use url::Url;

    use crate::symbol_table::build::build_symbol_table;

    use super::*;

    fn modules(body: &str) -> Vec<Arc<Module>> {
        let source = format!(
            r#"<repository version="1.2"
                 xmlns="http://www.gtk.org/introspection/core/1.0"
                 xmlns:glib="http://www.gtk.org/introspection/glib/1.0">
                 <namespace name="Test" version="1.0">{body}</namespace>
               </repository>"#
        );
        let uri = Url::parse("file:///Test-1.0.gir").unwrap();
        vec![Arc::new(parse_module(uri, &source).unwrap())]
    }

    fn walk_names(
        index: &InheritanceIndex,
        symbol_table: &SymbolTable,
        start: &str,
    ) -> Vec<String> {
        let mut names = Vec::new();
        index.closure_walk(symbol_table, "Test-1.0", start, &mut |entry| {
            names.push(entry.qualified_name.clone());
        });
        names
    }

    #[test]
    fn walks_the_parent_chain() {
        let modules = modules(
            r#"<class name="A" parent="B"/><class name="B" parent="C"/><class name="C"/>"#,
        );
        let symbol_table = build_symbol_table(&modules);
        let index = build_inheritance_index(&modules, &symbol_table);
        assert_eq!(walk_names(&index, &symbol_table, "Test.A"), vec!["Test.B", "Test.C"]);
    }

    #[test]
    fn cycle_stops_the_walk() {
        let modules = modules(r#"<class name="A" parent="B"/><class name="B" parent="A"/>"#);
        let symbol_table = build_symbol_table(&modules);
        let index = build_inheritance_index(&modules, &symbol_table);
        // A -> B is visited; B's parent A closes the cycle and stops descent
        assert_eq!(walk_names(&index, &symbol_table, "Test.A"), vec!["Test.B"]);
    }

    #[test]
    fn interfaces_and_prerequisites_are_visited_once() {
        let modules = modules(
            r#"<class name="D">
                 <implements name="I"/>
                 <implements name="J"/>
               </class>
               <interface name="I"><prerequisite name="K"/></interface>
               <interface name="J"><prerequisite name="K"/></interface>
               <interface name="K"/>"#,
        );
        let symbol_table = build_symbol_table(&modules);
        let index = build_inheritance_index(&modules, &symbol_table);
        let mut names = Vec::new();
        index.for_each_interface(&symbol_table, "Test.D", false, &mut |entry| {
            names.push(entry.qualified_name.clone());
        });
        assert_eq!(names, vec!["Test.I", "Test.K", "Test.J"]);
    }

    #[test]
    fn unresolved_parents_fall_back_to_the_object_class() {
        let modules = modules(r#"<class name="A" parent="Missing.Parent"/>"#);
        let symbol_table = build_symbol_table(&modules);
        let index = build_inheritance_index(&modules, &symbol_table);
        assert_eq!(index.parents("Test.A"), [OBJECT_CLASS.to_owned()]);
    }
}
