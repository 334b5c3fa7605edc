use girts_ast::HashMap;
use girts_parser::cst::decls::Decl;

pub mod build;

/// A declaration together with the metadata stamped onto it during the
/// population pass.
///
/// Parsed nodes are shared and never mutated; the owning module and the
/// fully qualified name live here instead.
#[derive(Debug, Clone)]
pub struct Entry {
    /// Fully qualified name, `"<Namespace>.<Name>"`
    pub qualified_name: String,
    /// The namespace of the owning module
    pub namespace: String,
    /// The package name of the owning module, e.g. `Gtk-3.0`
    pub package_name: String,
    pub decl: Decl,
}

/// The global mapping from fully qualified names to declarations across all
/// loaded modules.
///
/// Built once before emission and read-only afterwards.
#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    map: HashMap<String, Entry>,
}

impl SymbolTable {
    /// Inserts an entry, keeping the first one on duplicate keys.
    pub fn insert(&mut self, entry: Entry) {
        if self.map.contains_key(&entry.qualified_name) {
            log::warn!(
                "[{}] Duplicate symbol {}, keeping the first definition",
                entry.package_name,
                entry.qualified_name
            );
            return;
        }
        self.map.insert(entry.qualified_name.clone(), entry);
    }

    pub fn lookup(&self, qualified_name: &str) -> Option<&Entry> {
        self.map.get(qualified_name)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
