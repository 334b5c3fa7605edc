use girts_parser::cst::decls::Namespace;

use crate::inheritance::InheritanceIndex;
use crate::symbol_table::SymbolTable;

/// The dynamic runtime the generated declarations target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Gjs,
    Node,
}

/// Whether the output is a type package or a library source tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildType {
    #[default]
    Types,
    Lib,
}

/// Options that shape a namespace emission
#[derive(Debug, Clone)]
pub struct EmitOptions {
    pub environment: Environment,
    pub build_type: BuildType,
    /// Emit classes with `extends`; the alternative is the
    /// interface-plus-constant decomposition
    pub inheritance: bool,
    /// Allow quoted member names for dash-containing properties
    pub allow_quotes: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            environment: Environment::Gjs,
            build_type: BuildType::Types,
            inheritance: true,
            allow_quotes: true,
        }
    }
}

/// Pre-rendered collaborator output spliced into one module's emission.
///
/// The driver renders these from its templates; the emitter only
/// concatenates them.
#[derive(Debug, Clone, Default)]
pub struct ModuleExtras {
    /// Header comment lines for the top of the file
    pub header: Vec<String>,
    /// The general signal-helper member lines
    pub signal_helpers: Vec<String>,
    /// A per-module override file, spliced verbatim between interfaces and
    /// classes
    pub patch: Option<String>,
    /// Package names of direct dependencies that could not be located
    pub missing_dependencies: Vec<String>,
}

/// Read-only context for emitting a single namespace
pub struct Ctx<'a> {
    pub symbols: &'a SymbolTable,
    pub inheritance: &'a InheritanceIndex,
    pub opts: &'a EmitOptions,
    /// The namespace currently being emitted
    pub namespace: &'a Namespace,
    /// Package name of the namespace currently being emitted
    pub package_name: String,
    /// Namespace used to qualify unqualified type references.
    ///
    /// Differs from the emitted namespace while members inherited from
    /// another module are being rendered.
    pub resolve_namespace: String,
}

impl<'a> Ctx<'a> {
    pub fn new(
        symbols: &'a SymbolTable,
        inheritance: &'a InheritanceIndex,
        opts: &'a EmitOptions,
        namespace: &'a Namespace,
    ) -> Self {
        let package_name = namespace.package_name();
        let resolve_namespace = namespace.name.clone();
        Self { symbols, inheritance, opts, namespace, package_name, resolve_namespace }
    }

    /// A context that qualifies unqualified references in another namespace.
    pub fn resolving_in(&self, namespace: &str) -> Ctx<'a> {
        Ctx {
            symbols: self.symbols,
            inheritance: self.inheritance,
            opts: self.opts,
            namespace: self.namespace,
            package_name: self.package_name.clone(),
            resolve_namespace: namespace.to_owned(),
        }
    }

    /// Qualifies a name with the resolution namespace unless it already is.
    pub fn qualify(&self, name: &str) -> String {
        if name.contains('.') {
            name.to_owned()
        } else {
            format!("{}.{}", self.resolve_namespace, name)
        }
    }

    /// Strips the emitted module's prefix for same-module references.
    pub fn strip_local_prefix<'n>(&self, qualified_name: &'n str) -> &'n str {
        qualified_name
            .strip_prefix(&format!("{}.", self.namespace.name))
            .unwrap_or(qualified_name)
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        log::warn!("[{}] {}", self.package_name, message.as_ref());
    }
}
