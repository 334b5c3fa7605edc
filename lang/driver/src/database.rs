use std::sync::Arc;

use girts_lowering::{
    build_inheritance_index, build_symbol_table, InheritanceIndex, ModuleExtras, SymbolTable,
};
use girts_parser::cst;
use girts_printer::PrintToString;
use url::Url;

use crate::cache::Cache;
use crate::config::Config;
use crate::dependency_graph::DependencyGraph;
use crate::fs::{FileSource, FileSystemSource, InMemorySource};
use crate::result::{DriverError, Error};
use crate::templates;

use girts_ast::HashMap;

/// The rendered output of one module
#[derive(Debug, Clone)]
pub struct GeneratedModule {
    pub package_name: String,
    /// The declaration file contents
    pub declarations: String,
    /// The runtime stub contents
    pub stub: String,
}

/// A database tracking a set of GIR documents and the artifacts generated
/// from them.
pub struct Database {
    /// The source provider of the files (file system or in-memory)
    pub source: Box<dyn FileSource>,
    config: Config,
    /// The source text of each document
    pub files: Cache<String>,
    /// The CST of each document (once parsed)
    pub cst: Cache<Result<Arc<cst::decls::Module>, Error>>,
    /// Dependency graph over the loaded modules
    pub deps: DependencyGraph,
    /// Module URIs in load order
    loaded: Vec<Url>,
    /// Direct dependencies that could not be located, per module
    missing: HashMap<Url, Vec<String>>,
    /// The global symbol table, built by `prepare`
    symbols: Option<Arc<SymbolTable>>,
    /// The inheritance index, built by `prepare`
    inheritance: Option<Arc<InheritanceIndex>>,
}

impl Database {
    /// Create a database reading from the configured gir directories
    pub fn new(config: Config) -> Self {
        let source = FileSystemSource::new(config.gir_directories.clone());
        Self::from_source(config, source)
    }

    /// Create a database that only keeps files in memory
    pub fn in_memory(config: Config, source: InMemorySource) -> Self {
        Self::from_source(config, source)
    }

    pub fn from_source(config: Config, source: impl FileSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            config,
            files: Cache::default(),
            cst: Cache::default(),
            deps: DependencyGraph::default(),
            loaded: Vec::new(),
            missing: HashMap::default(),
            symbols: None,
            inheritance: None,
        }
    }

    // Core API: Source
    //
    //

    pub fn source_text(&mut self, uri: &Url) -> Result<String, Error> {
        match self.files.get_unless_stale(uri) {
            Some(source) => {
                log::debug!("Found source in cache: {uri}");
                Ok(source.clone())
            }
            None => self.recompute_source(uri),
        }
    }

    fn recompute_source(&mut self, uri: &Url) -> Result<String, Error> {
        log::debug!("Recomputing source for: {uri}");
        let source = self.source.read_to_string(uri)?;
        self.files.insert(uri.clone(), source.clone());
        Ok(source)
    }

    // Core API: CST
    //
    //

    pub fn cst(&mut self, uri: &Url) -> Result<Arc<cst::decls::Module>, Error> {
        match self.cst.get_unless_stale(uri) {
            Some(cst) => {
                log::debug!("Found cst in cache: {uri}");
                cst.clone()
            }
            None => self.recompute_cst(uri),
        }
    }

    fn recompute_cst(&mut self, uri: &Url) -> Result<Arc<cst::decls::Module>, Error> {
        log::debug!("Recomputing cst for: {uri}");
        let source = self.source_text(uri)?;
        let module = girts_parser::parse_module(uri.clone(), &source)
            .map_err(Error::Parser)
            .map(Arc::new);
        self.cst.insert(uri.clone(), module.clone());
        module
    }

    // Loading
    //
    //

    /// Locates the document of a package across the gir directories.
    pub fn resolve_package(&self, package_name: &str) -> Result<Url, Error> {
        self.source
            .locate(package_name)
            .ok_or_else(|| DriverError::DependencyNotFound(package_name.to_owned()).into())
    }

    /// Loads a package and its transitive includes.
    pub fn load_package(&mut self, package_name: &str) -> Result<Url, Error> {
        let uri = self.resolve_package(package_name)?;
        self.load_module(&uri)?;
        Ok(uri)
    }

    /// Loads a module document and follows its `<include>` elements.
    ///
    /// A dependency that fails to load is reported and skipped; the
    /// referencing module still loads.
    pub fn load_module(&mut self, uri: &Url) -> Result<(), Error> {
        if self.loaded.contains(uri) {
            return Ok(());
        }
        self.loaded.push(uri.clone());

        let module = self.cst(uri)?;
        let package_name = module.package_name();

        let mut dep_uris = Vec::new();
        let mut missing = Vec::new();
        for include in &module.namespace.includes {
            let dep_package = include.package_name();
            match self.source.locate(&dep_package) {
                Some(dep_uri) => {
                    dep_uris.push(dep_uri.clone());
                    if let Err(err) = self.load_module(&dep_uri) {
                        log::warn!("[{package_name}] Failed to load dependency {dep_package}: {err}");
                    }
                }
                None => {
                    log::warn!("[{package_name}] Dependency not found: {dep_package}");
                    missing.push(dep_package);
                }
            }
        }
        self.deps.insert(uri.clone(), dep_uris);
        self.missing.insert(uri.clone(), missing);
        Ok(())
    }

    /// Module URIs in load order.
    pub fn loaded_modules(&self) -> &[Url] {
        &self.loaded
    }

    // Preparation: the two global build passes
    //
    //

    /// Builds the symbol table and the inheritance index over every loaded
    /// module. Both are frozen afterwards.
    pub fn prepare(&mut self) -> Result<(), Error> {
        let mut modules = Vec::new();
        for uri in self.loaded.clone() {
            match self.cst(&uri) {
                Ok(module) => modules.push(module),
                Err(err) => log::warn!("Skipping {uri}: {err}"),
            }
        }
        let symbols = build_symbol_table(&modules);
        let inheritance = build_inheritance_index(&modules, &symbols);
        log::debug!("Symbol table holds {} entries", symbols.len());
        self.symbols = Some(Arc::new(symbols));
        self.inheritance = Some(Arc::new(inheritance));
        if self.config.verbose {
            self.deps.print_dependency_tree();
        }
        Ok(())
    }

    // Generation
    //
    //

    /// Renders the declaration file and runtime stub of one module.
    pub fn generate(&mut self, uri: &Url) -> Result<GeneratedModule, Error> {
        if self.symbols.is_none() {
            self.prepare()?;
        }
        let module = self.cst(uri)?;
        let package_name = module.package_name();

        let extras = ModuleExtras {
            header: templates::header(&package_name, self.config.environment),
            signal_helpers: templates::signal_helpers(self.config.environment),
            patch: self.load_patch(&package_name),
            missing_dependencies: self.missing.get(uri).cloned().unwrap_or_default(),
        };
        let opts = self.config.emit_options();

        let (Some(symbols), Some(inheritance)) = (&self.symbols, &self.inheritance) else {
            return Err(DriverError::Impossible("tables not built before emission".into()).into());
        };

        let dts_module =
            girts_lowering::emit_namespace(&module, symbols, inheritance, &opts, &extras)
                .map_err(Error::Lowering)?;
        let declarations = dts_module.print_to_string(None);
        let stub = templates::runtime_stub(
            self.config.environment,
            &module.namespace.name,
            &module.namespace.version,
            &package_name,
        );
        Ok(GeneratedModule { package_name, declarations, stub })
    }

    /// The contents of the per-module override file, if one exists.
    fn load_patch(&self, package_name: &str) -> Option<String> {
        let dir = self.config.overrides_dir.as_ref()?;
        let path = dir.join(format!("{package_name}.append.d.ts"));
        match std::fs::read_to_string(&path) {
            Ok(patch) => {
                log::debug!("Applying override file {}", path.display());
                Some(patch.trim_end().to_owned())
            }
            Err(_) => None,
        }
    }

    /// Generates and writes the output files of one module.
    pub fn write_output(&mut self, uri: &Url) -> Result<String, Error> {
        let generated = self.generate(uri)?;
        let outdir = self.config.outdir.clone();
        std::fs::create_dir_all(&outdir).map_err(Arc::new).map_err(DriverError::Io)?;
        let dts_path = outdir.join(format!("{}.d.ts", generated.package_name));
        std::fs::write(&dts_path, &generated.declarations)
            .map_err(Arc::new)
            .map_err(DriverError::Io)?;
        let stub_path = outdir.join(format!("{}.js", generated.package_name));
        std::fs::write(&stub_path, &generated.stub).map_err(Arc::new).map_err(DriverError::Io)?;
        log::debug!("Wrote {}", dts_path.display());
        Ok(generated.package_name)
    }

    /// Lists every package discoverable in the configured gir directories.
    pub fn discover(&self) -> Vec<String> {
        let mut packages = Vec::new();
        for dir in &self.config.gir_directories {
            let Ok(entries) = std::fs::read_dir(dir) else {
                continue;
            };
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) == Some("gir") {
                    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                        packages.push(stem.to_owned());
                    }
                }
            }
        }
        packages.sort();
        packages.dedup();
        packages
    }

    pub fn pretty_error(&self, uri: &Url, err: Error) -> miette::Report {
        let miette_error: miette::Error = err.into();
        if let Some(source) = self.files.get_even_if_stale(uri) {
            miette_error.with_source_code(miette::NamedSource::new(uri, source.to_owned()))
        } else {
            miette_error
        }
    }
}
