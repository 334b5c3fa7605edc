use std::path::PathBuf;
use std::sync::Arc;

use girts_ast::HashMap;
use url::Url;

use crate::result::DriverError;

/// Provider of GIR documents, either from disk or from memory.
pub trait FileSource {
    /// Check if a file with the given URI exists
    fn exists(&self, uri: &Url) -> bool;
    /// Read the contents of a file with the given URI
    fn read_to_string(&mut self, uri: &Url) -> Result<String, DriverError>;
    /// Locate the document of a package, e.g. `Gtk-3.0`
    fn locate(&self, package_name: &str) -> Option<Url>;
}

/// A file source that searches a list of gir directories on disk.
pub struct FileSystemSource {
    gir_directories: Vec<PathBuf>,
}

impl FileSystemSource {
    pub fn new(gir_directories: Vec<PathBuf>) -> Self {
        Self { gir_directories }
    }
}

impl FileSource for FileSystemSource {
    fn exists(&self, uri: &Url) -> bool {
        uri.to_file_path().map(|path| path.exists()).unwrap_or(false)
    }

    fn read_to_string(&mut self, uri: &Url) -> Result<String, DriverError> {
        let path = uri.to_file_path().map_err(|_| DriverError::InvalidUri(uri.clone()))?;
        let source = std::fs::read_to_string(&path).map_err(Arc::new).map_err(DriverError::Io)?;
        // Normalize checked-out Windows line endings so spans and output
        // are identical on all platforms
        Ok(source.replace("\r\n", "\n"))
    }

    fn locate(&self, package_name: &str) -> Option<Url> {
        for dir in &self.gir_directories {
            let path = dir.join(format!("{package_name}.gir"));
            if path.exists() {
                let path = path.canonicalize().unwrap_or(path);
                return Url::from_file_path(path).ok();
            }
        }
        None
    }
}

/// A file source that keeps documents in memory
pub struct InMemorySource {
    files: HashMap<Url, String>,
    packages: HashMap<String, Url>,
}

impl Default for InMemorySource {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySource {
    pub fn new() -> Self {
        Self { files: HashMap::default(), packages: HashMap::default() }
    }

    /// Registers a package under a synthetic in-memory URI.
    pub fn insert(&mut self, package_name: &str, source: impl Into<String>) -> Url {
        let uri = Url::parse(&format!("file:///in-memory/{package_name}.gir"))
            .expect("in-memory URI is valid");
        self.files.insert(uri.clone(), source.into());
        self.packages.insert(package_name.to_owned(), uri.clone());
        uri
    }
}

impl FileSource for InMemorySource {
    fn exists(&self, uri: &Url) -> bool {
        self.files.contains_key(uri)
    }

    fn read_to_string(&mut self, uri: &Url) -> Result<String, DriverError> {
        self.files.get(uri).cloned().ok_or_else(|| DriverError::FileNotFound(uri.clone()))
    }

    fn locate(&self, package_name: &str) -> Option<Url> {
        self.packages.get(package_name).cloned()
    }
}
