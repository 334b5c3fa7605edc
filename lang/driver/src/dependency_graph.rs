use url::Url;

use girts_ast::{HashMap, HashSet};

/// The dependency graph over every loaded module, built from the
/// `<include>` elements.
#[derive(Default)]
pub struct DependencyGraph {
    graph: HashMap<Url, Vec<Url>>,
}

impl DependencyGraph {
    pub fn get(&self, url: &Url) -> Option<&Vec<Url>> {
        self.graph.get(url)
    }

    pub fn insert(&mut self, url: Url, deps: Vec<Url>) {
        self.graph.insert(url, deps);
    }

    /// Prints the dependency graph as an indented tree to the debug log.
    pub fn print_dependency_tree(&self) {
        let mut visited = HashSet::default();
        for module_uri in self.graph.keys() {
            self.print_module_dependencies(module_uri, &mut visited, 0);
        }
    }

    fn print_module_dependencies(
        &self,
        module_uri: &Url,
        visited: &mut HashSet<Url>,
        depth: usize,
    ) {
        let indent = "  ".repeat(depth);
        if !visited.insert(module_uri.clone()) {
            log::debug!("{}{} (already visited)", indent, url_to_label(module_uri));
            return;
        }
        log::debug!("{}{}", indent, url_to_label(module_uri));
        if let Some(dependencies) = self.get(module_uri) {
            for dep_url in dependencies {
                self.print_module_dependencies(dep_url, visited, depth + 1);
            }
        }
        visited.remove(module_uri);
    }
}

/// Extracts the file name from a URL for concise display.
fn url_to_label(url: &Url) -> String {
    if let Some(mut path_segments) = url.path_segments() {
        if let Some(file_name) = path_segments.next_back() {
            return file_name.to_string();
        }
    }
    url.path().to_string()
}
