//! The string-template collaborator: file headers, signal-helper blocks and
//! runtime stubs, with `${key}` substitution.

use girts_lowering::Environment;

/// Substitutes every `${key}` occurrence in the template.
pub fn render(template: &str, bindings: &[(&str, &str)]) -> String {
    let mut out = template.to_owned();
    for (key, value) in bindings {
        out = out.replace(&format!("${{{key}}}"), value);
    }
    out
}

const HEADER: &str = "\
/*
 * Type definitions for ${environment}
 * ${package}
 * Generated by girts; do not edit by hand
 */";

pub fn header(package_name: &str, environment: Environment) -> Vec<String> {
    let environment = match environment {
        Environment::Gjs => "Gjs",
        Environment::Node => "node-gtk",
    };
    render(HEADER, &[("environment", environment), ("package", package_name)])
        .lines()
        .map(str::to_owned)
        .collect()
}

const GJS_SIGNAL_HELPERS: &str = "\
connect(sigName: string, callback: any): number
connect_after(sigName: string, callback: any): number
emit(sigName: string, ...args: any[]): void
disconnect(id: number): void";

const NODE_SIGNAL_HELPERS: &str = "\
connect(sigName: string, callback: any): number
connect_after(sigName: string, callback: any): number
emit(sigName: string, ...args: any[]): void
disconnect(id: number): void
on(sigName: string, callback: any): NodeJS.EventEmitter
once(sigName: string, callback: any): NodeJS.EventEmitter
off(sigName: string, callback: any): NodeJS.EventEmitter";

/// The general signal-helper member block for one class view.
pub fn signal_helpers(environment: Environment) -> Vec<String> {
    let template = match environment {
        Environment::Gjs => GJS_SIGNAL_HELPERS,
        Environment::Node => NODE_SIGNAL_HELPERS,
    };
    template.lines().map(str::to_owned).collect()
}

const GJS_STUB: &str = "\
// ${package}
imports.gi.versions.${namespace} = '${version}'
module.exports = imports.gi.${namespace}
";

const NODE_STUB: &str = "\
// ${package}
module.exports = require('node-gtk').require('${namespace}', '${version}')
";

/// The runtime glue written next to the declaration file.
pub fn runtime_stub(
    environment: Environment,
    namespace: &str,
    version: &str,
    package_name: &str,
) -> String {
    let template = match environment {
        Environment::Gjs => GJS_STUB,
        Environment::Node => NODE_STUB,
    };
    render(
        template,
        &[("package", package_name), ("namespace", namespace), ("version", version)],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_replaces_every_occurrence() {
        assert_eq!(render("${a} + ${a} = ${b}", &[("a", "1"), ("b", "2")]), "1 + 1 = 2");
    }

    #[test]
    fn stubs_wire_up_the_runtime() {
        let stub = runtime_stub(Environment::Gjs, "Gtk", "3.0", "Gtk-3.0");
        assert!(stub.contains("imports.gi.versions.Gtk = '3.0'"));
        let stub = runtime_stub(Environment::Node, "Gtk", "3.0", "Gtk-3.0");
        assert!(stub.contains("require('node-gtk').require('Gtk', '3.0')"));
    }
}
