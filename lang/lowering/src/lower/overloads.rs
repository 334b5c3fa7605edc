//! Reconciliation of direct and inherited members of one class view.
//!
//! Collation walks the inheritance closure and the implemented interfaces
//! and gathers every method under its name; reconciliation then decides
//! which copies surface and which are kept as commented shadow
//! declarations.

use girts_ast::{Fragment, HashSet};
use indexmap::IndexMap;

/// Member names claimed by the signal helper machinery.
///
/// Inherited methods with these names always clash on classes other than
/// the root object class, because the helper declarations shadow them.
pub const SIGNAL_HELPERS: [&str; 4] = ["connect", "connect_after", "emit", "disconnect"];

/// A method defined directly on the class view, already rendered
pub struct RenderedMethod {
    pub name: String,
    pub lines: Vec<String>,
}

/// One inherited declaration gathered during collation
#[derive(Debug, Clone)]
pub struct InheritedMember {
    pub lines: Vec<String>,
    pub is_virtual: bool,
}

/// Inherited members keyed by name, then by owning class
#[derive(Default)]
pub struct Collation {
    pub fn_map: IndexMap<String, IndexMap<String, InheritedMember>>,
    /// Names of inherited properties; methods may not reuse them
    pub property_names: HashSet<String>,
}

impl Collation {
    pub fn add_inherited(
        &mut self,
        name: &str,
        owner: &str,
        lines: Vec<String>,
        is_virtual: bool,
    ) {
        self.fn_map
            .entry(name.to_owned())
            .or_default()
            .entry(owner.to_owned())
            .or_insert(InheritedMember { lines, is_virtual });
    }

    pub fn add_property_name(&mut self, name: &str) {
        self.property_names.insert(name.to_owned());
    }
}

/// Emits the methods defined directly on the view, together with shadow
/// declarations for every inherited copy whose signature differs.
pub fn reconcile_direct_methods(
    package_name: &str,
    methods: Vec<RenderedMethod>,
    collation: &mut Collation,
    local_names: &mut HashSet<String>,
) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    for method in methods {
        if collation.property_names.contains(&method.name) {
            fragments.push(Fragment::line(format!(
                "// method \"{}\" skipped, name clashes with an inherited property",
                method.name
            )));
            continue;
        }

        local_names.insert(method.name.clone());
        let own_canonical = canonicalize(package_name, &method.lines);
        fragments.push(Fragment(method.lines));

        let Some(inherited) = collation.fn_map.shift_remove(&method.name) else {
            continue;
        };
        for (owner, member) in inherited {
            if canonicalize(package_name, &member.lines) == own_canonical {
                continue;
            }
            let mut fragment = Fragment::line(format!(
                "// false overload of \"{}\" inherited from \"{owner}\"",
                method.name
            ));
            fragment.0.extend(member.lines);
            fragments.push(fragment);
        }
    }
    fragments
}

/// Emits the inherited names that were not redeclared directly.
///
/// A name only surfaces when two distinct signatures remain after
/// deduplication, or when a signal helper forces the clash.
pub fn reconcile_inherited(
    package_name: &str,
    collation: Collation,
    local_names: &mut HashSet<String>,
    is_root_object: bool,
) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    for (name, owners) in collation.fn_map {
        // Claimed even when skipped, to block later property collisions
        local_names.insert(name.clone());

        let forced = !is_root_object && SIGNAL_HELPERS.contains(&name.as_str());

        let mut seen: Vec<String> = Vec::new();
        let mut retained: Vec<(String, InheritedMember)> = Vec::new();
        for (owner, member) in owners {
            let canonical = canonicalize(package_name, &member.lines);
            if seen.contains(&canonical) {
                continue;
            }
            seen.push(canonical);
            retained.push((owner, member));
        }

        if retained.len() < 2 && !forced {
            continue;
        }

        for (owner, member) in retained {
            let note = if member.is_virtual {
                format!("// false overload of virtual method from \"{owner}\", do not override")
            } else {
                let owner_local = owner.rsplit('.').next().unwrap_or(&owner);
                format!(
                    "// false overload, use {owner_local}.prototype.{name}.call() \
                     to access the variant from \"{owner}\""
                )
            };
            let mut fragment = Fragment::line(note);
            fragment.0.extend(member.lines);
            fragments.push(fragment);
        }
    }
    fragments
}

/// Canonicalizes a declaration for signature comparison.
///
/// Block comments are removed, then every `<name>:` token in the
/// parenthesized parameter list is rewritten to `:` and every `<name>?:`
/// token to `?:`. Two declarations match iff the results are string-equal.
pub fn canonicalize(package_name: &str, lines: &[String]) -> String {
    let joined = lines.join("\n");
    let stripped = strip_block_comments(&joined);
    strip_parameter_names(package_name, &stripped)
}

fn strip_block_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start..].find("*/") {
            Some(end) => rest = &rest[start + end + 2..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '"' || c == '-'
}

fn strip_parameter_names(package_name: &str, input: &str) -> String {
    let mut out: Vec<char> = Vec::with_capacity(input.len());
    let mut depth: i32 = 0;
    for c in input.chars() {
        match c {
            '(' => {
                depth += 1;
                out.push(c);
            }
            ')' => {
                depth -= 1;
                if depth < 0 {
                    log::warn!("[{package_name}] Bad function definition: {input}");
                    depth = 0;
                }
                out.push(c);
            }
            ':' if depth > 0 => {
                let mut end = out.len();
                if end > 0 && out[end - 1] == '?' {
                    end -= 1;
                }
                let mut start = end;
                while start > 0 && is_ident_char(out[start - 1]) {
                    start -= 1;
                }
                out.drain(start..end);
                out.push(':');
            }
            _ => out.push(c),
        }
    }
    if depth != 0 {
        log::warn!("[{package_name}] Bad function definition: {input}");
    }
    out.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canon(line: &str) -> String {
        canonicalize("Test-1.0", &[line.to_owned()])
    }

    #[test]
    fn parameter_names_are_stripped() {
        assert_eq!(canon("m(a: number, b: string): void"), "m(: number, : string): void");
        assert_eq!(canon("m(a?: number): void"), "m(?: number): void");
    }

    #[test]
    fn block_comments_do_not_affect_comparison() {
        assert_eq!(canon("/* note */ m(x: number): void"), canon("m(y: number): void"));
    }

    #[test]
    fn nested_arrow_parameters_are_stripped_too() {
        assert_eq!(
            canon("connect(sig: string, cb: (obj: any) => void): number"),
            canon("connect(name: string, callback: (o: any) => void): number")
        );
    }

    #[test]
    fn differing_signatures_do_not_match() {
        assert_ne!(canon("m(): void"), canon("m(x: number): void"));
    }

    #[test]
    fn direct_method_clashing_with_property_is_skipped() {
        let mut collation = Collation::default();
        collation.add_property_name("margin");
        let mut local_names = HashSet::default();
        let fragments = reconcile_direct_methods(
            "Test-1.0",
            vec![RenderedMethod {
                name: "margin".to_owned(),
                lines: vec!["margin(): number".to_owned()],
            }],
            &mut collation,
            &mut local_names,
        );
        assert_eq!(fragments.len(), 1);
        assert!(fragments[0].0[0].contains("clashes with an inherited property"));
        assert!(!local_names.contains("margin"));
    }

    #[test]
    fn mismatching_inherited_copy_becomes_a_false_overload() {
        let mut collation = Collation::default();
        collation.add_inherited("m", "Test.A", vec!["m(x: number): void".to_owned()], false);
        let mut local_names = HashSet::default();
        let fragments = reconcile_direct_methods(
            "Test-1.0",
            vec![RenderedMethod { name: "m".to_owned(), lines: vec!["m(): void".to_owned()] }],
            &mut collation,
            &mut local_names,
        );
        assert_eq!(fragments.len(), 2);
        assert!(fragments[1].0[0].contains("false overload"));
        assert_eq!(fragments[1].0[1], "m(x: number): void");
        assert!(collation.fn_map.is_empty());
    }

    #[test]
    fn single_inherited_signature_is_skipped() {
        let mut collation = Collation::default();
        collation.add_inherited("m", "Test.A", vec!["m(): void".to_owned()], false);
        collation.add_inherited("m", "Test.B", vec!["m(): void".to_owned()], false);
        let mut local_names = HashSet::default();
        let fragments = reconcile_inherited("Test-1.0", collation, &mut local_names, false);
        assert!(fragments.is_empty());
        assert!(local_names.contains("m"));
    }

    #[test]
    fn two_distinct_inherited_signatures_both_surface() {
        let mut collation = Collation::default();
        collation.add_inherited("m", "Test.A", vec!["m(): void".to_owned()], false);
        collation.add_inherited("m", "Test.I", vec!["m(x: number): void".to_owned()], true);
        let mut local_names = HashSet::default();
        let fragments = reconcile_inherited("Test-1.0", collation, &mut local_names, false);
        assert_eq!(fragments.len(), 2);
        assert!(fragments[0].0[0].contains("false overload"));
        assert!(fragments[0].0[0].contains(".prototype.m.call()"));
        assert!(fragments[1].0[0].contains("do not override"));
    }

    #[test]
    fn signal_helper_names_force_the_clash() {
        let mut collation = Collation::default();
        collation.add_inherited(
            "connect",
            "GObject.Object",
            vec!["connect(sigName: string, callback: any): number".to_owned()],
            false,
        );
        let mut local_names = HashSet::default();
        let fragments =
            reconcile_inherited("Test-1.0", collation, &mut local_names, false);
        assert_eq!(fragments.len(), 1);

        // On the root object class itself the helper is not a clash
        let mut collation = Collation::default();
        collation.add_inherited(
            "connect",
            "GObject.Object",
            vec!["connect(sigName: string, callback: any): number".to_owned()],
            false,
        );
        let fragments =
            reconcile_inherited("GObject-2.0", collation, &mut HashSet::default(), true);
        assert!(fragments.is_empty());
    }
}
