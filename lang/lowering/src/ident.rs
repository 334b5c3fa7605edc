//! Transformations from raw GIR identifiers to valid surface identifiers.
//!
//! All transforms are deterministic and idempotent; applying a transform to
//! its own output returns the input unchanged.

/// Identifiers that may not be used as parameter, field or function names
/// on the target surface.
pub const RESERVED_WORDS: &[&str] = &[
    "abstract",
    "arguments",
    "await",
    "boolean",
    "break",
    "byte",
    "case",
    "catch",
    "char",
    "class",
    "const",
    "constructor",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "double",
    "else",
    "enum",
    "eval",
    "export",
    "extends",
    "false",
    "final",
    "finally",
    "float",
    "for",
    "function",
    "goto",
    "if",
    "implements",
    "import",
    "in",
    "instanceof",
    "int",
    "interface",
    "let",
    "long",
    "native",
    "new",
    "null",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "short",
    "static",
    "super",
    "switch",
    "synchronized",
    "this",
    "throw",
    "throws",
    "transient",
    "true",
    "try",
    "typeof",
    "var",
    "void",
    "volatile",
    "while",
    "with",
    "yield",
];

fn placeholder_for_empty(name: &str) -> Option<String> {
    // "-" is the placeholder itself; mapping it again must be a no-op
    if name.is_empty() || name == "-" { Some("-".to_owned()) } else { None }
}

fn escape_reserved(name: &str) -> String {
    if RESERVED_WORDS.contains(&name) { format!("{name}_") } else { name.to_owned() }
}

/// Removes dashes by camel-casing the character that follows each dash.
fn camel_case_dashes(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for c in name.chars() {
        if c == '-' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn guard_leading_digit(name: &str) -> String {
    if name.starts_with(|c: char| c.is_ascii_digit()) { format!("_{name}") } else { name.to_owned() }
}

pub fn transform_module_namespace(name: &str) -> String {
    if let Some(placeholder) = placeholder_for_empty(name) {
        return placeholder;
    }
    guard_leading_digit(name)
}

pub fn transform_type_name(name: &str) -> String {
    if let Some(placeholder) = placeholder_for_empty(name) {
        return placeholder;
    }
    guard_leading_digit(name)
}

pub fn transform_enum_name(name: &str) -> String {
    transform_type_name(name)
}

/// Enum values keep their GIR casing; dashes are camel-cased away.
///
/// A value that still starts with a digit after the transform cannot be
/// emitted as a member; the caller emits a commented placeholder instead.
pub fn transform_enum_value(name: &str) -> String {
    if let Some(placeholder) = placeholder_for_empty(name) {
        return placeholder;
    }
    escape_reserved(&camel_case_dashes(name))
}

pub fn transform_constant(name: &str) -> String {
    if let Some(placeholder) = placeholder_for_empty(name) {
        return placeholder;
    }
    guard_leading_digit(&camel_case_dashes(name))
}

pub fn transform_function_name(name: &str) -> String {
    if let Some(placeholder) = placeholder_for_empty(name) {
        return placeholder;
    }
    escape_reserved(&camel_case_dashes(name))
}

pub fn transform_parameter_name(name: &str) -> String {
    if let Some(placeholder) = placeholder_for_empty(name) {
        return placeholder;
    }
    escape_reserved(&camel_case_dashes(name))
}

/// Property names containing dashes are quoted when the surface allows
/// quoted member names, and camel-cased otherwise.
pub fn transform_property_name(name: &str, allow_quotes: bool) -> String {
    if let Some(placeholder) = placeholder_for_empty(name) {
        return placeholder;
    }
    if name.starts_with('"') {
        return name.to_owned();
    }
    if name.contains('-') {
        if allow_quotes { format!("\"{name}\"") } else { camel_case_dashes(name) }
    } else {
        escape_reserved(name)
    }
}

pub fn transform_field_name(name: &str, allow_quotes: bool) -> String {
    transform_property_name(name, allow_quotes)
}

/// Signal names only ever appear inside string literals, so dashes survive.
pub fn transform_signal_name(name: &str) -> String {
    if let Some(placeholder) = placeholder_for_empty(name) {
        return placeholder;
    }
    name.to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_digit_gets_prefixed() {
        assert_eq!(transform_enum_name("2BigEndian"), "_2BigEndian");
        assert_eq!(transform_enum_name("BigEndian"), "BigEndian");
    }

    #[test]
    fn empty_identifier_becomes_placeholder() {
        assert_eq!(transform_parameter_name(""), "-");
        assert_eq!(transform_type_name(""), "-");
    }

    #[test]
    fn reserved_parameter_names_are_suffixed() {
        assert_eq!(transform_parameter_name("function"), "function_");
        assert_eq!(transform_parameter_name("arguments"), "arguments_");
        assert_eq!(transform_parameter_name("data"), "data");
    }

    #[test]
    fn property_dashes_quote_or_camel_case() {
        assert_eq!(transform_property_name("double-buffered", true), "\"double-buffered\"");
        assert_eq!(transform_property_name("double-buffered", false), "doubleBuffered");
        assert_eq!(transform_property_name("title", true), "title");
    }

    #[test]
    fn enum_values_drop_dashes() {
        assert_eq!(transform_enum_value("b-c"), "bC");
        assert_eq!(transform_enum_value("a"), "a");
    }

    #[test]
    fn transforms_are_idempotent() {
        for raw in ["2fast", "double-buffered", "function", "", "plain"] {
            let once = transform_property_name(raw, true);
            assert_eq!(transform_property_name(&once, true), once);
            let once = transform_parameter_name(raw);
            assert_eq!(transform_parameter_name(&once), once);
            let once = transform_enum_name(raw);
            assert_eq!(transform_enum_name(&once), once);
        }
    }
}
