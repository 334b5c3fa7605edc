//! Built-in type mapping tables consulted by the type resolver.
//!
//! The tables are ordered by priority: raw C types, array-element
//! specials, plain built-ins, then fully qualified names. Entries differ by
//! target environment and, for a few polymorphic built-ins, by whether the
//! position is read (`out`) or written.

use crate::ctx::Environment;

/// Raw C-type replacements, a few of them namespace-specific.
pub fn c_type(namespace: &str, c_type: &str) -> Option<&'static str> {
    match (namespace, c_type) {
        ("GObject", "GType") => return Some("number"),
        ("GLib", "GQuark") => return Some("number"),
        _ => {}
    }
    match c_type {
        "char*" | "gchar*" | "const char*" | "const gchar*" => Some("string"),
        "char**" | "gchar**" | "const char**" | "const gchar**" => Some("string[]"),
        "GType" => Some("number"),
        "gboolean" => Some("boolean"),
        "int" | "gint" | "guint" | "gint64" | "guint64" | "gsize" | "gssize" | "double"
        | "gdouble" | "float" | "gfloat" => Some("number"),
        "void" => Some("void"),
        "gpointer" => Some("object"),
        _ => None,
    }
}

/// Element types that represent a packed buffer when they occur in arrays.
pub fn array_plain_type(name: &str, environment: Environment, out: bool) -> Option<&'static str> {
    match name {
        "guint8" | "gint8" | "gchar" | "guchar" => match environment {
            Environment::Gjs => {
                if out {
                    Some("Uint8Array")
                } else {
                    Some("Uint8Array | string")
                }
            }
            Environment::Node => Some("Buffer"),
        },
        _ => None,
    }
}

/// Plain built-in type names.
pub fn plain_type(name: &str, _environment: Environment, _out: bool) -> Option<&'static str> {
    match name {
        "none" => Some("void"),
        "utf8" | "filename" => Some("string"),
        "gboolean" => Some("boolean"),
        "gint" | "guint" | "gint8" | "guint8" | "gint16" | "guint16" | "gint32" | "guint32"
        | "gint64" | "guint64" | "gshort" | "gushort" | "glong" | "gulong" | "gsize" | "gssize"
        | "gfloat" | "gdouble" | "goffset" | "gintptr" | "guintptr" | "long double" | "double"
        | "float" | "int" | "uint" | "long" | "ulong" | "short" | "ushort" | "size_t"
        | "ssize_t" | "time_t" => Some("number"),
        "gchar" | "guchar" | "gunichar" | "gunichar2" => Some("string"),
        "gpointer" | "gconstpointer" => Some("object"),
        "GType" => Some("number"),
        "va_list" => Some("any"),
        _ => None,
    }
}

/// Fully qualified named-type replacements, direction-sensitive.
pub fn full_type(qualified_name: &str, environment: Environment, out: bool) -> Option<&'static str> {
    match qualified_name {
        // The type handle is a plain number at the surface
        "GObject.Type" | "GObject.GType" => Some("number"),
        "GObject.Value" => Some("any"),
        "GObject.Closure" => Some("Function"),
        "GLib.DestroyNotify" => Some("Function"),
        "GLib.ByteArray" | "GLib.Bytes" => match environment {
            Environment::Gjs => {
                if out {
                    Some("Uint8Array")
                } else {
                    Some("Uint8Array | string")
                }
            }
            Environment::Node => Some("Buffer"),
        },
        "GLib.HashTable" => Some("object"),
        "GLib.Error" => Some("Error"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_arrays_differ_by_direction_in_gjs() {
        assert_eq!(full_type("GLib.ByteArray", Environment::Gjs, true), Some("Uint8Array"));
        assert_eq!(
            full_type("GLib.ByteArray", Environment::Gjs, false),
            Some("Uint8Array | string")
        );
        assert_eq!(full_type("GLib.ByteArray", Environment::Node, false), Some("Buffer"));
    }

    #[test]
    fn the_type_handle_is_a_number() {
        assert_eq!(full_type("GObject.Type", Environment::Gjs, false), Some("number"));
        assert_eq!(c_type("GObject", "GType"), Some("number"));
    }
}
