use std::ops::Range;

use super::decls::Callback;

/// A type reference as it occurs on parameters, return values, fields,
/// properties, constants and aliases.
#[derive(Debug, Clone)]
pub enum AnyType {
    /// A plain `<type>` element
    Type(TypeNode),
    /// An `<array>` element wrapping an element type
    Array(ArrayNode),
    /// A `GLib.List`/`GLib.SList` with a known element type
    List(TypeNode),
    /// An inline `<callback>` element
    Callback(Box<Callback>),
    /// The `<varargs/>` marker
    Varargs,
}

impl AnyType {
    pub fn is_array_like(&self) -> bool {
        matches!(self, AnyType::Array(_) | AnyType::List(_))
    }
}

/// A `<type name=… c:type=…>` element
#[derive(Debug, Clone)]
pub struct TypeNode {
    pub span: Range<usize>,
    /// The introspected name, e.g. `utf8` or `Gtk.Widget`
    pub name: Option<String>,
    /// The raw C type, e.g. `gchar*`
    pub c_type: Option<String>,
}

/// An `<array>` element
#[derive(Debug, Clone)]
pub struct ArrayNode {
    pub span: Range<usize>,
    pub element: Box<AnyType>,
    /// Index of the parameter that carries the array length
    pub length: Option<usize>,
    pub c_type: Option<String>,
}
