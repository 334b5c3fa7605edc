use std::ops::Range;
use std::sync::Arc;

use url::Url;

use super::types::AnyType;

/// A parsed GIR document
#[derive(Debug, Clone)]
pub struct Module {
    pub uri: Url,
    pub namespace: Namespace,
}

impl Module {
    pub fn package_name(&self) -> String {
        self.namespace.package_name()
    }
}

/// An `<include name=… version=…>` element naming a direct dependency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Include {
    pub name: String,
    pub version: String,
}

impl Include {
    pub fn package_name(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }
}

/// The `<namespace>` element of a GIR document and all of its children
#[derive(Debug, Clone)]
pub struct Namespace {
    pub span: Range<usize>,
    pub name: String,
    pub version: String,
    pub includes: Vec<Include>,
    pub enumerations: Vec<Arc<Enumeration>>,
    pub bitfields: Vec<Arc<Enumeration>>,
    pub constants: Vec<Arc<Constant>>,
    pub aliases: Vec<Arc<Alias>>,
    pub callbacks: Vec<Arc<Callback>>,
    pub functions: Vec<Arc<Function>>,
    pub records: Vec<Arc<Compound>>,
    pub unions: Vec<Arc<Compound>>,
    pub classes: Vec<Arc<Class>>,
    pub interfaces: Vec<Arc<Interface>>,
}

impl Namespace {
    pub fn package_name(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }
}

/// A declaration as recorded in the symbol table.
///
/// Declarations are shared between the namespace that owns them and the
/// symbol table, and are never mutated after parsing.
#[derive(Debug, Clone)]
pub enum Decl {
    Enumeration(Arc<Enumeration>),
    Bitfield(Arc<Enumeration>),
    Constant(Arc<Constant>),
    Alias(Arc<Alias>),
    Callback(Arc<Callback>),
    Function(Arc<Function>),
    Record(Arc<Compound>),
    Union(Arc<Compound>),
    Class(Arc<Class>),
    Interface(Arc<Interface>),
}

impl Decl {
    pub fn name(&self) -> &str {
        match self {
            Decl::Enumeration(e) | Decl::Bitfield(e) => &e.name,
            Decl::Constant(c) => &c.name,
            Decl::Alias(a) => &a.name,
            Decl::Callback(c) => &c.name,
            Decl::Function(f) => &f.name,
            Decl::Record(r) | Decl::Union(r) => &r.name,
            Decl::Class(c) => &c.name,
            Decl::Interface(i) => &i.name,
        }
    }
}

/// An `<enumeration>` or `<bitfield>` element
#[derive(Debug, Clone)]
pub struct Enumeration {
    pub span: Range<usize>,
    pub name: String,
    pub introspectable: bool,
    pub members: Vec<Member>,
}

/// A `<member>` of an enumeration or bitfield
#[derive(Debug, Clone)]
pub struct Member {
    pub span: Range<usize>,
    pub name: String,
    pub value: Option<String>,
    pub c_identifier: Option<String>,
    pub nick: Option<String>,
}

/// A `<constant>` element
#[derive(Debug, Clone)]
pub struct Constant {
    pub span: Range<usize>,
    pub name: String,
    pub introspectable: bool,
    pub value: Option<String>,
    pub typ: Option<AnyType>,
}

/// An `<alias>` element
#[derive(Debug, Clone)]
pub struct Alias {
    pub span: Range<usize>,
    pub name: String,
    pub introspectable: bool,
    pub c_type: Option<String>,
    pub target: Option<AnyType>,
}

/// A `<callback>` element, either top-level or inline in a field
#[derive(Debug, Clone)]
pub struct Callback {
    pub span: Range<usize>,
    pub name: String,
    pub introspectable: bool,
    pub callable: Callable,
}

/// A `<function>`, `<method>`, `<constructor>` or `<virtual-method>` element
#[derive(Debug, Clone)]
pub struct Function {
    pub span: Range<usize>,
    pub name: String,
    pub introspectable: bool,
    pub c_identifier: Option<String>,
    pub shadowed_by: Option<String>,
    pub shadows: Option<String>,
    pub callable: Callable,
}

/// The parameter list and return value shared by all callable nodes
#[derive(Debug, Clone, Default)]
pub struct Callable {
    pub parameters: Vec<Parameter>,
    pub return_value: Option<ReturnValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
    InOut,
}

/// A `<parameter>` element
#[derive(Debug, Clone)]
pub struct Parameter {
    pub span: Range<usize>,
    pub name: String,
    pub direction: Direction,
    pub nullable: bool,
    pub allow_none: bool,
    pub optional: bool,
    pub closure: Option<usize>,
    pub destroy: Option<usize>,
    pub typ: AnyType,
}

impl Parameter {
    /// Whether the parameter may be omitted or passed as null at the surface
    pub fn is_nullable(&self) -> bool {
        self.nullable || self.allow_none || self.optional
    }
}

/// A `<return-value>` element
#[derive(Debug, Clone)]
pub struct ReturnValue {
    pub span: Range<usize>,
    pub nullable: bool,
    pub allow_none: bool,
    pub typ: AnyType,
}

/// A `<property>` element
#[derive(Debug, Clone)]
pub struct Property {
    pub span: Range<usize>,
    pub name: String,
    pub introspectable: bool,
    pub writable: bool,
    pub construct_only: bool,
    pub private: bool,
    pub nullable: bool,
    pub typ: AnyType,
}

/// A `<field>` element
#[derive(Debug, Clone)]
pub struct Field {
    pub span: Range<usize>,
    pub name: String,
    pub introspectable: bool,
    pub private: bool,
    pub writable: bool,
    pub typ: Option<AnyType>,
}

/// A `<glib:signal>` element
#[derive(Debug, Clone)]
pub struct Signal {
    pub span: Range<usize>,
    pub name: String,
    pub introspectable: bool,
    pub callable: Callable,
}

/// A `<class>` element
#[derive(Debug, Clone)]
pub struct Class {
    pub span: Range<usize>,
    pub name: String,
    pub introspectable: bool,
    /// The raw parent reference, qualified or local
    pub parent: Option<String>,
    pub implements: Vec<String>,
    pub fields: Vec<Field>,
    pub properties: Vec<Property>,
    pub methods: Vec<Arc<Function>>,
    pub virtual_methods: Vec<Arc<Function>>,
    pub constructors: Vec<Arc<Function>>,
    pub functions: Vec<Arc<Function>>,
    pub signals: Vec<Signal>,
}

/// An `<interface>` element
#[derive(Debug, Clone)]
pub struct Interface {
    pub span: Range<usize>,
    pub name: String,
    pub introspectable: bool,
    pub prerequisite: Option<String>,
    pub properties: Vec<Property>,
    pub methods: Vec<Arc<Function>>,
    pub virtual_methods: Vec<Arc<Function>>,
    pub functions: Vec<Arc<Function>>,
    pub signals: Vec<Signal>,
}

/// A `<record>` or `<union>` element
#[derive(Debug, Clone)]
pub struct Compound {
    pub span: Range<usize>,
    pub name: String,
    pub introspectable: bool,
    /// Links the auxiliary record holding a class's static methods
    pub is_gtype_struct_for: Option<String>,
    pub fields: Vec<Field>,
    pub methods: Vec<Arc<Function>>,
    pub constructors: Vec<Arc<Function>>,
    pub functions: Vec<Arc<Function>>,
}
