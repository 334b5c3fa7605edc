//! Translation of a parsed XML tree into the GIR concrete syntax tree.

use std::sync::Arc;

use girts_miette_util::ToMiette;
use roxmltree::{Document, Node};
use url::Url;

use crate::cst::decls::*;
use crate::cst::types::*;
use crate::result::ParseError;

type ParseResult<T> = Result<T, ParseError>;

/// List containers with a known element type
const LIST_TYPES: [&str; 2] = ["GLib.List", "GLib.SList"];

pub fn read_namespace(document: &Document, uri: &Url) -> ParseResult<Namespace> {
    let namespace = elements(document.root_element())
        .find(|node| node.tag_name().name() == "namespace")
        .ok_or_else(|| ParseError::MissingNamespace { uri: uri.clone() })?;

    let name = required_attr(namespace, "name")?.to_owned();
    let version = required_attr(namespace, "version")?.to_owned();

    let includes = elements(document.root_element())
        .filter(|node| node.tag_name().name() == "include")
        .map(read_include)
        .collect::<ParseResult<Vec<_>>>()?;

    let mut out = Namespace {
        span: namespace.range(),
        name,
        version,
        includes,
        enumerations: Vec::new(),
        bitfields: Vec::new(),
        constants: Vec::new(),
        aliases: Vec::new(),
        callbacks: Vec::new(),
        functions: Vec::new(),
        records: Vec::new(),
        unions: Vec::new(),
        classes: Vec::new(),
        interfaces: Vec::new(),
    };

    for child in elements(namespace) {
        match child.tag_name().name() {
            "enumeration" => out.enumerations.push(Arc::new(read_enumeration(child)?)),
            "bitfield" => out.bitfields.push(Arc::new(read_enumeration(child)?)),
            "constant" => out.constants.push(Arc::new(read_constant(child)?)),
            "alias" => out.aliases.push(Arc::new(read_alias(child)?)),
            "callback" => out.callbacks.push(Arc::new(read_callback(child)?)),
            "function" => out.functions.push(Arc::new(read_function(child)?)),
            "record" => out.records.push(Arc::new(read_compound(child)?)),
            "union" => out.unions.push(Arc::new(read_compound(child)?)),
            "class" => out.classes.push(Arc::new(read_class(child)?)),
            "interface" => out.interfaces.push(Arc::new(read_interface(child)?)),
            _ => {}
        }
    }

    Ok(out)
}

fn read_include(node: Node) -> ParseResult<Include> {
    Ok(Include {
        name: required_attr(node, "name")?.to_owned(),
        version: required_attr(node, "version")?.to_owned(),
    })
}

fn read_enumeration(node: Node) -> ParseResult<Enumeration> {
    let members = elements(node)
        .filter(|child| child.tag_name().name() == "member")
        .map(read_member)
        .collect::<ParseResult<Vec<_>>>()?;
    Ok(Enumeration {
        span: node.range(),
        name: required_attr(node, "name")?.to_owned(),
        introspectable: introspectable(node),
        members,
    })
}

fn read_member(node: Node) -> ParseResult<Member> {
    Ok(Member {
        span: node.range(),
        name: required_attr(node, "name")?.to_owned(),
        value: attr(node, "value").map(str::to_owned),
        c_identifier: attr(node, "identifier").map(str::to_owned),
        nick: attr(node, "nick").map(str::to_owned),
    })
}

fn read_constant(node: Node) -> ParseResult<Constant> {
    Ok(Constant {
        span: node.range(),
        name: required_attr(node, "name")?.to_owned(),
        introspectable: introspectable(node),
        value: attr(node, "value").map(str::to_owned),
        typ: read_any_type(node)?,
    })
}

fn read_alias(node: Node) -> ParseResult<Alias> {
    Ok(Alias {
        span: node.range(),
        name: required_attr(node, "name")?.to_owned(),
        introspectable: introspectable(node),
        c_type: attr(node, "type").map(str::to_owned),
        target: read_any_type(node)?,
    })
}

fn read_callback(node: Node) -> ParseResult<Callback> {
    Ok(Callback {
        span: node.range(),
        name: required_attr(node, "name")?.to_owned(),
        introspectable: introspectable(node),
        callable: read_callable(node)?,
    })
}

fn read_function(node: Node) -> ParseResult<Function> {
    Ok(Function {
        span: node.range(),
        name: required_attr(node, "name")?.to_owned(),
        introspectable: introspectable(node),
        c_identifier: attr(node, "identifier").map(str::to_owned),
        shadowed_by: attr(node, "shadowed-by").map(str::to_owned),
        shadows: attr(node, "shadows").map(str::to_owned),
        callable: read_callable(node)?,
    })
}

fn read_signal(node: Node) -> ParseResult<Signal> {
    Ok(Signal {
        span: node.range(),
        name: required_attr(node, "name")?.to_owned(),
        introspectable: introspectable(node),
        callable: read_callable(node)?,
    })
}

fn read_property(node: Node) -> ParseResult<Property> {
    Ok(Property {
        span: node.range(),
        name: required_attr(node, "name")?.to_owned(),
        introspectable: introspectable(node),
        writable: attr_bool(node, "writable", false),
        construct_only: attr_bool(node, "construct-only", false),
        private: attr_bool(node, "private", false),
        nullable: attr_bool(node, "nullable", false),
        typ: read_any_type(node)?.unwrap_or_else(|| untyped(&node)),
    })
}

fn read_field(node: Node) -> ParseResult<Field> {
    Ok(Field {
        span: node.range(),
        name: required_attr(node, "name")?.to_owned(),
        introspectable: introspectable(node),
        private: attr_bool(node, "private", false),
        writable: attr_bool(node, "writable", false),
        typ: read_any_type(node)?,
    })
}

fn read_class(node: Node) -> ParseResult<Class> {
    let mut class = Class {
        span: node.range(),
        name: required_attr(node, "name")?.to_owned(),
        introspectable: introspectable(node),
        parent: attr(node, "parent").map(str::to_owned),
        implements: Vec::new(),
        fields: Vec::new(),
        properties: Vec::new(),
        methods: Vec::new(),
        virtual_methods: Vec::new(),
        constructors: Vec::new(),
        functions: Vec::new(),
        signals: Vec::new(),
    };
    for child in elements(node) {
        match child.tag_name().name() {
            "implements" => class.implements.push(required_attr(child, "name")?.to_owned()),
            "field" => class.fields.push(read_field(child)?),
            "property" => class.properties.push(read_property(child)?),
            "method" => class.methods.push(Arc::new(read_function(child)?)),
            "virtual-method" => class.virtual_methods.push(Arc::new(read_function(child)?)),
            "constructor" => class.constructors.push(Arc::new(read_function(child)?)),
            "function" => class.functions.push(Arc::new(read_function(child)?)),
            "signal" => class.signals.push(read_signal(child)?),
            _ => {}
        }
    }
    Ok(class)
}

fn read_interface(node: Node) -> ParseResult<Interface> {
    let mut interface = Interface {
        span: node.range(),
        name: required_attr(node, "name")?.to_owned(),
        introspectable: introspectable(node),
        prerequisite: None,
        properties: Vec::new(),
        methods: Vec::new(),
        virtual_methods: Vec::new(),
        functions: Vec::new(),
        signals: Vec::new(),
    };
    for child in elements(node) {
        match child.tag_name().name() {
            "prerequisite" => {
                if interface.prerequisite.is_none() {
                    interface.prerequisite = Some(required_attr(child, "name")?.to_owned());
                }
            }
            "property" => interface.properties.push(read_property(child)?),
            "method" => interface.methods.push(Arc::new(read_function(child)?)),
            "virtual-method" => interface.virtual_methods.push(Arc::new(read_function(child)?)),
            "function" => interface.functions.push(Arc::new(read_function(child)?)),
            "signal" => interface.signals.push(read_signal(child)?),
            _ => {}
        }
    }
    Ok(interface)
}

fn read_compound(node: Node) -> ParseResult<Compound> {
    let mut compound = Compound {
        span: node.range(),
        name: required_attr(node, "name")?.to_owned(),
        introspectable: introspectable(node),
        is_gtype_struct_for: attr(node, "is-gtype-struct-for").map(str::to_owned),
        fields: Vec::new(),
        methods: Vec::new(),
        constructors: Vec::new(),
        functions: Vec::new(),
    };
    for child in elements(node) {
        match child.tag_name().name() {
            "field" => compound.fields.push(read_field(child)?),
            "method" => compound.methods.push(Arc::new(read_function(child)?)),
            "constructor" => compound.constructors.push(Arc::new(read_function(child)?)),
            "function" => compound.functions.push(Arc::new(read_function(child)?)),
            _ => {}
        }
    }
    Ok(compound)
}

fn read_callable(node: Node) -> ParseResult<Callable> {
    let mut callable = Callable::default();
    for child in elements(node) {
        match child.tag_name().name() {
            "parameters" => {
                for param in elements(child) {
                    match param.tag_name().name() {
                        "parameter" => callable.parameters.push(read_parameter(param)?),
                        // The instance parameter is implicit at the surface
                        "instance-parameter" => {}
                        _ => {}
                    }
                }
            }
            "return-value" => callable.return_value = Some(read_return_value(child)?),
            _ => {}
        }
    }
    Ok(callable)
}

fn read_parameter(node: Node) -> ParseResult<Parameter> {
    let direction = match attr(node, "direction") {
        Some("out") => Direction::Out,
        Some("inout") => Direction::InOut,
        _ => Direction::In,
    };
    Ok(Parameter {
        span: node.range(),
        name: attr(node, "name").unwrap_or_default().to_owned(),
        direction,
        nullable: attr_bool(node, "nullable", false),
        allow_none: attr_bool(node, "allow-none", false),
        optional: attr_bool(node, "optional", false),
        closure: attr_index(node, "closure"),
        destroy: attr_index(node, "destroy"),
        typ: read_any_type(node)?.unwrap_or_else(|| untyped(&node)),
    })
}

fn read_return_value(node: Node) -> ParseResult<ReturnValue> {
    Ok(ReturnValue {
        span: node.range(),
        nullable: attr_bool(node, "nullable", false),
        allow_none: attr_bool(node, "allow-none", false),
        typ: read_any_type(node)?.unwrap_or_else(|| untyped(&node)),
    })
}

/// Reads the type reference child of a node, if any.
fn read_any_type(node: Node) -> ParseResult<Option<AnyType>> {
    for child in elements(node) {
        match child.tag_name().name() {
            "type" => return Ok(Some(read_type(child))),
            "array" => {
                let element = read_any_type(child)?.unwrap_or_else(|| untyped(&child));
                return Ok(Some(AnyType::Array(ArrayNode {
                    span: child.range(),
                    element: Box::new(element),
                    length: attr_index(child, "length"),
                    c_type: attr(child, "type").map(str::to_owned),
                })));
            }
            "varargs" => return Ok(Some(AnyType::Varargs)),
            "callback" => return Ok(Some(AnyType::Callback(Box::new(read_callback(child)?)))),
            _ => {}
        }
    }
    Ok(None)
}

fn read_type(node: Node) -> AnyType {
    let type_node = TypeNode {
        span: node.range(),
        name: attr(node, "name").map(str::to_owned),
        c_type: attr(node, "type").map(str::to_owned),
    };
    if let Some(name) = &type_node.name {
        if LIST_TYPES.contains(&name.as_str()) {
            if let Some(element) =
                elements(node).find(|child| child.tag_name().name() == "type").map(read_type)
            {
                if let AnyType::Type(element) = element {
                    return AnyType::List(element);
                }
            }
        }
    }
    AnyType::Type(type_node)
}

/// A placeholder for nodes that carry no usable type reference
fn untyped(node: &Node) -> AnyType {
    AnyType::Type(TypeNode { span: node.range(), name: None, c_type: None })
}

fn elements<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|child| child.is_element())
}

/// Looks up an attribute by its local name, ignoring the namespace prefix.
fn attr<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attributes().find(|a| a.name() == name).map(|a| a.value())
}

fn required_attr<'a>(node: Node<'a, '_>, name: &str) -> ParseResult<&'a str> {
    attr(node, name).ok_or_else(|| ParseError::MissingAttribute {
        element: node.tag_name().name().to_owned(),
        attribute: name.to_owned(),
        span: node.range().to_miette(),
    })
}

fn attr_bool(node: Node, name: &str, default: bool) -> bool {
    match attr(node, name) {
        Some("0") | Some("false") => false,
        Some(_) => true,
        None => default,
    }
}

fn attr_index(node: Node, name: &str) -> Option<usize> {
    let value = attr(node, name)?;
    match value.parse() {
        Ok(index) => Some(index),
        Err(_) => {
            log::warn!("Ignoring malformed `{name}` attribute: {value}");
            None
        }
    }
}

fn introspectable(node: Node) -> bool {
    attr_bool(node, "introspectable", true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Namespace {
        let document = Document::parse(source).unwrap();
        let uri = Url::parse("file:///Test-1.0.gir").unwrap();
        read_namespace(&document, &uri).unwrap()
    }

    const HEADER: &str = r#"<repository version="1.2"
        xmlns="http://www.gtk.org/introspection/core/1.0"
        xmlns:c="http://www.gtk.org/introspection/c/1.0"
        xmlns:glib="http://www.gtk.org/introspection/glib/1.0">"#;

    #[test]
    fn parses_namespace_identity_and_includes() {
        let ns = parse(&format!(
            r#"{HEADER}<include name="GObject" version="2.0"/>
               <namespace name="Test" version="1.0"></namespace></repository>"#
        ));
        assert_eq!(ns.package_name(), "Test-1.0");
        assert_eq!(ns.includes, vec![Include { name: "GObject".into(), version: "2.0".into() }]);
    }

    #[test]
    fn parses_enumeration_members() {
        let ns = parse(&format!(
            r#"{HEADER}<namespace name="Test" version="1.0">
                 <enumeration name="Foo">
                   <member name="a" value="0" glib:nick="a" c:identifier="FOO_A"/>
                   <member name="b-c" value="1"/>
                 </enumeration>
               </namespace></repository>"#
        ));
        let foo = &ns.enumerations[0];
        assert_eq!(foo.name, "Foo");
        assert_eq!(foo.members.len(), 2);
        assert_eq!(foo.members[0].c_identifier.as_deref(), Some("FOO_A"));
        assert_eq!(foo.members[1].name, "b-c");
    }

    #[test]
    fn class_collects_members_and_implements() {
        let ns = parse(&format!(
            r#"{HEADER}<namespace name="Test" version="1.0">
                 <class name="W" parent="GObject.Object">
                   <implements name="Buildable"/>
                   <property name="title" writable="1"/>
                   <method name="show"><return-value><type name="none"/></return-value></method>
                   <constructor name="new"><return-value><type name="Test.W"/></return-value></constructor>
                   <glib:signal name="clicked"><return-value><type name="none"/></return-value></glib:signal>
                 </class>
               </namespace></repository>"#
        ));
        let class = &ns.classes[0];
        assert_eq!(class.parent.as_deref(), Some("GObject.Object"));
        assert_eq!(class.implements, vec!["Buildable".to_owned()]);
        assert_eq!(class.properties.len(), 1);
        assert_eq!(class.methods.len(), 1);
        assert_eq!(class.constructors.len(), 1);
        assert_eq!(class.signals.len(), 1);
    }

    #[test]
    fn parameter_annotations_are_read() {
        let ns = parse(&format!(
            r#"{HEADER}<namespace name="Test" version="1.0">
                 <function name="f" c:identifier="test_f">
                   <return-value><type name="utf8" c:type="char*"/></return-value>
                   <parameters>
                     <parameter name="data" direction="out" nullable="1">
                       <array length="1"><type name="guint8"/></array>
                     </parameter>
                     <parameter name="len"><type name="gsize"/></parameter>
                   </parameters>
                 </function>
               </namespace></repository>"#
        ));
        let f = &ns.functions[0];
        let data = &f.callable.parameters[0];
        assert_eq!(data.direction, Direction::Out);
        assert!(data.is_nullable());
        match &data.typ {
            AnyType::Array(array) => assert_eq!(array.length, Some(1)),
            other => panic!("expected array, got {other:?}"),
        }
    }

    #[test]
    fn introspectable_zero_is_recorded() {
        let ns = parse(&format!(
            r#"{HEADER}<namespace name="Test" version="1.0">
                 <record name="Hidden" introspectable="0"/>
               </namespace></repository>"#
        ));
        assert!(!ns.records[0].introspectable);
    }

    #[test]
    fn missing_namespace_is_fatal() {
        let xml = format!("{HEADER}</repository>");
        let document = Document::parse(&xml).unwrap();
        let uri = Url::parse("file:///Broken-1.0.gir").unwrap();
        let err = read_namespace(&document, &uri).unwrap_err();
        assert!(matches!(err, ParseError::MissingNamespace { .. }));
    }

    #[test]
    fn list_types_keep_their_element() {
        let ns = parse(&format!(
            r#"{HEADER}<namespace name="Test" version="1.0">
                 <function name="names" c:identifier="test_names">
                   <return-value>
                     <type name="GLib.List" c:type="GList*"><type name="utf8"/></type>
                   </return-value>
                 </function>
               </namespace></repository>"#
        ));
        let ret = ns.functions[0].callable.return_value.as_ref().unwrap();
        match &ret.typ {
            AnyType::List(element) => assert_eq!(element.name.as_deref(), Some("utf8")),
            other => panic!("expected list, got {other:?}"),
        }
    }
}
