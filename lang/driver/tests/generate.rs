//! End-to-end generation over in-memory GIR documents.

use girts_driver::{Config, Database, InMemorySource};

const REPOSITORY_OPEN: &str = r#"<repository version="1.2"
    xmlns="http://www.gtk.org/introspection/core/1.0"
    xmlns:c="http://www.gtk.org/introspection/c/1.0"
    xmlns:glib="http://www.gtk.org/introspection/glib/1.0">"#;

const GOBJECT_GIR_BODY: &str = r#"
    <namespace name="GObject" version="2.0">
      <alias name="Type" c:type="GType"><type name="gsize"/></alias>
      <class name="Object">
        <method name="get_data">
          <return-value><type name="gpointer"/></return-value>
          <parameters>
            <parameter name="key"><type name="utf8"/></parameter>
          </parameters>
        </method>
      </class>
      <class name="ParamSpec"/>
    </namespace>"#;

fn gir(body: &str) -> String {
    format!("{REPOSITORY_OPEN}{body}</repository>")
}

fn test_gir(namespace_body: &str) -> String {
    gir(&format!(
        r#"<include name="GObject" version="2.0"/>
           <namespace name="Test" version="1.0">{namespace_body}</namespace>"#
    ))
}

fn generate(namespace_body: &str) -> String {
    let mut source = InMemorySource::new();
    source.insert("GObject-2.0", gir(GOBJECT_GIR_BODY));
    source.insert("Test-1.0", test_gir(namespace_body));
    let config = Config { gir_directories: Vec::new(), ..Config::default() };
    let mut db = Database::in_memory(config, source);
    let uri = db.load_package("Test-1.0").unwrap();
    db.generate(&uri).unwrap().declarations
}

#[test]
fn trivial_enum() {
    let output = generate(
        r#"<enumeration name="Foo">
             <member name="a" value="0"/>
             <member name="b-c" value="1"/>
           </enumeration>"#,
    );
    assert!(output.contains("export enum Foo {"));
    assert!(output.contains("a,"));
    assert!(output.contains("bC,"));
}

#[test]
fn numeric_leading_enum_value_is_commented_out() {
    let output = generate(
        r#"<enumeration name="E">
             <member name="2fast" value="1"/>
           </enumeration>"#,
    );
    assert!(output.contains("// 2fast (invalid, starts with a number)"));
    assert!(!output.contains("2fast,"));
}

#[test]
fn nullable_parameter_promotion() {
    let output = generate(
        r#"<function name="f" c:identifier="test_f">
             <return-value><type name="none"/></return-value>
             <parameters>
               <parameter name="a" nullable="1"><type name="gint"/></parameter>
               <parameter name="b"><type name="gint"/></parameter>
             </parameters>
           </function>
           <function name="g" c:identifier="test_g">
             <return-value><type name="none"/></return-value>
             <parameters>
               <parameter name="a"><type name="gint"/></parameter>
               <parameter name="b" nullable="1"><type name="gint"/></parameter>
             </parameters>
           </function>"#,
    );
    assert!(output.contains("export function f(a: number, b: number): void"));
    assert!(output.contains("export function g(a: number, b?: number): void"));
}

#[test]
fn diamond_inheritance_clash_emits_false_overloads() {
    let output = generate(
        r#"<interface name="I">
             <method name="m">
               <return-value><type name="none"/></return-value>
               <parameters>
                 <parameter name="x"><type name="gint"/></parameter>
               </parameters>
             </method>
           </interface>
           <class name="A" parent="GObject.Object">
             <method name="m">
               <return-value><type name="none"/></return-value>
             </method>
           </class>
           <class name="D" parent="A">
             <implements name="I"/>
           </class>"#,
    );
    assert!(output.contains("export class D extends A implements I"));
    // Both inherited shapes surface, each behind a false-overload note
    let d_view = output.split("export class D").nth(1).unwrap();
    assert!(d_view.contains("false overload"));
    assert!(d_view.contains("m(): void"));
    assert!(d_view.contains("m(x: number): void"));
    assert!(d_view.contains(".prototype.m.call()"));
}

#[test]
fn gtype_struct_methods_become_statics() {
    let output = generate(
        r#"<class name="W" parent="GObject.Object"/>
           <record name="WClass" glib:is-gtype-struct-for="W">
             <method name="get_default">
               <return-value><type name="Test.W"/></return-value>
             </method>
           </record>"#,
    );
    assert!(output.contains("static get_default(): W"));
}

#[test]
fn inheritance_cycle_still_emits_direct_members() {
    let output = generate(
        r#"<class name="A" parent="B">
             <method name="own">
               <return-value><type name="none"/></return-value>
             </method>
           </class>
           <class name="B" parent="A"/>"#,
    );
    assert!(output.contains("export class A extends B"));
    assert!(output.contains("own(): void"));
}

#[test]
fn derived_classes_get_notify_overloads_and_helpers() {
    let output = generate(
        r#"<class name="W" parent="GObject.Object">
             <property name="title" writable="1"><type name="utf8"/></property>
           </class>"#,
    );
    assert!(output
        .contains("connect(sigName: \"notify::title\", callback: (($obj: W, pspec: GObject.ParamSpec) => void)): number"));
    assert!(output.contains("connect(sigName: string, callback: any): number"));
    assert!(output.contains("disconnect(id: number): void"));
}

#[test]
fn inherited_properties_appear_exactly_once() {
    let output = generate(
        r#"<class name="A" parent="GObject.Object">
             <property name="title" writable="1"><type name="utf8"/></property>
           </class>
           <class name="D" parent="A">
             <property name="title" writable="1"><type name="utf8"/></property>
           </class>"#,
    );
    let d_view = output.split("export class D").nth(1).unwrap();
    let d_view = &d_view[..d_view.find("export class").unwrap_or(d_view.len())];
    assert_eq!(d_view.matches("title: string").count(), 1);
}

#[test]
fn constants_export_at_most_once() {
    let output = generate(
        r#"<constant name="MAX" value="100"><type name="gint"/></constant>
           <constant name="MAX" value="100"><type name="gint"/></constant>"#,
    );
    assert_eq!(output.matches("export const MAX: number").count(), 1);
}

#[test]
fn non_introspectable_constructs_are_absent() {
    let output = generate(
        r#"<class name="Hidden" introspectable="0"/>
           <class name="Visible" parent="GObject.Object"/>"#,
    );
    assert!(!output.contains("Hidden"));
    assert!(output.contains("export class Visible"));
}

#[test]
fn signals_emit_connect_overloads() {
    let output = generate(
        r#"<class name="W" parent="GObject.Object">
             <glib:signal name="moved">
               <return-value><type name="none"/></return-value>
               <parameters>
                 <parameter name="x"><type name="gint"/></parameter>
               </parameters>
             </glib:signal>
           </class>"#,
    );
    assert!(output
        .contains("connect(sigName: \"moved\", callback: (($obj: W, x: number) => void)): number"));
    assert!(output.contains("emit(sigName: \"moved\", x: number): void"));
}

#[test]
fn construct_props_carrier_is_emitted() {
    let output = generate(
        r#"<class name="W" parent="GObject.Object">
             <property name="title" writable="1" construct-only="1"><type name="utf8"/></property>
           </class>"#,
    );
    assert!(output.contains("export interface W_ConstructProps extends GObject.Object_ConstructProps"));
    assert!(output.contains("title?: string"));
    // Construct-only properties stay out of the instance view
    let view = output.split("export class W").nth(1).unwrap();
    assert!(!view.contains("\n    title: string"));
}

#[test]
fn imports_include_the_root_object_module() {
    let output = generate(r#"<class name="W" parent="GObject.Object"/>"#);
    assert!(output.contains("import * as GObject from './GObject-2.0'"));
    assert!(output.contains("declare namespace Test {"));
}

#[test]
fn missing_dependency_keeps_a_placeholder_comment() {
    let mut source = InMemorySource::new();
    source.insert("GObject-2.0", gir(GOBJECT_GIR_BODY));
    source.insert(
        "Test-1.0",
        gir(r#"<include name="GObject" version="2.0"/>
               <include name="Gone" version="9.9"/>
               <namespace name="Test" version="1.0"></namespace>"#),
    );
    let config = Config { gir_directories: Vec::new(), ..Config::default() };
    let mut db = Database::in_memory(config, source);
    let uri = db.load_package("Test-1.0").unwrap();
    let output = db.generate(&uri).unwrap().declarations;
    assert!(output.contains("// Dependency 'Gone-9.9' not found"));
}

#[test]
fn decomposed_mode_splits_interface_and_constructor() {
    let mut source = InMemorySource::new();
    source.insert("GObject-2.0", gir(GOBJECT_GIR_BODY));
    source.insert(
        "Test-1.0",
        test_gir(
            r#"<class name="W" parent="GObject.Object">
                 <constructor name="new">
                   <return-value><type name="Test.W"/></return-value>
                 </constructor>
               </class>"#,
        ),
    );
    let config =
        Config { gir_directories: Vec::new(), inheritance: false, ..Config::default() };
    let mut db = Database::in_memory(config, source);
    let uri = db.load_package("Test-1.0").unwrap();
    let output = db.generate(&uri).unwrap().declarations;
    assert!(output.contains("export interface W extends GObject.Object"));
    assert!(output.contains("export const W: {"));
    assert!(output.contains("new: () => W"));
}
