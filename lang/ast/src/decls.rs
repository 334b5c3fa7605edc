use girts_printer::tokens::*;
use girts_printer::util::{BracesExt, IsNilExt};
use girts_printer::{Alloc, Builder, DocAllocator, Print, PrintCfg};

/// One generated declaration file, ready to be printed.
#[derive(Debug, Clone)]
pub struct Module {
    /// The package name, e.g. `Gtk-3.0`
    pub package_name: String,
    /// The transformed namespace identifier, e.g. `Gtk`
    pub namespace: String,
    /// Pre-rendered header comment lines
    pub header: Vec<String>,
    pub imports: Vec<Import>,
    /// Wrap all declarations in `declare namespace … { }`
    pub wrap_namespace: bool,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone)]
pub enum Import {
    Resolved { alias: String, package_name: String },
    /// The dependency could not be located; a placeholder comment is kept
    Missing { package_name: String },
}

#[derive(Debug, Clone)]
pub enum Item {
    Enum(TsEnum),
    Const(TsConst),
    Alias(TsAlias),
    Function(TsFunction),
    Callback(TsCallback),
    Class(TsClass),
    /// A template override spliced into the output verbatim
    Patch(String),
}

/// An `export enum` with pre-rendered member lines
#[derive(Debug, Clone)]
pub struct TsEnum {
    pub name: String,
    pub members: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct TsConst {
    pub name: String,
    pub typ: String,
}

#[derive(Debug, Clone)]
pub struct TsAlias {
    pub name: String,
    pub target: String,
}

/// A module-level function; the signature starts at the parameter list
#[derive(Debug, Clone)]
pub struct TsFunction {
    pub name: String,
    pub signature: String,
}

/// A callback is printed as an interface with a single call signature
#[derive(Debug, Clone)]
pub struct TsCallback {
    pub name: String,
    pub call_signature: String,
}

/// A block of pre-rendered member lines belonging to one source declaration
#[derive(Debug, Clone, Default)]
pub struct Fragment(pub Vec<String>);

impl Fragment {
    pub fn line(line: impl Into<String>) -> Fragment {
        Fragment(vec![line.into()])
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.0.push(line.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// How a class view is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    /// `export class`, statics inline as `static` members
    Class,
    /// `export interface`, no constructor carrier
    Interface,
    /// `export interface` plus an `export const` carrier for the statics
    Decomposed,
}

/// A class or interface view over a GIR class, interface, record or union
#[derive(Debug, Clone)]
pub struct TsClass {
    pub name: String,
    pub extends: Option<String>,
    pub implements: Vec<String>,
    /// Instance-side member fragments (includes `static` lines in class mode)
    pub members: Vec<Fragment>,
    /// Arrow-style static carrier fragments, used by the decomposed form
    pub statics: Vec<Fragment>,
    pub kind: ClassKind,
}

fn lines<'a>(alloc: &'a Alloc<'a>, lines: &'a [String]) -> Builder<'a> {
    alloc.intersperse(lines.iter().map(|line| alloc.text(line.as_str())), alloc.hardline())
}

fn fragments<'a>(alloc: &'a Alloc<'a>, fragments: &'a [Fragment]) -> Builder<'a> {
    alloc.intersperse(
        fragments.iter().filter(|fragment| !fragment.is_empty()).map(|fragment| {
            lines(alloc, &fragment.0)
        }),
        alloc.hardline(),
    )
}

/// Renders `head { body }` with the body indented on its own lines.
fn block<'a>(
    cfg: &PrintCfg,
    alloc: &'a Alloc<'a>,
    head: Builder<'a>,
    body: Builder<'a>,
) -> Builder<'a> {
    if body.is_nil() {
        return head.append(alloc.space()).append(cfg.braces.0).append(cfg.braces.1);
    }
    head.append(alloc.space()).append(
        alloc
            .hardline()
            .append(body)
            .nest(cfg.indent)
            .append(alloc.hardline())
            .braces_from(cfg),
    )
}

impl Print for Module {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let Module { package_name: _, namespace, header, imports, wrap_namespace, items } = self;

        let sep = alloc.hardline().append(alloc.hardline());
        let body = alloc.intersperse(items.iter().map(|item| item.print(cfg, alloc)), sep);

        let body = if *wrap_namespace {
            let head = alloc
                .text(DECLARE)
                .append(alloc.space())
                .append(NAMESPACE)
                .append(alloc.space())
                .append(namespace.as_str());
            block(cfg, alloc, head, body)
        } else {
            body
        };

        let mut doc = lines(alloc, header).append(alloc.hardline());
        if !imports.is_empty() {
            doc = doc
                .append(alloc.hardline())
                .append(alloc.intersperse(
                    imports.iter().map(|import| import.print(cfg, alloc)),
                    alloc.hardline(),
                ))
                .append(alloc.hardline());
        }
        doc.append(alloc.hardline()).append(body).append(alloc.hardline())
    }
}

impl Print for Import {
    fn print<'a>(&'a self, _cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        match self {
            Import::Resolved { alias, package_name } => alloc
                .text(IMPORT)
                .append(alloc.space())
                .append("* as ")
                .append(alias.as_str())
                .append(alloc.space())
                .append(FROM)
                .append(alloc.space())
                .append(format!("'./{package_name}'")),
            Import::Missing { package_name } => {
                alloc.text(format!("// Dependency '{package_name}' not found"))
            }
        }
    }
}

impl Print for Item {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        match self {
            Item::Enum(ts_enum) => ts_enum.print(cfg, alloc),
            Item::Const(ts_const) => ts_const.print(cfg, alloc),
            Item::Alias(ts_alias) => ts_alias.print(cfg, alloc),
            Item::Function(ts_function) => ts_function.print(cfg, alloc),
            Item::Callback(ts_callback) => ts_callback.print(cfg, alloc),
            Item::Class(ts_class) => ts_class.print(cfg, alloc),
            Item::Patch(text) => alloc
                .intersperse(text.lines().map(|line| alloc.text(line)), alloc.hardline()),
        }
    }
}

impl Print for TsEnum {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let TsEnum { name, members } = self;
        let head = alloc
            .text(EXPORT)
            .append(alloc.space())
            .append(ENUM)
            .append(alloc.space())
            .append(name.as_str());
        block(cfg, alloc, head, lines(alloc, members))
    }
}

impl Print for TsConst {
    fn print<'a>(&'a self, _cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let TsConst { name, typ } = self;
        alloc
            .text(EXPORT)
            .append(alloc.space())
            .append(CONST)
            .append(alloc.space())
            .append(name.as_str())
            .append(COLON)
            .append(alloc.space())
            .append(typ.as_str())
    }
}

impl Print for TsAlias {
    fn print<'a>(&'a self, _cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let TsAlias { name, target } = self;
        alloc
            .text(EXPORT)
            .append(alloc.space())
            .append(TYPE)
            .append(alloc.space())
            .append(name.as_str())
            .append(alloc.space())
            .append(EQUALS)
            .append(alloc.space())
            .append(target.as_str())
    }
}

impl Print for TsFunction {
    fn print<'a>(&'a self, _cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let TsFunction { name: _, signature } = self;
        alloc
            .text(EXPORT)
            .append(alloc.space())
            .append(FUNCTION)
            .append(alloc.space())
            .append(signature.as_str())
    }
}

impl Print for TsCallback {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let TsCallback { name, call_signature } = self;
        let head = alloc
            .text(EXPORT)
            .append(alloc.space())
            .append(INTERFACE)
            .append(alloc.space())
            .append(name.as_str());
        block(cfg, alloc, head, alloc.text(call_signature.as_str()))
    }
}

impl TsClass {
    fn head<'a>(&'a self, keyword: &'static str, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let TsClass { name, extends, implements, kind, .. } = self;
        let mut head = alloc
            .text(EXPORT)
            .append(alloc.space())
            .append(keyword)
            .append(alloc.space())
            .append(name.as_str());
        // Interfaces may not `implements`; fold the list into `extends` there
        let as_interface = *kind != ClassKind::Class;
        match (extends, as_interface && !implements.is_empty()) {
            (Some(parent), true) => {
                head = head
                    .append(alloc.space())
                    .append(EXTENDS)
                    .append(alloc.space())
                    .append(parent.as_str())
                    .append(format!("{} {}", COMMA, implements.join(", ")));
            }
            (Some(parent), false) => {
                head = head
                    .append(alloc.space())
                    .append(EXTENDS)
                    .append(alloc.space())
                    .append(parent.as_str());
            }
            (None, true) => {
                head = head
                    .append(alloc.space())
                    .append(EXTENDS)
                    .append(alloc.space())
                    .append(implements.join(", "));
            }
            (None, false) => {}
        }
        if !as_interface && !implements.is_empty() {
            head = head
                .append(alloc.space())
                .append(IMPLEMENTS)
                .append(alloc.space())
                .append(implements.join(", "));
        }
        head
    }
}

impl Print for TsClass {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let TsClass { name, members, statics, kind, .. } = self;

        let keyword = match kind {
            ClassKind::Class => CLASS,
            ClassKind::Interface | ClassKind::Decomposed => INTERFACE,
        };
        let head = self.head(keyword, alloc);
        let view = block(cfg, alloc, head, fragments(alloc, members));

        if *kind != ClassKind::Decomposed {
            return view;
        }

        let carrier_head = alloc
            .text(EXPORT)
            .append(alloc.space())
            .append(CONST)
            .append(alloc.space())
            .append(name.as_str())
            .append(COLON);
        let carrier = block(cfg, alloc, carrier_head, fragments(alloc, statics));

        view.append(alloc.hardline()).append(alloc.hardline()).append(carrier)
    }
}
