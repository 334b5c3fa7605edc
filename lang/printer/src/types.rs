pub type Alloc<'a> = pretty::Arena<'a, ()>;
pub type Builder<'a> = pretty::DocBuilder<'a, Alloc<'a>, ()>;

pub trait Print {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a>;
}

/// Configuration of the pretty printer
#[derive(Debug, Clone)]
pub struct PrintCfg {
    /// The width of the output page
    pub width: usize,
    /// How many spaces of indentation a nested block receives
    pub indent: isize,
    /// The braces that enclose a declaration body
    pub braces: (&'static str, &'static str),
}

impl Default for PrintCfg {
    fn default() -> Self {
        Self { width: crate::DEFAULT_WIDTH, indent: 4, braces: ("{", "}") }
    }
}

