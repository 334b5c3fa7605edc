mod ctx;
mod ident;
mod inheritance;
mod lower;
mod result;
mod symbol_table;

pub use ctx::*;
pub use ident::*;
pub use inheritance::{build_inheritance_index, InheritanceIndex, MAX_RECURSION, OBJECT_CLASS};
pub use lower::emit_namespace;
pub use result::*;
pub use symbol_table::build::build_symbol_table;
pub use symbol_table::{Entry, SymbolTable};
