pub use pretty::DocAllocator;

pub mod print_to_string;
pub mod tokens;
pub mod types;
pub mod util;

pub use print_to_string::PrintToString;
pub use types::*;

pub const DEFAULT_WIDTH: usize = 100;
