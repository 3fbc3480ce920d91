//! Path module - The dotted path language used to address nodes in a tree.

mod parse;
mod path;

pub use path::*;
