//! Tree module - Path-addressed reads and edits on a [`Value`](crate::Value) tree.
//!
//! A patch is applied in three steps: [`navigate`] turns a [`Path`](crate::Path)
//! into a [`Location`], [`coerce`] turns the patch text into a value, and
//! [`apply`] performs the edit at the location.

mod coerce;
mod mutate;
mod navigate;
mod selector;

pub use coerce::*;
pub use mutate::*;
pub use navigate::{navigate, Location};
pub use selector::*;
