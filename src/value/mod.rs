//! Value module - In-memory representation of YAML/JSON documents.
//!
//! Both manifest trees and patch payloads are held as [`Value`].

mod value;

pub use value::*;
