//! Overlay module - Overlay records and their mapping onto manifest objects.

mod matcher;
mod types;

pub use matcher::*;
pub use types::*;
