//! Patch module - Runs overlays against a manifest.
//!
//! [`PatchEngine`] drives the whole run: it matches overlays to objects,
//! applies each matching overlay's patches in order and re-encodes the
//! objects. Failures never stop the run; they are gathered into
//! [`PatchErrors`](crate::PatchErrors) and returned with the output.

mod context;
mod engine;


pub use context::*;
pub use engine::*;
