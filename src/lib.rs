//! # K8s Overlay Patch
//!
//! Applies path-addressed overlay patches to rendered Kubernetes manifests.
//!
//! An overlay names one object by kind, namespace and name and lists patches
//! such as:
//!
//! ```yaml
//! overlays:
//! - kind: Deployment
//!   name: web
//!   patches:
//!   - path: spec.template.spec.containers.[name:app].args.[--verbose]
//!   - path: spec.template.spec.containers.[name:app].args.[2]
//!     value: --log-level=debug
//! ```
//!
//! ## Modules
//!
//! - [`value`] - In-memory representation of YAML/JSON documents
//! - [`path`] - The dotted path language with `[field:value]` and `[pattern]` selectors
//! - [`tree`] - Navigation, value coercion and edits on a document tree
//! - [`overlay`] - Overlay records and their matching onto manifest objects
//! - [`manifest`] - Splitting and re-encoding multi-document manifests
//! - [`patch`] - The engine that runs a whole overlay set

pub mod error;
pub mod manifest;
pub mod overlay;
pub mod patch;
pub mod path;
pub mod tree;
pub mod value;

pub use error::{PatchError, PatchErrors};
pub use manifest::{ManifestObject, ObjectKey};
pub use overlay::{Overlay, OverlaySpec, Patch};
pub use patch::{yaml_manifest_patch, PatchContext, PatchEngine, PatchOutcome};
pub use path::{Path, PathSegment};
pub use tree::{Edit, Location};
pub use value::Value;
