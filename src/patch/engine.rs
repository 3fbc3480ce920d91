//! Applies a list of overlays to a manifest, collecting every error.

use super::context::PatchContext;
use crate::error::{PatchError, PatchErrors};
use crate::manifest::{parse_manifest, ManifestObject, YAML_SEPARATOR};
use crate::overlay::{match_overlays, Overlay, Patch, Payload};
use crate::path::Path;
use crate::tree::{apply, coerce, navigate, Edit};
use crate::value::Value;
use log::{debug, log, warn};

/// PatchOutcome is the result of one run: the patched manifest plus every
/// error met on the way.
///
/// Objects are emitted even when some of their patches failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchOutcome {
    pub manifest: String,
    pub errors: PatchErrors,
}

impl PatchOutcome {
    /// Returns the manifest if no error was collected.
    pub fn into_result(self) -> Result<String, PatchErrors> {
        self.errors.into_result().map(|()| self.manifest)
    }
}

/// PatchEngine applies overlays to manifest objects.
#[derive(Debug, Clone, Default)]
pub struct PatchEngine {
    ctx: PatchContext,
    default_namespace: String,
}

impl PatchEngine {
    /// Creates an engine resolving overlays without a namespace against
    /// `default_namespace`.
    pub fn new(ctx: PatchContext, default_namespace: impl Into<String>) -> Self {
        PatchEngine {
            ctx,
            default_namespace: default_namespace.into(),
        }
    }

    pub fn context(&self) -> &PatchContext {
        &self.ctx
    }

    pub fn default_namespace(&self) -> &str {
        &self.default_namespace
    }

    /// Patches a multi-document YAML manifest.
    pub fn run(&self, manifest: &str, overlays: &[Overlay]) -> PatchOutcome {
        let mut objects = match parse_manifest(manifest) {
            Ok(objects) => objects,
            Err(e) => {
                return PatchOutcome {
                    manifest: String::new(),
                    errors: e.into(),
                };
            }
        };
        let mut errors = self.apply(&mut objects, overlays);
        let manifest = self.render(&objects, &mut errors);
        PatchOutcome { manifest, errors }
    }

    /// Applies `overlays` to `objects` in place.
    ///
    /// Overlays are applied in list order and patches in list order within
    /// an overlay. An overlay is applied only if it matches exactly one object.
    pub fn apply(&self, objects: &mut [ManifestObject], overlays: &[Overlay]) -> PatchErrors {
        let mut errors = PatchErrors::new();
        for (i, overlay) in overlays.iter().enumerate() {
            for e in overlay.validate(i) {
                errors.add(e);
            }
        }

        let (matches, cardinality) = match_overlays(objects, overlays, &self.default_namespace);

        for (object_index, object) in objects.iter_mut().enumerate() {
            for overlay_index in matches.overlays_for(object_index) {
                errors.extend(self.apply_overlay(object, &overlays[overlay_index]));
            }
        }

        for (i, overlay) in overlays.iter().enumerate() {
            if overlay.optional && matches.objects(i).is_empty() {
                debug!(
                    target: self.ctx.scope(),
                    "overlay for {}:{} is optional and does not match any object",
                    overlay.kind,
                    overlay.name
                );
            }
        }
        for e in cardinality {
            errors.add(e);
        }
        errors
    }

    /// Applies the patches of one overlay to one object.
    pub fn apply_overlay(&self, object: &mut ManifestObject, overlay: &Overlay) -> PatchErrors {
        let mut errors = PatchErrors::new();
        debug!(
            target: self.ctx.scope(),
            "applying overlay {}:{} to {}",
            overlay.kind,
            overlay.name,
            object.key()
        );
        for patch in &overlay.patches {
            errors.record(self.apply_patch(object.tree_mut(), patch));
        }
        errors
    }

    /// Applies a single patch to a tree.
    ///
    /// Returns `Ok(None)` when the patch was skipped: its path is blank, or
    /// it sets both `value` and `verbatim` (reported by validation).
    pub fn apply_patch(&self, tree: &mut Value, patch: &Patch) -> Result<Option<Edit>, PatchError> {
        let Some(payload) = patch.payload() else {
            return Ok(None);
        };
        if patch.path.trim().is_empty() {
            debug!(target: self.ctx.scope(), "skipping patch with empty path");
            return Ok(None);
        }

        let path = Path::parse(&patch.path)?;
        if path.is_empty() {
            debug!(target: self.ctx.scope(), "skipping patch with empty path {:?}", patch.path);
            return Ok(None);
        }
        let value = match payload {
            Payload::Value(text) => Some(coerce(text, false)?),
            Payload::Verbatim(text) => Some(coerce(text, true)?),
            Payload::Delete => None,
        };

        let location = navigate(tree, &path)?;
        let edit = apply(location, value)?;
        log!(
            target: self.ctx.scope(),
            self.ctx.patch_level(),
            "applied {} at {}",
            edit,
            path
        );
        Ok(Some(edit))
    }

    /// Encodes `objects` in order, separated by `---`.
    ///
    /// Objects that fail to encode are left out and reported.
    pub fn render(&self, objects: &[ManifestObject], errors: &mut PatchErrors) -> String {
        let mut documents = Vec::with_capacity(objects.len());
        for object in objects {
            match object.to_yaml() {
                Ok(yaml) => documents.push(yaml),
                Err(e) => {
                    warn!(
                        target: self.ctx.scope(),
                        "cannot encode {}: {}",
                        object.key(),
                        e
                    );
                    errors.add(e);
                }
            }
        }
        documents.join(YAML_SEPARATOR)
    }
}

/// Patches `base` with `overlays` using a default engine.
pub fn yaml_manifest_patch(base: &str, default_namespace: &str, overlays: &[Overlay]) -> PatchOutcome {
    PatchEngine::new(PatchContext::default(), default_namespace).run(base, overlays)
}
