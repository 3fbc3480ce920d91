//! Matching overlays to the manifest objects they target.

use super::types::Overlay;
use crate::error::PatchError;
use crate::manifest::{keys_listing, ManifestObject, ObjectKey};

/// Reports whether `object` is the target of `overlay`.
///
/// The overlay's namespace (or `default_namespace`) is tried first, then the
/// empty namespace so that cluster-scoped objects match too.
pub fn overlay_matches(overlay: &Overlay, object: &ManifestObject, default_namespace: &str) -> bool {
    let namespace = overlay.namespace.as_deref().unwrap_or(default_namespace);
    let key = object.key();
    *key == ObjectKey::new(&overlay.kind, namespace, &overlay.name)
        || *key == ObjectKey::new(&overlay.kind, "", &overlay.name)
}

/// OverlayMatches holds, per overlay, the indexes of the objects it targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayMatches {
    matches: Vec<Vec<usize>>,
}

impl OverlayMatches {
    /// Returns the object indexes matched by the overlay at `overlay_index`.
    pub fn objects(&self, overlay_index: usize) -> &[usize] {
        self.matches
            .get(overlay_index)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns the single object targeted by the overlay, if there is exactly one.
    pub fn target(&self, overlay_index: usize) -> Option<usize> {
        match self.objects(overlay_index) {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// Returns the indexes of overlays whose single target is `object_index`,
    /// in overlay order.
    pub fn overlays_for(&self, object_index: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.matches.len()).filter(move |&i| self.target(i) == Some(object_index))
    }
}

/// Matches every overlay against every object.
///
/// Returns the matches together with one error per overlay that matches no
/// object (unless optional) or more than one object.
pub fn match_overlays(
    objects: &[ManifestObject],
    overlays: &[Overlay],
    default_namespace: &str,
) -> (OverlayMatches, Vec<PatchError>) {
    let matches: Vec<Vec<usize>> = overlays
        .iter()
        .map(|overlay| {
            objects
                .iter()
                .enumerate()
                .filter(|(_, obj)| overlay_matches(overlay, obj, default_namespace))
                .map(|(i, _)| i)
                .collect()
        })
        .collect();

    let mut errors = Vec::new();
    for (overlay, found) in overlays.iter().zip(&matches) {
        match found.len() {
            0 if overlay.optional => {}
            0 => errors.push(PatchError::cardinality(
                &overlay.kind,
                &overlay.name,
                format!(
                    "does not match any object in output manifest. Available objects are:\n{}",
                    keys_listing(objects)
                ),
            )),
            1 => {}
            _ => errors.push(PatchError::cardinality(
                &overlay.kind,
                &overlay.name,
                format!(
                    "matches multiple objects in output manifest:\n{}",
                    found
                        .iter()
                        .map(|&i| objects[i].key().to_string())
                        .collect::<Vec<_>>()
                        .join("\n")
                ),
            )),
        }
    }

    (OverlayMatches { matches }, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::parse_manifest;

    const MANIFEST: &str = r#"
kind: Deployment
metadata:
  name: web
  namespace: prod
---
kind: ClusterRole
metadata:
  name: reader
---
kind: Service
metadata:
  name: web
  namespace: prod
---
kind: Service
metadata:
  name: web
"#;

    fn objects() -> Vec<ManifestObject> {
        parse_manifest(MANIFEST).unwrap()
    }

    #[test]
    fn test_match_by_default_namespace() {
        let objs = objects();
        let overlay = Overlay::new("Deployment", "web");
        assert!(overlay_matches(&overlay, &objs[0], "prod"));
        assert!(!overlay_matches(&overlay, &objs[0], "dev"));
    }

    #[test]
    fn test_explicit_namespace_overrides_default() {
        let objs = objects();
        let overlay = Overlay {
            namespace: Some("prod".into()),
            ..Overlay::new("Deployment", "web")
        };
        assert!(overlay_matches(&overlay, &objs[0], "dev"));
    }

    #[test]
    fn test_cluster_scoped_object_matches_any_namespace() {
        let objs = objects();
        let overlay = Overlay::new("ClusterRole", "reader");
        assert!(overlay_matches(&overlay, &objs[1], "prod"));
        assert!(overlay_matches(&overlay, &objs[1], ""));
    }

    #[test]
    fn test_cardinality() {
        let objs = objects();
        let overlays = vec![
            Overlay::new("Deployment", "web"),
            Overlay::new("Deployment", "absent"),
            Overlay {
                optional: true,
                ..Overlay::new("Deployment", "absent")
            },
            Overlay::new("Service", "web"),
        ];
        let (matches, errors) = match_overlays(&objs, &overlays, "prod");

        assert_eq!(matches.target(0), Some(0));
        assert_eq!(matches.objects(1), &[] as &[usize]);
        assert_eq!(matches.target(2), None);
        assert_eq!(matches.objects(3), &[2, 3]);
        assert_eq!(matches.target(3), None);
        assert_eq!(matches.overlays_for(0).collect::<Vec<_>>(), vec![0]);
        assert_eq!(matches.overlays_for(2).count(), 0);

        assert_eq!(errors.len(), 2);
        let first = errors[0].to_string();
        assert!(first.starts_with("overlay for Deployment:absent does not match any object"));
        assert!(first.contains("ClusterRole::reader"));
        assert!(errors[1].to_string().contains("matches multiple objects"));
    }
}
