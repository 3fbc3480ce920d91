//! Manifest module - Splitting, identifying and re-encoding manifest objects.

use crate::error::PatchError;
use crate::value::{self, Value};
use serde::Deserialize;
use std::fmt;

/// Separator written between documents of a manifest stream.
pub const YAML_SEPARATOR: &str = "---\n";

/// ObjectKey identifies a manifest object by kind, namespace and name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey {
    pub kind: String,
    pub namespace: String,
    pub name: String,
}

impl ObjectKey {
    pub fn new(
        kind: impl Into<String>,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        ObjectKey {
            kind: kind.into(),
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.kind, self.namespace, self.name)
    }
}

/// ManifestObject is one decoded document of a manifest.
///
/// The key is computed once on construction; the tree is edited in place.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestObject {
    key: ObjectKey,
    tree: Value,
}

impl ManifestObject {
    /// Wraps a decoded document. The root must be a mapping.
    pub fn from_value(tree: Value) -> Result<Self, PatchError> {
        let map = tree.as_map().ok_or_else(|| {
            PatchError::serialization(format!(
                "manifest document is a {}, not a mapping",
                tree.type_name()
            ))
        })?;
        let text = |v: Option<&Value>| v.and_then(Value::as_str).unwrap_or_default().to_string();
        let metadata = map.get("metadata").and_then(Value::as_map);
        let key = ObjectKey {
            kind: text(map.get("kind")),
            namespace: text(metadata.and_then(|m| m.get("namespace"))),
            name: text(metadata.and_then(|m| m.get("name"))),
        };
        Ok(ManifestObject { key, tree })
    }

    /// Decodes a single YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, PatchError> {
        Self::from_value(value::from_yaml(yaml)?)
    }

    pub fn key(&self) -> &ObjectKey {
        &self.key
    }

    pub fn tree(&self) -> &Value {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Value {
        &mut self.tree
    }

    /// Encodes the tree as YAML with two-space indentation.
    pub fn to_yaml(&self) -> Result<String, PatchError> {
        Ok(value::to_yaml(&self.tree)?)
    }
}

/// Splits a multi-document manifest into objects, in input order.
///
/// Empty documents are dropped.
pub fn parse_manifest(yaml: &str) -> Result<Vec<ManifestObject>, PatchError> {
    let mut objects = Vec::new();
    for document in serde_yaml::Deserializer::from_str(yaml) {
        let tree = Value::deserialize(document)?;
        if tree.is_null() {
            continue;
        }
        objects.push(ManifestObject::from_value(tree)?);
    }
    Ok(objects)
}

/// Returns the keys of `objects`, one per line, for error messages.
pub fn keys_listing(objects: &[ManifestObject]) -> String {
    objects
        .iter()
        .map(|o| o.key().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reports whether two manifest texts hold the same documents in the same order.
pub fn yaml_equal(a: &str, b: &str) -> bool {
    match (parse_documents(a), parse_documents(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn parse_documents(yaml: &str) -> Result<Vec<Value>, serde_yaml::Error> {
    let mut docs = Vec::new();
    for document in serde_yaml::Deserializer::from_str(yaml) {
        let doc = Value::deserialize(document)?;
        if !doc.is_null() {
            docs.push(doc);
        }
    }
    Ok(docs)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
apiVersion: apps/v1
kind: Deployment
metadata:
  name: web
  namespace: prod
---
---
apiVersion: rbac.authorization.k8s.io/v1
kind: ClusterRole
metadata:
  name: reader
"#;

    #[test]
    fn test_parse_manifest_keys_and_order() {
        let objs = parse_manifest(MANIFEST).unwrap();
        assert_eq!(objs.len(), 2);
        assert_eq!(objs[0].key(), &ObjectKey::new("Deployment", "prod", "web"));
        assert_eq!(objs[1].key(), &ObjectKey::new("ClusterRole", "", "reader"));
        assert_eq!(keys_listing(&objs), "Deployment:prod:web\nClusterRole::reader");
    }

    #[test]
    fn test_non_mapping_document_is_rejected() {
        let err = parse_manifest("- a\n- b\n").unwrap_err();
        assert!(matches!(err, PatchError::Serialization { .. }));
    }

    #[test]
    fn test_to_yaml_uses_two_space_indent() {
        let obj = ManifestObject::from_yaml("kind: A\nmetadata:\n  name: x\n").unwrap();
        assert_eq!(obj.to_yaml().unwrap(), "kind: A\nmetadata:\n  name: x\n");
    }

    #[test]
    fn test_yaml_equal() {
        assert!(yaml_equal("a: 1\nb: [x]\n", "b:\n- x\na: 1\n"));
        assert!(!yaml_equal("a: 1\n", "a: 2\n"));
        assert!(!yaml_equal("a: 1\n---\nb: 1\n", "b: 1\n---\na: 1\n"));
    }
}
