//! Overlay and patch records as read from an overlay file.

use crate::error::PatchError;
use serde::{Deserialize, Deserializer, Serialize};

/// Patch is a single edit: a path plus a value, a verbatim text, or neither.
///
/// With neither set the patch deletes the node at `path`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patch {
    /// Path of the form `a.[key:value].b.[pattern]`.
    #[serde(default)]
    pub path: String,
    /// Text decoded into a typed value. A YAML structure written in the
    /// overlay file is accepted and kept as its YAML text.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_text"
    )]
    pub value: Option<String>,
    /// Text stored as a string with no decoding.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_text"
    )]
    pub verbatim: Option<String>,
}

impl Patch {
    pub fn new(path: impl Into<String>) -> Self {
        Patch {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_verbatim(mut self, verbatim: impl Into<String>) -> Self {
        self.verbatim = Some(verbatim.into());
        self
    }

    /// Returns true if the patch removes its target.
    pub fn is_delete(&self) -> bool {
        self.value.is_none() && self.verbatim.is_none()
    }

    /// Returns what the patch writes, or `None` if both `value` and
    /// `verbatim` are set.
    pub fn payload(&self) -> Option<Payload<'_>> {
        match (&self.value, &self.verbatim) {
            (Some(value), None) => Some(Payload::Value(value)),
            (None, Some(text)) => Some(Payload::Verbatim(text)),
            (None, None) => Some(Payload::Delete),
            (Some(_), Some(_)) => None,
        }
    }
}

/// Payload is the validated content of a [`Patch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload<'a> {
    /// Text to decode into a typed value.
    Value(&'a str),
    /// Text to store as a string.
    Verbatim(&'a str),
    /// Remove the target.
    Delete,
}

/// Overlay is an ordered list of patches targeting one manifest object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlay {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    /// Falls back to the run's default namespace when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// A missing target object is not an error when set.
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub patches: Vec<Patch>,
}

impl Overlay {
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Overlay {
            kind: kind.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_patch(mut self, patch: Patch) -> Self {
        self.patches.push(patch);
        self
    }

    /// Checks that no patch sets both `value` and `verbatim`.
    pub fn validate(&self, overlay_index: usize) -> Vec<PatchError> {
        self.patches
            .iter()
            .enumerate()
            .filter(|(_, p)| p.value.is_some() && p.verbatim.is_some())
            .map(|(patch_index, _)| PatchError::Validation {
                overlay: overlay_index,
                patch: patch_index,
            })
            .collect()
    }
}

/// OverlaySpec is the overlay file: either a bare list of overlays or a
/// mapping with an `overlays` list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlaySpec {
    pub overlays: Vec<Overlay>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OverlayFile {
    Wrapped {
        #[serde(default)]
        overlays: Vec<Overlay>,
    },
    List(Vec<Overlay>),
}

impl<'de> Deserialize<'de> for OverlaySpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let overlays = match Option::<OverlayFile>::deserialize(deserializer)? {
            Some(OverlayFile::Wrapped { overlays }) | Some(OverlayFile::List(overlays)) => {
                overlays
            }
            None => Vec::new(),
        };
        Ok(OverlaySpec { overlays })
    }
}

impl OverlaySpec {
    /// Parses an overlay file.
    pub fn from_yaml(yaml: &str) -> Result<Self, PatchError> {
        if yaml.trim().is_empty() {
            return Ok(OverlaySpec::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }
}

/// Reads a patch text field; non-string YAML is kept as YAML text.
fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let raw = Option::<serde_yaml::Value>::deserialize(deserializer)?;
    Ok(match raw {
        None | Some(serde_yaml::Value::Null) => None,
        Some(serde_yaml::Value::String(s)) => Some(s),
        Some(serde_yaml::Value::Bool(b)) => Some(b.to_string()),
        Some(serde_yaml::Value::Number(n)) => Some(n.to_string()),
        Some(other) => Some(serde_yaml::to_string(&other).map_err(D::Error::custom)?),
    })
}
