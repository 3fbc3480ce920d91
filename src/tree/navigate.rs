//! Walks a tree along a path and yields the location of its last segment.

use super::selector::{resolve, Resolved};
use crate::error::PatchError;
use crate::path::{Path, PathSegment};
use crate::value::{Map, Value};

/// Location is a borrowed reference to one child slot of a container.
///
/// It holds the only mutable borrow of the tree until it is consumed by
/// [`apply`](super::apply).
#[derive(Debug)]
pub struct Location<'a> {
    pub(crate) path: String,
    pub(crate) target: Target<'a>,
}

#[derive(Debug)]
pub(crate) enum Target<'a> {
    /// A field of a mapping; the field may not exist yet.
    Field { map: &'a mut Map, key: String },
    /// An existing element of a sequence.
    Element {
        items: &'a mut Vec<Value>,
        index: usize,
        by_field: bool,
    },
    /// The slot one past the end of a sequence.
    Append { items: &'a mut Vec<Value> },
}

impl Location<'_> {
    /// Returns the path this location was resolved from.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns true if the location refers to an existing child.
    pub fn exists(&self) -> bool {
        match &self.target {
            Target::Field { map, key } => map.has(key),
            Target::Element { .. } => true,
            Target::Append { .. } => false,
        }
    }

    /// Returns the current child at this location, if any.
    pub fn current(&self) -> Option<&Value> {
        match &self.target {
            Target::Field { map, key } => map.get(key),
            Target::Element { items, index, .. } => items.get(*index),
            Target::Append { .. } => None,
        }
    }

    /// Returns true if the location is the append slot of a sequence.
    pub fn is_append(&self) -> bool {
        matches!(self.target, Target::Append { .. })
    }
}

/// Resolves `path` against `root`.
///
/// Every segment but the last must resolve to an existing node. A final key
/// segment only requires its parent to be a mapping, so that new fields can
/// be added; a final selector may resolve to the append slot.
pub fn navigate<'a>(root: &'a mut Value, path: &Path) -> Result<Location<'a>, PatchError> {
    let path_text = path.to_string();
    let (last, prefix) = path
        .as_slice()
        .split_last()
        .ok_or_else(|| PatchError::lookup(&path_text, "empty path"))?;

    let mut node = root;
    for segment in prefix {
        node = descend(node, segment).map_err(|msg| PatchError::lookup(&path_text, msg))?;
    }

    let target = match last {
        PathSegment::Key(key) => match node {
            Value::Map(map) => Target::Field {
                map,
                key: key.clone(),
            },
            other => {
                return Err(PatchError::lookup(
                    &path_text,
                    format!("cannot select field {:?} of a {}", key, other.type_name()),
                ));
            }
        },
        selector => match node {
            Value::List(items) => match resolve(items, selector) {
                Ok(Resolved::Index(index)) => Target::Element {
                    items,
                    index,
                    by_field: matches!(selector, PathSegment::FieldSelector { .. }),
                },
                Ok(Resolved::Append) => Target::Append { items },
                Err(_) => {
                    return Err(PatchError::lookup(
                        &path_text,
                        format!("no element matches {}", selector),
                    ));
                }
            },
            other => {
                return Err(PatchError::lookup(
                    &path_text,
                    format!("selector {} applied to a {}, not a sequence", selector, other.type_name()),
                ));
            }
        },
    };

    Ok(Location {
        path: path_text,
        target,
    })
}

/// Steps into the existing child named by an intermediate segment.
fn descend<'a>(node: &'a mut Value, segment: &PathSegment) -> Result<&'a mut Value, String> {
    match segment {
        PathSegment::Key(key) => match node {
            Value::Map(map) => map
                .get_mut(key)
                .ok_or_else(|| format!("intermediate path missing: no field {:?}", key)),
            other => Err(format!(
                "intermediate path missing: cannot select field {:?} of a {}",
                key,
                other.type_name()
            )),
        },
        selector => match node {
            Value::List(items) => match resolve(items, selector) {
                Ok(Resolved::Index(index)) => Ok(&mut items[index]),
                Ok(Resolved::Append) => Err(format!(
                    "append selector {} is only allowed as the last segment",
                    selector
                )),
                Err(_) => Err(format!("no element matches {}", selector)),
            },
            other => Err(format!(
                "selector {} applied to a {}, not a sequence",
                selector,
                other.type_name()
            )),
        },
    }
}
