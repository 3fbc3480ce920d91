//! Add, replace, merge and delete at a resolved location.

use super::navigate::{Location, Target};
use crate::error::PatchError;
use crate::value::Value;
use std::fmt;

/// Edit reports which kind of change [`apply`] made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    /// A new mapping field was inserted.
    Added,
    /// An existing field or element was overwritten.
    Replaced,
    /// Fields were written into an element selected by field.
    Merged,
    /// A new element was pushed onto a sequence.
    Appended,
    /// A field or element was removed.
    Deleted,
}

impl fmt::Display for Edit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Edit::Added => "add",
            Edit::Replaced => "replace",
            Edit::Merged => "merge",
            Edit::Appended => "append",
            Edit::Deleted => "delete",
        };
        f.write_str(s)
    }
}

/// Applies `value` at `location`; `None` deletes.
///
/// An element selected with `[field:value]` receiving a mapping is merged
/// one level deep: fields named in `value` are written, the others kept.
/// Everything else that already exists is overwritten whole.
pub fn apply(location: Location<'_>, value: Option<Value>) -> Result<Edit, PatchError> {
    let Location { path, target } = location;
    match (target, value) {
        (Target::Field { map, key }, None) => match map.delete(&key) {
            Some(_) => Ok(Edit::Deleted),
            None => Err(PatchError::lookup(
                path,
                format!("cannot delete missing field {:?}", key),
            )),
        },
        (Target::Field { map, key }, Some(value)) => match map.set(key, value) {
            Some(_) => Ok(Edit::Replaced),
            None => Ok(Edit::Added),
        },
        (Target::Element { items, index, .. }, None) => {
            items.remove(index);
            Ok(Edit::Deleted)
        }
        (
            Target::Element {
                items,
                index,
                by_field,
            },
            Some(value),
        ) => {
            let slot = &mut items[index];
            match (by_field, slot, value) {
                (true, Value::Map(existing), Value::Map(fields)) => {
                    existing.merge_shallow(fields);
                    Ok(Edit::Merged)
                }
                (_, slot, value) => {
                    *slot = value;
                    Ok(Edit::Replaced)
                }
            }
        }
        (Target::Append { .. }, None) => Err(PatchError::lookup(
            path,
            "cannot delete past the end of a sequence",
        )),
        (Target::Append { items }, Some(value)) => {
            items.push(value);
            Ok(Edit::Appended)
        }
    }
}
