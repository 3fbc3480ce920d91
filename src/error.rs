//! Error types shared by every stage of patch application.

use std::fmt;
use thiserror::Error;

/// PatchError represents a single failure while applying overlays.
///
/// Every failure is local to one patch, overlay or object; the engine
/// collects them into [`PatchErrors`] instead of aborting the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    /// Malformed path syntax.
    #[error("invalid path {path:?}: {message}")]
    Parse { path: String, message: String },

    /// A patch sets both `value` and `verbatim`.
    #[error("value and verbatim cannot be used together in overlay {overlay} patch {patch}")]
    Validation { overlay: usize, patch: usize },

    /// A path segment could not be resolved against the tree.
    #[error("path {path}: {message}")]
    Lookup { path: String, message: String },

    /// A patch value could not be decoded into a structured value.
    #[error("cannot decode value {value:?}: {message}")]
    Coercion { value: String, message: String },

    /// An overlay matched zero (non-optional) or several manifest objects.
    #[error("overlay for {kind}:{name} {message}")]
    MatchCardinality {
        kind: String,
        name: String,
        message: String,
    },

    /// A manifest or tree could not be decoded or encoded.
    #[error("serialization error: {message}")]
    Serialization { message: String },
}

impl PatchError {
    /// Creates a parse error.
    pub fn parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        PatchError::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a lookup error.
    pub fn lookup(path: impl Into<String>, message: impl Into<String>) -> Self {
        PatchError::Lookup {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a coercion error.
    pub fn coercion(value: impl Into<String>, message: impl Into<String>) -> Self {
        PatchError::Coercion {
            value: value.into(),
            message: message.into(),
        }
    }

    /// Creates a match cardinality error.
    pub fn cardinality(
        kind: impl Into<String>,
        name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        PatchError::MatchCardinality {
            kind: kind.into(),
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        PatchError::Serialization {
            message: message.into(),
        }
    }

    pub fn is_lookup(&self) -> bool {
        matches!(self, PatchError::Lookup { .. })
    }
}

impl From<serde_yaml::Error> for PatchError {
    fn from(e: serde_yaml::Error) -> Self {
        PatchError::serialization(e.to_string())
    }
}

/// PatchErrors is the run-scoped collection of errors, in encounter order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchErrors {
    errors: Vec<PatchError>,
}

impl PatchErrors {
    /// Creates a new empty PatchErrors.
    pub fn new() -> Self {
        PatchErrors { errors: Vec::new() }
    }

    /// Adds an error.
    pub fn add(&mut self, error: PatchError) {
        self.errors.push(error);
    }

    /// Extends with another PatchErrors.
    pub fn extend(&mut self, other: PatchErrors) {
        self.errors.extend(other.errors);
    }

    /// Records the error of `result`, if any, and returns its value.
    pub fn record<T>(&mut self, result: Result<T, PatchError>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(e) => {
                self.add(e);
                None
            }
        }
    }

    /// Returns true if there are no errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns an iterator over the errors.
    pub fn iter(&self) -> impl Iterator<Item = &PatchError> {
        self.errors.iter()
    }

    /// Returns `Ok(())` when empty, otherwise the whole collection as the error.
    pub fn into_result(self) -> Result<(), PatchErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<PatchError> for PatchErrors {
    fn from(error: PatchError) -> Self {
        PatchErrors {
            errors: vec![error],
        }
    }
}

impl IntoIterator for PatchErrors {
    type Item = PatchError;
    type IntoIter = std::vec::IntoIter<PatchError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl fmt::Display for PatchErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for PatchErrors {}
