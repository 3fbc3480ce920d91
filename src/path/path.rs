//! Path segment and path types.

use std::fmt;

/// PathSegment represents one level of path navigation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Field name of a mapping.
    Key(String),
    /// `[field:value]`: the sequence element whose `field` renders as `value`.
    FieldSelector { field: String, value: String },
    /// `[pattern]`: the sequence element whose text contains `pattern`, or the
    /// append position when `pattern` equals the sequence length.
    PatternSelector(String),
}

impl PathSegment {
    /// Creates a new key segment.
    pub fn key(name: impl Into<String>) -> Self {
        PathSegment::Key(name.into())
    }

    /// Creates a new field selector segment.
    pub fn field_selector(field: impl Into<String>, value: impl Into<String>) -> Self {
        PathSegment::FieldSelector {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates a new pattern selector segment.
    pub fn pattern(pattern: impl Into<String>) -> Self {
        PathSegment::PatternSelector(pattern.into())
    }

    /// Returns true if this is a key segment.
    pub fn is_key(&self) -> bool {
        matches!(self, PathSegment::Key(_))
    }

    /// Returns true if this segment selects a sequence element.
    pub fn is_selector(&self) -> bool {
        !self.is_key()
    }

    /// Returns the key name if this is a key segment.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            PathSegment::Key(name) => Some(name),
            _ => None,
        }
    }
}

/// Path is an ordered list of segments, root to leaf.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    /// Creates a new empty path.
    pub fn new() -> Self {
        Path {
            segments: Vec::new(),
        }
    }

    /// Creates a path from a vector of segments.
    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        Path { segments }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    pub fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    pub fn as_slice(&self) -> &[PathSegment] {
        &self.segments
    }
}

impl FromIterator<PathSegment> for Path {
    fn from_iter<T: IntoIterator<Item = PathSegment>>(iter: T) -> Self {
        Path {
            segments: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathSegment;
    type IntoIter = std::slice::Iter<'a, PathSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, s: &str, special: &[char]) -> fmt::Result {
    for c in s.chars() {
        if c == '\\' || special.contains(&c) {
            write!(f, "\\")?;
        }
        write!(f, "{}", c)?;
    }
    Ok(())
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(name) => write_escaped(f, name, &['.', '[', ']']),
            PathSegment::FieldSelector { field, value } => {
                write!(f, "[")?;
                write_escaped(f, field, &[':', ']'])?;
                write!(f, ":")?;
                write_escaped(f, value, &[':', ']'])?;
                write!(f, "]")
            }
            PathSegment::PatternSelector(pattern) => {
                write!(f, "[")?;
                write_escaped(f, pattern, &[':', ']'])?;
                write!(f, "]")
            }
        }
    }
}

/// Displays in the same syntax [`Path::parse`](super::Path::parse) accepts.
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}
