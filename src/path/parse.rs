//! Parser for dotted path expressions.
//!
//! Grammar:
//!
//! ```text
//! path     := segment ('.' segment)*
//! segment  := key | '[' selector ']'
//! selector := field ':' value | pattern
//! ```
//!
//! A backslash escapes the next `.`, `:`, `[`, `]` or `\`. Inside brackets
//! `.` is an ordinary character and a single unescaped `:` separates field
//! from value. `[:value]` is the same as `[value]`.

use super::path::{Path, PathSegment};
use crate::error::PatchError;

const ESCAPABLE: [char; 5] = ['.', ':', '[', ']', '\\'];

impl Path {
    /// Parses a path expression such as `spec.containers.[name:app].args.[3]`.
    ///
    /// Empty segments (leading, trailing or doubled dots) are ignored.
    pub fn parse(input: &str) -> Result<Path, PatchError> {
        let mut segments = Vec::new();
        let mut key = String::new();
        let mut chars = input.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some(next) if ESCAPABLE.contains(&next) => key.push(next),
                    Some(next) => {
                        key.push('\\');
                        key.push(next);
                    }
                    None => key.push('\\'),
                },
                '.' => {
                    if !key.is_empty() {
                        segments.push(PathSegment::Key(std::mem::take(&mut key)));
                    }
                }
                '[' => {
                    // `node[selector]` is shorthand for `node.[selector]`.
                    if !key.is_empty() {
                        segments.push(PathSegment::Key(std::mem::take(&mut key)));
                    }
                    let mut raw = String::new();
                    let mut closed = false;
                    while let Some(c) = chars.next() {
                        match c {
                            '\\' => {
                                raw.push('\\');
                                if let Some(next) = chars.next() {
                                    raw.push(next);
                                }
                            }
                            ']' => {
                                closed = true;
                                break;
                            }
                            '[' => {
                                return Err(PatchError::parse(input, "unexpected '[' inside selector"));
                            }
                            other => raw.push(other),
                        }
                    }
                    if !closed {
                        return Err(PatchError::parse(input, "unbalanced '[': missing ']'"));
                    }
                    segments.push(parse_selector(input, &raw)?);
                    match chars.peek() {
                        None | Some('.') | Some('[') => {}
                        Some(other) => {
                            return Err(PatchError::parse(
                                input,
                                format!("unexpected {:?} after ']'", other),
                            ));
                        }
                    }
                }
                ']' => {
                    return Err(PatchError::parse(input, "unbalanced ']': missing '['"));
                }
                other => key.push(other),
            }
        }
        if !key.is_empty() {
            segments.push(PathSegment::Key(key));
        }
        Ok(Path::from_segments(segments))
    }
}

/// Parses the text between brackets, still in its escaped form.
fn parse_selector(input: &str, raw: &str) -> Result<PathSegment, PatchError> {
    let mut parts = vec![String::new()];
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(next) if ESCAPABLE.contains(&next) => push_char(&mut parts, next),
                Some(next) => {
                    push_char(&mut parts, '\\');
                    push_char(&mut parts, next);
                }
                None => push_char(&mut parts, '\\'),
            },
            ':' => parts.push(String::new()),
            other => push_char(&mut parts, other),
        }
    }

    match parts.len() {
        1 => {
            let pattern = parts.remove(0);
            if pattern.is_empty() {
                return Err(PatchError::parse(input, "empty selector '[]'"));
            }
            Ok(PathSegment::PatternSelector(pattern))
        }
        2 => {
            let value = parts.remove(1);
            let field = parts.remove(0);
            if field.is_empty() {
                if value.is_empty() {
                    return Err(PatchError::parse(input, "empty selector '[:]'"));
                }
                return Ok(PathSegment::PatternSelector(value));
            }
            Ok(PathSegment::FieldSelector { field, value })
        }
        _ => Err(PatchError::parse(
            input,
            format!("ambiguous selector [{}]: escape literal ':' as '\\:'", raw),
        )),
    }
}

fn push_char(parts: &mut [String], c: char) {
    if let Some(last) = parts.last_mut() {
        last.push(c);
    }
}
