//! Resolution of selector segments against a sequence.

use crate::path::PathSegment;
use crate::value::Value;

/// Where a selector points inside a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved {
    /// An existing element.
    Index(usize),
    /// One past the last element; only produced by a pattern selector equal
    /// to the sequence length.
    Append,
}

/// Why a selector failed to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorMiss {
    /// The segment is a plain key, not a selector.
    NotASelector,
    /// No element matched.
    NoMatch,
}

/// Resolves `selector` against the elements of a sequence.
///
/// The first element in order wins; several matches are never an error.
pub fn resolve(items: &[Value], selector: &PathSegment) -> Result<Resolved, SelectorMiss> {
    match selector {
        PathSegment::FieldSelector { field, value } => items
            .iter()
            .position(|item| field_matches(item, field, value))
            .map(Resolved::Index)
            .ok_or(SelectorMiss::NoMatch),
        PathSegment::PatternSelector(pattern) => {
            if is_index(pattern) && pattern.parse::<usize>().is_ok_and(|n| n == items.len()) {
                return Ok(Resolved::Append);
            }
            items
                .iter()
                .position(|item| item.to_text().contains(pattern.as_str()))
                .map(Resolved::Index)
                .ok_or(SelectorMiss::NoMatch)
        }
        PathSegment::Key(_) => Err(SelectorMiss::NotASelector),
    }
}

/// A plain decimal index: digits only, no sign or leading zero.
fn is_index(pattern: &str) -> bool {
    !pattern.is_empty()
        && pattern.bytes().all(|b| b.is_ascii_digit())
        && (pattern == "0" || !pattern.starts_with('0'))
}

fn field_matches(item: &Value, field: &str, expected: &str) -> bool {
    item.as_map()
        .and_then(|m| m.get(field))
        .is_some_and(|v| v.to_text() == expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::from_yaml;

    fn list(yaml: &str) -> Vec<Value> {
        from_yaml(yaml).unwrap().as_list().unwrap().clone()
    }

    #[test]
    fn test_field_selector_first_match_wins() {
        let items = list("- {name: a, v: 1}\n- {name: b, v: 2}\n- {name: b, v: 3}\n");
        assert_eq!(
            resolve(&items, &PathSegment::field_selector("name", "b")),
            Ok(Resolved::Index(1))
        );
        assert_eq!(
            resolve(&items, &PathSegment::field_selector("v", "3")),
            Ok(Resolved::Index(2))
        );
        assert_eq!(
            resolve(&items, &PathSegment::field_selector("name", "c")),
            Err(SelectorMiss::NoMatch)
        );
    }

    #[test]
    fn test_field_selector_is_exact_and_never_appends() {
        let items = list("- {name: n10}\n- {name: n1}\n");
        assert_eq!(
            resolve(&items, &PathSegment::field_selector("name", "n1")),
            Ok(Resolved::Index(1))
        );
        assert_eq!(
            resolve(&items, &PathSegment::field_selector("name", "2")),
            Err(SelectorMiss::NoMatch)
        );
    }

    #[test]
    fn test_field_selector_skips_scalars_and_missing_fields() {
        let items = list("- plain\n- {other: x}\n- {port: 15014}\n");
        assert_eq!(
            resolve(&items, &PathSegment::field_selector("port", "15014")),
            Ok(Resolved::Index(2))
        );
    }

    #[test]
    fn test_pattern_selector_substring() {
        let items = list("- v1\n- v2\n- v3_regex\n");
        assert_eq!(resolve(&items, &PathSegment::pattern("v3")), Ok(Resolved::Index(2)));
        assert_eq!(resolve(&items, &PathSegment::pattern("v")), Ok(Resolved::Index(0)));
        assert_eq!(
            resolve(&items, &PathSegment::pattern("zz")),
            Err(SelectorMiss::NoMatch)
        );
    }

    #[test]
    fn test_pattern_selector_append_only_at_length() {
        let items = list("- v1\n- v2\n- v3_regex\n");
        assert_eq!(resolve(&items, &PathSegment::pattern("3")), Ok(Resolved::Append));
        // Smaller integers go through substring matching.
        assert_eq!(resolve(&items, &PathSegment::pattern("2")), Ok(Resolved::Index(1)));
        assert_eq!(
            resolve(&items, &PathSegment::pattern("0")),
            Err(SelectorMiss::NoMatch)
        );
        assert_eq!(resolve(&[], &PathSegment::pattern("0")), Ok(Resolved::Append));
    }

    #[test]
    fn test_pattern_selector_appends_only_for_plain_index() {
        let items = list("- v1\n- v2\n- v3_regex\n");
        for pattern in ["+3", "03", "3.0", " 3"] {
            assert_eq!(
                resolve(&items, &PathSegment::pattern(pattern)),
                Err(SelectorMiss::NoMatch),
                "{pattern}"
            );
        }
    }

    #[test]
    fn test_float_fields_match_shortest_form() {
        let items = list("- {v: 1.0}\n- {v: 2.5}\n");
        assert_eq!(
            resolve(&items, &PathSegment::field_selector("v", "1")),
            Ok(Resolved::Index(0))
        );
        assert_eq!(
            resolve(&items, &PathSegment::field_selector("v", "2.5")),
            Ok(Resolved::Index(1))
        );
        assert_eq!(
            resolve(&items, &PathSegment::field_selector("v", "1.0")),
            Err(SelectorMiss::NoMatch)
        );
    }

    #[test]
    fn test_key_is_not_a_selector() {
        assert_eq!(
            resolve(&[], &PathSegment::key("a")),
            Err(SelectorMiss::NotASelector)
        );
    }
}
