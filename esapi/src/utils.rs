//! Helpers for rendering argument values into URL components

use crate::error::{Error, Result};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde_json::Value;

/// Bytes escaped inside one path segment. `+` is included so that it never
/// reads as an encoded space.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'+')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Render a scalar or a sequence of scalars as one comma-joined string.
///
/// Order and duplicates are preserved. Nested sequences are flattened and
/// `null` elements skipped; a mapping anywhere in the value is rejected.
///
/// ```
/// use serde_json::json;
///
/// assert_eq!(esapi::utils::listify(&json!("a")).unwrap(), "a");
/// assert_eq!(esapi::utils::listify(&json!(["b", "a", "b"])).unwrap(), "b,a,b");
/// ```
pub fn listify(value: &Value) -> Result<String> {
    listify_with(value, false).map_err(|reason| Error::invalid_shape("list", reason))
}

/// Same as [`listify`], escaping every element for use inside a URL path.
pub fn listify_escaped(value: &Value) -> Result<String> {
    listify_with(value, true).map_err(|reason| Error::invalid_shape("list", reason))
}

pub(crate) fn listify_with(value: &Value, escape_items: bool) -> std::result::Result<String, String> {
    let mut items = Vec::new();
    collect_items(value, &mut items)?;

    let rendered: Vec<String> = if escape_items {
        items
            .iter()
            .map(|item| item.split(',').map(escape).collect::<Vec<_>>().join(","))
            .collect()
    } else {
        items
    };

    Ok(rendered.join(","))
}

fn collect_items(value: &Value, out: &mut Vec<String>) -> std::result::Result<(), String> {
    match value {
        Value::Null => Ok(()),
        Value::Array(values) => {
            for v in values {
                collect_items(v, out)?;
            }
            Ok(())
        }
        Value::Object(_) => Err("expected a scalar or a list of scalars, got a mapping".to_string()),
        scalar => {
            out.push(scalar_to_string(scalar).unwrap_or_default());
            Ok(())
        }
    }
}

/// String form of a JSON scalar; `None` for null, arrays and mappings.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Percent-encode a single path segment (space as `%20`, `*` kept as is).
pub fn escape(segment: &str) -> String {
    if segment == "*" {
        return segment.to_string();
    }
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

/// Join the non-empty segments with `/`, trimming stray slashes.
pub fn pathify<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(|s| s.as_ref().trim_matches('/'))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Absent, `null`, `""`, `[]` and `{}` all count as "not supplied", as does
/// a sequence holding only such values.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.iter().all(is_blank),
        Value::Object(o) => o.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_listify_scalar() {
        assert_eq!(listify(&json!("a")).unwrap(), "a");
        assert_eq!(listify(&json!(42)).unwrap(), "42");
        assert_eq!(listify(&json!(true)).unwrap(), "true");
    }

    #[test]
    fn test_listify_sequence_keeps_order_and_duplicates() {
        assert_eq!(listify(&json!(["a", "b", "c"])).unwrap(), "a,b,c");
        assert_eq!(listify(&json!(["b", "a", "b"])).unwrap(), "b,a,b");
    }

    #[test]
    fn test_listify_flattens_and_skips_nulls() {
        assert_eq!(listify(&json!(["a", ["b", "c"], null, "d"])).unwrap(), "a,b,c,d");
        assert_eq!(listify(&json!([])).unwrap(), "");
    }

    #[test]
    fn test_listify_rejects_mapping() {
        let err = listify(&json!({"a": 1})).unwrap_err();
        assert!(matches!(err, Error::InvalidArgumentShape { .. }));

        let err = listify(&json!(["a", {"b": 2}])).unwrap_err();
        assert!(matches!(err, Error::InvalidArgumentShape { .. }));
    }

    #[test]
    fn test_listify_escaped() {
        assert_eq!(listify_escaped(&json!(["my index", "logs-*"])).unwrap(), "my%20index,logs-*");
        // Embedded commas stay separators
        assert_eq!(listify_escaped(&json!("a,b/c")).unwrap(), "a,b%2Fc");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("*"), "*");
        assert_eq!(escape("a b"), "a%20b");
        assert_eq!(escape("a+b"), "a%2Bb");
        assert_eq!(escape("100%"), "100%25");
        assert_eq!(escape("doc/1"), "doc%2F1");
        assert_eq!(escape("ünï"), "%C3%BCn%C3%AF");
    }

    #[test]
    fn test_pathify() {
        assert_eq!(pathify(&["logs", "_doc", "1"]), "logs/_doc/1");
        assert_eq!(pathify(&["", "/_search/", ""]), "_search");
        assert_eq!(pathify::<&str>(&[]), "");
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(&json!(null)));
        assert!(is_blank(&json!("")));
        assert!(is_blank(&json!([])));
        assert!(is_blank(&json!({})));
        assert!(is_blank(&json!([null, ""])));
        assert!(is_blank(&json!([[], [null]])));
        assert!(!is_blank(&json!([null, "a"])));
        assert!(!is_blank(&json!(false)));
        assert!(!is_blank(&json!(0)));
        assert!(!is_blank(&json!(" ")));
    }
}
