//! Typed readers for metadata strings
//!
//! Producers store configuration as Python `str()` output: `"1"`, `"(1, 1)"`,
//! `"True"`, `"None"`, `"zeros"`. The container keeps these opaque; the
//! helpers here are for test runners that want typed values back.
//!
//! ```
//! use fixture_tensors::metadata::{parse_bool, parse_int_tuple, parse_pair};
//!
//! assert_eq!(parse_int_tuple("(1, 2)").unwrap(), vec![1, 2]);
//! assert_eq!(parse_pair("3").unwrap(), (3, 3));
//! assert!(parse_bool("True").unwrap());
//! ```

use crate::error::{FixtureError, Result};

fn parse_error(value: &str, expected: &'static str) -> FixtureError {
    FixtureError::MetadataParse {
        value: value.to_string(),
        expected,
    }
}

/// Parse an integer such as `"1"` or `"-2"`
///
/// # Errors
///
/// `MetadataParse` if the value is not an integer.
pub fn parse_int(value: &str) -> Result<i64> {
    value.trim().parse().map_err(|_| parse_error(value, "integer"))
}

/// Parse a float such as `"1e-06"`, `"0.5"` or `"inf"`
///
/// # Errors
///
/// `MetadataParse` if the value is not a float.
pub fn parse_float(value: &str) -> Result<f64> {
    value.trim().parse().map_err(|_| parse_error(value, "float"))
}

/// Parse `"True"`/`"False"` (lower case accepted)
///
/// # Errors
///
/// `MetadataParse` for anything else.
pub fn parse_bool(value: &str) -> Result<bool> {
    match value.trim() {
        "True" | "true" => Ok(true),
        "False" | "false" => Ok(false),
        _ => Err(parse_error(value, "bool")),
    }
}

/// Parse an integer tuple or list
///
/// Accepts a bare integer (`"3"`), tuples (`"(1, 1)"`, `"(2,)"`, `"()"`) and
/// lists (`"[1, 2]"`).
///
/// # Errors
///
/// `MetadataParse` if brackets are unbalanced or an element is not an integer.
pub fn parse_int_tuple(value: &str) -> Result<Vec<i64>> {
    let trimmed = value.trim();
    let inner = match (trimmed.chars().next(), trimmed.chars().last()) {
        (Some('('), Some(')')) | (Some('['), Some(']')) if trimmed.len() >= 2 => {
            &trimmed[1..trimmed.len() - 1]
        }
        (Some('(' | '['), _) | (_, Some(')' | ']')) => {
            return Err(parse_error(value, "integer tuple"));
        }
        _ => return parse_int(trimmed).map(|v| vec![v]),
    };

    let mut items: Vec<&str> = inner.split(',').map(str::trim).collect();
    // "(2,)" leaves one trailing empty item
    if items.last() == Some(&"") {
        items.pop();
    }
    items
        .into_iter()
        .map(|item| item.parse().map_err(|_| parse_error(value, "integer tuple")))
        .collect()
}

/// Parse a 2D parameter the way `torch.nn.modules.utils._pair` expands it
///
/// `"1"` becomes `(1, 1)`, `"(1, 2)"` stays `(1, 2)`.
///
/// # Errors
///
/// `MetadataParse` unless the value holds one or two integers.
pub fn parse_pair(value: &str) -> Result<(i64, i64)> {
    match parse_int_tuple(value)?.as_slice() {
        [v] => Ok((*v, *v)),
        [a, b] => Ok((*a, *b)),
        _ => Err(parse_error(value, "integer pair")),
    }
}

/// Map Python's `"None"` to `None`, otherwise apply `parse`
///
/// # Errors
///
/// Whatever `parse` returns for a non-`"None"` value.
pub fn parse_optional<T>(value: &str, parse: impl FnOnce(&str) -> Result<T>) -> Result<Option<T>> {
    if value.trim() == "None" {
        Ok(None)
    } else {
        parse(value).map(Some)
    }
}
