//! Draft field normalization.

use chrono::{Datelike, Local};

use crate::document::Value;

/// Normalize a tag input into a list of trimmed, non-empty tags.
///
/// A list is trimmed per element; a comma-delimited string is split first.
/// Duplicates are preserved. Idempotent: normalizing an already-normalized
/// list yields the same list.
///
/// # Examples
/// ```
/// use labhub_core::document::Value;
/// use labhub_core::normalize::normalize_tags;
/// assert_eq!(normalize_tags(&Value::text(" a, b ,b ")), vec!["a", "b", "b"]);
/// assert_eq!(normalize_tags(&Value::text("")), Vec::<String>::new());
/// ```
pub fn normalize_tags(value: &Value) -> Vec<String> {
    let raw: Vec<&str> = match value {
        Value::Text(s) => s.split(',').collect(),
        Value::TextList(items) => items.iter().map(String::as_str).collect(),
    };
    raw.iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// The year to persist for a reference: the trimmed input if non-empty,
/// otherwise the current calendar year.
pub fn year_or_current(value: Option<&Value>) -> String {
    match value {
        Some(Value::Text(s)) if !s.trim().is_empty() => s.trim().to_string(),
        _ => Local::now().year().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_from_delimited_string() {
        assert_eq!(
            normalize_tags(&Value::text(" a, b ,b ")),
            vec!["a", "b", "b"]
        );
    }

    #[test]
    fn tags_from_list() {
        let input = Value::list(vec![" memory ".into(), "".into(), "attention".into()]);
        assert_eq!(normalize_tags(&input), vec!["memory", "attention"]);
    }

    #[test]
    fn tags_idempotent() {
        let once = normalize_tags(&Value::text(" a, b ,b "));
        let twice = normalize_tags(&Value::list(once.clone()));
        assert_eq!(once, twice);
    }

    #[test]
    fn tags_empty_input() {
        assert_eq!(normalize_tags(&Value::text("   ")), Vec::<String>::new());
        assert_eq!(normalize_tags(&Value::text(",,")), Vec::<String>::new());
        assert_eq!(normalize_tags(&Value::list(vec![])), Vec::<String>::new());
    }

    #[test]
    fn year_passes_through() {
        assert_eq!(year_or_current(Some(&Value::text(" 2019 "))), "2019");
    }

    #[test]
    fn year_defaults_to_current() {
        let current = Local::now().year().to_string();
        assert_eq!(year_or_current(None), current);
        assert_eq!(year_or_current(Some(&Value::text(""))), current);
        assert_eq!(year_or_current(Some(&Value::list(vec![]))), current);
    }
}
