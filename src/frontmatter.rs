//! Minimal `---` preamble parser for draft files.
//!
//! ```text
//! ---
//! title: "Running a model at home"
//! tags: ai, local
//! ---
//! Body text...
//! ```
//!
//! Not YAML: one `key: value` per line, `tags` split on commas, everything
//! else kept as text. Lines without a colon are ignored.

use std::collections::BTreeMap;

const DELIMITER: &str = "---";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    fields: BTreeMap<String, FieldValue>,
}

impl Frontmatter {
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn title(&self) -> Option<&str> {
        match self.fields.get("title") {
            Some(FieldValue::Text(title)) => Some(title.as_str()),
            _ => None,
        }
    }

    /// Tags declared in the preamble, empty if none.
    pub fn tags(&self) -> &[String] {
        match self.fields.get("tags") {
            Some(FieldValue::List(tags)) => tags.as_slice(),
            _ => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Split `text` into its preamble fields and body.
///
/// Text without a complete preamble comes back unchanged with no fields.
pub fn parse(text: &str) -> (Frontmatter, String) {
    if !text.starts_with(DELIMITER) {
        return (Frontmatter::default(), text.to_string());
    }
    let mut parts = text.splitn(3, DELIMITER);
    let (Some(_), Some(preamble), Some(body)) = (parts.next(), parts.next(), parts.next()) else {
        return (Frontmatter::default(), text.to_string());
    };

    let fields = preamble
        .lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| {
            let key = key.trim().to_string();
            let value = strip_quotes(value.trim());
            let value = if key == "tags" {
                FieldValue::List(
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|t| !t.is_empty())
                        .map(String::from)
                        .collect(),
                )
            } else {
                FieldValue::Text(value.to_string())
            };
            (key, value)
        })
        .collect();

    (Frontmatter { fields }, body.trim().to_string())
}

/// Remove one layer of matching `"` or `'` around a value.
fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_without_preamble_is_unchanged() {
        let (fm, body) = parse("no dashes here");
        assert!(fm.is_empty());
        assert_eq!(body, "no dashes here");
    }

    #[test]
    fn title_and_tags() {
        let (fm, body) = parse("---\ntitle: Foo\ntags: a, b\n---\nBody");
        assert_eq!(fm.title(), Some("Foo"));
        assert_eq!(fm.tags(), ["a", "b"]);
        assert_eq!(body, "Body");
    }

    #[test]
    fn unterminated_preamble_is_unchanged() {
        let text = "---\ntitle: Foo\nBody";
        let (fm, body) = parse(text);
        assert!(fm.is_empty());
        assert_eq!(body, text);
    }

    #[test]
    fn quotes_are_stripped_once() {
        let (fm, _) = parse("---\ntitle: \"'Quoted'\"\n---\n");
        assert_eq!(fm.title(), Some("'Quoted'"));
    }

    #[test]
    fn mismatched_quotes_are_kept() {
        let (fm, _) = parse("---\ntitle: \"half\n---\n");
        assert_eq!(fm.title(), Some("\"half"));
    }

    #[test]
    fn value_may_contain_colons() {
        let (fm, _) = parse("---\ntitle: Rust: a love letter\n---\n");
        assert_eq!(fm.title(), Some("Rust: a love letter"));
    }

    #[test]
    fn lines_without_colon_are_skipped() {
        let (fm, _) = parse("---\njust words\nauthor: me\n---\nx");
        assert_eq!(fm.get("author"), Some(&FieldValue::Text("me".into())));
        assert!(fm.get("just words").is_none());
    }

    #[test]
    fn empty_tags_are_dropped() {
        let (fm, _) = parse("---\ntags: a, , b,\n---\n");
        assert_eq!(fm.tags(), ["a", "b"]);
    }

    #[test]
    fn missing_title_and_tags() {
        let (fm, body) = parse("---\n---\n\n  Body  \n");
        assert_eq!(fm.title(), None);
        assert!(fm.tags().is_empty());
        assert_eq!(body, "Body");
    }

    #[test]
    fn body_may_contain_horizontal_rules() {
        let (_, body) = parse("---\ntitle: T\n---\nabove\n\n---\n\nbelow");
        assert_eq!(body, "above\n\n---\n\nbelow");
    }
}
