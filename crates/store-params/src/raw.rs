//! Per-call raw parameter input.

use std::collections::HashMap;

use crate::error::RawInputError;
use crate::value::ParamValue;

/// Key to raw value mapping supplied by a caller for one validation.
///
/// An entry can hold a value (text or already typed) or an explicit null
/// (`None`). Absence of the key and an explicit null are different inputs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawParameters {
    values: HashMap<String, Option<ParamValue>>,
}

impl RawParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(key, text)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        pairs
            .into_iter()
            .map(|(k, v)| (k.into(), Some(ParamValue::Text(v.into()))))
            .collect()
    }

    /// Build from a URL query string such as `user=gis&port=8080`.
    ///
    /// Values are percent-decoded; a later duplicate key wins.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::from_pairs(
            url::form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned())),
        )
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> &mut Self {
        self.values.insert(key.into(), Some(value.into()));
        self
    }

    pub fn insert_text(&mut self, key: impl Into<String>, text: impl Into<String>) -> &mut Self {
        self.values
            .insert(key.into(), Some(ParamValue::Text(text.into())));
        self
    }

    /// Record the key as present with no value.
    pub fn insert_null(&mut self, key: impl Into<String>) -> &mut Self {
        self.values.insert(key.into(), None);
        self
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder form of [`insert_null`](Self::insert_null).
    pub fn with_null(mut self, key: impl Into<String>) -> Self {
        self.insert_null(key);
        self
    }

    /// Apply a command-line style assignment.
    ///
    /// `key=value` stores text, `key=` stores empty text and a bare `key`
    /// stores an explicit null.
    pub fn insert_assignment(&mut self, assignment: &str) -> Result<&mut Self, RawInputError> {
        let (key, value) = match assignment.split_once('=') {
            Some((key, value)) => (key.trim(), Some(value)),
            None => (assignment.trim(), None),
        };

        if key.is_empty() {
            return Err(RawInputError::EmptyKey(assignment.to_string()));
        }

        match value {
            Some(text) => self.insert_text(key, text),
            None => self.insert_null(key),
        };
        Ok(self)
    }

    /// Merge `other` into `self`; entries from `other` win.
    pub fn merge(&mut self, other: RawParameters) -> &mut Self {
        self.values.extend(other.values);
        self
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// `None` when the key is absent, `Some(None)` for an explicit null.
    pub fn get(&self, key: &str) -> Option<&Option<ParamValue>> {
        self.values.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Option<ParamValue>> {
        self.values.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&ParamValue>)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Option<ParamValue>)> for RawParameters {
    fn from_iter<I: IntoIterator<Item = (K, Option<ParamValue>)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl<K: Into<String>> Extend<(K, Option<ParamValue>)> for RawParameters {
    fn extend<I: IntoIterator<Item = (K, Option<ParamValue>)>>(&mut self, iter: I) {
        self.values
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_null_and_value_are_distinct() {
        let raw = RawParameters::new()
            .with("user", "gis")
            .with_null("password");

        assert_eq!(raw.get("missing"), None);
        assert_eq!(raw.get("password"), Some(&None));
        assert_eq!(
            raw.get("user"),
            Some(&Some(ParamValue::Text("gis".to_string())))
        );
        assert_eq!(raw.len(), 2);
    }

    #[test]
    fn test_from_query_decodes_values() {
        let raw = RawParameters::from_query("?user=a%20b&bbox=0%2C0%2C10%2C10&empty=");
        assert_eq!(raw.get("user"), Some(&Some(ParamValue::from("a b"))));
        assert_eq!(raw.get("bbox"), Some(&Some(ParamValue::from("0,0,10,10"))));
        assert_eq!(raw.get("empty"), Some(&Some(ParamValue::from(""))));
    }

    #[test]
    fn test_insert_assignment() {
        let mut raw = RawParameters::new();
        raw.insert_assignment("port=8080").unwrap();
        raw.insert_assignment("timeout=").unwrap();
        raw.insert_assignment("password").unwrap();
        raw.insert_assignment("url=http://host/?a=b").unwrap();

        assert_eq!(raw.get("port"), Some(&Some(ParamValue::from("8080"))));
        assert_eq!(raw.get("timeout"), Some(&Some(ParamValue::from(""))));
        assert_eq!(raw.get("password"), Some(&None));
        assert_eq!(
            raw.get("url"),
            Some(&Some(ParamValue::from("http://host/?a=b")))
        );

        assert_eq!(
            raw.insert_assignment("=value").unwrap_err(),
            RawInputError::EmptyKey("=value".to_string())
        );
    }

    #[test]
    fn test_merge_later_wins() {
        let mut base = RawParameters::from_pairs([("user", "env"), ("port", "1")]);
        base.merge(RawParameters::from_pairs([("user", "cli")]));

        assert_eq!(base.get("user"), Some(&Some(ParamValue::from("cli"))));
        assert_eq!(base.get("port"), Some(&Some(ParamValue::from("1"))));
    }
}
