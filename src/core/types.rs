//! Core types - Request parameters with a fixed, reproducible rendering

use std::borrow::Cow;

use rust_decimal::Decimal;

use crate::core::{Error, Result};

/// A single request parameter value.
///
/// Every variant has exactly one textual rendering, so the same parameters
/// always encode to the same bytes on every platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    Integer(i64),
    /// Rendered fixed-point, keeping the stored scale (`10.50` stays `10.50`)
    Decimal(Decimal),
}

impl ParamValue {
    pub fn render(&self) -> Cow<'_, str> {
        match self {
            ParamValue::Text(s) => Cow::Borrowed(s),
            ParamValue::Integer(n) => Cow::Owned(n.to_string()),
            ParamValue::Decimal(d) => Cow::Owned(d.to_string()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        ParamValue::Text(value.clone())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Integer(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Integer(value.into())
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Integer(value.into())
    }
}

impl From<Decimal> for ParamValue {
    fn from(value: Decimal) -> Self {
        ParamValue::Decimal(value)
    }
}

/// Insertion-ordered parameter map.
///
/// Order is part of the signed message: two sets with the same pairs in a
/// different order produce different signatures. Re-inserting a key replaces
/// its value where it already sits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    entries: Vec<(String, ParamValue)>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace, returning the previous value for `key`.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Option<ParamValue> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Chaining form of [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Remove `key`, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Parse an `application/x-www-form-urlencoded` body, keeping field order.
    ///
    /// All values come back as [`ParamValue::Text`]. A repeated field keeps its
    /// first position and its last value.
    pub fn from_form_body(body: &str) -> Result<Self> {
        let mut params = Self::new();
        for pair in body.split('&').filter(|p| !p.is_empty()) {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            params.insert(decode_component(k)?, decode_component(v)?);
        }
        Ok(params)
    }
}

fn decode_component(raw: &str) -> Result<String> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|s| s.into_owned())
        .map_err(|e| Error::Decode(format!("invalid form component {raw:?}: {e}")))
}

impl<K, V> FromIterator<(K, V)> for ParameterSet
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        params.extend(iter);
        params
    }
}

impl<K, V> Extend<(K, V)> for ParameterSet
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl IntoIterator for ParameterSet {
    type Item = (String, ParamValue);
    type IntoIter = std::vec::IntoIter<(String, ParamValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_position_on_replace() {
        let mut params = ParameterSet::new().with("hello", "world").with("key", "caller");
        params.insert("foo", "bar");
        let previous = params.insert("key", "injected");

        assert_eq!(previous, Some(ParamValue::from("caller")));
        assert_eq!(params.keys().collect::<Vec<_>>(), vec!["hello", "key", "foo"]);
        assert_eq!(params.get("key"), Some(&ParamValue::from("injected")));
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut params: ParameterSet = [("a", "1"), ("b", "2"), ("c", "3")].into_iter().collect();
        assert_eq!(params.remove("b"), Some(ParamValue::from("2")));
        assert_eq!(params.remove("missing"), None);
        assert_eq!(params.keys().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn test_value_rendering() {
        assert_eq!(ParamValue::from(1).render(), "1");
        assert_eq!(ParamValue::from(-42i64).render(), "-42");
        assert_eq!(ParamValue::from(Decimal::from(10)).render(), "10");
        assert_eq!(ParamValue::from(Decimal::new(1050, 2)).render(), "10.50");
        assert_eq!(ParamValue::from(Decimal::new(6, 3)).render(), "0.006");
        assert_eq!(ParamValue::from("json").render(), "json");
    }

    #[test]
    fn test_form_body_parsing() {
        let params =
            ParameterSet::from_form_body("status_text=Waiting+for+funds...&fee=0.006&note=a%2Bb%26c")
                .unwrap();
        assert_eq!(params.keys().collect::<Vec<_>>(), vec!["status_text", "fee", "note"]);
        assert_eq!(params.get("status_text").and_then(|v| v.as_text()), Some("Waiting for funds..."));
        assert_eq!(params.get("note").and_then(|v| v.as_text()), Some("a+b&c"));
    }

    #[test]
    fn test_form_body_edge_cases() {
        assert!(ParameterSet::from_form_body("").unwrap().is_empty());

        let params = ParameterSet::from_form_body("flag&empty=&x=1").unwrap();
        assert_eq!(params.get("flag").and_then(|v| v.as_text()), Some(""));
        assert_eq!(params.get("empty").and_then(|v| v.as_text()), Some(""));

        assert!(matches!(
            ParameterSet::from_form_body("bad=%FF%FE"),
            Err(Error::Decode(_))
        ));
    }
}
