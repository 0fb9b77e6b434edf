//! Catalog options
//!
//! Query parameters are kept in a `BTreeMap` so that encoding is deterministic:
//! the same set of parameters always produces the same query string, and a
//! decode followed by an encode is stable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Ordered option map forwarded to the catalog provider.
///
/// Deserializes directly from a request query string (`Query<CatalogOptions>`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogOptions(BTreeMap<String, String>);

impl CatalogOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Parse a value, `None` when absent.
    pub fn parse<T: FromStr>(&self, key: &str) -> Option<Result<T, T::Err>> {
        self.get(key).map(|v| v.trim().parse())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    /// Builder-style insert, overwriting any existing value
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Percent-encode as `k1=v1&k2=v2`, keys in ascending order.
    pub fn to_query_string(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Decode a query string (with or without a leading `?`).
    ///
    /// `+` is read as a space. When a key repeats, the last value wins.
    pub fn from_query_string(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_component(k), decode_component(v))
            })
            .collect()
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned()
}

impl From<BTreeMap<String, String>> for CatalogOptions {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CatalogOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string_is_sorted_and_encoded() {
        let options = CatalogOptions::new()
            .with("start", "60")
            .with("collection", "TOP_FREE")
            .with("q", "panda & bear");

        assert_eq!(
            options.to_query_string(),
            "collection=TOP_FREE&q=panda%20%26%20bear&start=60"
        );
    }

    #[test]
    fn test_decode_then_encode_is_stable() {
        let raw = "q=panda%20bear&num=10&lang=es&fullDetail=true";
        let decoded = CatalogOptions::from_query_string(raw);

        assert_eq!(decoded.get("q"), Some("panda bear"));
        assert_eq!(decoded.len(), 4);

        let reencoded = decoded.to_query_string();
        assert_eq!(CatalogOptions::from_query_string(&reencoded), decoded);
    }

    #[test]
    fn test_plus_and_bare_keys() {
        let decoded = CatalogOptions::from_query_string("?term=angry+birds&price");
        assert_eq!(decoded.get("term"), Some("angry birds"));
        assert_eq!(decoded.get("price"), Some(""));
    }

    #[test]
    fn test_parse_numeric() {
        let options = CatalogOptions::new().with("num", " 30").with("start", "abc");
        assert_eq!(options.parse::<i64>("num"), Some(Ok(30)));
        assert!(matches!(options.parse::<i64>("start"), Some(Err(_))));
        assert!(options.parse::<i64>("page").is_none());
    }

    #[test]
    fn test_deserializes_from_json_object() {
        let options: CatalogOptions =
            serde_json::from_value(serde_json::json!({"appId": "com.example", "lang": "de"})).unwrap();
        assert_eq!(options.get("appId"), Some("com.example"));
        assert_eq!(serde_json::to_value(&options).unwrap()["lang"], "de");
    }
}
