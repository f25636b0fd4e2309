//! Multi-valued string parameters, as decoded from a URL query string.

use std::collections::BTreeMap;

/// Unordered collection of keys, each with one or more raw string values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    values: BTreeMap<String, Vec<String>>,
}

impl QueryParams {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a URL query string such as `color=red&color=blue&limit=10`.
    ///
    /// A leading `?` is ignored, `+` decodes to a space and percent escapes are
    /// decoded. Keys without `=` get an empty value.
    pub fn parse(query: &str) -> Self {
        query
            .trim_start_matches('?')
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_component(key), decode_component(value))
            })
            .collect()
    }

    /// Adds one value under `key`.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.entry(key.into()).or_default().push(value.into());
        self
    }

    /// Returns all values for `key`, in insertion order.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.values.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns the first value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_all(key).first().map(String::as_str)
    }

    /// Returns true if `key` occurred at least once.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Iterates over the distinct keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Returns true if no parameters are present.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.append(key, value);
        }
        params
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_string() {
        let params = QueryParams::parse("?color=red&color=blue%2Cgreen&search=running+shoe&limit=10");

        assert_eq!(params.get_all("color"), ["red", "blue,green"]);
        assert_eq!(params.get("search"), Some("running shoe"));
        assert_eq!(params.get("limit"), Some("10"));
        assert!(params.get_all("missing").is_empty());
    }

    #[test]
    fn test_parse_key_without_value() {
        let params = QueryParams::parse("onSale&&inStock=");
        assert_eq!(params.get("onSale"), Some(""));
        assert_eq!(params.get("inStock"), Some(""));
        assert_eq!(params.keys().count(), 2);
    }

    #[test]
    fn test_parse_empty() {
        assert!(QueryParams::parse("").is_empty());
        assert!(QueryParams::parse("?").is_empty());
    }

    #[test]
    fn test_from_pairs() {
        let params: QueryParams = [("sort", "popularity"), ("sort", "price_asc")].into_iter().collect();
        assert!(params.contains_key("sort"));
        assert_eq!(params.get_all("sort"), ["popularity", "price_asc"]);
    }
}
