use std::collections::BTreeMap;
use std::fmt;

pub const API_VERSION: &str = "1.0";
pub const DEFAULT_LIMIT: i64 = 5;
pub const DEFAULT_RADIUS_M: i64 = 50_000;

pub const KEY_API_VERSION: &str = "api-version";
pub const KEY_LIMIT: &str = "limit";
pub const KEY_SUBSCRIPTION: &str = "subscription-key";
pub const KEY_QUERY: &str = "query";
pub const KEY_CATEGORY_SET: &str = "categorySet";
pub const KEY_COUNTRY_SET: &str = "countrySet";
pub const KEY_LAT: &str = "lat";
pub const KEY_LON: &str = "lon";
pub const KEY_RADIUS: &str = "radius";

/// A single query string value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Int(i64),
    Float(f64),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Text(s) => f.write_str(s),
            ParamValue::Int(n) => write!(f, "{}", n),
            ParamValue::Float(x) => write!(f, "{}", x),
        }
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

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

/// Parameters of one search, keyed by their wire name.
///
/// Kept sorted so the generated query string is stable.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryParams {
    values: BTreeMap<&'static str, ParamValue>,
}

impl QueryParams {
    /// Defaults for a fresh search: API version, limit, key and query.
    pub fn for_search(api_key: &str, query: &str) -> Self {
        let mut params = Self::default();
        params.set(KEY_API_VERSION, API_VERSION);
        params.set(KEY_LIMIT, DEFAULT_LIMIT);
        params.set(KEY_SUBSCRIPTION, api_key);
        params.set(KEY_QUERY, query);
        params
    }

    pub fn set(&mut self, key: &'static str, value: impl Into<ParamValue>) {
        self.values.insert(key, value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Name/value pairs ready to hand to a transport.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.values
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}

/// One or more ISO country codes for the `countrySet` filter.
///
/// Built from a single code or any list of codes; lists are joined with `,`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountrySet(String);

impl CountrySet {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn join<S: AsRef<str>>(codes: &[S]) -> Self {
        let joined = codes
            .iter()
            .map(|c| c.as_ref())
            .collect::<Vec<_>>()
            .join(",");
        CountrySet(joined)
    }
}

impl From<&str> for CountrySet {
    fn from(code: &str) -> Self {
        CountrySet(code.to_string())
    }
}

impl From<String> for CountrySet {
    fn from(code: String) -> Self {
        CountrySet(code)
    }
}

impl From<&String> for CountrySet {
    fn from(code: &String) -> Self {
        CountrySet(code.clone())
    }
}

impl<S: AsRef<str>> From<&[S]> for CountrySet {
    fn from(codes: &[S]) -> Self {
        CountrySet::join(codes)
    }
}

impl<S: AsRef<str>, const N: usize> From<[S; N]> for CountrySet {
    fn from(codes: [S; N]) -> Self {
        CountrySet::join(&codes)
    }
}

impl<S: AsRef<str>> From<Vec<S>> for CountrySet {
    fn from(codes: Vec<S>) -> Self {
        CountrySet::join(&codes)
    }
}

impl<S: AsRef<str>> From<&Vec<S>> for CountrySet {
    fn from(codes: &Vec<S>) -> Self {
        CountrySet::join(codes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_defaults() {
        let params = QueryParams::for_search("key", "Main Street");
        assert_eq!(params.len(), 4);
        assert_eq!(params.get(KEY_API_VERSION), Some(&ParamValue::from("1.0")));
        assert_eq!(params.get(KEY_LIMIT), Some(&ParamValue::Int(5)));
        assert_eq!(params.get(KEY_SUBSCRIPTION), Some(&ParamValue::from("key")));
        assert_eq!(params.get(KEY_QUERY), Some(&ParamValue::from("Main Street")));
    }

    #[test]
    fn test_set_overwrites() {
        let mut params = QueryParams::for_search("key", "q");
        params.set(KEY_LIMIT, 10_i64);
        assert_eq!(params.get(KEY_LIMIT), Some(&ParamValue::Int(10)));
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn test_value_formatting() {
        assert_eq!(ParamValue::Float(-33.925).to_string(), "-33.925");
        assert_eq!(ParamValue::Float(18.424).to_string(), "18.424");
        assert_eq!(ParamValue::Int(-1).to_string(), "-1");
        assert_eq!(ParamValue::from("ZA,NA").to_string(), "ZA,NA");
    }

    #[test]
    fn test_pairs_are_sorted_by_key() {
        let params = QueryParams::for_search("key", "q");
        let keys: Vec<String> = params.to_pairs().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["api-version", "limit", "query", "subscription-key"]);
    }

    #[test]
    fn test_country_set_from_single_and_lists() {
        assert_eq!(CountrySet::from("ZA").as_str(), "ZA");
        assert_eq!(CountrySet::from(["ZA", "NA"]).as_str(), "ZA,NA");
        assert_eq!(
            CountrySet::from(vec!["ZA".to_string(), "NA".to_string(), "BW".to_string()]).as_str(),
            "ZA,NA,BW"
        );
        let codes: &[&str] = &["GB"];
        assert_eq!(CountrySet::from(codes).as_str(), "GB");
        let empty: Vec<&str> = Vec::new();
        assert_eq!(CountrySet::from(empty).as_str(), "");
    }
}
