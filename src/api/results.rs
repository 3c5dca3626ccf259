//! Raw Azure Maps search response types and their mapping into the
//! simplified [`SearchResult`] shape.
//!
//! Every raw field is optional. Mapping never fails on missing, null or
//! oddly typed data; it substitutes an empty string or `None`. Numeric
//! text fields keep their JSON spelling and numeric strings are accepted as
//! coordinates.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Raw search response. Only `results` is read; `summary` and friends are
/// ignored.
#[derive(Debug, Default, Deserialize)]
pub struct RawResponse {
    #[serde(default, deserialize_with = "lenient_list")]
    pub results: Vec<RawResult>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawResult {
    #[serde(default, deserialize_with = "lenient")]
    pub address: RawAddress,
    #[serde(default, deserialize_with = "lenient")]
    pub position: RawPosition,
    #[serde(default, deserialize_with = "lenient")]
    pub poi: RawPoi,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAddress {
    #[serde(default, deserialize_with = "scalar_text")]
    pub street_number: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub street_name: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub municipality_subdivision: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub municipality: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub postal_code: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub country_subdivision: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub country_subdivision_code: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub country: Option<String>,
    #[serde(rename = "countryCodeISO3", default, deserialize_with = "scalar_text")]
    pub country_code_iso3: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawPosition {
    #[serde(default, deserialize_with = "coordinate")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "coordinate")]
    pub lon: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawPoi {
    #[serde(default, deserialize_with = "scalar_text")]
    pub name: Option<String>,
}

/// Any value that does not fit `T` (null, wrong shape) becomes `T::default()`.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Non-arrays read as empty; each element is read with [`lenient`] rules.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        _ => Vec::new(),
    };
    Ok(items
        .into_iter()
        .map(|item| serde_json::from_value(item).unwrap_or_default())
        .collect())
}

/// Strings as-is, numbers and booleans in their JSON spelling.
fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// Numbers, or strings that parse as one.
fn coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// One normalized search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub name: String,
    pub address: Address,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub line1: String,
    pub line2: String,
    pub suburb: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub province: Option<String>,
    pub province_code: Option<String>,
    pub country: Option<String>,
    #[serde(rename = "countryCodeISO3")]
    pub country_code_iso3: Option<String>,
}

/// Output keeps `lng` while the API sends `lon`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl From<RawResult> for SearchResult {
    fn from(raw: RawResult) -> Self {
        SearchResult {
            name: raw.poi.name.unwrap_or_default(),
            address: Address::from(raw.address),
            coordinates: Coordinates {
                lat: raw.position.lat,
                lng: raw.position.lon,
            },
        }
    }
}

impl From<RawAddress> for Address {
    fn from(raw: RawAddress) -> Self {
        let line1 = format!(
            "{} {}",
            raw.street_number.as_deref().unwrap_or(""),
            raw.street_name.as_deref().unwrap_or("")
        )
        .trim()
        .to_string();

        // The separator only appears when there is a subdivision to separate.
        let subdivision = raw
            .municipality_subdivision
            .as_deref()
            .map(|s| format!("{}, ", s))
            .unwrap_or_default();
        let line2 = format!(
            "{}{}",
            subdivision,
            raw.municipality.as_deref().unwrap_or("")
        )
        .trim()
        .to_string();

        Address {
            line1,
            line2,
            suburb: raw.municipality_subdivision,
            city: raw.municipality,
            postal_code: raw.postal_code,
            province: raw.country_subdivision,
            province_code: raw.country_subdivision_code,
            country: raw.country,
            country_code_iso3: raw.country_code_iso3,
        }
    }
}

/// Map every raw entry of a response, preserving order.
pub fn map_results(response: RawResponse) -> Vec<SearchResult> {
    response.results.into_iter().map(SearchResult::from).collect()
}
