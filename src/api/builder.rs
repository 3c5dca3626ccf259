use std::fmt;
use tracing::{debug, warn};

use super::error::SearchError;
use super::params::{
    CountrySet, DEFAULT_RADIUS_M, KEY_CATEGORY_SET, KEY_COUNTRY_SET, KEY_LAT, KEY_LIMIT, KEY_LON,
    KEY_RADIUS, QueryParams,
};
use super::results::{RawResponse, SearchResult, map_results};
use super::transport::{HttpTransport, Transport};

/// Fluent builder for one Azure Maps search at a time.
///
/// Start a search with [`new_search`](Self::new_search), chain any filters,
/// then call [`fetch`](Self::fetch). The accumulated parameters are consumed
/// by the fetch, so each search starts from the defaults again.
///
/// ```no_run
/// use azure_maps_search::QueryBuilder;
///
/// let mut builder = QueryBuilder::new("https://atlas.microsoft.com/search/fuzzy/json", "key")?;
/// let json = builder
///     .new_search("123 Main Street", None)
///     .country(["ZA", "NA"])
///     .limit(10)
///     .fetch()?;
/// println!("{}", json);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct QueryBuilder<T = HttpTransport> {
    base_url: String,
    api_key: String,
    transport: T,
    params: Option<QueryParams>,
}

impl<T> fmt::Debug for QueryBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("params", &self.params.as_ref().map(|p| p.len()))
            .finish_non_exhaustive()
    }
}

impl QueryBuilder<HttpTransport> {
    /// Builder backed by a default reqwest transport.
    pub fn new(base_url: &str, api_key: &str) -> anyhow::Result<Self> {
        Ok(Self::with_transport(base_url, api_key, HttpTransport::new()?))
    }
}

impl<T: Transport> QueryBuilder<T> {
    pub fn with_transport(base_url: &str, api_key: &str, transport: T) -> Self {
        Self {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            transport,
            params: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Parameters of the active search, if one has been started.
    pub fn params(&self) -> Option<&QueryParams> {
        self.params.as_ref()
    }

    /// Reset the parameters for a new search.
    ///
    /// An empty `category_set` is treated the same as `None`.
    pub fn new_search(&mut self, query: &str, category_set: Option<&str>) -> &mut Self {
        let mut params = QueryParams::for_search(&self.api_key, query);
        if let Some(category) = category_set.filter(|c| !c.is_empty()) {
            params.set(KEY_CATEGORY_SET, category);
        }
        self.params = Some(params);
        self
    }

    /// Maximum number of results. Not range-checked.
    pub fn limit(&mut self, limit: i64) -> &mut Self {
        self.update("limit", |params| params.set(KEY_LIMIT, limit))
    }

    /// Restrict results to one or more countries.
    pub fn country(&mut self, codes: impl Into<CountrySet>) -> &mut Self {
        let codes = codes.into();
        self.update("country", |params| {
            params.set(KEY_COUNTRY_SET, codes.as_str())
        })
    }

    /// Bias results around a point, using the default 50 km radius.
    pub fn location(&mut self, lat: f64, lon: f64) -> &mut Self {
        self.location_with_radius(lat, lon, DEFAULT_RADIUS_M)
    }

    /// Bias results around a point within `radius_m` meters.
    pub fn location_with_radius(&mut self, lat: f64, lon: f64, radius_m: i64) -> &mut Self {
        self.update("location", |params| {
            params.set(KEY_LAT, lat);
            params.set(KEY_LON, lon);
            params.set(KEY_RADIUS, radius_m);
        })
    }

    /// Run the search and return the normalized results as JSON text.
    pub fn fetch(&mut self) -> Result<String, SearchError> {
        let results = self.fetch_results()?;
        serde_json::to_string(&results).map_err(|e| SearchError::Serialize(e.to_string()))
    }

    /// Run the search and return the normalized results.
    pub fn fetch_results(&mut self) -> Result<Vec<SearchResult>, SearchError> {
        let params = self.params.take().ok_or(SearchError::NoActiveSearch)?;

        debug!(
            url = %self.base_url,
            params = params.len(),
            "Sending Azure Maps search request"
        );

        let response = self
            .transport
            .get(&self.base_url, &params.to_pairs())
            .map_err(|e| SearchError::Transport(format!("{:#}", e)))?;

        if response.status != 200 {
            warn!(status = response.status, "Azure Maps search rejected");
            return Err(SearchError::Status {
                status: response.status,
            });
        }

        let raw: RawResponse = serde_json::from_str(&response.body)
            .map_err(|e| SearchError::MalformedResponse(e.to_string()))?;
        let results = map_results(raw);

        debug!(count = results.len(), "Azure Maps search completed");
        Ok(results)
    }

    fn update(&mut self, option: &str, apply: impl FnOnce(&mut QueryParams)) -> &mut Self {
        match self.params.as_mut() {
            Some(params) => apply(params),
            None => warn!(option, "Ignoring search option set before new_search"),
        }
        self
    }
}
