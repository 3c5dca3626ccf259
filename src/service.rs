//! Named search entry points over a single [`QueryBuilder`].

use anyhow::Result;

use crate::api::{HttpTransport, QueryBuilder, Transport};
use crate::config::Config;

/// Azure Maps POI category code for schools.
pub const SCHOOL_CATEGORY: &str = "7372";

/// Facade that hands out a pre-seeded builder for each kind of search.
///
/// The builder is created once by the factory passed to
/// [`SearchService::with_factory`]; every search reuses it.
#[derive(Debug)]
pub struct SearchService<T = HttpTransport> {
    builder: QueryBuilder<T>,
}

impl SearchService<HttpTransport> {
    /// Service talking to the endpoint described by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = HttpTransport::with_settings(&config.user_agent, config.timeout)?;
        Ok(Self::with_factory(|| {
            QueryBuilder::with_transport(&config.base_url, &config.api_key, transport)
        }))
    }
}

impl<T: Transport> SearchService<T> {
    pub fn with_factory(factory: impl FnOnce() -> QueryBuilder<T>) -> Self {
        Self { builder: factory() }
    }

    /// Free-text address search.
    pub fn search_address(&mut self, query: &str) -> &mut QueryBuilder<T> {
        self.builder.new_search(query, None)
    }

    /// Search restricted to the school category.
    pub fn search_schools(&mut self, query: &str) -> &mut QueryBuilder<T> {
        self.builder.new_search(query, Some(SCHOOL_CATEGORY))
    }

    pub fn builder(&self) -> &QueryBuilder<T> {
        &self.builder
    }
}
