//! azure-maps-search - fluent query builder for Azure Maps address and POI search

pub mod api;
pub mod config;
pub mod service;

pub use api::{Address, Coordinates, QueryBuilder, SearchError, SearchResult, Transport};
pub use config::{Config, FileConfig};
pub use service::SearchService;
