pub mod builder;
pub mod error;
pub mod params;
pub mod results;
pub mod transport;

pub use builder::QueryBuilder;
pub use error::SearchError;
pub use params::{CountrySet, QueryParams};
pub use results::{Address, Coordinates, SearchResult};
pub use transport::{HttpTransport, Transport, TransportResponse};
