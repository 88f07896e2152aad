pub mod comparison;
pub mod geospatial;
pub mod http;
pub mod ml;

pub use comparison::ComparisonClient;
pub use geospatial::GeospatialClient;
pub use http::build_http_client;
pub use ml::MlApiClient;
