//! Geospatial value objects and local helpers
//!
//! Nothing in this module performs I/O. The export client in `geoshift-client`
//! builds on these types; everything else here is usable offline.

pub mod area;
pub mod bounds;
pub mod data_url;
pub mod detection;
pub mod error;
pub mod export;
pub mod geojson;
pub mod stats;
pub mod style;

pub use area::{AreaUnit, FormattedArea, format_area};
pub use bounds::{GeoBounds, GeoCoordinate, Region, default_bounds, pixel_to_geo, validate_bounds};
pub use data_url::{DataUrl, encode_data_url, encode_json_data_url, parse_data_url};
pub use detection::{ChangeDetection, ChangeType, ClusterKind, DetectionCluster};
pub use error::GeoError;
pub use export::{
    ClusterRequest, DEFAULT_CLUSTER_DISTANCE_METERS, DEFAULT_MAPBOX_STYLE, ExportFormat,
    ExportRequest, ExportedOverlay, LeafletConfiguration, Legend, LegendItem, MapConfiguration,
    MapConfigurationRequest, MapProvider, MapboxConfiguration,
};
pub use geojson::{
    Feature, FeatureCollection, Geometry, Position, calculate_bounds,
    detections_to_feature_collection,
};
pub use stats::{StatsSummary, create_stats_summary};
pub use style::{FeatureStyle, feature_style};
