//! Geo Shift Spy Core - Shared foundation for the change-detection client
//!
//! This crate holds everything that does not touch the network:
//!
//! # Modules
//!
//! - [`config`] - Strongly-typed configuration with TOML and environment variable support
//! - [`domain`] - Backend response view models and geospatial value objects
//! - [`logging`] - Structured logging with tracing
//!
//! # Configuration
//!
//! ```rust,ignore
//! use geoshift_core::Config;
//!
//! let config = Config::load()?;
//! ```
//!
//! Environment variables use the `GEOSHIFT__` prefix with double underscore separators:
//!
//! ```bash
//! GEOSHIFT__API__API_URL=http://analysis.internal:8000
//! GEOSHIFT__LOGGING__LEVEL=debug
//! ```
//!
//! `VITE_API_URL` is honoured as an override for the comparison endpoint base URL.
//!
//! # Local geospatial helpers
//!
//! ```rust
//! use geoshift_core::domain::geospatial::{default_bounds, format_area, validate_bounds};
//!
//! let amazon = default_bounds("amazon");
//! assert!(validate_bounds(&amazon));
//! assert_eq!(format_area(2_000_000.0).to_string(), "2.00 km²");
//! ```

pub mod config;
pub mod domain;
pub mod logging;

pub use config::Config;
pub use logging::init_tracing;
