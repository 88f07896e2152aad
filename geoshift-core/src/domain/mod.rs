//! Domain layer - backend view models and geospatial value objects
//!
//! Every type here is created from a single backend response (or built locally
//! for a request) and treated as an immutable value afterwards.

pub mod comparison;
pub mod geospatial;
pub mod image;
pub mod ml;
pub mod severity;

pub use comparison::*;
pub use image::ImagePayload;
pub use ml::*;
pub use severity::Severity;
