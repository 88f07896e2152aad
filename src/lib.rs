//! Geo Shift Spy - command-line client for the change-detection backend
//!
//! This crate wires the client wrappers together and exposes the CLI

mod app;
pub mod cli;

pub use app::{AppHandle, create_app};
pub use geoshift_core::{Config, init_tracing};

// Re-export for convenience
pub use geoshift_client;
pub use geoshift_core;
