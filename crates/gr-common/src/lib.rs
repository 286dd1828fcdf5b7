//! Shared types for Gutenberg-Richter catalog analysis.
//!
//! This crate provides foundational types used across the workspace:
//! - Earthquake events and the read-only event catalog
//! - Selection regions (polygons, bounding boxes) and time windows
//! - The unified error taxonomy
//! - Output formats

pub mod error;
pub mod event;
pub mod output;
pub mod region;

pub use error::{Error, ErrorCategory, Result, StructuredError};
pub use event::{Event, EventCatalog};
pub use output::OutputFormat;
pub use region::{BoundingBox, GeoPoint, Polygon, Region, TimeRange};
