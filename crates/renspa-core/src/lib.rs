//! Domain model for SENASA RENSPA property lookups.
//!
//! Holds the identifier value types, the registry record shape shared by the
//! client and the exporters, the polygon extraction pipeline, and the
//! environment-driven application config. Nothing in this crate performs I/O
//! beyond reading environment variables.

pub mod app_config;
pub mod config;
pub mod geometry;
pub mod identifiers;
pub mod property;
pub mod timeline;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use geometry::{extract_polygon, Centroid, Polygon, Vertex};
pub use identifiers::{
    normalize_property_id, normalize_taxpayer_id, IdentifierError, PropertyId, TaxpayerId,
};
pub use property::{EnrichedProperty, PropertyRecord, RecordFilter};
pub use timeline::{activity_timeline, TimelinePoint};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
