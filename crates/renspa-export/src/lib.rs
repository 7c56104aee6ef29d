//! KML, KMZ, GeoJSON and CSV exporters for resolved RENSPA properties.
//!
//! Exporters only see [`ExportFeature`]s: a record, its ring and an optional
//! CUIT. Properties without geometry never reach them.

pub mod csv_export;
pub mod error;
pub mod feature;
pub mod format;
pub mod geojson_export;
pub mod kml;
pub mod kmz;

pub use csv_export::{timeline_to_csv, to_csv};
pub use error::ExportError;
pub use feature::{mapped_features, ExportFeature};
pub use format::{write_export, ExportFormat, UnknownFormat};
pub use geojson_export::{feature_collection, to_geojson};
pub use kml::{to_kml, write_kml};
pub use kmz::to_kmz;
