use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::ExportError;
use crate::feature::ExportFeature;

/// Supported export encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Kml,
    Kmz,
    GeoJson,
    Csv,
}

impl ExportFormat {
    /// Infers the format from a file extension (case-insensitive).
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }

    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Kml => "kml",
            Self::Kmz => "kmz",
            Self::GeoJson => "geojson",
            Self::Csv => "csv",
        }
    }

    /// Encodes `features` in this format.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] if the underlying encoder fails.
    pub fn render(
        self,
        features: &[ExportFeature<'_>],
        document_name: &str,
    ) -> Result<Vec<u8>, ExportError> {
        match self {
            Self::Kml => crate::kml::to_kml(features, document_name),
            Self::Kmz => crate::kmz::to_kmz(features, document_name),
            Self::GeoJson => crate::geojson_export::to_geojson(features),
            Self::Csv => crate::csv_export::to_csv(features),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown export format \"{0}\": expected kml, kmz, geojson or csv")]
pub struct UnknownFormat(pub String);

impl FromStr for ExportFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kml" => Ok(Self::Kml),
            "kmz" => Ok(Self::Kmz),
            "geojson" | "json" => Ok(Self::GeoJson),
            "csv" => Ok(Self::Csv),
            _ => Err(UnknownFormat(s.to_owned())),
        }
    }
}

/// Encodes `features` and writes them to `path`.
///
/// # Errors
///
/// Returns [`ExportError`] if encoding or the file write fails.
pub fn write_export(
    path: &Path,
    format: ExportFormat,
    features: &[ExportFeature<'_>],
    document_name: &str,
) -> Result<(), ExportError> {
    let bytes = format.render(features, document_name)?;
    std::fs::write(path, &bytes)?;
    tracing::info!(path = %path.display(), %format, features = features.len(), bytes = bytes.len(), "export written");
    Ok(())
}
