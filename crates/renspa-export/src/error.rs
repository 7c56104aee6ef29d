use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("KML encoding error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("KMZ archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("CSV encoding error: {0}")]
    Csv(#[from] csv::Error),

    #[error("GeoJSON encoding error: {0}")]
    Json(#[from] serde_json::Error),
}
