//! KMZ: the KML document zipped as the single entry `doc.kml`.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::ExportError;
use crate::feature::ExportFeature;
use crate::kml::to_kml;

pub const KMZ_ENTRY: &str = "doc.kml";

/// Renders `features` as KML and packs it into a KMZ archive.
///
/// # Errors
///
/// Returns [`ExportError::Xml`] or [`ExportError::Zip`] if encoding fails.
pub fn to_kmz(features: &[ExportFeature<'_>], document_name: &str) -> Result<Vec<u8>, ExportError> {
    let kml = to_kml(features, document_name)?;

    let mut archive = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    archive.start_file(KMZ_ENTRY, options)?;
    archive.write_all(&kml)?;
    let cursor = archive.finish()?;
    Ok(cursor.into_inner())
}
