//! CSV writers for property rows and activity timelines.

use renspa_core::TimelinePoint;
use serde::Serialize;

use crate::error::ExportError;
use crate::feature::ExportFeature;

/// One exported property row.
#[derive(Debug, Serialize)]
struct PropertyRow<'a> {
    renspa: &'a str,
    titular: &'a str,
    localidad: &'a str,
    provincia: &'a str,
    superficie_ha: f64,
    estado: &'static str,
    cuit: &'a str,
    centroide_lat: f64,
    centroide_lon: f64,
    maps_url: String,
}

impl<'a> PropertyRow<'a> {
    fn from_feature(feature: &ExportFeature<'a>) -> Self {
        let record = feature.record;
        let centroid = feature.centroid();
        Self {
            renspa: record.property_id.as_str(),
            titular: &record.owner_name,
            localidad: &record.locality,
            provincia: &record.province,
            superficie_ha: record.area_hectares,
            estado: if feature.is_active() { "activo" } else { "historico" },
            cuit: feature.taxpayer.map_or("", |t| t.as_str()),
            centroide_lat: centroid.lat,
            centroide_lon: centroid.lon,
            maps_url: centroid.maps_url(),
        }
    }
}

#[derive(Debug, Serialize)]
struct TimelineRow {
    fecha: String,
    renspa_activos: usize,
    hectareas_activas: f64,
}

/// One row per feature, with a header.
///
/// # Errors
///
/// Returns [`ExportError::Csv`] if a row cannot be written.
pub fn to_csv(features: &[ExportFeature<'_>]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for feature in features {
        writer.serialize(PropertyRow::from_feature(feature))?;
    }
    finish(writer)
}

/// Timeline series as `fecha,renspa_activos,hectareas_activas`.
///
/// # Errors
///
/// Returns [`ExportError::Csv`] if a row cannot be written.
pub fn timeline_to_csv(points: &[TimelinePoint]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for point in points {
        writer.serialize(TimelineRow {
            fecha: point.date.format("%Y-%m-%d").to_string(),
            renspa_activos: point.active_properties,
            hectareas_activas: point.active_hectares,
        })?;
    }
    finish(writer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>, ExportError> {
    writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))
}
