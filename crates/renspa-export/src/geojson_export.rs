//! GeoJSON `FeatureCollection` writer.

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};

use crate::error::ExportError;
use crate::feature::ExportFeature;

fn properties(feature: &ExportFeature<'_>) -> JsonObject {
    let record = feature.record;
    let mut props = JsonObject::new();
    props.insert("renspa".to_owned(), JsonValue::from(record.property_id.as_str()));
    props.insert("titular".to_owned(), JsonValue::from(record.owner_name.as_str()));
    props.insert("localidad".to_owned(), JsonValue::from(record.locality.as_str()));
    props.insert("provincia".to_owned(), JsonValue::from(record.province.as_str()));
    props.insert("superficie".to_owned(), JsonValue::from(record.area_hectares));
    props.insert("activo".to_owned(), JsonValue::from(feature.is_active()));
    props.insert(
        "cuit".to_owned(),
        feature
            .taxpayer
            .map_or(JsonValue::Null, |t| JsonValue::from(t.as_str())),
    );
    props
}

/// Builds the collection: one `Polygon` feature per entry, ring in `[lon, lat]` order.
#[must_use]
pub fn feature_collection(features: &[ExportFeature<'_>]) -> FeatureCollection {
    let features = features
        .iter()
        .map(|f| Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::Polygon(vec![f.polygon.positions()]))),
            id: None,
            properties: Some(properties(f)),
            foreign_members: None,
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Pretty-printed GeoJSON bytes.
///
/// # Errors
///
/// Returns [`ExportError::Json`] if serialization fails.
pub fn to_geojson(features: &[ExportFeature<'_>]) -> Result<Vec<u8>, ExportError> {
    Ok(serde_json::to_vec_pretty(&feature_collection(features))?)
}
