//! Export target resolution and writing.

use std::path::PathBuf;

use renspa_export::{mapped_features, write_export, ExportFeature, ExportFormat};
use renspa_registry::{LookupBatch, QueryBatch};

/// Where and how to write an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExportTarget {
    pub path: PathBuf,
    pub format: ExportFormat,
}

/// Pairs `--export` with `--format`, inferring the format from the extension
/// when it is not given.
///
/// # Errors
///
/// Returns an error if the format is neither given nor inferable.
pub(crate) fn resolve_target(
    path: Option<PathBuf>,
    format: Option<ExportFormat>,
) -> anyhow::Result<Option<ExportTarget>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let format = match format.or_else(|| ExportFormat::from_path(&path)) {
        Some(format) => format,
        None => anyhow::bail!(
            "cannot infer export format from {}; pass --format kml|kmz|geojson|csv",
            path.display()
        ),
    };
    Ok(Some(ExportTarget { path, format }))
}

/// Mappable properties of a taxpayer batch, in taxpayer order.
pub(crate) fn batch_features(batch: &QueryBatch) -> Vec<ExportFeature<'_>> {
    mapped_features(batch.all())
}

/// Mappable properties of a RENSPA lookup, in input order. A lookup has no
/// batch CUIT, so the holder reported by the registry is used instead.
pub(crate) fn lookup_features(batch: &LookupBatch) -> Vec<ExportFeature<'_>> {
    batch
        .resolved
        .iter()
        .filter_map(|property| {
            property.polygon.as_ref().map(|polygon| {
                ExportFeature::new(
                    &property.record,
                    polygon,
                    property.record.reported_taxpayer.as_ref(),
                )
            })
        })
        .collect()
}

/// Writes `features`, or explains why nothing was written.
///
/// # Errors
///
/// Returns an error if encoding or the file write fails.
pub(crate) fn write_features(
    target: &ExportTarget,
    features: &[ExportFeature<'_>],
    document_name: &str,
) -> anyhow::Result<()> {
    if features.is_empty() {
        println!("nothing to export: no property resolved a polygon");
        return Ok(());
    }
    write_export(&target.path, target.format, features, document_name)?;
    println!(
        "exported {} properties as {} to {}",
        features.len(),
        target.format,
        target.path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use renspa_core::{EnrichedProperty, PropertyId, PropertyRecord, TaxpayerId};
    use renspa_registry::ResolvedProperty;

    use super::*;

    const RING: &str = "(-34.1,-58.1)(-34.2,-58.1)(-34.2,-58.2)";

    fn record(renspa: &str, geometry: Option<&str>) -> PropertyRecord {
        PropertyRecord {
            property_id: PropertyId::parse(renspa).unwrap(),
            owner_name: "LA ESTANCIA".to_owned(),
            locality: "Pergamino".to_owned(),
            province: "Buenos Aires".to_owned(),
            area_hectares: 10.0,
            raw_geometry: geometry.map(str::to_owned),
            registered_on: NaiveDate::from_ymd_opt(2015, 3, 1),
            deregistered_on: None,
            deregistered: false,
            reported_taxpayer: None,
        }
    }

    #[test]
    fn no_export_path_means_no_target() {
        assert_eq!(resolve_target(None, None).unwrap(), None);
    }

    #[test]
    fn format_is_inferred_from_extension() {
        let target = resolve_target(Some(PathBuf::from("campos.kmz")), None)
            .unwrap()
            .unwrap();
        assert_eq!(target.format, ExportFormat::Kmz);
    }

    #[test]
    fn explicit_format_wins_over_extension() {
        let target = resolve_target(Some(PathBuf::from("campos.txt")), Some(ExportFormat::Csv))
            .unwrap()
            .unwrap();
        assert_eq!(target.format, ExportFormat::Csv);
    }

    #[test]
    fn unknown_extension_without_format_fails() {
        assert!(resolve_target(Some(PathBuf::from("campos.txt")), None).is_err());
    }

    #[test]
    fn batch_features_skip_properties_without_geometry() {
        let cuit = TaxpayerId::parse("30-65425756-2").unwrap();
        let enriched = |record: PropertyRecord| EnrichedProperty {
            polygon: record.polygon(),
            record,
            taxpayer: cuit.clone(),
        };
        let mut batch = QueryBatch::default();
        batch.properties.insert(
            cuit.clone(),
            vec![
                enriched(record("01.023.0.00001/01", Some(RING))),
                enriched(record("01.023.0.00002/01", None)),
            ],
        );

        let features = batch_features(&batch);
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].taxpayer, Some(&cuit));
    }

    #[test]
    fn lookup_features_use_reported_taxpayer() {
        let mut with_holder = record("01.023.0.12345/01", Some(RING));
        with_holder.reported_taxpayer = Some(TaxpayerId::parse("30654257562").unwrap());
        let batch = LookupBatch {
            resolved: vec![
                ResolvedProperty {
                    polygon: with_holder.polygon(),
                    record: with_holder,
                },
                ResolvedProperty {
                    polygon: None,
                    record: record("01.023.0.12346/01", None),
                },
            ],
            ..LookupBatch::default()
        };

        let features = lookup_features(&batch);
        assert_eq!(features.len(), 1);
        assert_eq!(
            features[0].taxpayer.map(TaxpayerId::as_str),
            Some("30-65425756-2")
        );
    }
}
