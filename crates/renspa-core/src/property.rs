//! Registry property records and their enriched, map-ready form.

use chrono::NaiveDate;
use serde::Serialize;

use crate::geometry::{extract_polygon, Centroid, Polygon};
use crate::identifiers::{PropertyId, TaxpayerId};

/// One RENSPA entry as reported by the registry.
///
/// Built once from a listing or detail payload and never mutated; a re-fetch
/// produces a new record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyRecord {
    pub property_id: PropertyId,
    pub owner_name: String,
    pub locality: String,
    pub province: String,
    /// Declared surface in hectares, never negative.
    pub area_hectares: f64,
    pub raw_geometry: Option<String>,
    pub registered_on: Option<NaiveDate>,
    pub deregistered_on: Option<NaiveDate>,
    /// Set when the registry reports a deregistration, even one whose date
    /// could not be read.
    pub deregistered: bool,
    /// Holder CUIT when the payload carries one (detail lookups usually do).
    pub reported_taxpayer: Option<TaxpayerId>,
}

impl PropertyRecord {
    /// `true` until the registry reports a deregistration, dated or not.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.deregistered && self.deregistered_on.is_none()
    }

    /// Runs the polygon extractor over `raw_geometry`, if any.
    #[must_use]
    pub fn polygon(&self) -> Option<Polygon> {
        self.raw_geometry.as_deref().and_then(extract_polygon)
    }

    /// Combines a listing record with the detail record fetched for it.
    ///
    /// Listing values win for descriptive fields (owner, locality, province,
    /// registration date) and for the activity status the record was filtered
    /// on; the detail wins for area and geometry. Empty listing text falls
    /// back to the detail's.
    #[must_use]
    pub fn with_detail(&self, detail: &PropertyRecord) -> PropertyRecord {
        fn prefer(listing: &str, detail: &str) -> String {
            if listing.trim().is_empty() {
                detail.to_owned()
            } else {
                listing.to_owned()
            }
        }

        PropertyRecord {
            property_id: self.property_id.clone(),
            owner_name: prefer(&self.owner_name, &detail.owner_name),
            locality: prefer(&self.locality, &detail.locality),
            province: prefer(&self.province, &detail.province),
            area_hectares: detail.area_hectares,
            raw_geometry: detail.raw_geometry.clone(),
            registered_on: self.registered_on.or(detail.registered_on),
            deregistered_on: self.deregistered_on,
            deregistered: self.deregistered,
            reported_taxpayer: self
                .reported_taxpayer
                .clone()
                .or_else(|| detail.reported_taxpayer.clone()),
        }
    }
}

/// Which registry records a batch keeps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecordFilter {
    /// Only records with no deregistration date.
    #[default]
    ActiveOnly,
    /// Every record, each tagged with its own activity status.
    IncludeHistorical,
}

impl RecordFilter {
    #[must_use]
    pub fn accepts(self, record: &PropertyRecord) -> bool {
        match self {
            Self::ActiveOnly => record.is_active(),
            Self::IncludeHistorical => true,
        }
    }
}

/// A record joined with its resolved ring and the CUIT it was found under.
///
/// `polygon` is `None` for properties that never resolved a geometry; those
/// count in statistics but are skipped by the map and the exporters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedProperty {
    pub record: PropertyRecord,
    pub polygon: Option<Polygon>,
    pub taxpayer: TaxpayerId,
}

impl EnrichedProperty {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.record.is_active()
    }

    #[must_use]
    pub fn centroid(&self) -> Option<Centroid> {
        self.polygon.as_ref().map(Polygon::centroid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(geometry: Option<&str>) -> PropertyRecord {
        PropertyRecord {
            property_id: PropertyId::parse("0102301234501").unwrap(),
            owner_name: "LA ESTANCIA SA".to_owned(),
            locality: "Pergamino".to_owned(),
            province: "Buenos Aires".to_owned(),
            area_hectares: 120.5,
            raw_geometry: geometry.map(str::to_owned),
            registered_on: NaiveDate::from_ymd_opt(2010, 5, 1),
            deregistered_on: None,
            deregistered: false,
            reported_taxpayer: None,
        }
    }

    #[test]
    fn active_until_deregistered() {
        let mut r = record(None);
        assert!(r.is_active());
        r.deregistered_on = NaiveDate::from_ymd_opt(2020, 1, 1);
        assert!(!r.is_active());
    }

    #[test]
    fn filter_active_only_rejects_historical() {
        let mut r = record(None);
        r.deregistered_on = NaiveDate::from_ymd_opt(2020, 1, 1);
        assert!(!RecordFilter::ActiveOnly.accepts(&r));
        assert!(RecordFilter::IncludeHistorical.accepts(&r));
        assert_eq!(RecordFilter::default(), RecordFilter::ActiveOnly);
    }

    #[test]
    fn polygon_is_none_without_geometry() {
        assert!(record(None).polygon().is_none());
        assert!(record(Some("")).polygon().is_none());
        assert!(record(Some("(-34.1,-58.1)(-34.2,-58.1)(-34.2,-58.2)"))
            .polygon()
            .is_some());
    }

    #[test]
    fn with_detail_keeps_listing_text_and_takes_detail_area() {
        let listing = record(None);
        let mut detail = record(Some("(-34.1,-58.1)(-34.2,-58.1)(-34.2,-58.2)"));
        detail.owner_name = "OTRO TITULAR".to_owned();
        detail.area_hectares = 99.0;
        detail.reported_taxpayer = Some(TaxpayerId::parse("30654257562").unwrap());

        let merged = listing.with_detail(&detail);
        assert_eq!(merged.owner_name, "LA ESTANCIA SA");
        assert!((merged.area_hectares - 99.0).abs() < f64::EPSILON);
        assert!(merged.raw_geometry.is_some());
        assert_eq!(
            merged.reported_taxpayer.as_ref().map(TaxpayerId::as_str),
            Some("30-65425756-2")
        );
    }

    #[test]
    fn with_detail_keeps_listing_activity_status() {
        let listing = record(None);
        let mut detail = record(Some("(-34.1,-58.1)(-34.2,-58.1)(-34.2,-58.2)"));
        detail.deregistered_on = NaiveDate::from_ymd_opt(2021, 6, 1);
        detail.deregistered = true;

        let merged = listing.with_detail(&detail);
        assert!(merged.is_active());
        assert!(RecordFilter::ActiveOnly.accepts(&merged));
        assert_eq!(merged.deregistered_on, None);
    }

    #[test]
    fn undated_deregistration_is_not_active() {
        let mut r = record(None);
        r.deregistered = true;
        assert!(!r.is_active());
        assert!(!RecordFilter::ActiveOnly.accepts(&r));
    }

    #[test]
    fn with_detail_fills_blank_listing_fields() {
        let mut listing = record(None);
        listing.locality = "  ".to_owned();
        let detail = record(None);
        assert_eq!(listing.with_detail(&detail).locality, "Pergamino");
    }

    #[test]
    fn enriched_centroid_follows_polygon() {
        let r = record(Some("(0,0)(0,2)(2,2)(2,0)"));
        let enriched = EnrichedProperty {
            polygon: r.polygon(),
            record: r,
            taxpayer: TaxpayerId::parse("30654257562").unwrap(),
        };
        let c = enriched.centroid().unwrap();
        // (0,0),(0,2),(2,2),(2,0),(0,0) -> lat 4/5, lon 4/5
        assert!((c.lat - 0.8).abs() < 1e-12);
        assert!((c.lon - 0.8).abs() < 1e-12);
        assert!(enriched.is_active());
    }
}
