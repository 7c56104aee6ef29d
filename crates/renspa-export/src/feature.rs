//! The read-only view every exporter consumes.

use renspa_core::{Centroid, EnrichedProperty, Polygon, PropertyRecord, TaxpayerId};

/// One mappable property: a record, its ring, and the CUIT it was found
/// under (if known).
#[derive(Debug, Clone, Copy)]
pub struct ExportFeature<'a> {
    pub record: &'a PropertyRecord,
    pub polygon: &'a Polygon,
    pub taxpayer: Option<&'a TaxpayerId>,
}

impl<'a> ExportFeature<'a> {
    #[must_use]
    pub fn new(
        record: &'a PropertyRecord,
        polygon: &'a Polygon,
        taxpayer: Option<&'a TaxpayerId>,
    ) -> Self {
        Self {
            record,
            polygon,
            taxpayer,
        }
    }

    /// `None` for properties without a resolved ring.
    #[must_use]
    pub fn from_enriched(property: &'a EnrichedProperty) -> Option<Self> {
        property
            .polygon
            .as_ref()
            .map(|polygon| Self::new(&property.record, polygon, Some(&property.taxpayer)))
    }

    #[must_use]
    pub fn centroid(&self) -> Centroid {
        self.polygon.centroid()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.record.is_active()
    }
}

/// Mappable properties among `properties`, in iteration order.
#[must_use]
pub fn mapped_features<'a, I>(properties: I) -> Vec<ExportFeature<'a>>
where
    I: IntoIterator<Item = &'a EnrichedProperty>,
{
    properties
        .into_iter()
        .filter_map(ExportFeature::from_enriched)
        .collect()
}
