//! Multi-taxpayer batch: listing, filtering, geometry resolution and stats.
//!
//! Per-taxpayer failures never abort the batch. An invalid CUIT, an empty
//! listing or a property whose geometry never resolves each leave a trace in
//! [`QueryBatch::failures`] or [`BatchStats`] and the run moves on.

use std::collections::{BTreeMap, HashSet};

use futures::stream::{self, StreamExt};
use renspa_core::{
    EnrichedProperty, IdentifierError, Polygon, PropertyRecord, RecordFilter, TaxpayerId,
};
use serde::Serialize;

use crate::client::RegistryClient;

/// Knobs for [`run_taxpayer_batch`].
#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    pub filter: RecordFilter,
    /// Taxpayers resolved at once. `1` (the default) keeps the run strictly
    /// sequential, one request in flight at a time.
    pub max_concurrent_taxpayers: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            filter: RecordFilter::ActiveOnly,
            max_concurrent_taxpayers: 1,
        }
    }
}

/// Why a requested taxpayer contributed no properties.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaxpayerFailure {
    InvalidIdentifier { input: String, error: String },
    NoRecords { taxpayer: TaxpayerId },
}

impl std::fmt::Display for TaxpayerFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidIdentifier { error, .. } => write!(f, "{error}"),
            Self::NoRecords { taxpayer } => write!(f, "no RENSPA records found for {taxpayer}"),
        }
    }
}

/// Run counters. Areas only cover records that passed the filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchStats {
    pub taxpayers_requested: usize,
    pub taxpayers_succeeded: usize,
    pub taxpayers_invalid: usize,
    pub taxpayers_empty: usize,
    pub taxpayers_duplicate: usize,
    /// Listing entries before filtering.
    pub records_listed: usize,
    /// Entries that passed the filter.
    pub properties_found: usize,
    pub properties_with_geometry: usize,
    pub properties_without_geometry: usize,
    pub detail_lookups: usize,
    pub total_area_hectares: f64,
    pub active_area_hectares: f64,
}

/// Output of one batch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryBatch {
    pub properties: BTreeMap<TaxpayerId, Vec<EnrichedProperty>>,
    pub failures: Vec<TaxpayerFailure>,
    pub stats: BatchStats,
}

impl QueryBatch {
    /// Every processed property, in taxpayer order.
    pub fn all(&self) -> impl Iterator<Item = &EnrichedProperty> {
        self.properties.values().flatten()
    }

    /// Properties with a resolved ring; the ones that can be mapped or exported.
    pub fn mapped(&self) -> impl Iterator<Item = &EnrichedProperty> {
        self.all().filter(|p| p.polygon.is_some())
    }

    #[must_use]
    pub fn get(&self, taxpayer: &TaxpayerId) -> Option<&[EnrichedProperty]> {
        self.properties.get(taxpayer).map(Vec::as_slice)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// What one taxpayer's resolution produced, before it is folded into the batch.
struct TaxpayerOutcome {
    taxpayer: TaxpayerId,
    listed: usize,
    properties: Vec<EnrichedProperty>,
    detail_lookups: usize,
}

/// Resolves every CUIT in `inputs` to its enriched properties.
///
/// Inputs are canonicalised first; invalid ones become
/// [`TaxpayerFailure::InvalidIdentifier`] and repeats are skipped. Each valid
/// taxpayer's listing is walked, filtered per `options.filter`, and each kept
/// record gets a ring: the inline geometry when it parses, otherwise one
/// detail lookup. A record whose detail has no usable ring is kept without
/// geometry.
pub async fn run_taxpayer_batch<S: AsRef<str>>(
    client: &RegistryClient,
    inputs: &[S],
    options: &BatchOptions,
) -> QueryBatch {
    let mut batch = QueryBatch::default();
    batch.stats.taxpayers_requested = inputs.len();

    let mut seen: HashSet<TaxpayerId> = HashSet::new();
    let mut taxpayers = Vec::new();
    for input in inputs {
        let raw = input.as_ref();
        match TaxpayerId::parse(raw) {
            Ok(id) => {
                if seen.insert(id.clone()) {
                    taxpayers.push(id);
                } else {
                    tracing::debug!(cuit = %id, "duplicate taxpayer in batch skipped");
                    batch.stats.taxpayers_duplicate += 1;
                }
            }
            Err(e) => {
                tracing::warn!(input = raw, error = %e, "invalid taxpayer id");
                batch.stats.taxpayers_invalid += 1;
                batch.failures.push(invalid_identifier(raw, &e));
            }
        }
    }

    let filter = options.filter;
    let outcomes: Vec<TaxpayerOutcome> = stream::iter(taxpayers)
        .map(|taxpayer| resolve_taxpayer(client, taxpayer, filter))
        .buffered(options.max_concurrent_taxpayers.max(1))
        .collect()
        .await;

    for outcome in outcomes {
        absorb(&mut batch, outcome);
    }

    tracing::info!(
        requested = batch.stats.taxpayers_requested,
        succeeded = batch.stats.taxpayers_succeeded,
        properties = batch.stats.properties_found,
        mapped = batch.stats.properties_with_geometry,
        total_ha = batch.stats.total_area_hectares,
        "taxpayer batch complete"
    );

    batch
}

fn invalid_identifier(input: &str, error: &IdentifierError) -> TaxpayerFailure {
    TaxpayerFailure::InvalidIdentifier {
        input: input.to_owned(),
        error: error.to_string(),
    }
}

fn absorb(batch: &mut QueryBatch, outcome: TaxpayerOutcome) {
    let stats = &mut batch.stats;
    stats.records_listed += outcome.listed;
    stats.detail_lookups += outcome.detail_lookups;

    if outcome.listed == 0 {
        stats.taxpayers_empty += 1;
        batch.failures.push(TaxpayerFailure::NoRecords {
            taxpayer: outcome.taxpayer,
        });
        return;
    }

    stats.taxpayers_succeeded += 1;
    for property in &outcome.properties {
        stats.properties_found += 1;
        if property.polygon.is_some() {
            stats.properties_with_geometry += 1;
        } else {
            stats.properties_without_geometry += 1;
        }
        stats.total_area_hectares += property.record.area_hectares;
        if property.is_active() {
            stats.active_area_hectares += property.record.area_hectares;
        }
    }
    batch.properties.insert(outcome.taxpayer, outcome.properties);
}

async fn resolve_taxpayer(
    client: &RegistryClient,
    taxpayer: TaxpayerId,
    filter: RecordFilter,
) -> TaxpayerOutcome {
    let listing = client.fetch_properties_by_taxpayer(&taxpayer).await;
    let listed = listing.len();
    if listed == 0 {
        tracing::warn!(cuit = %taxpayer, "no RENSPA records found");
    }

    let mut properties = Vec::new();
    let mut detail_lookups = 0;
    for record in listing.into_iter().filter(|r| filter.accepts(r)) {
        let (record, polygon) = match record.polygon() {
            Some(polygon) => (record, Some(polygon)),
            None => {
                detail_lookups += 1;
                resolve_via_detail(client, record).await
            }
        };
        if polygon.is_none() {
            tracing::debug!(cuit = %taxpayer, renspa = %record.property_id, "no geometry resolved");
        }
        properties.push(EnrichedProperty {
            record,
            polygon,
            taxpayer: taxpayer.clone(),
        });
    }

    TaxpayerOutcome {
        taxpayer,
        listed,
        properties,
        detail_lookups,
    }
}

/// Falls back to `consultaPorNumero` for a listing entry without inline geometry.
async fn resolve_via_detail(
    client: &RegistryClient,
    record: PropertyRecord,
) -> (PropertyRecord, Option<Polygon>) {
    let detail = client.fetch_property_detail(&record.property_id).await;
    client.pause().await;

    let Some(detail) = detail else {
        return (record, None);
    };
    match detail.polygon() {
        Some(polygon) => (record.with_detail(&detail), Some(polygon)),
        None => (record, None),
    }
}
