//! Direct lookup of RENSPA numbers through `consultaPorNumero`.

use std::collections::HashSet;

use renspa_core::{Centroid, Polygon, PropertyId, PropertyRecord};
use serde::Serialize;

use crate::client::RegistryClient;

/// A detail record and the ring parsed from it, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedProperty {
    pub record: PropertyRecord,
    pub polygon: Option<Polygon>,
}

impl ResolvedProperty {
    #[must_use]
    pub fn centroid(&self) -> Option<Centroid> {
        self.polygon.as_ref().map(Polygon::centroid)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LookupFailure {
    InvalidIdentifier { input: String, error: String },
    /// The registry returned nothing usable, or the request failed.
    NotFound { property: PropertyId },
}

impl std::fmt::Display for LookupFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidIdentifier { error, .. } => write!(f, "{error}"),
            Self::NotFound { property } => write!(f, "RENSPA {property} not found"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LookupStats {
    pub requested: usize,
    pub invalid: usize,
    pub duplicate: usize,
    pub found: usize,
    pub not_found: usize,
    pub with_geometry: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LookupBatch {
    /// In input order.
    pub resolved: Vec<ResolvedProperty>,
    pub failures: Vec<LookupFailure>,
    pub stats: LookupStats,
}

impl LookupBatch {
    /// Resolved entries that carry a ring.
    pub fn mapped(&self) -> impl Iterator<Item = &ResolvedProperty> {
        self.resolved.iter().filter(|p| p.polygon.is_some())
    }
}

/// Fetches each RENSPA number in `inputs`, one detail call at a time.
///
/// Invalid numbers are reported without touching the network and repeats are
/// skipped. The inter-request delay follows every detail call.
pub async fn run_property_lookup<S: AsRef<str>>(
    client: &RegistryClient,
    inputs: &[S],
) -> LookupBatch {
    let mut batch = LookupBatch::default();
    batch.stats.requested = inputs.len();
    let mut seen: HashSet<PropertyId> = HashSet::new();

    for input in inputs {
        let raw = input.as_ref();
        let property = match PropertyId::parse(raw) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(input = raw, error = %e, "invalid RENSPA number");
                batch.stats.invalid += 1;
                batch.failures.push(LookupFailure::InvalidIdentifier {
                    input: raw.to_owned(),
                    error: e.to_string(),
                });
                continue;
            }
        };
        if !seen.insert(property.clone()) {
            batch.stats.duplicate += 1;
            continue;
        }

        let detail = client.fetch_property_detail(&property).await;
        client.pause().await;

        match detail {
            Some(record) => {
                let polygon = record.polygon();
                batch.stats.found += 1;
                if polygon.is_some() {
                    batch.stats.with_geometry += 1;
                } else {
                    tracing::debug!(renspa = %property, "detail has no usable geometry");
                }
                batch.resolved.push(ResolvedProperty { record, polygon });
            }
            None => {
                batch.stats.not_found += 1;
                batch.failures.push(LookupFailure::NotFound { property });
            }
        }
    }

    tracing::info!(
        requested = batch.stats.requested,
        found = batch.stats.found,
        mapped = batch.stats.with_geometry,
        "property lookup complete"
    );

    batch
}
