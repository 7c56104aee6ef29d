//! Client and batch runner for the SENASA RENSPA registry API.
//!
//! [`RegistryClient`] wraps the two upstream endpoints (`consultaPorCuit`,
//! `consultaPorNumero`). Its `fetch_*` operations never fail: transport and
//! decoding problems are logged and turned into short or empty results.
//! [`run_taxpayer_batch`] and [`run_property_lookup`] compose the client with
//! the polygon extractor from `renspa-core`.

pub mod batch;
pub mod client;
pub mod error;
pub mod lookup;
pub mod normalize;
pub mod pacing;
pub mod pagination;
mod retry;
pub mod types;

pub use batch::{run_taxpayer_batch, BatchOptions, BatchStats, QueryBatch, TaxpayerFailure};
pub use client::{RegistryClient, RegistryClientConfig};
pub use error::RegistryError;
pub use lookup::{run_property_lookup, LookupBatch, LookupFailure, LookupStats, ResolvedProperty};
pub use normalize::normalize_item;
pub use pacing::RequestPacer;
pub use pagination::OffsetPager;
pub use types::{ListingPage, RegistryItem};
