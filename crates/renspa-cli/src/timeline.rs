//! `renspa timeline`: active properties and hectares over time.

use std::path::Path;

use anyhow::Context;
use renspa_core::{activity_timeline, AppConfig, RecordFilter};
use renspa_export::timeline_to_csv;
use renspa_registry::{run_taxpayer_batch, BatchOptions};

use crate::render;

/// Runs a historical-inclusive batch and prints or writes its timeline.
///
/// # Errors
///
/// Returns an error if the client cannot be built or the CSV cannot be written.
pub(crate) async fn run_timeline(
    config: &AppConfig,
    inputs: &[String],
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let client = crate::build_client(config)?;
    let options = BatchOptions {
        filter: RecordFilter::IncludeHistorical,
        max_concurrent_taxpayers: config.max_concurrent_taxpayers,
    };
    let batch = run_taxpayer_batch(&client, inputs, &options).await;

    for failure in &batch.failures {
        println!("not resolved: {failure}");
    }

    let points = activity_timeline(batch.all().map(|p| &p.record));
    match output {
        Some(path) => {
            let bytes = timeline_to_csv(&points)?;
            std::fs::write(path, bytes)
                .with_context(|| format!("writing timeline to {}", path.display()))?;
            println!("wrote {} timeline points to {}", points.len(), path.display());
        }
        None => render::print_timeline(&points),
    }
    Ok(())
}
