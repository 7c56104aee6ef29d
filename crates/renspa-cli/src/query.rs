//! `renspa cuit`: taxpayer batch, summary and optional export.

use renspa_core::{AppConfig, RecordFilter};
use renspa_registry::{run_taxpayer_batch, BatchOptions};

use crate::export::{batch_features, write_features, ExportTarget};
use crate::render;

/// Runs a taxpayer batch over `inputs`, prints it and writes the export.
///
/// Invalid or empty taxpayers are reported in the summary, not as errors.
///
/// # Errors
///
/// Returns an error if the client cannot be built or the export fails.
pub(crate) async fn run_cuit(
    config: &AppConfig,
    inputs: &[String],
    include_historical: bool,
    export: Option<&ExportTarget>,
) -> anyhow::Result<()> {
    let client = crate::build_client(config)?;
    let options = BatchOptions {
        filter: if include_historical {
            RecordFilter::IncludeHistorical
        } else {
            RecordFilter::ActiveOnly
        },
        max_concurrent_taxpayers: config.max_concurrent_taxpayers,
    };

    let batch = run_taxpayer_batch(&client, inputs, &options).await;
    render::print_taxpayer_batch(&batch, config.map_links);

    if let Some(target) = export {
        let name = document_name(batch.properties.keys().map(ToString::to_string));
        write_features(target, &batch_features(&batch), &name)?;
    }
    Ok(())
}

/// `RENSPA - <id>, <id>, …` for KML document titles.
pub(crate) fn document_name<I: Iterator<Item = String>>(ids: I) -> String {
    let ids: Vec<String> = ids.collect();
    if ids.is_empty() {
        "RENSPA".to_owned()
    } else {
        format!("RENSPA - {}", ids.join(", "))
    }
}
