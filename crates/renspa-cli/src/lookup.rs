//! `renspa renspa`: direct RENSPA-number lookup.

use renspa_core::AppConfig;
use renspa_registry::run_property_lookup;

use crate::export::{lookup_features, write_features, ExportTarget};
use crate::query::document_name;
use crate::render;

/// Resolves each RENSPA number, prints the results and writes the export.
///
/// # Errors
///
/// Returns an error if the client cannot be built or the export fails.
pub(crate) async fn run_renspa(
    config: &AppConfig,
    inputs: &[String],
    export: Option<&ExportTarget>,
) -> anyhow::Result<()> {
    let client = crate::build_client(config)?;
    let batch = run_property_lookup(&client, inputs).await;
    render::print_lookup(&batch, config.map_links);

    if let Some(target) = export {
        let name = document_name(
            batch
                .resolved
                .iter()
                .map(|p| p.record.property_id.to_string()),
        );
        write_features(target, &lookup_features(&batch), &name)?;
    }
    Ok(())
}
