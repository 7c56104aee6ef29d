//! Identifier input from positional arguments and `--file`.

use std::path::Path;

use anyhow::Context;

/// Merges positional ids with the lines of `file`, in that order.
///
/// Blank lines and `#` comments in the file are ignored. Ids are passed on
/// unvalidated; the batch runners report invalid ones.
///
/// # Errors
///
/// Returns an error if the file cannot be read or no ids were given at all.
pub(crate) fn collect_inputs(mut ids: Vec<String>, file: Option<&Path>) -> anyhow::Result<Vec<String>> {
    if let Some(path) = file {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading identifiers from {}", path.display()))?;
        ids.extend(parse_lines(&contents));
    }
    ids.retain(|id| !id.trim().is_empty());
    if ids.is_empty() {
        anyhow::bail!("no identifiers given; pass them as arguments or with --file");
    }
    Ok(ids)
}

fn parse_lines(contents: &str) -> impl Iterator<Item = String> + '_ {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_owned)
}
