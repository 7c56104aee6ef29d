//! Terminal presentation of batch and lookup results.
//!
//! Map links are a presentation capability: callers pass `map_links` from the
//! configuration and nothing below the CLI branches on it.

use chrono::NaiveDate;
use renspa_core::{Centroid, PropertyRecord, TimelinePoint};
use renspa_registry::{BatchStats, LookupBatch, QueryBatch};

/// Format an optional date for display, returning `"—"` when `None`.
pub(crate) fn fmt_date(date: Option<NaiveDate>) -> String {
    date.map_or_else(
        || "\u{2014}".to_string(),
        |d| d.format("%Y-%m-%d").to_string(),
    )
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    } else {
        text.to_owned()
    }
}

fn status(record: &PropertyRecord) -> &'static str {
    if record.is_active() {
        "active"
    } else {
        "historical"
    }
}

fn print_header() {
    println!(
        "{:<20}{:<12}{:>10}  {:<12}{:<20}OWNER",
        "RENSPA", "STATUS", "HECTARES", "REGISTERED", "LOCALITY"
    );
}

fn print_row(record: &PropertyRecord, centroid: Option<Centroid>, map_links: bool) {
    let geometry_note = if centroid.is_none() { " (no geometry)" } else { "" };
    println!(
        "{:<20}{:<12}{:>10.1}  {:<12}{:<20}{}{}",
        record.property_id.as_str(),
        status(record),
        record.area_hectares,
        fmt_date(record.registered_on),
        truncate(&record.locality, 18),
        truncate(&record.owner_name, 40),
        geometry_note
    );
    if map_links {
        if let Some(centroid) = centroid {
            println!("    map: {}", centroid.maps_url());
        }
    }
}

pub(crate) fn print_taxpayer_batch(batch: &QueryBatch, map_links: bool) {
    for (taxpayer, properties) in &batch.properties {
        let mapped = properties.iter().filter(|p| p.polygon.is_some()).count();
        println!(
            "CUIT {taxpayer}: {} properties, {mapped} with geometry",
            properties.len()
        );
        if !properties.is_empty() {
            print_header();
            for property in properties {
                print_row(&property.record, property.centroid(), map_links);
            }
        }
        println!();
    }

    if !batch.failures.is_empty() {
        println!("Not resolved:");
        for failure in &batch.failures {
            println!("  {failure}");
        }
        println!();
    }

    print_stats(&batch.stats);
}

fn print_stats(stats: &BatchStats) {
    println!(
        "Taxpayers: {} requested, {} with properties, {} invalid, {} without records, {} duplicate",
        stats.taxpayers_requested,
        stats.taxpayers_succeeded,
        stats.taxpayers_invalid,
        stats.taxpayers_empty,
        stats.taxpayers_duplicate
    );
    println!(
        "Properties: {} found ({} listed), {} with geometry, {} without, {} detail lookups",
        stats.properties_found,
        stats.records_listed,
        stats.properties_with_geometry,
        stats.properties_without_geometry,
        stats.detail_lookups
    );
    println!(
        "Area: {:.1} ha total, {:.1} ha active",
        stats.total_area_hectares, stats.active_area_hectares
    );
}

pub(crate) fn print_lookup(batch: &LookupBatch, map_links: bool) {
    if !batch.resolved.is_empty() {
        print_header();
        for property in &batch.resolved {
            print_row(&property.record, property.centroid(), map_links);
        }
        println!();
    }

    if !batch.failures.is_empty() {
        println!("Not resolved:");
        for failure in &batch.failures {
            println!("  {failure}");
        }
        println!();
    }

    let stats = &batch.stats;
    println!(
        "RENSPA: {} requested, {} found, {} with geometry, {} not found, {} invalid, {} duplicate",
        stats.requested,
        stats.found,
        stats.with_geometry,
        stats.not_found,
        stats.invalid,
        stats.duplicate
    );
}

pub(crate) fn print_timeline(points: &[TimelinePoint]) {
    if points.is_empty() {
        println!("no dated registrations to build a timeline from");
        return;
    }
    println!("{:<12}{:>8}{:>14}", "DATE", "ACTIVE", "HECTARES");
    for point in points {
        println!(
            "{:<12}{:>8}{:>14.1}",
            fmt_date(Some(point.date)),
            point.active_properties,
            point.active_hectares
        );
    }
}
