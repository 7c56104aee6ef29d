//! Reconstruction of active hectares over time from registration dates.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::property::PropertyRecord;

/// Registry state on `date`, after that day's registrations and removals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelinePoint {
    pub date: NaiveDate,
    pub active_properties: usize,
    pub active_hectares: f64,
}

#[derive(Default)]
struct DayDelta {
    added: usize,
    removed: usize,
    hectares: f64,
}

/// Builds a step series with one point per date on which something changed.
///
/// Each record adds its area on `registered_on` and removes it on
/// `deregistered_on`. Records with no registration date are skipped; a
/// deregistration earlier than its registration is ignored.
#[must_use]
pub fn activity_timeline<'a, I>(records: I) -> Vec<TimelinePoint>
where
    I: IntoIterator<Item = &'a PropertyRecord>,
{
    let mut days: BTreeMap<NaiveDate, DayDelta> = BTreeMap::new();

    for record in records {
        let Some(start) = record.registered_on else {
            tracing::debug!(renspa = %record.property_id, "no registration date; left out of timeline");
            continue;
        };
        let entry = days.entry(start).or_default();
        entry.added += 1;
        entry.hectares += record.area_hectares;

        if let Some(end) = record.deregistered_on.filter(|end| *end >= start) {
            let entry = days.entry(end).or_default();
            entry.removed += 1;
            entry.hectares -= record.area_hectares;
        }
    }

    let mut active_properties = 0usize;
    let mut active_hectares = 0.0_f64;
    days.into_iter()
        .map(|(date, delta)| {
            active_properties = (active_properties + delta.added).saturating_sub(delta.removed);
            // Clamp float drift so a fully deregistered portfolio reads as zero.
            active_hectares = (active_hectares + delta.hectares).max(0.0);
            if active_properties == 0 {
                active_hectares = 0.0;
            }
            TimelinePoint {
                date,
                active_properties,
                active_hectares,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifiers::PropertyId;

    fn record(
        area: f64,
        from: Option<(i32, u32, u32)>,
        to: Option<(i32, u32, u32)>,
    ) -> PropertyRecord {
        let date = |(y, m, d): (i32, u32, u32)| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        PropertyRecord {
            property_id: PropertyId::parse("0102301234501").unwrap(),
            owner_name: String::new(),
            locality: String::new(),
            province: String::new(),
            area_hectares: area,
            raw_geometry: None,
            registered_on: from.map(date),
            deregistered_on: to.map(date),
            deregistered: to.is_some(),
            reported_taxpayer: None,
        }
    }

    #[test]
    fn empty_input_gives_empty_series() {
        assert!(activity_timeline(&Vec::<PropertyRecord>::new()).is_empty());
    }

    #[test]
    fn accumulates_and_releases_area() {
        let records = vec![
            record(100.0, Some((2010, 1, 1)), Some((2020, 1, 1))),
            record(50.0, Some((2015, 6, 1)), None),
        ];
        let series = activity_timeline(&records);
        assert_eq!(series.len(), 3);

        assert_eq!(series[0].active_properties, 1);
        assert!((series[0].active_hectares - 100.0).abs() < 1e-9);

        assert_eq!(series[1].active_properties, 2);
        assert!((series[1].active_hectares - 150.0).abs() < 1e-9);

        assert_eq!(series[2].date, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(series[2].active_properties, 1);
        assert!((series[2].active_hectares - 50.0).abs() < 1e-9);
    }

    #[test]
    fn same_day_changes_share_one_point() {
        let records = vec![
            record(10.0, Some((2018, 3, 1)), Some((2019, 3, 1))),
            record(20.0, Some((2019, 3, 1)), None),
        ];
        let series = activity_timeline(&records);
        assert_eq!(series.len(), 2);
        assert_eq!(series[1].active_properties, 1);
        assert!((series[1].active_hectares - 20.0).abs() < 1e-9);
    }

    #[test]
    fn skips_records_without_registration_date() {
        let records = vec![record(10.0, None, Some((2019, 3, 1)))];
        assert!(activity_timeline(&records).is_empty());
    }

    #[test]
    fn ignores_deregistration_before_registration() {
        let records = vec![record(10.0, Some((2019, 3, 1)), Some((2018, 1, 1)))];
        let series = activity_timeline(&records);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].active_properties, 1);
    }

    #[test]
    fn fully_deregistered_portfolio_ends_at_zero() {
        let records = vec![
            record(0.1, Some((2000, 1, 1)), Some((2001, 1, 1))),
            record(0.2, Some((2000, 1, 1)), Some((2001, 1, 1))),
        ];
        let series = activity_timeline(&records);
        let last = series.last().unwrap();
        assert_eq!(last.active_properties, 0);
        assert!(last.active_hectares.abs() < f64::EPSILON);
    }
}
