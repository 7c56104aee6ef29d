//! Normalization of RENSPA API items into [`PropertyRecord`]s.

use chrono::NaiveDate;
use renspa_core::{normalize_property_id, PropertyRecord, TaxpayerId};

use crate::types::RegistryItem;

/// Parses a date that starts with `YYYY-MM-DD`, ignoring any time suffix.
///
/// Returns `None` for missing, short or malformed input.
#[must_use]
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let prefix = s.get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

fn clean_text(value: Option<&String>) -> String {
    value.map(|s| s.trim().to_owned()).unwrap_or_default()
}

/// Converts a decoded API item into a [`PropertyRecord`].
///
/// Returns `None` when the item has no usable RENSPA number, since nothing
/// downstream can key on it. A missing, negative or non-finite area becomes
/// `0.0`.
#[must_use]
pub fn normalize_item(item: &RegistryItem) -> Option<PropertyRecord> {
    let raw_id = item.renspa.as_deref()?;
    let property_id = match normalize_property_id(raw_id) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(error = %e, "dropping registry item with malformed RENSPA");
            return None;
        }
    };

    let area_hectares = match item.superficie {
        Some(area) if area.is_finite() && area >= 0.0 => area,
        Some(area) => {
            tracing::warn!(renspa = %property_id, area, "invalid surface reported; using 0");
            0.0
        }
        None => 0.0,
    };

    let raw_geometry = item
        .poligono
        .as_deref()
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_owned);

    let (deregistered, deregistered_on) = match item.fecha_baja.as_deref().map(str::trim) {
        None | Some("") => (false, None),
        Some(raw) => {
            let parsed = parse_date(raw);
            if parsed.is_none() {
                tracing::warn!(renspa = %property_id, fecha_baja = raw, "unparseable deregistration date; treating as historical");
            }
            (true, parsed)
        }
    };

    Some(PropertyRecord {
        owner_name: clean_text(item.titular.as_ref()),
        locality: clean_text(item.localidad.as_ref()),
        province: clean_text(item.provincia.as_ref()),
        area_hectares,
        raw_geometry,
        registered_on: item.fecha_alta.as_deref().and_then(parse_date),
        deregistered_on,
        deregistered,
        reported_taxpayer: item
            .cuit
            .as_deref()
            .and_then(|c| TaxpayerId::parse(c).ok()),
        property_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> RegistryItem {
        RegistryItem {
            renspa: Some("01.023.0.12345/01".to_owned()),
            titular: Some("  LA ESTANCIA SA ".to_owned()),
            cuit: Some("30654257562".to_owned()),
            localidad: Some("Pergamino".to_owned()),
            provincia: Some("Buenos Aires".to_owned()),
            superficie: Some(250.0),
            poligono: Some("(-34.1,-58.1)(-34.2,-58.1)(-34.2,-58.2)".to_owned()),
            fecha_alta: Some("2011-04-05T00:00:00Z".to_owned()),
            fecha_baja: None,
        }
    }

    #[test]
    fn parse_date_accepts_prefixed_timestamps() {
        assert_eq!(parse_date("2020-01-01"), NaiveDate::from_ymd_opt(2020, 1, 1));
        assert_eq!(
            parse_date("2020-01-01T12:30:00"),
            NaiveDate::from_ymd_opt(2020, 1, 1)
        );
        assert_eq!(parse_date("2020-1-1"), None);
        assert_eq!(parse_date("01/01/2020"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn normalizes_full_item() {
        let record = normalize_item(&item()).unwrap();
        assert_eq!(record.property_id.as_str(), "01.023.0.12345/01");
        assert_eq!(record.owner_name, "LA ESTANCIA SA");
        assert_eq!(record.registered_on, NaiveDate::from_ymd_opt(2011, 4, 5));
        assert!(record.is_active());
        assert_eq!(
            record.reported_taxpayer.as_ref().map(TaxpayerId::as_str),
            Some("30-65425756-2")
        );
        assert!(record.polygon().is_some());
    }

    #[test]
    fn bare_digit_renspa_is_canonicalized() {
        let mut raw = item();
        raw.renspa = Some("0102301234501".to_owned());
        let record = normalize_item(&raw).unwrap();
        assert_eq!(record.property_id.as_str(), "01.023.0.12345/01");
    }

    #[test]
    fn item_without_valid_renspa_is_dropped() {
        let mut raw = item();
        raw.renspa = None;
        assert!(normalize_item(&raw).is_none());
        raw.renspa = Some("123".to_owned());
        assert!(normalize_item(&raw).is_none());
    }

    #[test]
    fn negative_or_missing_area_becomes_zero() {
        let mut raw = item();
        raw.superficie = Some(-3.0);
        assert!(normalize_item(&raw).unwrap().area_hectares.abs() < f64::EPSILON);
        raw.superficie = None;
        assert!(normalize_item(&raw).unwrap().area_hectares.abs() < f64::EPSILON);
    }

    #[test]
    fn deregistration_date_marks_record_historical() {
        let mut raw = item();
        raw.fecha_baja = Some("2020-01-01".to_owned());
        let record = normalize_item(&raw).unwrap();
        assert!(!record.is_active());
        assert_eq!(record.deregistered_on, NaiveDate::from_ymd_opt(2020, 1, 1));
    }

    #[test]
    fn unreadable_deregistration_date_still_marks_record_historical() {
        let mut raw = item();
        raw.fecha_baja = Some("31/12/2019".to_owned());
        let record = normalize_item(&raw).unwrap();
        assert!(!record.is_active());
        assert!(record.deregistered);
        assert_eq!(record.deregistered_on, None);
    }

    #[test]
    fn blank_geometry_and_dates_are_absent() {
        let mut raw = item();
        raw.poligono = Some("   ".to_owned());
        raw.fecha_baja = Some(String::new());
        let record = normalize_item(&raw).unwrap();
        assert!(record.raw_geometry.is_none());
        assert!(record.is_active());
    }
}
