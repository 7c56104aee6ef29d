//! RENSPA API response types.
//!
//! ## Observed shape
//!
//! Both endpoints answer `{ "items": [...], "hasMore": bool }`. The listing
//! endpoint pages by `offset` in steps of ten; the detail endpoint returns at
//! most one item.
//!
//! Items are kept as raw JSON on the envelope and decoded one at a time, so a
//! single malformed entry does not discard the rest of the page.
//!
//! ### `superficie`
//! Usually a JSON number of hectares. Some entries carry it as a string,
//! occasionally with a decimal comma (`"12,5"`); both are accepted.
//!
//! ### `fecha_alta` / `fecha_baja`
//! Strings that start with `YYYY-MM-DD`, sometimes followed by a time part.
//! `fecha_baja` is `null` for active registrations.
//!
//! ### `poligono`
//! Free text containing `(lat,lon)` tuples; absent, `null` or empty when the
//! property was never digitized.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Envelope shared by `consultaPorCuit` and `consultaPorNumero`.
#[derive(Debug, Deserialize)]
pub struct ListingPage {
    #[serde(default)]
    pub items: Option<Vec<Value>>,
    #[serde(rename = "hasMore", default)]
    pub has_more: Option<bool>,
}

impl ListingPage {
    /// Decodes each raw item, skipping (and logging) entries that do not fit
    /// [`RegistryItem`].
    #[must_use]
    pub fn decode_items(self, context: &str) -> Vec<RegistryItem> {
        self.items
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .filter_map(|(idx, value)| match serde_json::from_value::<RegistryItem>(value) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!(context, index = idx, error = %e, "skipping undecodable registry item");
                    None
                }
            })
            .collect()
    }

    /// Number of raw items on the page, decodable or not.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.as_ref().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.has_more.unwrap_or(false)
    }
}

/// A property entry from either endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistryItem {
    #[serde(default, deserialize_with = "lenient_string")]
    pub renspa: Option<String>,
    #[serde(default)]
    pub titular: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub cuit: Option<String>,
    #[serde(default)]
    pub localidad: Option<String>,
    #[serde(default)]
    pub provincia: Option<String>,
    /// Declared surface in hectares.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub superficie: Option<f64>,
    #[serde(default)]
    pub poligono: Option<String>,
    #[serde(default)]
    pub fecha_alta: Option<String>,
    #[serde(default)]
    pub fecha_baja: Option<String>,
}

/// Accepts a string or a number, rendering numbers as their JSON text.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Accepts a number, a numeric string (dot or comma decimal), or null.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => parse_decimal(&s),
        _ => None,
    })
}

/// With a comma present, dots are thousands separators: `1.234,5` is 1234.5.
fn parse_decimal(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.contains(',') {
        raw.replace('.', "").replace(',', ".").parse().ok()
    } else {
        raw.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_listing_envelope() {
        let page: ListingPage = serde_json::from_value(json!({
            "items": [{ "renspa": "01.023.0.12345/01", "superficie": 12.5 }],
            "hasMore": true
        }))
        .unwrap();
        assert!(page.has_more());
        let items = page.decode_items("test");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].superficie, Some(12.5));
    }

    #[test]
    fn missing_fields_default_to_none() {
        let page: ListingPage = serde_json::from_value(json!({})).unwrap();
        assert!(!page.has_more());
        assert!(page.decode_items("test").is_empty());

        let page: ListingPage = serde_json::from_value(json!({ "items": null })).unwrap();
        assert!(page.decode_items("test").is_empty());
    }

    #[test]
    fn superficie_accepts_strings_with_decimal_comma() {
        let item: RegistryItem =
            serde_json::from_value(json!({ "superficie": "12,5" })).unwrap();
        assert_eq!(item.superficie, Some(12.5));

        let item: RegistryItem = serde_json::from_value(json!({ "superficie": "n/a" })).unwrap();
        assert_eq!(item.superficie, None);

        let item: RegistryItem = serde_json::from_value(json!({ "superficie": null })).unwrap();
        assert_eq!(item.superficie, None);
    }

    #[test]
    fn superficie_strips_thousands_separators() {
        let item: RegistryItem =
            serde_json::from_value(json!({ "superficie": "1.234,5" })).unwrap();
        assert_eq!(item.superficie, Some(1234.5));

        assert_eq!(parse_decimal("12.5"), Some(12.5));
        assert_eq!(parse_decimal(" 12,5 "), Some(12.5));
        assert_eq!(parse_decimal("1.234.567,25"), Some(1_234_567.25));
    }

    #[test]
    fn numeric_cuit_is_kept_as_text() {
        let item: RegistryItem = serde_json::from_value(json!({ "cuit": 30654257562_u64 })).unwrap();
        assert_eq!(item.cuit.as_deref(), Some("30654257562"));
    }

    #[test]
    fn undecodable_item_is_skipped_not_fatal() {
        let page: ListingPage = serde_json::from_value(json!({
            "items": [
                { "renspa": "01.023.0.12345/01" },
                { "titular": ["not", "a", "string"] },
                "garbage"
            ]
        }))
        .unwrap();
        let items = page.decode_items("test");
        assert_eq!(items.len(), 1);
    }
}
