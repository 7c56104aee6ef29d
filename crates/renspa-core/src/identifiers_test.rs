use regex::Regex;

use super::*;

fn cuit_shape() -> Regex {
    Regex::new(r"^\d{2}-\d{8}-\d$").unwrap()
}

fn renspa_shape() -> Regex {
    Regex::new(r"^\d{2}\.\d{3}\.\d\.\d{5}/\d{2}$").unwrap()
}

// ---------------------------------------------------------------------------
// CUIT
// ---------------------------------------------------------------------------

#[test]
fn taxpayer_id_from_bare_digits() {
    let id = normalize_taxpayer_id("30654257562").unwrap();
    assert_eq!(id.as_str(), "30-65425756-2");
}

#[test]
fn taxpayer_id_already_canonical_is_unchanged() {
    let id = normalize_taxpayer_id("30-65425756-2").unwrap();
    assert_eq!(id.as_str(), "30-65425756-2");
}

#[test]
fn taxpayer_id_with_misplaced_hyphens_is_reformatted() {
    let id = normalize_taxpayer_id("3065-4257-562").unwrap();
    assert_eq!(id.as_str(), "30-65425756-2");
}

#[test]
fn taxpayer_id_ignores_surrounding_whitespace() {
    let id = normalize_taxpayer_id("  20123456783 \n").unwrap();
    assert_eq!(id.as_str(), "20-12345678-3");
}

#[test]
fn taxpayer_id_output_always_matches_canonical_shape() {
    let re = cuit_shape();
    for raw in ["00000000000", "99999999999", "20-12345678-3", "2-0-1-2-3-4-5-6-7-8-3"] {
        let id = normalize_taxpayer_id(raw).unwrap();
        assert!(re.is_match(id.as_str()), "{raw} -> {id}");
    }
}

#[test]
fn taxpayer_id_rejects_wrong_digit_counts() {
    for raw in ["", "3065425756", "306542575620", "30-6542575-2", "bad-id"] {
        let err = normalize_taxpayer_id(raw).unwrap_err();
        assert!(
            matches!(err, IdentifierError::InvalidTaxpayerId { .. }),
            "expected InvalidTaxpayerId for {raw:?}, got {err:?}"
        );
    }
}

#[test]
fn taxpayer_id_rejects_non_digits_of_right_length() {
    let err = normalize_taxpayer_id("3065425756a").unwrap_err();
    assert!(matches!(
        err,
        IdentifierError::InvalidTaxpayerId { digits: 10, .. }
    ));
}

#[test]
fn taxpayer_id_error_keeps_raw_input() {
    let err = normalize_taxpayer_id("bad-id").unwrap_err();
    assert_eq!(err.raw(), "bad-id");
}

#[test]
fn taxpayer_id_digits_strips_separators() {
    let id = TaxpayerId::parse("30-65425756-2").unwrap();
    assert_eq!(id.digits(), "30654257562");
}

// ---------------------------------------------------------------------------
// RENSPA
// ---------------------------------------------------------------------------

#[test]
fn property_id_from_bare_digits() {
    let id = normalize_property_id("0102301234501").unwrap();
    assert_eq!(id.as_str(), "01.023.0.12345/01");
}

#[test]
fn property_id_canonical_is_idempotent() {
    let once = normalize_property_id("01.023.0.12345/01").unwrap();
    let twice = normalize_property_id(once.as_str()).unwrap();
    assert_eq!(once, twice);
    assert_eq!(twice.as_str(), "01.023.0.12345/01");
}

#[test]
fn property_id_output_matches_canonical_shape() {
    let re = renspa_shape();
    for raw in ["0000000000000", "9999999999999", " 1234567890123 "] {
        let id = normalize_property_id(raw).unwrap();
        assert!(re.is_match(id.as_str()), "{raw:?} -> {id}");
    }
}

#[test]
fn property_id_rejects_malformed_input() {
    for raw in [
        "",
        "010230123450",
        "01023012345012",
        "01.023.0.12345-01",
        "01.023.0.1234/501",
        "abcdefghijklm",
    ] {
        assert!(
            matches!(
                normalize_property_id(raw),
                Err(IdentifierError::InvalidPropertyId { .. })
            ),
            "expected InvalidPropertyId for {raw:?}"
        );
    }
}

#[test]
fn identifiers_parse_via_from_str() {
    let cuit: TaxpayerId = "20123456783".parse().unwrap();
    let renspa: PropertyId = "0102301234501".parse().unwrap();
    assert_eq!(cuit.to_string(), "20-12345678-3");
    assert_eq!(renspa.to_string(), "01.023.0.12345/01");
}

#[test]
fn identifiers_serialize_as_canonical_strings() {
    let cuit = TaxpayerId::parse("20123456783").unwrap();
    assert_eq!(serde_json::to_string(&cuit).unwrap(), "\"20-12345678-3\"");

    let back: TaxpayerId = serde_json::from_str("\"20123456783\"").unwrap();
    assert_eq!(back, cuit);

    assert!(serde_json::from_str::<PropertyId>("\"nope\"").is_err());
}
