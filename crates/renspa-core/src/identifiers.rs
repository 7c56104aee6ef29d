//! Taxpayer (CUIT) and property (RENSPA) identifiers.
//!
//! Both types can only be built through normalization, so holding one means
//! the text is already in canonical form:
//!
//! - CUIT: `NN-NNNNNNNN-N`
//! - RENSPA: `NN.NNN.N.NNNNN/NN`

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

const TAXPAYER_DIGITS: usize = 11;
const PROPERTY_DIGITS: usize = 13;

static CANONICAL_PROPERTY_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{2}\.\d{3}\.\d\.\d{5}/\d{2}$").expect("valid regex")
});

/// Structural validation failure for a user- or registry-supplied identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("invalid CUIT \"{raw}\": expected 11 digits, found {digits}")]
    InvalidTaxpayerId { raw: String, digits: usize },

    #[error("invalid RENSPA \"{raw}\": expected NN.NNN.N.NNNNN/NN or 13 digits")]
    InvalidPropertyId { raw: String },
}

impl IdentifierError {
    /// The raw input that failed validation.
    #[must_use]
    pub fn raw(&self) -> &str {
        match self {
            Self::InvalidTaxpayerId { raw, .. } | Self::InvalidPropertyId { raw } => raw,
        }
    }
}

/// An 11-digit Argentine taxpayer id in `NN-NNNNNNNN-N` form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaxpayerId(String);

impl TaxpayerId {
    /// Parses and canonicalizes a CUIT. See [`normalize_taxpayer_id`].
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::InvalidTaxpayerId`] unless the input is
    /// exactly 11 ASCII digits once hyphens are removed.
    pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
        normalize_taxpayer_id(raw)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The 11 digits without separators, e.g. for file names.
    #[must_use]
    pub fn digits(&self) -> String {
        self.0.replace('-', "")
    }
}

/// A 13-digit RENSPA property number in `NN.NNN.N.NNNNN/NN` form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyId(String);

impl PropertyId {
    /// Parses and canonicalizes a RENSPA. See [`normalize_property_id`].
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::InvalidPropertyId`] unless the input is
    /// canonical already or exactly 13 digits.
    pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
        normalize_property_id(raw)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Strips hyphens from `raw` and re-inserts them after digits 2 and 10.
///
/// Surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns [`IdentifierError::InvalidTaxpayerId`] if the stripped value is not
/// exactly 11 ASCII digits.
pub fn normalize_taxpayer_id(raw: &str) -> Result<TaxpayerId, IdentifierError> {
    let stripped: String = raw.trim().chars().filter(|c| *c != '-').collect();
    let digits = stripped.chars().filter(char::is_ascii_digit).count();

    if digits != TAXPAYER_DIGITS || stripped.len() != TAXPAYER_DIGITS {
        return Err(IdentifierError::InvalidTaxpayerId {
            raw: raw.to_owned(),
            digits,
        });
    }

    Ok(TaxpayerId(format!(
        "{}-{}-{}",
        &stripped[..2],
        &stripped[2..10],
        &stripped[10..]
    )))
}

/// Returns canonical RENSPA text for `raw`.
///
/// Already-canonical input is returned unchanged; a bare 13-digit string gets
/// separators inserted after digits 2, 5, 6 and 11.
///
/// # Errors
///
/// Returns [`IdentifierError::InvalidPropertyId`] for anything else.
pub fn normalize_property_id(raw: &str) -> Result<PropertyId, IdentifierError> {
    let trimmed = raw.trim();

    if CANONICAL_PROPERTY_ID.is_match(trimmed) {
        return Ok(PropertyId(trimmed.to_owned()));
    }

    if trimmed.len() == PROPERTY_DIGITS && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(PropertyId(format!(
            "{}.{}.{}.{}/{}",
            &trimmed[..2],
            &trimmed[2..5],
            &trimmed[5..6],
            &trimmed[6..11],
            &trimmed[11..]
        )));
    }

    Err(IdentifierError::InvalidPropertyId {
        raw: raw.to_owned(),
    })
}

impl fmt::Display for TaxpayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TaxpayerId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize_taxpayer_id(s)
    }
}

impl FromStr for PropertyId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize_property_id(s)
    }
}

impl Serialize for TaxpayerId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TaxpayerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        normalize_taxpayer_id(&raw).map_err(serde::de::Error::custom)
    }
}

impl Serialize for PropertyId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PropertyId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        normalize_property_id(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "identifiers_test.rs"]
mod tests;
