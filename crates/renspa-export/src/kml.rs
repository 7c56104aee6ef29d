//! KML document writer.
//!
//! One `Placemark` per feature, each with a single outer ring written as
//! `lon,lat,0` triples. Features found under a CUIT share a style: line
//! colours cycle through [`LINE_COLORS`] in first-appearance order and the
//! fill is the same colour at half opacity.

use std::collections::HashMap;
use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use renspa_core::TaxpayerId;

use crate::error::ExportError;
use crate::feature::ExportFeature;

const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";

/// KML `aabbggrr` line colours assigned to taxpayers in order.
pub const LINE_COLORS: [&str; 6] = [
    "ff0000ff", "ffff0000", "ff00ff00", "ffffff00", "ffff00ff", "ff00ffff",
];

/// Style used for features with no known CUIT.
const DEFAULT_STYLE_ID: &str = "style_default";

/// A line/fill pair for one taxpayer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxpayerStyle {
    pub id: String,
    pub line_color: String,
    pub fill_color: String,
}

impl TaxpayerStyle {
    fn new(id: String, line_color: &str) -> Self {
        Self {
            id,
            line_color: line_color.to_owned(),
            fill_color: format!("7f{}", &line_color[2..]),
        }
    }
}

/// `style_` + the CUIT with hyphens replaced, e.g. `style_30_65425756_2`.
#[must_use]
pub fn style_id(taxpayer: &TaxpayerId) -> String {
    format!("style_{}", taxpayer.as_str().replace('-', "_"))
}

/// Assigns a style to every distinct CUIT in `features`, in first-appearance order.
#[must_use]
pub fn taxpayer_styles(features: &[ExportFeature<'_>]) -> Vec<(Option<TaxpayerId>, TaxpayerStyle)> {
    let mut styles: Vec<(Option<TaxpayerId>, TaxpayerStyle)> = Vec::new();
    for feature in features {
        let key = feature.taxpayer.cloned();
        if styles.iter().any(|(k, _)| *k == key) {
            continue;
        }
        let color = LINE_COLORS[styles.len() % LINE_COLORS.len()];
        let id = key.as_ref().map_or_else(|| DEFAULT_STYLE_ID.to_owned(), style_id);
        styles.push((key, TaxpayerStyle::new(id, color)));
    }
    styles
}

/// Placemark description line.
#[must_use]
pub fn describe(feature: &ExportFeature<'_>) -> String {
    let cuit = feature.taxpayer.map_or("-", TaxpayerId::as_str);
    format!(
        "CUIT: {cuit} - Localidad: {} - Superficie: {:.1} ha",
        feature.record.locality, feature.record.area_hectares
    )
}

/// Space-separated `lon,lat,0` triples for one ring.
fn coordinates(feature: &ExportFeature<'_>) -> String {
    feature
        .polygon
        .vertices()
        .iter()
        .map(|v| format!("{},{},0", v.lon, v.lat))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Renders `features` as a KML document named `document_name`.
///
/// # Errors
///
/// Returns [`ExportError`] if the XML writer fails.
pub fn to_kml(features: &[ExportFeature<'_>], document_name: &str) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    write_kml(&mut buf, features, document_name)?;
    Ok(buf)
}

/// Streams a KML document into `out`.
///
/// # Errors
///
/// Returns [`ExportError`] if writing to `out` fails.
pub fn write_kml<W: Write>(
    out: W,
    features: &[ExportFeature<'_>],
    document_name: &str,
) -> Result<(), ExportError> {
    let mut writer = Writer::new_with_indent(out, b' ', 2);
    let styles = taxpayer_styles(features);
    let style_lookup: HashMap<Option<&TaxpayerId>, &str> = styles
        .iter()
        .map(|(k, s)| (k.as_ref(), s.id.as_str()))
        .collect();

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new("kml").with_attributes([("xmlns", KML_NAMESPACE)]),
    ))?;
    writer.write_event(Event::Start(BytesStart::new("Document")))?;
    text_element(&mut writer, "name", document_name)?;

    for (_, style) in &styles {
        write_style(&mut writer, style)?;
    }

    for feature in features {
        let style = style_lookup
            .get(&feature.taxpayer)
            .copied()
            .unwrap_or(DEFAULT_STYLE_ID);
        write_placemark(&mut writer, feature, style)?;
    }

    writer.write_event(Event::End(BytesEnd::new("Document")))?;
    writer.write_event(Event::End(BytesEnd::new("kml")))?;
    tracing::debug!(placemarks = features.len(), styles = styles.len(), "KML written");
    Ok(())
}

fn write_style<W: Write>(writer: &mut Writer<W>, style: &TaxpayerStyle) -> Result<(), ExportError> {
    writer.write_event(Event::Start(
        BytesStart::new("Style").with_attributes([("id", style.id.as_str())]),
    ))?;
    writer.write_event(Event::Start(BytesStart::new("LineStyle")))?;
    text_element(writer, "color", &style.line_color)?;
    text_element(writer, "width", "2")?;
    writer.write_event(Event::End(BytesEnd::new("LineStyle")))?;
    writer.write_event(Event::Start(BytesStart::new("PolyStyle")))?;
    text_element(writer, "color", &style.fill_color)?;
    writer.write_event(Event::End(BytesEnd::new("PolyStyle")))?;
    writer.write_event(Event::End(BytesEnd::new("Style")))?;
    Ok(())
}

fn write_placemark<W: Write>(
    writer: &mut Writer<W>,
    feature: &ExportFeature<'_>,
    style_id: &str,
) -> Result<(), ExportError> {
    writer.write_event(Event::Start(BytesStart::new("Placemark")))?;
    text_element(writer, "name", &feature.record.owner_name)?;
    text_element(writer, "description", &describe(feature))?;
    text_element(writer, "styleUrl", &format!("#{style_id}"))?;

    writer.write_event(Event::Start(BytesStart::new("ExtendedData")))?;
    data_element(writer, "renspa", feature.record.property_id.as_str())?;
    data_element(writer, "estado", if feature.is_active() { "activo" } else { "historico" })?;
    writer.write_event(Event::End(BytesEnd::new("ExtendedData")))?;

    writer.write_event(Event::Start(BytesStart::new("Polygon")))?;
    writer.write_event(Event::Start(BytesStart::new("outerBoundaryIs")))?;
    writer.write_event(Event::Start(BytesStart::new("LinearRing")))?;
    text_element(writer, "coordinates", &coordinates(feature))?;
    writer.write_event(Event::End(BytesEnd::new("LinearRing")))?;
    writer.write_event(Event::End(BytesEnd::new("outerBoundaryIs")))?;
    writer.write_event(Event::End(BytesEnd::new("Polygon")))?;

    writer.write_event(Event::End(BytesEnd::new("Placemark")))?;
    Ok(())
}

fn data_element<W: Write>(writer: &mut Writer<W>, name: &str, value: &str) -> Result<(), ExportError> {
    writer.write_event(Event::Start(
        BytesStart::new("Data").with_attributes([("name", name)]),
    ))?;
    text_element(writer, "value", value)?;
    writer.write_event(Event::End(BytesEnd::new("Data")))?;
    Ok(())
}

fn text_element<W: Write>(writer: &mut Writer<W>, tag: &str, text: &str) -> Result<(), ExportError> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}
