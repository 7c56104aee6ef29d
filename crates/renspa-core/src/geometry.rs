//! Polygon extraction from the registry's `poligono` text.
//!
//! The registry writes rings as a run of parenthesized `(lat,lon)` tuples,
//! usually wrapped in other text. [`extract_polygon`] scans for the tuples,
//! transposes them to `(lon, lat)` and closes the ring.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Minimum number of parsed vertices, before closure, for a usable ring.
pub const MIN_RING_VERTICES: usize = 3;

static COORD_TUPLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(\s*([-+\d.]+)\s*,\s*([-+\d.]+)\s*\)").expect("valid regex")
});

/// One ring vertex in GeoJSON axis order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Vertex {
    pub lon: f64,
    pub lat: f64,
}

impl Vertex {
    #[must_use]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// Naive point-mean centre of a ring, used for map centering and links.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Centroid {
    pub lat: f64,
    pub lon: f64,
}

impl Centroid {
    /// Google Maps link centred on this point at zoom 15.
    #[must_use]
    pub fn maps_url(&self) -> String {
        format!("https://www.google.com/maps/@{},{},15z", self.lat, self.lon)
    }
}

/// A closed ring: at least four vertices, first equal to last.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polygon {
    vertices: Vec<Vertex>,
}

impl Polygon {
    /// Builds a ring from `(lon, lat)` vertices, closing it.
    ///
    /// Consecutive repeats and an explicit closing vertex are dropped first.
    /// Returns `None` when fewer than [`MIN_RING_VERTICES`] distinct vertices
    /// remain.
    #[must_use]
    pub fn from_vertices(mut vertices: Vec<Vertex>) -> Option<Self> {
        vertices.dedup();
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }
        if distinct_count(&vertices) < MIN_RING_VERTICES {
            return None;
        }
        let first = vertices[0];
        vertices.push(first);
        Some(Self { vertices })
    }

    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Ring as `[lon, lat]` positions, the GeoJSON coordinate layout.
    #[must_use]
    pub fn positions(&self) -> Vec<Vec<f64>> {
        self.vertices.iter().map(|v| vec![v.lon, v.lat]).collect()
    }

    /// Arithmetic mean of every listed vertex, closing vertex included.
    ///
    /// This is not an area-weighted centroid: the closing vertex counts twice.
    #[must_use]
    pub fn centroid(&self) -> Centroid {
        #[allow(clippy::cast_precision_loss)]
        let n = self.vertices.len() as f64;
        let (lat_sum, lon_sum) = self
            .vertices
            .iter()
            .fold((0.0, 0.0), |(lat, lon), v| (lat + v.lat, lon + v.lon));
        Centroid {
            lat: lat_sum / n,
            lon: lon_sum / n,
        }
    }
}

fn distinct_count(vertices: &[Vertex]) -> usize {
    vertices
        .iter()
        .enumerate()
        .filter(|&(i, v)| !vertices[..i].contains(v))
        .count()
}

/// Parses registry geometry text into a closed [`Polygon`].
///
/// Tuples whose numbers do not parse are skipped. Returns `None` when fewer
/// than three vertices survive, which is the normal case for properties that
/// were never digitized.
#[must_use]
pub fn extract_polygon(raw: &str) -> Option<Polygon> {
    let vertices: Vec<Vertex> = COORD_TUPLE
        .captures_iter(raw)
        .filter_map(|cap| {
            let lat = cap[1].parse::<f64>().ok()?;
            let lon = cap[2].parse::<f64>().ok()?;
            (lat.is_finite() && lon.is_finite()).then_some(Vertex::new(lon, lat))
        })
        .collect();

    Polygon::from_vertices(vertices)
}
