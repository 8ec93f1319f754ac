use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::Value;

/// One GeoJSON feature: the boundary plus the raw properties bag it arrived
/// with. Identifier resolution happens later (see `dataset::geo_key`).
#[derive(Debug, Clone)]
pub(crate) struct RawFeature {
    pub properties: serde_json::Map<String, Value>,
    pub id: Option<Value>,
    pub shape: MultiPolygon<f64>,
}

/// Read a GeoJSON FeatureCollection from a file path.
pub(crate) fn read_feature_collection(path: &Path) -> Result<Vec<RawFeature>> {
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to open GeoJSON: {}", path.display()))?;
    features_from_bytes(&bytes)
}

/// Read features from GeoJSON bytes. Polygon geometries are promoted to
/// single-member MultiPolygons; other geometry types are rejected.
pub(crate) fn features_from_bytes(bytes: &[u8]) -> Result<Vec<RawFeature>> {
    let value: Value = serde_json::from_slice(bytes).context("Failed to parse GeoJSON bytes")?;

    let features = value["features"].as_array()
        .ok_or_else(|| anyhow!("GeoJSON is not a FeatureCollection"))?;

    let mut out = Vec::with_capacity(features.len());
    for (idx, feature) in features.iter().enumerate() {
        let geometry = feature["geometry"].as_object()
            .ok_or_else(|| anyhow!("feature {idx}: missing geometry"))?;
        let coords = geometry["coordinates"].as_array()
            .ok_or_else(|| anyhow!("feature {idx}: missing coordinates"))?;

        let shape = match geometry["type"].as_str() {
            Some("MultiPolygon") => parse_multipolygon_coords(coords)
                .with_context(|| format!("feature {idx}"))?,
            Some("Polygon") => MultiPolygon(vec![
                parse_polygon_coords(coords).with_context(|| format!("feature {idx}"))?,
            ]),
            other => return Err(anyhow!("feature {idx}: unsupported geometry type {other:?}")),
        };

        let properties = feature["properties"].as_object()
            .cloned()
            .unwrap_or_default();

        out.push(RawFeature {
            properties,
            id: feature.get("id").filter(|v| !v.is_null()).cloned(),
            shape,
        });
    }

    Ok(out)
}

/// Parse standard GeoJSON MultiPolygon coordinates: an array of polygons,
/// each an array of rings (first exterior, rest holes).
fn parse_multipolygon_coords(coords: &[Value]) -> Result<MultiPolygon<f64>> {
    let mut polygons = Vec::with_capacity(coords.len());

    for polygon_coords in coords {
        let rings = polygon_coords.as_array()
            .ok_or_else(|| anyhow!("Invalid MultiPolygon: polygon is not an array"))?;
        polygons.push(parse_polygon_coords(rings)?);
    }

    Ok(MultiPolygon(polygons))
}

/// Parse standard GeoJSON Polygon coordinates: an array of rings.
fn parse_polygon_coords(rings: &[Value]) -> Result<Polygon<f64>> {
    let exterior_coords = rings.first()
        .and_then(|v| v.as_array())
        .ok_or_else(|| anyhow!("Invalid Polygon: missing exterior ring"))?;
    let exterior = parse_ring_coords(exterior_coords)?;

    let mut interiors = Vec::new();
    for interior_ring in &rings[1..] {
        let ring_array = interior_ring.as_array()
            .ok_or_else(|| anyhow!("Invalid Polygon: interior ring is not an array"))?;
        interiors.push(parse_ring_coords(ring_array)?);
    }

    Ok(Polygon::new(exterior, interiors))
}

/// Parse a ring (exterior or interior) from GeoJSON coordinates.
/// Format: [[x, y], [x, y], ...]
fn parse_ring_coords(coords: &[Value]) -> Result<LineString<f64>> {
    let mut points = Vec::with_capacity(coords.len());

    for coord_pair in coords {
        if let Some(coord_array) = coord_pair.as_array() {
            if coord_array.len() >= 2 {
                let x = coord_array[0].as_f64()
                    .ok_or_else(|| anyhow!("Invalid coordinate: x must be a number"))?;
                let y = coord_array[1].as_f64()
                    .ok_or_else(|| anyhow!("Invalid coordinate: y must be a number"))?;
                points.push(Coord { x, y });
            }
        }
    }

    // Ensure ring is closed (first point == last point)
    if !points.is_empty() && points[0] != points[points.len() - 1] {
        points.push(points[0]);
    }

    Ok(LineString(points))
}
