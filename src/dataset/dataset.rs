use std::path::Path;

use ahash::AHashMap;
use anyhow::Result;
use geo::{Centroid, MultiPolygon, Point};
use log::debug;

use crate::common::{self, RawFeature};

use super::{entity::CountyEntity, geo_key::{GeoKey, resolve_geo_key}};

/// One map shape with its resolved join key (possibly empty) and centroid.
#[derive(Debug, Clone)]
pub struct CountyShape {
    pub key: GeoKey,
    pub shape: MultiPolygon<f64>,
    pub centroid: Option<Point<f64>>,
}

/// One loaded dataset: the entity rows, a key index over them, and the map
/// shapes. The map draws from `shapes` (neutral fill when no row joins);
/// scatterplots draw from `entities` only.
#[derive(Debug, Default)]
pub struct Dataset {
    pub entities: Vec<CountyEntity>,
    pub shapes: Vec<CountyShape>,
    index: AHashMap<GeoKey, u32>, // per-dataset contiguous indices
}

impl Dataset {
    /// Load and join a county CSV and a GeoJSON FeatureCollection.
    pub fn load(csv_path: &Path, geojson_path: &Path) -> Result<Self> {
        let frame = common::read_from_csv(csv_path)?;
        let entities = common::entities_from_frame(&frame)?;
        let features = common::read_feature_collection(geojson_path)?;
        Ok(Self::from_parts(entities, features))
    }

    /// Join rows to shapes by resolved key. Rows without a shape (and shapes
    /// without a row) are kept, each visible only in the views it can drive;
    /// mismatches are logged once here so the drop is not silent.
    pub(crate) fn from_parts(entities: Vec<CountyEntity>, features: Vec<RawFeature>) -> Self {
        let mut index = AHashMap::with_capacity(entities.len());
        for (i, entity) in entities.iter().enumerate() {
            index.insert(entity.key.clone(), i as u32);
        }

        let shapes: Vec<CountyShape> = features.into_iter()
            .map(|feature| {
                let key = resolve_geo_key(&feature.properties, feature.id.as_ref());
                let centroid = feature.shape.centroid();
                CountyShape { key, shape: feature.shape, centroid }
            })
            .collect();

        for shape in &shapes {
            if shape.key.is_empty() {
                debug!("shape with unresolvable identifier; excluded from choropleth coloring");
            } else if !index.contains_key(&shape.key) {
                debug!("shape {} has no matching row; neutral fill on the map", shape.key);
            }
        }
        for entity in &entities {
            if !shapes.iter().any(|s| s.key == entity.key) {
                debug!("row {} ({}) has no matching shape; scatter-only", entity.key, entity.name);
            }
        }

        Self { entities, shapes, index }
    }

    pub fn get(&self, key: &GeoKey) -> Option<&CountyEntity> {
        self.index.get(key).map(|&i| &self.entities[i as usize])
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use geo::{Coord, LineString, MultiPolygon, Polygon};
    use serde_json::json;

    use crate::common::RawFeature;

    use super::{CountyEntity, Dataset, GeoKey};

    /// A unit square offset by `(dx, dy)`.
    pub(crate) fn square(dx: f64, dy: f64) -> MultiPolygon<f64> {
        let ring = LineString(vec![
            Coord { x: dx, y: dy },
            Coord { x: dx + 1.0, y: dy },
            Coord { x: dx + 1.0, y: dy + 1.0 },
            Coord { x: dx, y: dy + 1.0 },
            Coord { x: dx, y: dy },
        ]);
        MultiPolygon(vec![Polygon::new(ring, vec![])])
    }

    pub(crate) fn entity(key: &str, name: &str) -> CountyEntity {
        CountyEntity {
            key: GeoKey::new(key),
            name: Arc::from(name),
            depression_age_adjusted: 20.0,
            depression_crude: 19.0,
            total_population: 50_000.0,
            adult_population: 38_000.0,
            median_income: 55_000.0,
            poverty_rate: 15.0,
            bachelors_pct: 22.0,
            needs_index: None,
        }
    }

    pub(crate) fn feature(geoid: &str, dx: f64) -> RawFeature {
        let mut properties = serde_json::Map::new();
        properties.insert("GEOID".into(), json!(geoid));
        RawFeature { properties, id: None, shape: square(dx, 0.0) }
    }

    /// Three joined counties laid out west-to-east, plus helpers for
    /// mismatch scenarios.
    pub(crate) fn small_dataset() -> Dataset {
        Dataset::from_parts(
            vec![
                entity("47001", "Anderson"),
                entity("47003", "Bedford"),
                entity("47005", "Benton"),
            ],
            vec![feature("47001", 0.0), feature("47003", 2.0), feature("47005", 4.0)],
        )
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::common::RawFeature;

    use super::{Dataset, GeoKey, test_support::{entity, feature, square}};

    #[test]
    fn joins_rows_to_shapes_by_resolved_key() {
        let ds = super::test_support::small_dataset();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.shapes.len(), 3);
        assert_eq!(ds.get(&GeoKey::new("47003")).unwrap().name.as_ref(), "Bedford");
        assert!(ds.get(&GeoKey::new("47999")).is_none());
    }

    #[test]
    fn keeps_row_without_shape_and_shape_without_row() {
        let ds = Dataset::from_parts(
            vec![entity("47001", "Anderson"), entity("47003", "Bedford")],
            vec![feature("47001", 0.0), feature("47005", 2.0)],
        );

        // Both sides survive the join; linking is per-view.
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.shapes.len(), 2);
        assert!(ds.get(&GeoKey::new("47003")).is_some()); // scatter-only row
        assert!(ds.get(&GeoKey::new("47005")).is_none()); // map-only shape
    }

    #[test]
    fn unresolvable_shape_gets_empty_key() {
        let mut properties = serde_json::Map::new();
        properties.insert("NAME".into(), json!("Nowhere"));
        let ds = Dataset::from_parts(
            vec![],
            vec![RawFeature { properties, id: None, shape: square(0.0, 0.0) }],
        );
        assert!(ds.shapes[0].key.is_empty());
    }

    #[test]
    fn shape_centroids_are_computed_at_join() {
        let ds = super::test_support::small_dataset();
        let c = ds.shapes[0].centroid.unwrap();
        assert!((c.x() - 0.5).abs() < 1e-9);
        assert!((c.y() - 0.5).abs() < 1e-9);
    }
}
