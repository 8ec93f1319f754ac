//! Quick bulk selection by geographic position: shapes are split into
//! west / central / east thirds of the state by centroid longitude.

use ahash::AHashSet;

use crate::dataset::{CountyShape, GeoKey};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Region {
    West,
    Central,
    East,
}

/// Longitude cut points between the three regions.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RegionThresholds {
    pub west_max: f64,
    pub central_max: f64,
}

/// The three disjoint key sets; together they cover every joined shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionSets {
    pub west: AHashSet<GeoKey>,
    pub central: AHashSet<GeoKey>,
    pub east: AHashSet<GeoKey>,
}

/// Compute the cut points as positional tertiles of the sorted centroid
/// longitudes (ranks n/3 and 2n/3), not value quantiles. Returns `None`
/// when no shape has a centroid.
pub fn thresholds(shapes: &[CountyShape]) -> Option<RegionThresholds> {
    let mut longitudes: Vec<f64> = shapes.iter()
        .filter_map(|s| s.centroid.map(|c| c.x()))
        .collect();
    if longitudes.is_empty() {
        return None;
    }
    longitudes.sort_by(f64::total_cmp);

    Some(RegionThresholds {
        west_max: longitudes[longitudes.len() / 3],
        central_max: longitudes[longitudes.len() * 2 / 3],
    })
}

/// Collect the keys of successfully joined shapes whose centroid longitude
/// satisfies `predicate`. "Select All" is the always-true predicate.
pub fn keys_where(shapes: &[CountyShape], predicate: impl Fn(f64) -> bool) -> AHashSet<GeoKey> {
    shapes.iter()
        .filter(|s| !s.key.is_empty())
        .filter_map(|s| s.centroid.map(|c| (s, c.x())))
        .filter(|(_, lon)| predicate(*lon))
        .map(|(s, _)| s.key.clone())
        .collect()
}

/// Partition all joined shapes into the three regions.
pub fn partition(shapes: &[CountyShape]) -> RegionSets {
    let Some(t) = thresholds(shapes) else {
        return RegionSets::default();
    };

    RegionSets {
        west: keys_where(shapes, |lon| lon < t.west_max),
        central: keys_where(shapes, |lon| lon >= t.west_max && lon < t.central_max),
        east: keys_where(shapes, |lon| lon >= t.central_max),
    }
}

impl RegionSets {
    pub fn get(&self, region: Region) -> &AHashSet<GeoKey> {
        match region {
            Region::West => &self.west,
            Region::Central => &self.central,
            Region::East => &self.east,
        }
    }
}
