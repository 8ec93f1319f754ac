mod dataset;
mod entity;
mod geo_key;

#[cfg(test)]
pub(crate) use dataset::test_support;
pub use dataset::{CountyShape, Dataset};
pub use entity::{CountyEntity, Variable};
pub use geo_key::{GeoKey, resolve_geo_key};
