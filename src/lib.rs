#![doc = "CountyLens public API"]
mod common;
mod dataset;
mod needs;
mod region;
mod select;
mod session;
mod view;

pub mod cli;
pub mod commands;

#[doc(inline)]
pub use dataset::{CountyEntity, CountyShape, Dataset, GeoKey, Variable, resolve_geo_key};

#[doc(inline)]
pub use needs::{WeightControls, Weights, clear_needs_index, compute_needs_index};

#[doc(inline)]
pub use region::{Region, RegionSets, RegionThresholds, keys_where, partition, thresholds};

#[doc(inline)]
pub use select::{Selection, SelectionMode, SelectionSnapshot, SelectionStore};

#[doc(inline)]
pub use session::{ControlAction, InputEvent, Session, ViewTarget};

#[doc(inline)]
pub use view::{
    BrushRect, ColorRamp, ColorScheme, DetailField, DetailRecord, LegendSpec, LinkedViews,
    MapView, ScatterView, Tooltip, present, tooltip_for, write_legend,
};
