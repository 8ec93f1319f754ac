mod data;
mod format;
mod geojson;
mod svg;

pub(crate) use data::*;
pub(crate) use format::*;
pub(crate) use geojson::*;
pub(crate) use svg::*;
