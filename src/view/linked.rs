use crate::dataset::{Dataset, Variable};
use crate::select::Selection;

use super::{
    color::ColorRamp,
    map_view::{LegendSpec, MapView},
    scatter::ScatterView,
};

/// The three socioeconomic variables tracked as scatterplots, in panel order.
pub const SCATTER_VARIABLES: [Variable; 3] = [
    Variable::MedianIncome,
    Variable::PovertyRate,
    Variable::BachelorsPct,
];

/// The map plus its three linked scatterplots, restyled together so every
/// surface always reflects the same selection state.
#[derive(Debug)]
pub struct LinkedViews {
    pub map: MapView,
    pub scatters: Vec<ScatterView>,
}

impl LinkedViews {
    pub fn new() -> Self {
        Self {
            map: MapView::new(900.0, 10.0),
            scatters: SCATTER_VARIABLES.iter().map(|&v| ScatterView::new(v)).collect(),
        }
    }

    /// Full redraw of every surface from the dataset, coloring the map by
    /// `layer` through `ramp`.
    pub fn render(&mut self, dataset: &Dataset, layer: Variable, ramp: ColorRamp, legend: LegendSpec) {
        self.map.render(dataset, layer, ramp, legend);
        for scatter in &mut self.scatters {
            scatter.render(dataset);
        }
    }

    /// Restyle all surfaces from one selection, geometry untouched.
    pub fn apply_selection(&mut self, selection: &Selection) {
        self.map.apply_selection(selection);
        for scatter in &mut self.scatters {
            scatter.apply_selection(selection);
        }
    }

    /// Toggle brush affordances on every scatterplot simultaneously.
    pub fn set_brush_visible(&mut self, visible: bool) {
        for scatter in &mut self.scatters {
            scatter.set_brush_visible(visible);
        }
    }

    pub fn scatter(&self, variable: Variable) -> Option<&ScatterView> {
        self.scatters.iter().find(|s| s.variable() == variable)
    }

    pub fn scatter_mut(&mut self, variable: Variable) -> Option<&mut ScatterView> {
        self.scatters.iter_mut().find(|s| s.variable() == variable)
    }
}

impl Default for LinkedViews {
    fn default() -> Self {
        Self::new()
    }
}
