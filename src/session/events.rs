use crate::dataset::{GeoKey, Variable};
use crate::needs::WeightControls;
use crate::region::Region;
use crate::select::SelectionMode;

/// Which surface a pointer event happened on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewTarget {
    Map,
    Scatter(Variable),
}

/// The finite set of pointer interactions the host forwards to the core.
/// Drag events are scatter-only (brushing); coordinates are plot pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerEnter { view: ViewTarget, key: GeoKey },
    PointerLeave { view: ViewTarget, key: GeoKey },
    Click { view: ViewTarget, key: GeoKey },
    DragStart { plot: Variable, x: f64, y: f64 },
    DragMove { plot: Variable, x: f64, y: f64 },
    DragEnd { plot: Variable, x: f64, y: f64 },
}

/// Control-panel actions surfaced to the core.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlAction {
    SetMode(SelectionMode),
    ApplyWeights(WeightControls),
    ResetWeights,
    SelectRegion(Region),
    SelectAll,
    ClearSelection,
    /// A tab/panel switch outside the core; re-applies current highlighting.
    TabActivated,
}
