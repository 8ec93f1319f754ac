mod color;
mod detail;
mod legend;
mod linked;
mod map_view;
mod scatter;
mod tooltip;

pub use color::{BLUES, ColorRamp, ColorScheme, NEUTRAL_FILL, REDS};
pub use detail::{DetailField, DetailRecord, present};
pub use legend::write_legend;
pub use linked::{LinkedViews, SCATTER_VARIABLES};
pub use map_view::{LegendSpec, MapView};
pub use scatter::{BrushRect, ScatterView};
pub use tooltip::{Tooltip, tooltip_for};
