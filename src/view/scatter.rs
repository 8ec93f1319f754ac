use std::io::Write;

use ahash::AHashSet;
use anyhow::Result;

use crate::common::SvgWriter;
use crate::dataset::{Dataset, GeoKey, Variable};
use crate::select::Selection;

const WIDTH: f64 = 440.0;
const HEIGHT: f64 = 340.0;
const MARGIN_LEFT: f64 = 54.0;
const MARGIN_RIGHT: f64 = 14.0;
const MARGIN_TOP: f64 = 14.0;
const MARGIN_BOTTOM: f64 = 40.0;

const BASE_RADIUS: f64 = 3.5;
const SELECTED_RADIUS: f64 = 5.5;
const BASE_FILL: &str = "#4292c6";
const SELECTED_FILL: &str = "#e6550d";

/// A drag rectangle in plot pixel coordinates. `(x0, y0)` is the drag
/// origin, `(x1, y1)` the current pointer position; either corner ordering
/// is accepted.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BrushRect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl BrushRect {
    fn normalized(&self) -> (f64, f64, f64, f64) {
        (
            self.x0.min(self.x1),
            self.y0.min(self.y1),
            self.x0.max(self.x1),
            self.y0.max(self.y1),
        )
    }

    /// A click with no drag area selects nothing.
    pub fn is_degenerate(&self) -> bool {
        self.x0 == self.x1 || self.y0 == self.y1
    }
}

#[derive(Debug, Clone)]
struct ScatterPoint {
    key: GeoKey,
    x: f64,
    y: f64,
    selected: bool,
}

/// One scatterplot: the tracked variable on x, age-adjusted depression rate
/// on y. Drawn from data rows only; shapes never feed this view.
///
/// Point positions are cached at render time so brush hit-testing during a
/// drag is pure arithmetic over the cache.
#[derive(Debug)]
pub struct ScatterView {
    variable: Variable,
    points: Vec<ScatterPoint>,
    hovered: Option<GeoKey>,
    brush_visible: bool,
    brush: Option<BrushRect>,
}

impl ScatterView {
    pub fn new(variable: Variable) -> Self {
        Self {
            variable,
            points: Vec::new(),
            hovered: None,
            brush_visible: false,
            brush: None,
        }
    }

    pub fn variable(&self) -> Variable {
        self.variable
    }

    /// Full idempotent redraw: project every row into plot coordinates.
    /// Rows missing a value for the variable are skipped.
    pub fn render(&mut self, dataset: &Dataset) {
        self.points.clear();

        // Both domains come from the rows that will actually plot; rows
        // without a value for the variable must not stretch the y-axis.
        let (xs, ys): (Vec<f64>, Vec<f64>) = dataset.entities.iter()
            .filter_map(|e| e.value(self.variable).map(|v| (v, e.depression_age_adjusted)))
            .unzip();
        let Some((x_min, x_max)) = min_max(&xs) else { return };
        let Some((y_min, y_max)) = min_max(&ys) else { return };

        let x_span = (x_max - x_min).max(f64::EPSILON);
        let y_span = (y_max - y_min).max(f64::EPSILON);
        let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;

        for entity in &dataset.entities {
            let Some(value) = entity.value(self.variable) else { continue };
            self.points.push(ScatterPoint {
                key: entity.key.clone(),
                x: MARGIN_LEFT + (value - x_min) / x_span * plot_w,
                y: MARGIN_TOP + (y_max - entity.depression_age_adjusted) / y_span * plot_h,
                selected: false,
            });
        }
    }

    /// The cached plot position for a county, if it is drawn here.
    pub fn point_position(&self, key: &GeoKey) -> Option<(f64, f64)> {
        self.points.iter()
            .find(|p| &p.key == key)
            .map(|p| (p.x, p.y))
    }

    /// Counties whose plotted position falls inside the rectangle.
    pub fn keys_in_rect(&self, rect: &BrushRect) -> AHashSet<GeoKey> {
        let (min_x, min_y, max_x, max_y) = rect.normalized();
        self.points.iter()
            .filter(|p| p.x >= min_x && p.x <= max_x && p.y >= min_y && p.y <= max_y)
            .map(|p| p.key.clone())
            .collect()
    }

    /// Restyle points from the selection without re-projecting.
    pub fn apply_selection(&mut self, selection: &Selection) {
        for point in &mut self.points {
            point.selected = selection.contains(&point.key);
        }
    }

    pub fn set_brush_visible(&mut self, visible: bool) {
        self.brush_visible = visible;
        if !visible {
            self.brush = None;
        }
    }

    pub fn brush_visible(&self) -> bool {
        self.brush_visible
    }

    /// Update (or clear) the in-flight brush rectangle affordance.
    pub fn set_brush(&mut self, brush: Option<BrushRect>) {
        self.brush = brush;
    }

    pub fn hover(&mut self, key: &GeoKey) {
        self.hovered = Some(key.clone());
    }

    pub fn unhover(&mut self) {
        self.hovered = None;
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn is_selected(&self, key: &GeoKey) -> bool {
        self.points.iter().any(|p| &p.key == key && p.selected)
    }

    pub fn write_svg<W: Write>(&self, out: W) -> Result<()> {
        let mut writer = SvgWriter::new(out);
        writer.write_header(WIDTH, HEIGHT)?;
        writer.write_styles("    .axis { stroke: #9ca3af; stroke-width: 1; }\n    .axis-label { font: 11px sans-serif; fill: #374151; }")?;

        // Axes
        let x_axis_y = HEIGHT - MARGIN_BOTTOM;
        writeln!(
            writer,
            r#"<line class="axis" x1="{MARGIN_LEFT}" y1="{x_axis_y}" x2="{}" y2="{x_axis_y}"/>"#,
            WIDTH - MARGIN_RIGHT,
        )?;
        writeln!(
            writer,
            r#"<line class="axis" x1="{MARGIN_LEFT}" y1="{MARGIN_TOP}" x2="{MARGIN_LEFT}" y2="{x_axis_y}"/>"#,
        )?;
        writeln!(
            writer,
            r#"<text class="axis-label" x="{}" y="{}" text-anchor="middle">{}</text>"#,
            (MARGIN_LEFT + WIDTH - MARGIN_RIGHT) / 2.0,
            HEIGHT - 10.0,
            self.variable.label(),
        )?;
        writeln!(
            writer,
            r#"<text class="axis-label" x="14" y="{}" transform="rotate(-90 14 {})" text-anchor="middle">{}</text>"#,
            (MARGIN_TOP + x_axis_y) / 2.0,
            (MARGIN_TOP + x_axis_y) / 2.0,
            Variable::DepressionAgeAdjusted.label(),
        )?;

        for point in &self.points {
            let hovered = self.hovered.as_ref() == Some(&point.key);
            let (radius, fill) = if point.selected {
                (SELECTED_RADIUS, SELECTED_FILL)
            } else {
                (BASE_RADIUS, BASE_FILL)
            };
            let stroke = if hovered { r##" stroke="#333333" stroke-width="1.5""## } else { "" };

            writeln!(
                writer,
                r#"<circle cx="{:.2}" cy="{:.2}" r="{radius}" fill="{fill}"{stroke}/>"#,
                point.x, point.y,
            )?;
        }

        if self.brush_visible {
            if let Some(brush) = &self.brush {
                let (min_x, min_y, max_x, max_y) = brush.normalized();
                writeln!(
                    writer,
                    r##"<rect x="{min_x:.2}" y="{min_y:.2}" width="{:.2}" height="{:.2}" fill="#60a5fa" fill-opacity="0.15" stroke="#2563eb" stroke-dasharray="4 2"/>"##,
                    max_x - min_x,
                    max_y - min_y,
                )?;
            }
        }

        writer.write_footer()?;
        writer.flush()?;
        Ok(())
    }
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
    }
    Some((min, max))
}
