use std::io::Write;

use anyhow::Result;
use geo::{BoundingRect, Coord, CoordsIter, LineString, MultiPolygon};

use crate::common::SvgWriter;
use crate::dataset::{Dataset, GeoKey, Variable};
use crate::select::Selection;

use super::color::{ColorRamp, NEUTRAL_FILL};

/// Projection function: lon/lat -> SVG coords (x,y)
type Projection = dyn Fn(&Coord<f64>) -> (f64, f64);

/// What the legend surface should say about the active color layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LegendSpec {
    pub title: String,
}

/// One cached, projected shape with its current visual state.
#[derive(Debug, Clone)]
struct ShapePath {
    key: GeoKey,
    path: String,
    base_fill: String,
    selected: bool,
}

/// The choropleth surface.
///
/// `render` is a full idempotent redraw: it re-projects every shape and
/// resets visual state. `apply_selection` only rewrites the cached styles,
/// never the geometry. Adequate at county-scale cardinality (low hundreds);
/// the path cache would need dirty tracking before this scaled further.
#[derive(Debug)]
pub struct MapView {
    width: f64,
    height: f64,
    margin: f64,
    paths: Vec<ShapePath>,
    ramp: ColorRamp,
    legend: LegendSpec,
    hovered: Option<GeoKey>,
}

impl MapView {
    pub fn new(width: f64, margin: f64) -> Self {
        Self {
            width,
            height: width,
            margin,
            paths: Vec::new(),
            ramp: ColorRamp::from_values([], super::color::BLUES),
            legend: LegendSpec::default(),
            hovered: None,
        }
    }

    /// Full redraw from the dataset: project every shape and color it by
    /// `variable` through `ramp`. Shapes with no joined row (or no value for
    /// the variable) get the neutral fill rather than failing.
    pub fn render(&mut self, dataset: &Dataset, variable: Variable, ramp: ColorRamp, legend: LegendSpec) {
        self.ramp = ramp;
        self.legend = legend;
        self.paths.clear();

        let Some(bounds) = merged_bounds(dataset.shapes.iter().map(|s| &s.shape)) else {
            self.height = 2.0 * self.margin;
            return;
        };
        let (min_x, min_y, max_x, max_y) = bounds;

        let margin = self.margin;
        let scale = (self.width - 2.0 * margin) / (max_x - min_x).max(f64::EPSILON);
        self.height = (max_y - min_y) * scale + 2.0 * margin;

        // --- Map lon/lat -> SVG coords (preserve aspect, Y down) ---
        let project = move |coord: &Coord<f64>| -> (f64, f64) {
            let x = margin + (coord.x - min_x) * scale;
            let y = margin + (max_y - coord.y) * scale; // invert vertically
            (x, y)
        };

        for shape in &dataset.shapes {
            let base_fill = if shape.key.is_empty() {
                NEUTRAL_FILL.to_owned()
            } else {
                match dataset.get(&shape.key).and_then(|e| e.value(variable)) {
                    Some(v) => self.ramp.color(v),
                    None => NEUTRAL_FILL.to_owned(),
                }
            };

            self.paths.push(ShapePath {
                key: shape.key.clone(),
                path: multipolygon_to_path(&shape.shape, &project),
                base_fill,
                selected: false,
            });
        }
    }

    /// Restyle shapes from the selection without re-projecting geometry.
    pub fn apply_selection(&mut self, selection: &Selection) {
        for shape in &mut self.paths {
            shape.selected = !shape.key.is_empty() && selection.contains(&shape.key);
        }
    }

    /// Transient hover emphasis, layered over (never written to) the
    /// selection state.
    pub fn hover(&mut self, key: &GeoKey) {
        self.hovered = Some(key.clone());
    }

    pub fn unhover(&mut self) {
        self.hovered = None;
    }

    pub fn legend(&self) -> &LegendSpec {
        &self.legend
    }

    pub fn ramp(&self) -> &ColorRamp {
        &self.ramp
    }

    pub fn shape_count(&self) -> usize {
        self.paths.len()
    }

    pub fn is_selected(&self, key: &GeoKey) -> bool {
        self.paths.iter().any(|s| &s.key == key && s.selected)
    }

    pub fn fill_of(&self, key: &GeoKey) -> Option<&str> {
        self.paths.iter()
            .find(|s| &s.key == key)
            .map(|s| s.base_fill.as_str())
    }

    /// Emit the surface as SVG. Hover stroke takes precedence while active;
    /// on leave a selected shape falls back to the selected stroke.
    pub fn write_svg<W: Write>(&self, out: W) -> Result<()> {
        let mut writer = SvgWriter::new(out);
        writer.write_header(self.width, self.height)?;
        writer.write_styles("    .county { stroke-linejoin: round; }")?;

        for shape in &self.paths {
            let hovered = self.hovered.as_ref() == Some(&shape.key);
            let (stroke, stroke_width) = if hovered {
                ("#333333", 1.5)
            } else if shape.selected {
                ("#111827", 2.0)
            } else {
                ("#ffffff", 0.5)
            };

            writeln!(
                writer,
                r#"<path class="county" d="{}" fill="{}" stroke="{}" stroke-width="{}"/>"#,
                shape.path, shape.base_fill, stroke, stroke_width,
            )?;
        }

        writer.write_footer()?;
        writer.flush()?;
        Ok(())
    }
}

/// Merge bounding rects over all shapes into (min_x, min_y, max_x, max_y).
fn merged_bounds<'a>(shapes: impl Iterator<Item = &'a MultiPolygon<f64>>) -> Option<(f64, f64, f64, f64)> {
    let mut out: Option<(f64, f64, f64, f64)> = None;
    for shape in shapes {
        let Some(rect) = shape.bounding_rect() else { continue };
        out = Some(match out {
            None => (rect.min().x, rect.min().y, rect.max().x, rect.max().y),
            Some((min_x, min_y, max_x, max_y)) => (
                min_x.min(rect.min().x),
                min_y.min(rect.min().y),
                max_x.max(rect.max().x),
                max_y.max(rect.max().y),
            ),
        });
    }
    out
}

/// Build a compact SVG path string for a MultiPolygon (exteriors + holes).
fn multipolygon_to_path(shape: &MultiPolygon<f64>, project: &Projection) -> String {
    let mut out = String::new();

    for polygon in &shape.0 {
        out.push_str(&ring_to_path(polygon.exterior(), project));
        for interior in polygon.interiors() {
            out.push_str(&ring_to_path(interior, project));
        }
    }

    out
}

/// Build a compact SVG path string for a LineString (ring).
fn ring_to_path(ring: &LineString<f64>, project: &Projection) -> String {
    let mut out = String::new();

    let mut coords = ring.coords_iter()
        .map(|coord| project(&coord));
    if let Some((x, y)) = coords.next() {
        out.push_str(&format!(" M{x:.3},{y:.3}"));
        for (x, y) in coords {
            out.push_str(&format!(" L{x:.3},{y:.3}"));
        }
        out.push('Z');
    }

    out
}

#[cfg(test)]
mod tests {
    use crate::dataset::{Dataset, GeoKey, Variable, test_support};
    use crate::select::Selection;
    use crate::view::color::{BLUES, ColorRamp, NEUTRAL_FILL};

    use super::{LegendSpec, MapView};

    fn rendered_map(dataset: &Dataset) -> MapView {
        let mut map = MapView::new(600.0, 10.0);
        let ramp = ColorRamp::from_values(
            dataset.entities.iter().map(|e| e.depression_age_adjusted),
            BLUES,
        );
        map.render(dataset, Variable::DepressionAgeAdjusted, ramp, LegendSpec {
            title: "Depression rate".into(),
        });
        map
    }

    #[test]
    fn renders_one_path_per_shape() {
        let dataset = test_support::small_dataset();
        let map = rendered_map(&dataset);
        assert_eq!(map.shape_count(), 3);
    }

    #[test]
    fn unjoined_shape_gets_neutral_fill() {
        let dataset = Dataset::from_parts(
            vec![test_support::entity("47001", "Anderson")],
            vec![test_support::feature("47001", 0.0), test_support::feature("47099", 2.0)],
        );
        let map = rendered_map(&dataset);

        assert_ne!(map.fill_of(&GeoKey::new("47001")).unwrap(), NEUTRAL_FILL);
        assert_eq!(map.fill_of(&GeoKey::new("47099")).unwrap(), NEUTRAL_FILL);
    }

    #[test]
    fn needs_layer_without_scores_is_neutral() {
        let dataset = test_support::small_dataset();
        let mut map = MapView::new(600.0, 10.0);
        map.render(&dataset, Variable::NeedsIndex, ColorRamp::new(0.0, 10.0, BLUES), LegendSpec::default());

        // No entity has a computed index yet.
        assert_eq!(map.fill_of(&GeoKey::new("47001")).unwrap(), NEUTRAL_FILL);
    }

    #[test]
    fn selection_restyles_without_rerender() {
        let dataset = test_support::small_dataset();
        let mut map = rendered_map(&dataset);

        map.apply_selection(&Selection::Single(GeoKey::new("47003")));
        assert!(map.is_selected(&GeoKey::new("47003")));
        assert!(!map.is_selected(&GeoKey::new("47001")));

        map.apply_selection(&Selection::None);
        assert!(!map.is_selected(&GeoKey::new("47003")));
    }

    #[test]
    fn rerender_is_idempotent_and_resets_selection_styling() {
        let dataset = test_support::small_dataset();
        let mut map = rendered_map(&dataset);
        map.apply_selection(&Selection::Single(GeoKey::new("47001")));

        let ramp = *map.ramp();
        let legend = map.legend().clone();
        map.render(&dataset, Variable::DepressionAgeAdjusted, ramp, legend);
        assert!(!map.is_selected(&GeoKey::new("47001")));
        assert_eq!(map.shape_count(), 3);
    }

    #[test]
    fn hover_stroke_takes_precedence_then_yields_to_selected() {
        let dataset = test_support::small_dataset();
        let mut map = rendered_map(&dataset);
        let key = GeoKey::new("47001");
        map.apply_selection(&Selection::Single(key.clone()));

        map.hover(&key);
        let mut hovered_svg = Vec::new();
        map.write_svg(&mut hovered_svg).unwrap();
        assert!(String::from_utf8(hovered_svg).unwrap().contains(r##"stroke="#333333""##));

        map.unhover();
        let mut left_svg = Vec::new();
        map.write_svg(&mut left_svg).unwrap();
        assert!(String::from_utf8(left_svg).unwrap().contains(r##"stroke="#111827""##));
    }

    #[test]
    fn empty_dataset_renders_blank_surface() {
        let dataset = Dataset::from_parts(vec![], vec![]);
        let map = rendered_map(&dataset);

        let mut svg = Vec::new();
        map.write_svg(&mut svg).unwrap();
        assert!(String::from_utf8(svg).unwrap().contains("</svg>"));
    }
}
