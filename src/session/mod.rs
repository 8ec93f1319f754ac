//! The process-scoped interactive state: one loaded dataset, one selection
//! store, one set of linked surfaces. All interaction arrives as explicit
//! [`InputEvent`]/[`ControlAction`] calls on a single thread; every call is
//! fully applied (store, then dependent restyling) before it returns.

mod events;

use std::cell::{Ref, RefCell};
use std::io::Write;
use std::path::Path;
use std::rc::Rc;

use anyhow::{Result, anyhow};

use crate::dataset::{Dataset, GeoKey, Variable};
use crate::needs::{WeightControls, clear_needs_index, compute_needs_index};
use crate::region::{self, Region};
use crate::select::{Selection, SelectionMode, SelectionStore};
use crate::view::{
    BLUES, BrushRect, ColorRamp, DetailRecord, LegendSpec, LinkedViews, REDS, Tooltip, present,
    tooltip_for, write_legend,
};

pub use events::{ControlAction, InputEvent, ViewTarget};

/// A rectangular drag in flight over one scatterplot.
#[derive(Debug, Clone, Copy, PartialEq)]
struct BrushGesture {
    plot: Variable,
    origin: (f64, f64),
    current: (f64, f64),
}

impl BrushGesture {
    fn rect(&self) -> BrushRect {
        BrushRect {
            x0: self.origin.0,
            y0: self.origin.1,
            x1: self.current.0,
            y1: self.current.1,
        }
    }
}

pub struct Session {
    dataset: Rc<RefCell<Dataset>>,
    store: SelectionStore,
    views: Rc<RefCell<LinkedViews>>,
    detail: Rc<RefCell<DetailRecord>>,
    tooltip: Option<Tooltip>,
    brush: Option<BrushGesture>,
    layer: Variable,
}

impl Session {
    /// Build a session over a loaded dataset and render the initial
    /// depression-rate layer.
    pub fn new(dataset: Dataset) -> Self {
        let dataset = Rc::new(RefCell::new(dataset));
        let views = Rc::new(RefCell::new(LinkedViews::new()));
        let detail = Rc::new(RefCell::new(present(None)));

        let mut store = SelectionStore::new();
        {
            let views = views.clone();
            store.subscribe(move |snapshot| {
                let mut views = views.borrow_mut();
                views.apply_selection(&snapshot.selection);
                views.set_brush_visible(snapshot.brush_enabled);
            });
        }
        {
            let dataset = dataset.clone();
            let detail = detail.clone();
            store.subscribe(move |snapshot| {
                let ds = dataset.borrow();
                *detail.borrow_mut() = present(snapshot.selection.single().and_then(|k| ds.get(k)));
            });
        }

        let mut session = Self {
            dataset,
            store,
            views,
            detail,
            tooltip: None,
            brush: None,
            layer: Variable::DepressionAgeAdjusted,
        };
        session.render_layer();
        session
    }

    /// Load both sources and build the session. On failure the error is also
    /// reported to the log channel and nothing is rendered.
    pub fn load(csv_path: &Path, geojson_path: &Path) -> Result<Self> {
        match Dataset::load(csv_path, geojson_path) {
            Ok(dataset) => Ok(Self::new(dataset)),
            Err(err) => {
                log::error!("failed to load dataset: {err:#}");
                Err(err)
            }
        }
    }

    pub fn selection(&self) -> &Selection {
        self.store.current()
    }

    pub fn mode(&self) -> SelectionMode {
        self.store.mode()
    }

    pub fn layer(&self) -> Variable {
        self.layer
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub fn detail(&self) -> DetailRecord {
        self.detail.borrow().clone()
    }

    pub fn views(&self) -> Ref<'_, LinkedViews> {
        self.views.borrow()
    }

    /// Return to the freshly-constructed state: no selection, individual
    /// mode, unscored entities, depression-rate layer.
    pub fn reset(&mut self) {
        self.brush = None;
        self.tooltip = None;
        self.store.set_mode(SelectionMode::Individual);
        clear_needs_index(&mut self.dataset.borrow_mut().entities);
        self.layer = Variable::DepressionAgeAdjusted;
        self.render_layer();
    }

    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerEnter { view, key } => {
                self.tooltip = self.dataset.borrow().get(&key).map(tooltip_for);
                let mut views = self.views.borrow_mut();
                match view {
                    ViewTarget::Map => views.map.hover(&key),
                    ViewTarget::Scatter(variable) => {
                        if let Some(scatter) = views.scatter_mut(variable) {
                            scatter.hover(&key);
                        }
                    }
                }
            }
            InputEvent::PointerLeave { view, .. } => {
                self.tooltip = None;
                let mut views = self.views.borrow_mut();
                match view {
                    ViewTarget::Map => views.map.unhover(),
                    ViewTarget::Scatter(variable) => {
                        if let Some(scatter) = views.scatter_mut(variable) {
                            scatter.unhover();
                        }
                    }
                }
            }
            InputEvent::Click { key, .. } => self.click(key),
            InputEvent::DragStart { plot, x, y } => self.drag_start(plot, x, y),
            InputEvent::DragMove { plot, x, y } => self.drag_move(plot, x, y),
            InputEvent::DragEnd { plot, x, y } => self.drag_end(plot, x, y),
        }
    }

    pub fn handle_control(&mut self, action: ControlAction) {
        match action {
            ControlAction::SetMode(mode) => {
                self.cancel_brush();
                self.store.set_mode(mode);
            }
            ControlAction::ApplyWeights(controls) => self.apply_weights(&controls),
            ControlAction::ResetWeights => {
                clear_needs_index(&mut self.dataset.borrow_mut().entities);
                self.layer = Variable::DepressionAgeAdjusted;
                self.render_layer();
            }
            ControlAction::SelectRegion(region) => {
                let keys = {
                    let ds = self.dataset.borrow();
                    region::partition(&ds.shapes).get(region).clone()
                };
                self.store.select_multiple(keys);
            }
            ControlAction::SelectAll => {
                let keys = {
                    let ds = self.dataset.borrow();
                    region::keys_where(&ds.shapes, |_| true)
                };
                self.store.select_multiple(keys);
            }
            ControlAction::ClearSelection => self.store.clear(),
            ControlAction::TabActivated => {
                self.views.borrow_mut().apply_selection(self.store.current());
            }
        }
    }

    /// In individual mode a click promotes the county to the single
    /// selection, overriding any brush/cluster result. Clicks while a brush
    /// gesture is in flight are suppressed (no spurious single-select at
    /// drag end); clicks in cluster mode never write to the store.
    fn click(&mut self, key: GeoKey) {
        if self.brush.is_some() {
            return;
        }
        if self.store.mode() == SelectionMode::Individual {
            self.store.select_single(Some(key));
        }
    }

    fn drag_start(&mut self, plot: Variable, x: f64, y: f64) {
        if !self.store.brush_enabled() {
            return;
        }
        if self.views.borrow().scatter(plot).is_none() {
            return;
        }
        let gesture = BrushGesture { plot, origin: (x, y), current: (x, y) };
        self.brush = Some(gesture);
        self.set_brush_rect(plot, Some(gesture.rect()));
    }

    /// Every drag-frame recomputes the provisional set, so the map and all
    /// three scatterplots update live during the drag.
    fn drag_move(&mut self, plot: Variable, x: f64, y: f64) {
        let Some(mut gesture) = self.brush else { return };
        if gesture.plot != plot {
            return;
        }
        gesture.current = (x, y);
        self.brush = Some(gesture);

        let rect = gesture.rect();
        let keys = {
            let mut views = self.views.borrow_mut();
            if let Some(scatter) = views.scatter_mut(plot) {
                scatter.set_brush(Some(rect));
                scatter.keys_in_rect(&rect)
            } else {
                return;
            }
        };
        self.store.select_multiple(keys);
    }

    /// Releasing with no area is a click-shaped drag: it clears. Releasing
    /// with area finalizes the covered set as the standing multi-selection.
    fn drag_end(&mut self, plot: Variable, x: f64, y: f64) {
        let Some(mut gesture) = self.brush else { return };
        if gesture.plot != plot {
            return;
        }
        gesture.current = (x, y);
        let rect = gesture.rect();

        self.brush = None;
        let keys = {
            let mut views = self.views.borrow_mut();
            if let Some(scatter) = views.scatter_mut(plot) {
                scatter.set_brush(None);
                scatter.keys_in_rect(&rect)
            } else {
                return;
            }
        };

        if rect.is_degenerate() {
            self.store.clear();
        } else {
            self.store.select_multiple(keys);
        }
    }

    fn apply_weights(&mut self, controls: &WeightControls) {
        {
            let mut ds = self.dataset.borrow_mut();
            compute_needs_index(&mut ds.entities, &controls.effective());
        }
        self.layer = Variable::NeedsIndex;
        self.render_layer();
    }

    fn cancel_brush(&mut self) {
        if let Some(gesture) = self.brush.take() {
            self.set_brush_rect(gesture.plot, None);
        }
    }

    fn set_brush_rect(&self, plot: Variable, rect: Option<BrushRect>) {
        let mut views = self.views.borrow_mut();
        if let Some(scatter) = views.scatter_mut(plot) {
            scatter.set_brush(rect);
        }
    }

    /// Full redraw of every surface for the active layer, then re-apply the
    /// standing selection and brush visibility (a redraw resets styles).
    fn render_layer(&mut self) {
        let ds = self.dataset.borrow();
        let scheme = if self.layer == Variable::NeedsIndex { REDS } else { BLUES };
        let ramp = ColorRamp::from_values(
            ds.entities.iter().filter_map(|e| e.value(self.layer)),
            scheme,
        );
        let legend = LegendSpec { title: self.layer.label().to_owned() };

        let mut views = self.views.borrow_mut();
        views.render(&ds, self.layer, ramp, legend);
        views.apply_selection(self.store.current());
        views.set_brush_visible(self.store.brush_enabled());
        drop(views);

        *self.detail.borrow_mut() =
            present(self.store.current().single().and_then(|k| ds.get(k)));
    }

    pub fn write_map_svg<W: Write>(&self, out: W) -> Result<()> {
        self.views.borrow().map.write_svg(out)
    }

    pub fn write_scatter_svg<W: Write>(&self, variable: Variable, out: W) -> Result<()> {
        let views = self.views.borrow();
        let scatter = views.scatter(variable)
            .ok_or_else(|| anyhow!("no scatterplot tracks {variable:?}"))?;
        scatter.write_svg(out)
    }

    pub fn write_legend_svg<W: Write>(&self, out: W) -> Result<()> {
        let views = self.views.borrow();
        write_legend(out, views.map.ramp(), views.map.legend())
    }
}

#[cfg(test)]
mod tests {
    use crate::dataset::{Dataset, GeoKey, Variable, test_support};
    use crate::needs::Weights;
    use crate::region::Region;
    use crate::select::{Selection, SelectionMode};
    use crate::view::NEUTRAL_FILL;

    use super::{ControlAction, InputEvent, Session, ViewTarget};

    fn key(s: &str) -> GeoKey {
        GeoKey::new(s)
    }

    fn session() -> Session {
        Session::new(test_support::small_dataset())
    }

    fn point_of(session: &Session, plot: Variable, k: &str) -> (f64, f64) {
        session.views().scatter(plot).unwrap().point_position(&key(k)).unwrap()
    }

    /// Drag a rectangle around a single scatter point.
    fn brush_around(session: &mut Session, plot: Variable, k: &str) {
        let (x, y) = point_of(session, plot, k);
        session.handle_event(InputEvent::DragStart { plot, x: x - 4.0, y: y - 4.0 });
        session.handle_event(InputEvent::DragMove { plot, x: x + 4.0, y: y + 4.0 });
        session.handle_event(InputEvent::DragEnd { plot, x: x + 4.0, y: y + 4.0 });
    }

    #[test]
    fn click_in_individual_mode_promotes_single_selection() {
        let mut s = session();
        s.handle_event(InputEvent::Click { view: ViewTarget::Map, key: key("47003") });

        assert_eq!(s.selection(), &Selection::Single(key("47003")));
        assert!(s.views().map.is_selected(&key("47003")));
        assert_eq!(s.detail().title, "Bedford");
    }

    #[test]
    fn click_in_cluster_mode_is_a_noop_on_the_store() {
        let mut s = session();
        s.handle_control(ControlAction::SetMode(SelectionMode::Cluster));
        s.handle_event(InputEvent::Click {
            view: ViewTarget::Scatter(Variable::MedianIncome),
            key: key("47003"),
        });

        assert!(s.selection().is_none());
    }

    #[test]
    fn brush_selects_live_and_finalizes_on_release() {
        let mut s = session();
        s.handle_control(ControlAction::SetMode(SelectionMode::Cluster));

        let plot = Variable::MedianIncome;
        let (x, y) = point_of(&s, plot, "47001");
        s.handle_event(InputEvent::DragStart { plot, x: x - 4.0, y: y - 4.0 });
        s.handle_event(InputEvent::DragMove { plot, x: x + 4.0, y: y + 4.0 });

        // Live update during the drag: every surface already restyled.
        assert!(s.selection().contains(&key("47001")));
        assert!(s.views().map.is_selected(&key("47001")));
        assert!(s.views().scatter(Variable::PovertyRate).unwrap().is_selected(&key("47001")));

        s.handle_event(InputEvent::DragEnd { plot, x: x + 4.0, y: y + 4.0 });
        assert!(matches!(s.selection(), Selection::Multiple(_)));
    }

    #[test]
    fn empty_brush_release_clears_the_selection() {
        let mut s = session();
        s.handle_control(ControlAction::SetMode(SelectionMode::Cluster));
        brush_around(&mut s, Variable::MedianIncome, "47001");
        assert!(!s.selection().is_none());

        // Zero-area gesture far from any point.
        let plot = Variable::MedianIncome;
        s.handle_event(InputEvent::DragStart { plot, x: 1.0, y: 1.0 });
        s.handle_event(InputEvent::DragEnd { plot, x: 1.0, y: 1.0 });
        assert!(s.selection().is_none());
    }

    #[test]
    fn brush_covering_no_points_ends_with_nothing_selected() {
        let mut s = session();
        s.handle_control(ControlAction::SetMode(SelectionMode::Cluster));
        brush_around(&mut s, Variable::MedianIncome, "47001");

        // Real drag area, but far from every plotted point.
        let plot = Variable::MedianIncome;
        s.handle_event(InputEvent::DragStart { plot, x: 400.0, y: 300.0 });
        s.handle_event(InputEvent::DragMove { plot, x: 430.0, y: 330.0 });
        s.handle_event(InputEvent::DragEnd { plot, x: 430.0, y: 330.0 });

        assert!(s.selection().is_none());
    }

    #[test]
    fn click_during_brush_is_suppressed() {
        let mut s = session();
        s.handle_control(ControlAction::SetMode(SelectionMode::Cluster));

        let plot = Variable::MedianIncome;
        s.handle_event(InputEvent::DragStart { plot, x: 0.0, y: 0.0 });
        s.handle_event(InputEvent::Click { view: ViewTarget::Scatter(plot), key: key("47005") });

        assert!(s.selection().is_none());
    }

    #[test]
    fn drag_is_ignored_in_individual_mode() {
        let mut s = session();
        let plot = Variable::MedianIncome;
        s.handle_event(InputEvent::DragStart { plot, x: 0.0, y: 0.0 });
        s.handle_event(InputEvent::DragMove { plot, x: 500.0, y: 500.0 });
        s.handle_event(InputEvent::DragEnd { plot, x: 500.0, y: 500.0 });

        assert!(s.selection().is_none());
    }

    #[test]
    fn mode_switch_resets_selection_and_brush_affordances() {
        let mut s = session();
        s.handle_event(InputEvent::Click { view: ViewTarget::Map, key: key("47001") });

        s.handle_control(ControlAction::SetMode(SelectionMode::Cluster));
        assert!(s.selection().is_none());
        assert!(s.views().scatters.iter().all(|sc| sc.brush_visible()));

        s.handle_control(ControlAction::SetMode(SelectionMode::Individual));
        assert!(s.selection().is_none());
        assert!(s.views().scatters.iter().all(|sc| !sc.brush_visible()));
    }

    #[test]
    fn region_quick_select_replaces_the_selection() {
        let mut s = session();
        s.handle_control(ControlAction::SelectRegion(Region::West));
        assert!(s.selection().contains(&key("47001")));
        assert!(!s.selection().contains(&key("47005")));

        s.handle_control(ControlAction::SelectAll);
        assert_eq!(s.selection().len(), 3);

        s.handle_control(ControlAction::ClearSelection);
        assert!(s.selection().is_none());
    }

    #[test]
    fn hover_is_transient_and_never_touches_the_store() {
        let mut s = session();
        s.handle_event(InputEvent::Click { view: ViewTarget::Map, key: key("47001") });

        s.handle_event(InputEvent::PointerEnter { view: ViewTarget::Map, key: key("47003") });
        assert_eq!(s.tooltip().unwrap().title, "Bedford");
        assert_eq!(s.selection(), &Selection::Single(key("47001")));

        s.handle_event(InputEvent::PointerLeave { view: ViewTarget::Map, key: key("47003") });
        assert!(s.tooltip().is_none());
    }

    #[test]
    fn applying_weights_recolors_the_map_by_needs_index() {
        let mut s = session();
        assert_eq!(s.layer(), Variable::DepressionAgeAdjusted);

        s.handle_control(ControlAction::ApplyWeights(Weights::EQUAL.into()));
        assert_eq!(s.layer(), Variable::NeedsIndex);
        assert_ne!(s.views().map.fill_of(&key("47001")).unwrap(), NEUTRAL_FILL);

        s.handle_control(ControlAction::ResetWeights);
        assert_eq!(s.layer(), Variable::DepressionAgeAdjusted);
    }

    #[test]
    fn applying_weights_preserves_selection_highlighting() {
        let mut s = session();
        s.handle_event(InputEvent::Click { view: ViewTarget::Map, key: key("47003") });
        s.handle_control(ControlAction::ApplyWeights(Weights::EQUAL.into()));

        assert!(s.views().map.is_selected(&key("47003")));
        // Detail refreshed with the newly computed score.
        assert!(s.detail().fields[0].value.ends_with("/10"));
    }

    #[test]
    fn tab_reactivation_reapplies_highlighting() {
        let mut s = session();
        s.handle_event(InputEvent::Click { view: ViewTarget::Map, key: key("47005") });
        s.handle_control(ControlAction::TabActivated);
        assert!(s.views().map.is_selected(&key("47005")));
    }

    #[test]
    fn reset_restores_the_initial_state() {
        let mut s = session();
        s.handle_control(ControlAction::ApplyWeights(Weights::EQUAL.into()));
        s.handle_event(InputEvent::Click { view: ViewTarget::Map, key: key("47001") });

        s.reset();
        assert!(s.selection().is_none());
        assert_eq!(s.mode(), SelectionMode::Individual);
        assert_eq!(s.layer(), Variable::DepressionAgeAdjusted);
        assert!(s.detail().is_placeholder());
    }

    #[test]
    fn empty_dataset_stays_unrendered_but_alive() {
        let mut s = Session::new(Dataset::from_parts(vec![], vec![]));
        assert_eq!(s.views().map.shape_count(), 0);

        s.handle_event(InputEvent::Click { view: ViewTarget::Map, key: key("47001") });
        assert_eq!(s.selection(), &Selection::Single(key("47001")));
        assert!(s.detail().is_placeholder()); // no row to present
    }
}
