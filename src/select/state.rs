use ahash::AHashSet;

use crate::dataset::GeoKey;

/// The current selection: none, exactly one county, or a set of counties.
/// Single and Multiple are mutually exclusive and never merged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Single(GeoKey),
    Multiple(AHashSet<GeoKey>),
}

impl Selection {
    pub fn is_none(&self) -> bool {
        matches!(self, Selection::None)
    }

    pub fn single(&self) -> Option<&GeoKey> {
        match self {
            Selection::Single(key) => Some(key),
            _ => None,
        }
    }

    pub fn contains(&self, key: &GeoKey) -> bool {
        match self {
            Selection::None => false,
            Selection::Single(k) => k == key,
            Selection::Multiple(set) => set.contains(key),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Selection::None => 0,
            Selection::Single(_) => 1,
            Selection::Multiple(set) => set.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Which interaction producers may write to the store: clicks in
/// `Individual`, brushes (and their live drag-frames) in `Cluster`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum SelectionMode {
    #[default]
    Individual,
    Cluster,
}

/// The state handed to subscribers on every mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSnapshot {
    pub selection: Selection,
    pub mode: SelectionMode,
    pub brush_enabled: bool,
}

type Subscriber = Box<dyn FnMut(&SelectionSnapshot)>;

/// Single source of truth for the cross-view selection.
///
/// All mutations are synchronous: every subscriber runs before the setter
/// returns, so no view ever observes a stale selection after a gesture
/// completes.
#[derive(Default)]
pub struct SelectionStore {
    selection: Selection,
    mode: SelectionMode,
    subscribers: Vec<Subscriber>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &Selection {
        &self.selection
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Brushing is only available in cluster mode; the renderer consumes
    /// this to toggle brush affordances on all scatterplots at once.
    pub fn brush_enabled(&self) -> bool {
        self.mode == SelectionMode::Cluster
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&SelectionSnapshot) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Switch interaction mode. Always resets the selection to none.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        self.mode = mode;
        self.selection = Selection::None;
        self.notify();
    }

    /// Select exactly one county, clearing any multi-selection first.
    /// `select_single(None)` is equivalent to [`SelectionStore::clear`].
    pub fn select_single(&mut self, key: Option<GeoKey>) {
        self.selection = match key {
            Some(key) => Selection::Single(key),
            None => Selection::None,
        };
        self.notify();
    }

    /// Replace (never union) the selection with the given set, clearing any
    /// single selection first. An empty set resets to none.
    pub fn select_multiple(&mut self, keys: AHashSet<GeoKey>) {
        self.selection = if keys.is_empty() {
            Selection::None
        } else {
            Selection::Multiple(keys)
        };
        self.notify();
    }

    pub fn clear(&mut self) {
        self.select_single(None);
    }

    fn notify(&mut self) {
        let snapshot = SelectionSnapshot {
            selection: self.selection.clone(),
            mode: self.mode,
            brush_enabled: self.brush_enabled(),
        };

        // Subscribers run with the list detached so they may not re-enter
        // the setters; subscriptions added during notification survive.
        let mut subscribers = std::mem::take(&mut self.subscribers);
        for subscriber in subscribers.iter_mut() {
            subscriber(&snapshot);
        }
        subscribers.append(&mut self.subscribers);
        self.subscribers = subscribers;
    }
}
