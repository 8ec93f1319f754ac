mod state;

pub use state::{Selection, SelectionMode, SelectionSnapshot, SelectionStore};
