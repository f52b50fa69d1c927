//! What a product table shows, derived from the cache state.

use crate::framework::{filter, CatalogEntity, LoadState};

/// The three things the table can display.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenState<T> {
    /// No load has completed yet.
    Loading,
    /// The first load failed; carries the message to show.
    Error(String),
    /// The filtered rows in display order.
    Rows(Vec<T>),
}

impl<T: CatalogEntity> ScreenState<T> {
    /// Projects the load state and the snapshot onto the screen.
    ///
    /// Once any load has succeeded the table keeps showing rows, even if a later
    /// refetch fails.
    pub fn derive(state: &LoadState, items: &[T], term: &str) -> Self {
        match state {
            LoadState::Idle | LoadState::Loading => ScreenState::Loading,
            LoadState::Failed(e) => ScreenState::Error(e.to_string()),
            LoadState::Ready => ScreenState::Rows(filter(items, term).into_iter().cloned().collect()),
        }
    }

    pub fn rows(&self) -> &[T] {
        match self {
            ScreenState::Rows(rows) => rows,
            _ => &[],
        }
    }
}
