use std::{collections::HashMap, sync::Arc};

use crate::{
    foundation::clock::Clock,
    model::item::ItemId,
    store::items::ItemStore,
};

/// Freeze-frame state of the wall.
///
/// `paused_positions` is only ever non-empty while `is_paused` holds; resuming clears it together
/// with the timestamp.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PauseState {
    /// Whether the engine must stop writing positions.
    pub is_paused: bool,
    /// Frozen translate value per item, used by the paint layer while paused.
    pub paused_positions: HashMap<ItemId, f64>,
    /// Epoch millis of the pause.
    pub pause_timestamp: Option<u64>,
}

impl PauseState {
    pub(crate) fn clear(&mut self) {
        self.is_paused = false;
        self.paused_positions.clear();
        self.pause_timestamp = None;
    }
}

/// One frozen translate value handed to [`PauseControl::save_all_positions`].
#[derive(Clone, Debug, PartialEq)]
pub struct SavedPosition {
    /// Item id.
    pub id: ItemId,
    /// Translate value to freeze.
    pub translate_x: f64,
}

/// User-facing pause/resume controls over an [`ItemStore`].
///
/// `pause` and `resume` only touch the store when the transition is valid, so repeated calls
/// leave [`ItemStore::pause_writes`] unchanged.
#[derive(Clone)]
pub struct PauseControl {
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for PauseControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PauseControl").finish_non_exhaustive()
    }
}

impl PauseControl {
    /// Controls stamping pauses with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Freeze the wall. No-op while already paused.
    pub fn pause(&self, store: &mut ItemStore) {
        if !store.is_paused() {
            tracing::debug!("pausing animation");
            store.set_paused(true, self.clock.epoch_millis());
        }
    }

    /// Unfreeze the wall and drop the pause cache. No-op while running.
    pub fn resume(&self, store: &mut ItemStore) {
        if store.is_paused() {
            tracing::debug!("resuming animation");
            store.set_paused(false, self.clock.epoch_millis());
        }
    }

    /// Pause when running, resume when paused.
    pub fn toggle(&self, store: &mut ItemStore) {
        tracing::debug!(
            from = store.is_paused(),
            to = !store.is_paused(),
            "toggling pause state"
        );
        store.toggle_pause(self.clock.epoch_millis());
    }

    /// Freeze one item's translate value.
    pub fn save_position(&self, store: &mut ItemStore, id: &ItemId, translate_x: f64) {
        store.save_paused_position(id, translate_x);
        tracing::trace!(%id, translate_x, "saved position");
    }

    /// Freeze many translate values.
    pub fn save_all_positions(&self, store: &mut ItemStore, positions: &[SavedPosition]) {
        for p in positions {
            store.save_paused_position(&p.id, p.translate_x);
        }
        tracing::debug!(count = positions.len(), "saved positions");
    }

    /// Frozen translate value for an item.
    pub fn get_saved_position(&self, store: &ItemStore, id: &ItemId) -> Option<f64> {
        store.paused_position_x(id)
    }

    /// Empty the pause cache without resuming.
    pub fn clear_saved_positions(&self, store: &mut ItemStore) {
        tracing::debug!("clearing all saved positions");
        store.clear_paused_positions();
    }

    /// Pause and freeze every visible item's current `x`, ready for a snapshot.
    ///
    /// Returns the number of positions saved.
    pub fn pause_and_capture(&self, store: &mut ItemStore) -> usize {
        self.pause(store);
        let frozen: Vec<SavedPosition> = store
            .visible_items()
            .into_iter()
            .map(|i| SavedPosition {
                id: i.id.clone(),
                translate_x: i.position.x,
            })
            .collect();
        self.save_all_positions(store, &frozen);
        frozen.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/pause.rs"]
mod tests;
