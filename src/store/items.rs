use std::collections::{HashMap, HashSet};

use crate::{
    foundation::core::{BoardDimensions, Position},
    model::item::{ItemContent, ItemId, ItemKind, ScrollItem},
    services::velocity::VelocityService,
    store::pause::PauseState,
};

/// Lowest accepted global speed percentage.
pub const MIN_GLOBAL_VELOCITY: f64 = 10.0;
/// Highest accepted global speed percentage.
pub const MAX_GLOBAL_VELOCITY: f64 = 150.0;

const INITIAL_GLOBAL_VELOCITY: f64 = 100.0;
const RESET_GLOBAL_VELOCITY: f64 = 50.0;
const DEFAULT_ITEM_COUNT: usize = 20;

/// Item totals by kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct ItemsCount {
    /// All items.
    pub total: usize,
    /// Image items.
    pub images: usize,
    /// Text items.
    pub texts: usize,
}

/// Partial update applied by [`ItemStore::update_item`]. The id is immutable.
#[derive(Clone, Debug, Default)]
pub struct ItemPatch {
    /// New position.
    pub position: Option<Position>,
    /// New velocity.
    pub velocity: Option<f64>,
    /// New paint order.
    pub z_index: Option<i32>,
    /// New rotation.
    pub rotation: Option<f64>,
    /// New payload.
    pub content: Option<ItemContent>,
}

/// Single source of truth for item state.
///
/// Items live in an ordered list with an id→slot index that always mirrors the list's
/// membership. Every mutation on an unknown id is a silent no-op.
#[derive(Debug)]
pub struct ItemStore {
    items: Vec<ScrollItem>,
    index: HashMap<ItemId, usize>,
    global_velocity: f64,
    item_count: usize,
    show_texts: bool,
    board: BoardDimensions,
    pub(crate) pause: PauseState,
    epoch: u64,
    pause_writes: u64,
}

impl Default for ItemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemStore {
    /// Empty store at 100 % speed showing 20 items.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
            global_velocity: INITIAL_GLOBAL_VELOCITY,
            item_count: DEFAULT_ITEM_COUNT,
            show_texts: true,
            board: BoardDimensions::default(),
            pause: PauseState::default(),
            epoch: 0,
            pause_writes: 0,
        }
    }

    /// All items in insertion order.
    pub fn items(&self) -> &[ScrollItem] {
        &self.items
    }

    /// Global speed percentage.
    pub fn global_velocity(&self) -> f64 {
        self.global_velocity
    }

    /// How many items from the front of the list are animated.
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Whether text items are displayed.
    pub fn show_texts(&self) -> bool {
        self.show_texts
    }

    /// Current board bounds.
    pub fn board_dimensions(&self) -> BoardDimensions {
        self.board
    }

    /// Identity of the item collection; bumped whenever it is replaced wholesale.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Number of effective pause-flag mutations since construction.
    pub fn pause_writes(&self) -> u64 {
        self.pause_writes
    }

    /// Image items in list order.
    pub fn image_items(&self) -> Vec<&ScrollItem> {
        self.items.iter().filter(|i| i.is_image()).collect()
    }

    /// Text items in list order.
    pub fn text_items(&self) -> Vec<&ScrollItem> {
        self.items.iter().filter(|i| i.is_text()).collect()
    }

    /// Items whose physics run: the first `item_count` items, images only while texts are hidden.
    pub fn visible_items(&self) -> Vec<&ScrollItem> {
        self.items
            .iter()
            .filter(|i| self.show_texts || i.is_image())
            .take(self.item_count)
            .collect()
    }

    /// Totals by kind.
    pub fn items_count(&self) -> ItemsCount {
        let images = self.items.iter().filter(|i| i.is_image()).count();
        ItemsCount {
            total: self.items.len(),
            images,
            texts: self.items.len() - images,
        }
    }

    /// Items in ascending paint order. Ties keep list order.
    pub fn sorted_by_z_index(&self) -> Vec<&ScrollItem> {
        let mut out: Vec<&ScrollItem> = self.items.iter().collect();
        out.sort_by_key(|i| i.z_index);
        out
    }

    /// Global speed as a fraction.
    pub fn speed_multiplier(&self) -> f64 {
        self.global_velocity / 100.0
    }

    /// O(1) lookup.
    pub fn get_item_by_id(&self, id: &ItemId) -> Option<&ScrollItem> {
        self.index.get(id).map(|&slot| &self.items[slot])
    }

    /// Items of one kind in list order.
    pub fn get_items_by_type(&self, kind: ItemKind) -> Vec<&ScrollItem> {
        self.items.iter().filter(|i| i.kind() == kind).collect()
    }

    /// Whether the id index holds exactly the ids in the list.
    pub fn index_is_consistent(&self) -> bool {
        self.index.len() == self.items.len()
            && self
                .items
                .iter()
                .enumerate()
                .all(|(slot, item)| self.index.get(&item.id) == Some(&slot))
    }

    /// Append one item. An id that is already live is ignored.
    pub fn add_item(&mut self, item: ScrollItem) {
        if self.index.contains_key(&item.id) {
            tracing::warn!(id = %item.id, "duplicate item id ignored");
            return;
        }
        self.index.insert(item.id.clone(), self.items.len());
        self.items.push(item);
    }

    /// Append items in order.
    pub fn add_items(&mut self, items: impl IntoIterator<Item = ScrollItem>) {
        for item in items {
            self.add_item(item);
        }
    }

    /// Remove one item and its pause-cache entry.
    pub fn remove_item(&mut self, id: &ItemId) {
        let Some(slot) = self.index.remove(id) else {
            return;
        };
        self.items.remove(slot);
        self.pause.paused_positions.remove(id);
        for (i, item) in self.items.iter().enumerate().skip(slot) {
            self.index.insert(item.id.clone(), i);
        }
    }

    /// Remove many items and their pause-cache entries.
    pub fn remove_items(&mut self, ids: &[ItemId]) {
        let doomed: HashSet<&ItemId> = ids.iter().collect();
        let before = self.items.len();
        self.items.retain(|i| !doomed.contains(&i.id));
        if self.items.len() == before {
            return;
        }
        self.pause
            .paused_positions
            .retain(|id, _| !doomed.contains(id));
        self.rebuild_index();
    }

    /// Drop every item.
    pub fn clear_items(&mut self) {
        self.items.clear();
        self.index.clear();
        self.pause.paused_positions.clear();
        self.epoch += 1;
    }

    /// Replace the whole collection. Later duplicates of an id are dropped.
    pub fn set_items(&mut self, items: Vec<ScrollItem>) {
        self.clear_items();
        self.add_items(items);
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (slot, item) in self.items.iter().enumerate() {
            self.index.insert(item.id.clone(), slot);
        }
    }

    fn item_mut(&mut self, id: &ItemId) -> Option<&mut ScrollItem> {
        let slot = *self.index.get(id)?;
        self.items.get_mut(slot)
    }

    /// Move an item.
    pub fn update_item_position(&mut self, id: &ItemId, position: Position) {
        if let Some(item) = self.item_mut(id) {
            item.position = position;
        }
    }

    /// Apply a position computed off the main loop.
    pub fn update_item_position_direct(&mut self, id: &ItemId, x: f64, y: f64) {
        self.update_item_position(id, Position::new(x, y));
    }

    /// Set an item's velocity; negative input is stored as zero.
    pub fn update_item_velocity(&mut self, id: &ItemId, velocity: f64) {
        if let Some(item) = self.item_mut(id) {
            item.velocity = velocity.max(0.0);
        }
    }

    /// Set an item's paint order.
    pub fn update_item_z_index(&mut self, id: &ItemId, z_index: i32) {
        if let Some(item) = self.item_mut(id) {
            item.z_index = z_index;
        }
    }

    /// Apply a partial update.
    pub fn update_item(&mut self, id: &ItemId, patch: ItemPatch) {
        let Some(item) = self.item_mut(id) else {
            return;
        };
        if let Some(p) = patch.position {
            item.position = p;
        }
        if let Some(v) = patch.velocity {
            item.velocity = v.max(0.0);
        }
        if let Some(z) = patch.z_index {
            item.z_index = z;
        }
        if let Some(r) = patch.rotation {
            item.rotation = r;
        }
        if let Some(c) = patch.content {
            item.content = c;
        }
    }

    /// Raise an item above every other item.
    pub fn bring_to_front(&mut self, id: &ItemId) {
        if !self.index.contains_key(id) {
            return;
        }
        let top = self.items.iter().map(|i| i.z_index).max().unwrap_or(0);
        self.update_item_z_index(id, top + 1);
    }

    /// Recompute every item's velocity from the service's current multiplier.
    pub fn update_all_velocities(&mut self, velocity: &mut VelocityService) {
        let base = velocity.default_velocity();
        for item in &mut self.items {
            item.velocity = velocity.calculate_item_velocity(base, item.kind());
        }
    }

    /// Set the global speed percentage, clamped to `[10, 150]`. `NaN` is ignored.
    pub fn update_global_velocity(&mut self, percent: f64) {
        if percent.is_nan() {
            return;
        }
        self.global_velocity = percent.clamp(MIN_GLOBAL_VELOCITY, MAX_GLOBAL_VELOCITY);
    }

    /// Set the global speed from a fraction.
    pub fn set_speed_multiplier(&mut self, multiplier: f64) {
        self.update_global_velocity(multiplier * 100.0);
    }

    /// Set how many items are animated; at least one.
    pub fn update_item_count(&mut self, count: usize) {
        self.item_count = count.max(1);
    }

    /// Show or hide text items.
    pub fn set_show_texts(&mut self, show: bool) {
        self.show_texts = show;
    }

    /// Flip text visibility.
    pub fn toggle_texts(&mut self) {
        self.show_texts = !self.show_texts;
    }

    /// Record the board bounds.
    pub fn set_board_dimensions(&mut self, board: BoardDimensions) {
        self.board = board;
    }

    /// Whether the wall is frozen.
    pub fn is_paused(&self) -> bool {
        self.pause.is_paused
    }

    /// Epoch millis of the last effective pause, if paused.
    pub fn pause_timestamp(&self) -> Option<u64> {
        self.pause.pause_timestamp
    }

    /// Read-only view of the pause state.
    pub fn pause_state(&self) -> &PauseState {
        &self.pause
    }

    /// Set the paused flag.
    ///
    /// Pausing stamps `now_epoch_ms`; resuming clears the stamp and the whole pause cache.
    /// Setting the flag to its current value is not a mutation and is not counted.
    pub fn set_paused(&mut self, paused: bool, now_epoch_ms: u64) {
        if self.pause.is_paused == paused {
            return;
        }
        self.pause_writes += 1;
        if paused {
            self.pause.is_paused = true;
            self.pause.pause_timestamp = Some(now_epoch_ms);
        } else {
            self.pause.clear();
        }
    }

    /// Flip the paused flag.
    pub fn toggle_pause(&mut self, now_epoch_ms: u64) {
        self.set_paused(!self.pause.is_paused, now_epoch_ms);
    }

    /// Store a frozen translate value. Ignored while running or for unknown ids.
    pub fn save_paused_position(&mut self, id: &ItemId, translate_x: f64) {
        if !self.pause.is_paused || !self.index.contains_key(id) {
            return;
        }
        self.pause.paused_positions.insert(id.clone(), translate_x);
    }

    /// Frozen translate value for an item.
    pub fn paused_position_x(&self, id: &ItemId) -> Option<f64> {
        self.pause.paused_positions.get(id).copied()
    }

    /// Empty the pause cache without resuming.
    pub fn clear_paused_positions(&mut self) {
        self.pause.paused_positions.clear();
    }

    /// Restore documented defaults: speed 50 %, 20 items, texts shown, no items, unpaused.
    pub fn reset(&mut self) {
        self.items.clear();
        self.index.clear();
        self.global_velocity = RESET_GLOBAL_VELOCITY;
        self.item_count = DEFAULT_ITEM_COUNT;
        self.show_texts = true;
        self.board = BoardDimensions::default();
        self.pause.clear();
        self.epoch += 1;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/items.rs"]
mod tests;
