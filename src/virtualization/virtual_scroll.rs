use std::collections::HashSet;

use crate::{
    config::scroll::{SizeConfig, VirtualizationConfig},
    foundation::core::{Rect, Size},
    model::item::{ItemId, ScrollItem},
};

/// Membership transition emitted by [`IntersectionTracker::update`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IntersectionChange {
    /// The item's bounds started touching the grown viewport.
    Enter(ItemId),
    /// The item's bounds left the grown viewport.
    Exit(ItemId),
}

/// Geometric intersection observer.
///
/// Tracks which observed items overlap the viewport grown by `root_margin` on every side.
/// Touching edges count as intersecting.
#[derive(Clone, Debug, Default)]
pub struct IntersectionTracker {
    root_margin: f64,
    observed: HashSet<ItemId>,
    intersecting: HashSet<ItemId>,
}

impl IntersectionTracker {
    /// Tracker with no observed items.
    pub fn new(root_margin: f64) -> Self {
        Self {
            root_margin: root_margin.max(0.0),
            ..Self::default()
        }
    }

    /// Start observing `id`. Membership is decided on the next [`Self::update`].
    pub fn observe(&mut self, id: ItemId) {
        self.observed.insert(id);
    }

    /// Stop observing `id` and drop it from the membership set.
    pub fn unobserve(&mut self, id: &ItemId) {
        self.observed.remove(id);
        self.intersecting.remove(id);
    }

    /// Stop observing everything.
    pub fn unobserve_all(&mut self) {
        self.observed.clear();
        self.intersecting.clear();
    }

    /// Whether `id` is currently observed.
    pub fn is_observed(&self, id: &ItemId) -> bool {
        self.observed.contains(id)
    }

    /// Whether `id` currently intersects.
    pub fn is_intersecting(&self, id: &ItemId) -> bool {
        self.intersecting.contains(id)
    }

    /// Ids currently intersecting.
    pub fn intersecting_ids(&self) -> &HashSet<ItemId> {
        &self.intersecting
    }

    /// Recompute membership for every observed item present in `items`.
    ///
    /// Observed ids missing from `items` keep their last state until unobserved.
    pub fn update(
        &mut self,
        viewport: Rect,
        items: &[ScrollItem],
        sizes: &SizeConfig,
    ) -> Vec<IntersectionChange> {
        let root = viewport.inflate(self.root_margin, self.root_margin);
        let mut changes = Vec::new();
        for item in items.iter().filter(|i| self.observed.contains(&i.id)) {
            let bounds = Rect::from_origin_size(item.position, item.estimated_size(sizes));
            let hit = touches(root, bounds);
            let was = self.intersecting.contains(&item.id);
            if hit && !was {
                self.intersecting.insert(item.id.clone());
                changes.push(IntersectionChange::Enter(item.id.clone()));
            } else if !hit && was {
                self.intersecting.remove(&item.id);
                changes.push(IntersectionChange::Exit(item.id.clone()));
            }
        }
        changes
    }
}

fn touches(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

/// Counters describing how much the render-level filter saves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderingStats {
    /// Items in the store.
    pub total_items: usize,
    /// Items that pass the virtual filter.
    pub virtual_items: usize,
    /// Ids the intersection tracker reports as intersecting.
    pub visible_items: usize,
    /// Percentage of items filtered out, rounded.
    pub reduction_rate: u32,
}

/// Render-level filter: which items should exist as painted nodes at all.
///
/// Independent from the store's count-based visible items that drive animation.
#[derive(Clone, Debug)]
pub struct VirtualScroll {
    buffer_zone: f64,
    viewport: Size,
    tracker: IntersectionTracker,
}

impl VirtualScroll {
    /// Filter for a viewport of the given size.
    pub fn new(config: &VirtualizationConfig, viewport: Size) -> Self {
        Self {
            buffer_zone: config.buffer_zone,
            viewport,
            tracker: IntersectionTracker::new(config.root_margin),
        }
    }

    /// Replace the viewport size.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Current viewport size.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Point check: `x` within `[-buffer, viewport_width + buffer]`.
    pub fn in_buffer_zone(&self, x: f64) -> bool {
        x >= -self.buffer_zone && x <= self.viewport.width + self.buffer_zone
    }

    /// Items passing the point check or reported by the tracker, in store order.
    pub fn virtual_items<'a>(&self, items: &'a [ScrollItem]) -> Vec<&'a ScrollItem> {
        items
            .iter()
            .filter(|i| self.in_buffer_zone(i.position.x) || self.tracker.is_intersecting(&i.id))
            .collect()
    }

    /// Intersection tracker.
    pub fn tracker(&self) -> &IntersectionTracker {
        &self.tracker
    }

    /// Intersection tracker, mutable (observe / unobserve).
    pub fn tracker_mut(&mut self) -> &mut IntersectionTracker {
        &mut self.tracker
    }

    /// Observe every item in `items`.
    pub fn observe_all(&mut self, items: &[ScrollItem]) {
        for item in items {
            self.tracker.observe(item.id.clone());
        }
    }

    /// Run the tracker against the current viewport.
    pub fn refresh(&mut self, items: &[ScrollItem], sizes: &SizeConfig) -> Vec<IntersectionChange> {
        let viewport = Rect::from_origin_size((0.0, 0.0), self.viewport);
        self.tracker.update(viewport, items, sizes)
    }

    /// Stats over `items`.
    pub fn rendering_stats(&self, items: &[ScrollItem]) -> RenderingStats {
        let total_items = items.len();
        let virtual_items = self.virtual_items(items).len();
        let reduction_rate = if total_items == 0 {
            0
        } else {
            ((1.0 - virtual_items as f64 / total_items as f64) * 100.0).round() as u32
        };
        RenderingStats {
            total_items,
            virtual_items,
            visible_items: self.tracker.intersecting_ids().len(),
            reduction_rate,
        }
    }

    /// Emit [`Self::rendering_stats`] at `debug` level; silent on an empty store.
    pub fn log_stats(&self, items: &[ScrollItem]) {
        let stats = self.rendering_stats(items);
        if stats.total_items > 0 {
            tracing::debug!(
                total = stats.total_items,
                virtual_items = stats.virtual_items,
                visible = stats.visible_items,
                reduction = stats.reduction_rate,
                "virtual scroll stats"
            );
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/virtualization/virtual_scroll.rs"]
mod tests;
