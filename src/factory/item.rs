use std::sync::Arc;

use crate::{
    factory::content::{ContentFactory, ImageData},
    foundation::{
        clock::Clock,
        error::WallResult,
        random::{WallRng, random_range, seeded_rng},
    },
    model::item::{ItemContent, ItemId, ItemKind, ScrollItem},
    services::{position::PositionService, velocity::VelocityService},
};

const Z_INDEX_BASE: i32 = 10;
const Z_INDEX_SPREAD: f64 = 30.0;
const IMAGE_ROTATION_DEG: f64 = 20.0;
const TEXT_ROTATION_DEG: f64 = 10.0;

/// One entry of a mixed batch.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ItemSeed {
    /// Image input.
    Image(ImageData),
    /// Text input.
    Text(String),
}

/// Assembles complete scroll items from raw inputs.
///
/// Owns the position and velocity services used for spawn placement and speed, so batches are
/// placed by their index in the batch.
pub struct ScrollItemFactory {
    position: PositionService,
    velocity: VelocityService,
    content: ContentFactory,
    clock: Arc<dyn Clock>,
    counter: u64,
    rng: WallRng,
}

impl std::fmt::Debug for ScrollItemFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollItemFactory")
            .field("position", &self.position)
            .field("velocity", &self.velocity)
            .field("counter", &self.counter)
            .finish_non_exhaustive()
    }
}

impl ScrollItemFactory {
    /// OS-seeded factory.
    pub fn new(
        position: PositionService,
        velocity: VelocityService,
        content: ContentFactory,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::with_rng(position, velocity, content, clock, seeded_rng(None))
    }

    /// Factory with a seeded RNG for z-index and rotation.
    pub fn with_seed(
        position: PositionService,
        velocity: VelocityService,
        content: ContentFactory,
        clock: Arc<dyn Clock>,
        seed: u64,
    ) -> Self {
        Self::with_rng(position, velocity, content, clock, seeded_rng(Some(seed)))
    }

    fn with_rng(
        position: PositionService,
        velocity: VelocityService,
        content: ContentFactory,
        clock: Arc<dyn Clock>,
        rng: WallRng,
    ) -> Self {
        Self {
            position,
            velocity,
            content,
            clock,
            counter: 0,
            rng,
        }
    }

    /// Image item spawned at slot `index`.
    pub fn create_image_item(
        &mut self,
        data: &ImageData,
        index: usize,
        base_velocity: f64,
    ) -> WallResult<ScrollItem> {
        let content = self.content.create_image_content(data)?;
        Ok(self.assemble(ItemContent::Image(content), index, base_velocity))
    }

    /// Text item spawned at slot `index`.
    pub fn create_text_item(
        &mut self,
        text: &str,
        index: usize,
        base_velocity: f64,
    ) -> WallResult<ScrollItem> {
        let content = self.content.create_text_content(text)?;
        Ok(self.assemble(ItemContent::Text(content), index, base_velocity))
    }

    /// Mixed batch; entry `i` is placed at slot `start_index + i`.
    pub fn create_batch(
        &mut self,
        seeds: &[ItemSeed],
        start_index: usize,
        base_velocity: f64,
    ) -> WallResult<Vec<ScrollItem>> {
        seeds
            .iter()
            .enumerate()
            .map(|(i, seed)| match seed {
                ItemSeed::Image(data) => {
                    self.create_image_item(data, start_index + i, base_velocity)
                }
                ItemSeed::Text(text) => self.create_text_item(text, start_index + i, base_velocity),
            })
            .collect()
    }

    /// Image batch; entry `i` is placed at slot `start_index + i`.
    pub fn create_image_batch(
        &mut self,
        data: &[ImageData],
        start_index: usize,
        base_velocity: f64,
    ) -> WallResult<Vec<ScrollItem>> {
        data.iter()
            .enumerate()
            .map(|(i, d)| self.create_image_item(d, start_index + i, base_velocity))
            .collect()
    }

    /// Text batch; entry `i` is placed at slot `start_index + i`.
    pub fn create_text_batch(
        &mut self,
        texts: &[String],
        start_index: usize,
        base_velocity: f64,
    ) -> WallResult<Vec<ScrollItem>> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| self.create_text_item(t, start_index + i, base_velocity))
            .collect()
    }

    /// Restart the id counter.
    pub fn reset_counter(&mut self) {
        self.counter = 0;
    }

    /// Items created since construction or the last reset.
    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Placement service.
    pub fn position_service(&self) -> &PositionService {
        &self.position
    }

    /// Placement service, mutable (board updates).
    pub fn position_service_mut(&mut self) -> &mut PositionService {
        &mut self.position
    }

    /// Velocity service.
    pub fn velocity_service(&self) -> &VelocityService {
        &self.velocity
    }

    /// Velocity service, mutable (global speed).
    pub fn velocity_service_mut(&mut self) -> &mut VelocityService {
        &mut self.velocity
    }

    /// Payload factory.
    pub fn content_factory(&self) -> &ContentFactory {
        &self.content
    }

    fn assemble(&mut self, content: ItemContent, index: usize, base_velocity: f64) -> ScrollItem {
        let kind = content.kind();
        let rotation = match kind {
            ItemKind::Image => IMAGE_ROTATION_DEG,
            ItemKind::Text => TEXT_ROTATION_DEG,
        };
        ScrollItem {
            id: self.generate_id(kind, index),
            position: self.position.generate_offscreen_position(index),
            velocity: self.velocity.calculate_item_velocity(base_velocity, kind),
            z_index: Z_INDEX_BASE
                + random_range(&mut self.rng, 0.0, Z_INDEX_SPREAD).floor() as i32,
            rotation: random_range(&mut self.rng, -rotation, rotation),
            content,
        }
    }

    fn generate_id(&mut self, kind: ItemKind, index: usize) -> ItemId {
        self.counter += 1;
        ItemId(format!(
            "{}-{}-{}-{}",
            kind.id_prefix(),
            self.clock.epoch_millis(),
            index,
            self.counter
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/factory/item.rs"]
mod tests;
