use std::sync::Arc;

use crate::{
    config::scroll::ScrollConfig,
    factory::{
        content::{ContentFactory, ImageData},
        item::{ItemSeed, ScrollItemFactory},
    },
    foundation::{
        clock::Clock,
        core::BoardDimensions,
        error::{WallError, WallResult},
        random::{WallRng, random_bool, seeded_rng, shuffle},
    },
    model::item::{ItemId, ScrollItem},
    services::{position::PositionService, velocity::VelocityService},
    store::items::ItemStore,
    wall::media::MediaData,
};

/// Options for [`ItemManager::generate_from_media`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Most images taken from the media.
    pub max_images: usize,
    /// Most texts considered from the media.
    pub max_texts: usize,
    /// Shuffle the mixed list before adding it.
    pub shuffle: bool,
    /// Chance each considered text is kept.
    pub text_probability: f64,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            max_images: 20,
            max_texts: 15,
            shuffle: true,
            text_probability: 0.7,
        }
    }
}

/// Counts reported by [`ItemManager::generate_from_media`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSummary {
    /// Images taken from the media.
    pub image_count: usize,
    /// Texts considered from the media, before the keep roll.
    pub text_count: usize,
    /// Items actually added.
    pub total_count: usize,
}

/// Snapshot of the facade and the store it manages.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerStats {
    /// Items in the store.
    pub total_items: usize,
    /// Items the engine animates.
    pub visible_items: usize,
    /// Image items in the store.
    pub image_items: usize,
    /// Text items in the store.
    pub text_items: usize,
    /// Global speed percentage.
    pub global_speed: f64,
    /// Whether text items are shown.
    pub show_texts: bool,
    /// Whether services are constructed.
    pub is_initialized: bool,
}

/// Item-management facade: wires the factories to the store.
///
/// Owns the [`ItemStore`]; item operations require [`Self::initialize_services`] first.
pub struct ItemManager {
    config: ScrollConfig,
    clock: Arc<dyn Clock>,
    seed: Option<u64>,
    rng: WallRng,
    factory: Option<ScrollItemFactory>,
    store: ItemStore,
}

impl std::fmt::Debug for ItemManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemManager")
            .field("seed", &self.seed)
            .field("initialized", &self.factory.is_some())
            .field("items", &self.store.items().len())
            .finish_non_exhaustive()
    }
}

impl ItemManager {
    /// Facade over an empty store. `seed` makes every service reproducible.
    pub fn new(config: ScrollConfig, clock: Arc<dyn Clock>, seed: Option<u64>) -> Self {
        Self {
            config,
            clock,
            seed,
            rng: seeded_rng(seed),
            factory: None,
            store: ItemStore::new(),
        }
    }

    /// Build the services for a board of `width × height`.
    ///
    /// Calling again replaces the services; the id counter restarts.
    pub fn initialize_services(&mut self, width: f64, height: f64) {
        let board = BoardDimensions::new(width.max(0.0), height.max(0.0));
        let cfg = &self.config;
        let factory = match self.seed {
            Some(s) => ScrollItemFactory::with_seed(
                PositionService::with_seed(cfg.position.clone(), board, s.wrapping_add(1)),
                VelocityService::with_seed(cfg.velocity.clone(), s.wrapping_add(2)),
                ContentFactory::with_seed(cfg, s.wrapping_add(3)),
                Arc::clone(&self.clock),
                s.wrapping_add(4),
            ),
            None => ScrollItemFactory::new(
                PositionService::new(cfg.position.clone(), board),
                VelocityService::new(cfg.velocity.clone()),
                ContentFactory::new(cfg),
                Arc::clone(&self.clock),
            ),
        };
        self.factory = Some(factory);
        self.store.set_board_dimensions(board);
        tracing::debug!(width = board.width, height = board.height, "item services initialized");
    }

    /// Whether [`Self::initialize_services`] has run since construction or cleanup.
    pub fn is_initialized(&self) -> bool {
        self.factory.is_some()
    }

    /// Configuration the services were built from.
    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    /// The managed store.
    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    /// The managed store, mutable (engine frames, pause control).
    pub fn store_mut(&mut self) -> &mut ItemStore {
        &mut self.store
    }

    /// A copy of the placement service, for an engine that wraps on its own.
    pub fn position_service(&self) -> WallResult<PositionService> {
        Ok(self.factory()?.position_service().clone())
    }

    /// Add image items placed from slot `start_index`.
    pub fn add_image_items(
        &mut self,
        images: &[ImageData],
        start_index: usize,
    ) -> WallResult<Vec<ScrollItem>> {
        let factory = self.factory_mut()?;
        let base = factory.velocity_service().default_velocity();
        let items = factory.create_image_batch(images, start_index, base)?;
        self.store.add_items(items.iter().cloned());
        Ok(items)
    }

    /// Add text items placed from slot `start_index`.
    pub fn add_text_items(
        &mut self,
        texts: &[String],
        start_index: usize,
    ) -> WallResult<Vec<ScrollItem>> {
        let factory = self.factory_mut()?;
        let base = factory.velocity_service().default_velocity();
        let items = factory.create_text_batch(texts, start_index, base)?;
        self.store.add_items(items.iter().cloned());
        Ok(items)
    }

    /// Add a mixed batch placed from slot `start_index`.
    pub fn add_mixed_items(
        &mut self,
        seeds: &[ItemSeed],
        start_index: usize,
    ) -> WallResult<Vec<ScrollItem>> {
        let factory = self.factory_mut()?;
        let base = factory.velocity_service().default_velocity();
        let items = factory.create_batch(seeds, start_index, base)?;
        self.store.add_items(items.iter().cloned());
        Ok(items)
    }

    /// Remove one item. Unknown ids are ignored.
    pub fn remove_item(&mut self, id: &ItemId) {
        self.store.remove_item(id);
    }

    /// Remove several items. Unknown ids are ignored.
    pub fn remove_items(&mut self, ids: &[ItemId]) {
        self.store.remove_items(ids);
    }

    /// Drop every item.
    pub fn clear_all_items(&mut self) {
        self.store.clear_items();
    }

    /// Raise an item above all others.
    pub fn bring_item_to_front(&mut self, id: &ItemId) {
        self.store.bring_to_front(id);
    }

    /// Change the global speed and recompute every item's velocity.
    pub fn update_global_speed(&mut self, percent: f64) -> WallResult<()> {
        let factory = self
            .factory
            .as_mut()
            .ok_or_else(|| WallError::not_initialized("velocity service not initialized"))?;
        let velocity = factory.velocity_service_mut();
        velocity.set_global_multiplier(percent);
        self.store.update_global_velocity(percent);
        if !self.store.items().is_empty() {
            self.store.update_all_velocities(velocity);
        }
        Ok(())
    }

    /// Change how many items the engine animates.
    pub fn update_item_count(&mut self, count: usize) {
        self.store.update_item_count(count);
    }

    /// Flip text visibility.
    pub fn toggle_text_visibility(&mut self) {
        self.store.toggle_texts();
    }

    /// Propagate a resize to spawn placement and the store.
    pub fn update_board_dimensions(&mut self, width: f64, height: f64) {
        if let Some(factory) = self.factory.as_mut() {
            factory.position_service_mut().update_board_dimensions(width, height);
        }
        self.store.set_board_dimensions(BoardDimensions::new(width, height));
    }

    /// Build a mixed list from `media` and add it from slot 0.
    ///
    /// Images come first, each considered text is kept with `text_probability`, then the list
    /// is optionally shuffled.
    #[tracing::instrument(
        skip(self, media),
        fields(images = media.images.len(), texts = media.texts.len())
    )]
    pub fn generate_from_media(
        &mut self,
        media: &MediaData,
        opts: GenerateOptions,
    ) -> WallResult<GenerationSummary> {
        self.factory()?;
        let images = &media.images[..media.images.len().min(opts.max_images)];
        let texts = &media.texts[..media.texts.len().min(opts.max_texts)];

        let mut seeds: Vec<ItemSeed> = images.iter().cloned().map(ItemSeed::Image).collect();
        for text in texts {
            if random_bool(&mut self.rng, opts.text_probability) {
                seeds.push(ItemSeed::Text(text.clone()));
            }
        }
        if opts.shuffle {
            seeds = shuffle(&mut self.rng, &seeds);
        }

        let added = self.add_mixed_items(&seeds, 0)?;
        let summary = GenerationSummary {
            image_count: images.len(),
            text_count: texts.len(),
            total_count: added.len(),
        };
        tracing::debug!(?summary, "items generated from media");
        Ok(summary)
    }

    /// Current counters.
    pub fn stats(&self) -> ManagerStats {
        let counts = self.store.items_count();
        ManagerStats {
            total_items: counts.total,
            visible_items: self.store.visible_items().len(),
            image_items: counts.images,
            text_items: counts.texts,
            global_speed: self.store.global_velocity(),
            show_texts: self.store.show_texts(),
            is_initialized: self.is_initialized(),
        }
    }

    /// Drop every item and the services.
    pub fn cleanup(&mut self) {
        self.clear_all_items();
        self.factory = None;
    }

    fn factory(&self) -> WallResult<&ScrollItemFactory> {
        self.factory
            .as_ref()
            .ok_or_else(|| WallError::not_initialized("item services not initialized"))
    }

    fn factory_mut(&mut self) -> WallResult<&mut ScrollItemFactory> {
        self.factory
            .as_mut()
            .ok_or_else(|| WallError::not_initialized("item services not initialized"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/wall/manager.rs"]
mod tests;
