use crate::{
    config::scroll::{Span, VelocityConfig},
    foundation::random::{WallRng, random_range, seeded_rng},
    model::item::ItemKind,
};

/// Maps the global speed percentage and an item's kind to a per-item velocity in px/s.
#[derive(Debug)]
pub struct VelocityService {
    config: VelocityConfig,
    global_multiplier: f64,
    rng: WallRng,
}

impl VelocityService {
    /// OS-seeded service at 100 % speed.
    pub fn new(config: VelocityConfig) -> Self {
        Self::with_rng(config, seeded_rng(None))
    }

    /// Reproducible service for tests and seeded runs.
    pub fn with_seed(config: VelocityConfig, seed: u64) -> Self {
        Self::with_rng(config, seeded_rng(Some(seed)))
    }

    fn with_rng(config: VelocityConfig, rng: WallRng) -> Self {
        Self {
            config,
            global_multiplier: 1.0,
            rng,
        }
    }

    /// `base × multiplier × jitter(kind)`.
    pub fn calculate_item_velocity(&mut self, base: f64, kind: ItemKind) -> f64 {
        let jitter = self.variation_range(kind);
        let factor = random_range(&mut self.rng, jitter.min, jitter.max);
        base * self.global_multiplier * factor
    }

    /// Clamp `percent` to the configured bounds and store it as a multiplier. `NaN` is ignored.
    pub fn set_global_multiplier(&mut self, percent: f64) {
        if percent.is_nan() {
            return;
        }
        self.global_multiplier = self.config.percent.clamp(percent) / 100.0;
    }

    /// Current multiplier as a fraction (`0.1..=1.5` by default).
    pub fn global_multiplier(&self) -> f64 {
        self.global_multiplier
    }

    /// Current multiplier as a percentage.
    pub fn global_multiplier_percent(&self) -> f64 {
        self.global_multiplier * 100.0
    }

    /// Back to 100 %.
    pub fn reset_global_multiplier(&mut self) {
        self.global_multiplier = 1.0;
    }

    /// Base speed in px/s.
    pub fn default_velocity(&self) -> f64 {
        self.config.default
    }

    /// Accepted percentage bounds.
    pub fn velocity_range(&self) -> Span {
        self.config.percent
    }

    /// Jitter factor range for a kind.
    pub fn variation_range(&self, kind: ItemKind) -> Span {
        match kind {
            ItemKind::Image => self.config.image_jitter,
            ItemKind::Text => self.config.text_jitter,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/services/velocity.rs"]
mod tests;
