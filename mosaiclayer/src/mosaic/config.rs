//! Mosaic settings.

use crate::pool::PoolConfig;

/// Default composite width and height in pixels.
pub const DEFAULT_RESOLUTION: u32 = 1024;

/// Frames to keep the full-coverage layer uncut after a new inset appears.
pub const DEFAULT_INSET_WAIT_FRAMES: u32 = 3;

/// Settings for a [`MosaicOrchestrator`](super::MosaicOrchestrator).
#[derive(Debug, Clone, PartialEq)]
pub struct MosaicConfig {
    pub pool: PoolConfig,
    /// Pixel width of full-coverage and inset composites.
    pub width: u32,
    /// Pixel height of full-coverage and inset composites.
    pub height: u32,
    pub inset_wait_frames: u32,
    /// Attribution attached to every layer.
    pub credit: Option<String>,
    /// Expose the last requested rectangle through `debug_bounds`.
    pub show_debug_bounds: bool,
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            pool: PoolConfig::default(),
            width: DEFAULT_RESOLUTION,
            height: DEFAULT_RESOLUTION,
            inset_wait_frames: DEFAULT_INSET_WAIT_FRAMES,
            credit: None,
            show_debug_bounds: false,
        }
    }
}

impl MosaicConfig {
    pub fn with_pool(mut self, pool: PoolConfig) -> Self {
        self.pool = pool;
        self
    }

    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_inset_wait_frames(mut self, frames: u32) -> Self {
        self.inset_wait_frames = frames;
        self
    }

    pub fn with_credit(mut self, credit: impl Into<String>) -> Self {
        self.credit = Some(credit.into());
        self
    }

    pub fn with_debug_bounds(mut self, show: bool) -> Self {
        self.show_debug_bounds = show;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MosaicConfig::default();
        assert_eq!((config.width, config.height), (1024, 1024));
        assert_eq!(config.inset_wait_frames, 3);
        assert_eq!(config.pool.concurrency, 2);
        assert_eq!(config.pool.image_cache_size, 100);
        assert!(config.credit.is_none());
    }

    #[test]
    fn test_builder() {
        let config = MosaicConfig::default()
            .with_resolution(256, 128)
            .with_credit("Survey")
            .with_inset_wait_frames(1)
            .with_debug_bounds(true);
        assert_eq!((config.width, config.height), (256, 128));
        assert_eq!(config.credit.as_deref(), Some("Survey"));
        assert_eq!(config.inset_wait_frames, 1);
        assert!(config.show_debug_bounds);
    }
}
