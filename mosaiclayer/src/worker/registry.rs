//! Per-worker table of assigned source images.

use crate::geo::{BoundsAccumulator, GeographicRectangle};
use crate::projection::approximate_cartographic_extents;
use crate::source::SourceImage;

use super::error::InitializationError;

/// A source image with its precomputed geographic bounds.
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    pub source: SourceImage,
    /// Approximate lon/lat bounds from sampling the projected edges.
    pub unprojected_rectangle: GeographicRectangle,
}

/// The images one worker is responsible for, in assignment order.
///
/// Built once and never mutated.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
}

impl Registry {
    /// Computes the unprojected rectangle of every image.
    pub fn build(images: Vec<SourceImage>) -> Result<Self, InitializationError> {
        let entries = images
            .into_iter()
            .map(|source| {
                let projected = *source.projected_rectangle();
                if !projected.is_valid() {
                    return Err(InitializationError::InvalidProjectedRectangle {
                        url: source.url().to_string(),
                        rectangle: projected,
                    });
                }
                let unprojected =
                    approximate_cartographic_extents(&projected, source.projection().as_ref())
                        .ok_or_else(|| InitializationError::UnboundedExtent {
                            url: source.url().to_string(),
                        })?;
                Ok(RegistryEntry {
                    source,
                    unprojected_rectangle: unprojected,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { entries })
    }

    /// Union of all unprojected rectangles; `None` for an empty registry.
    pub fn rectangle(&self) -> Option<GeographicRectangle> {
        let mut bounds = BoundsAccumulator::new();
        for entry in &self.entries {
            bounds.add_rectangle(&entry.unprojected_rectangle);
        }
        bounds.finish()
    }

    /// Entries whose unprojected rectangle overlaps `rectangle`, in registry order.
    pub fn candidates<'a>(
        &'a self,
        rectangle: &'a GeographicRectangle,
    ) -> impl Iterator<Item = &'a RegistryEntry> + 'a {
        self.entries
            .iter()
            .filter(move |entry| entry.unprojected_rectangle.intersects(rectangle))
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
