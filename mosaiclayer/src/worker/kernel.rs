//! Per-pixel reprojection.

use rayon::prelude::*;

use crate::bitmap::{Bitmap, BYTES_PER_PIXEL};
use crate::geo::{Cartographic, GeographicRectangle};

use super::registry::RegistryEntry;

/// Reprojects `source` into `target`, where `target` spans `request`.
///
/// For every destination pixel centre the geographic position is projected
/// into the entry's native space; if it falls inside the entry's projected
/// rectangle the nearest source pixel is copied over the destination pixel,
/// replacing whatever was there (including with a transparent source pixel).
/// Rows are processed in parallel; each pixel is written at most once per
/// call, so the result does not depend on scheduling.
///
/// Returns the number of destination pixels written.
pub fn reproject_into(
    target: &mut Bitmap,
    request: &GeographicRectangle,
    source: &Bitmap,
    entry: &RegistryEntry,
) -> u64 {
    let width = target.width() as usize;
    let height = target.height() as usize;
    let source_width = source.width() as usize;
    let source_height = source.height() as usize;
    if width == 0 || height == 0 || source_width == 0 || source_height == 0 {
        return 0;
    }

    let projection = entry.source.projection().as_ref();
    let projected = *entry.source.projected_rectangle();
    let lon_step = request.width() / width as f64;
    let lat_step = request.height() / height as f64;
    let west = request.west();
    let north = request.north();
    let x_scale = source_width as f64 / projected.width();
    let y_scale = source_height as f64 / projected.height();
    let source_stride = source.stride();
    let source_pixels = source.pixels();
    let stride = target.stride();

    target
        .pixels_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .map(|(row, row_pixels)| {
            let latitude = north - (row as f64 + 0.5) * lat_step;
            let mut written = 0u64;

            for (col, pixel) in row_pixels.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
                let longitude = west + (col as f64 + 0.5) * lon_step;
                let (x, y) = projection.project(Cartographic::new(longitude, latitude));
                if !projected.contains(x, y) {
                    continue;
                }

                let u = (((x - projected.min_x) * x_scale) as usize).min(source_width - 1);
                let v = (((projected.max_y - y) * y_scale) as usize).min(source_height - 1);
                let offset = v * source_stride + u * BYTES_PER_PIXEL;
                pixel.copy_from_slice(&source_pixels[offset..offset + BYTES_PER_PIXEL]);
                written += 1;
            }

            written
        })
        .sum()
}
