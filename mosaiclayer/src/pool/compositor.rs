//! Merging of per-worker bitmaps.

use rayon::prelude::*;

use crate::bitmap::{Bitmap, BYTES_PER_PIXEL};

/// Composites worker bitmaps in worker-index order.
///
/// The first bitmap is the base. Every later bitmap overwrites the base RGBA
/// at each pixel where its own alpha is non-zero, so the highest-indexed
/// worker that touched a pixel wins it. An empty input yields an empty bitmap.
pub fn composite(layers: Vec<Bitmap>) -> Bitmap {
    composite_reclaiming(layers).0
}

/// Like [`composite`], also handing back the overlays (every bitmap after
/// the first, in order) so their buffers can be reused.
pub fn composite_reclaiming(layers: Vec<Bitmap>) -> (Bitmap, Vec<Bitmap>) {
    let mut layers = layers.into_iter();
    let Some(mut base) = layers.next() else {
        return (Bitmap::default(), Vec::new());
    };

    let overlays: Vec<Bitmap> = layers.collect();
    for overlay in &overlays {
        overlay_onto(&mut base, overlay);
    }
    (base, overlays)
}

/// Copies every pixel of `overlay` with alpha > 0 onto `base`.
///
/// Both bitmaps must have the same dimensions; only the overlapping prefix of
/// pixels is considered otherwise.
pub fn overlay_onto(base: &mut Bitmap, overlay: &Bitmap) {
    debug_assert_eq!(
        (base.width(), base.height()),
        (overlay.width(), overlay.height())
    );

    base.pixels_mut()
        .par_chunks_exact_mut(BYTES_PER_PIXEL)
        .zip(overlay.pixels().par_chunks_exact(BYTES_PER_PIXEL))
        .for_each(|(dst, src)| {
            if src[3] > 0 {
                dst.copy_from_slice(src);
            }
        });
}
