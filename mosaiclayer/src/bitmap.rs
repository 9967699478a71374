//! RGBA8 pixel buffers.
//!
//! [`Bitmap`] wraps an `image::RgbaImage` so decoded sources, worker targets
//! and composites share one representation that converts directly to and from
//! the `image` crate for decode and PNG output.

use image::{DynamicImage, RgbaImage};
use thiserror::Error;

/// Bytes per RGBA8 pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Errors constructing a bitmap from raw data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BitmapError {
    /// Buffer length does not equal `width * height * 4`.
    #[error("Pixel buffer has {actual} bytes, expected {expected} for {width}x{height}")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// A mutable RGBA8 image. New bitmaps are fully transparent.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    image: RgbaImage,
}

impl Bitmap {
    /// Creates a zeroed (transparent) bitmap.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    /// Wraps a raw RGBA8 buffer, row-major from the top-left pixel.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, BitmapError> {
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        let actual = pixels.len();
        RgbaImage::from_raw(width, height, pixels)
            .map(|image| Self { image })
            .ok_or(BitmapError::BufferSize {
                width,
                height,
                expected,
                actual,
            })
    }

    /// Creates a bitmap filled with a single colour.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, image::Rgba(rgba)),
        }
    }

    /// Converts any decoded image to RGBA8.
    pub fn from_image(image: DynamicImage) -> Self {
        Self {
            image: image.into_rgba8(),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Byte offset of one row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.width() as usize * BYTES_PER_PIXEL
    }

    /// Raw RGBA bytes.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Mutable raw RGBA bytes.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.image
    }

    /// RGBA of one pixel. Panics when out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }

    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        self.image.put_pixel(x, y, image::Rgba(rgba));
    }

    /// Sets every byte to zero.
    pub fn clear(&mut self) {
        self.pixels_mut().fill(0);
    }

    /// Makes this bitmap `width`×`height` and fully transparent.
    ///
    /// Reuses the existing allocation when the size is unchanged.
    pub fn reset(&mut self, width: u32, height: u32) {
        if self.width() == width && self.height() == height {
            self.clear();
        } else {
            self.image = RgbaImage::new(width, height);
        }
    }

    /// True when no pixel has a non-zero alpha.
    pub fn is_transparent(&self) -> bool {
        self.pixels()
            .chunks_exact(BYTES_PER_PIXEL)
            .all(|pixel| pixel[3] == 0)
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

impl Default for Bitmap {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl From<RgbaImage> for Bitmap {
    fn from(image: RgbaImage) -> Self {
        Self { image }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_transparent() {
        let bitmap = Bitmap::new(4, 3);
        assert_eq!(bitmap.width(), 4);
        assert_eq!(bitmap.height(), 3);
        assert_eq!(bitmap.pixels().len(), 4 * 3 * 4);
        assert!(bitmap.is_transparent());
    }

    #[test]
    fn test_from_rgba_rejects_wrong_length() {
        let err = Bitmap::from_rgba(2, 2, vec![0; 15]).unwrap_err();
        assert_eq!(
            err,
            BitmapError::BufferSize {
                width: 2,
                height: 2,
                expected: 16,
                actual: 15,
            }
        );
    }

    #[test]
    fn test_set_and_get_pixel() {
        let mut bitmap = Bitmap::new(2, 2);
        bitmap.set_pixel(1, 0, [1, 2, 3, 4]);
        assert_eq!(bitmap.pixel(1, 0), [1, 2, 3, 4]);
        assert_eq!(&bitmap.pixels()[4..8], &[1, 2, 3, 4]);
        assert!(!bitmap.is_transparent());
    }

    #[test]
    fn test_reset_same_size_clears() {
        let mut bitmap = Bitmap::filled(3, 3, [9, 9, 9, 255]);
        bitmap.reset(3, 3);
        assert!(bitmap.is_transparent());
        assert_eq!(bitmap.width(), 3);
    }

    #[test]
    fn test_reset_new_size_reallocates() {
        let mut bitmap = Bitmap::filled(3, 3, [9, 9, 9, 255]);
        bitmap.reset(5, 2);
        assert_eq!(bitmap.width(), 5);
        assert_eq!(bitmap.height(), 2);
        assert_eq!(bitmap.pixels().len(), 5 * 2 * 4);
        assert!(bitmap.is_transparent());
    }

    #[test]
    fn test_from_dynamic_image_converts_rgb() {
        let rgb = image::RgbImage::from_pixel(2, 1, image::Rgb([10, 20, 30]));
        let bitmap = Bitmap::from_image(DynamicImage::ImageRgb8(rgb));
        assert_eq!(bitmap.pixel(0, 0), [10, 20, 30, 255]);
    }
}
