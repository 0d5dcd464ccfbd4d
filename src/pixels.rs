// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.

use image::GenericImageView;
use std::path::Path;

use crate::error::TextureError;
use crate::geometry::Color;

pub const BYTES_PER_PIXEL: usize = 4;

/// Tightly packed RGBA8 pixels, the intermediate form between a decoder or
/// rasterizer and the GPU texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, TextureError> {
        let expected = byte_len(width, height);
        if width == 0 || height == 0 || expected != Some(data.len()) {
            return Err(TextureError::InvalidPixels {
                width,
                height,
                expected: expected.unwrap_or(usize::MAX),
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A buffer filled with a single color.
    pub fn solid(width: u32, height: u32, color: Color) -> Result<Self, TextureError> {
        let Some(len) = byte_len(width, height) else {
            return Self::new(width, height, Vec::new());
        };
        let pixel = [color.r, color.g, color.b, color.a];
        let data = pixel.iter().copied().cycle().take(len).collect();
        Self::new(width, height, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pitch(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = y as usize * self.pitch() + x as usize * BYTES_PER_PIXEL;
        let p = &self.data[i..i + BYTES_PER_PIXEL];
        Some(Color::rgba(p[0], p[1], p[2], p[3]))
    }

    /// Makes every pixel whose color channels match `key` fully transparent.
    /// Returns how many pixels were keyed out.
    pub fn apply_color_key(&mut self, key: Color) -> usize {
        let mut keyed = 0;
        for px in self.data.chunks_exact_mut(BYTES_PER_PIXEL) {
            if px[0] == key.r && px[1] == key.g && px[2] == key.b {
                px[3] = 0;
                keyed += 1;
            }
        }
        keyed
    }
}

// None when the size does not fit in memory.
fn byte_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
}

/// Decodes any format the `image` crate understands into RGBA8.
pub fn decode_image(path: &Path) -> Result<PixelBuffer, TextureError> {
    let img = image::open(path).map_err(|e| TextureError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let (width, height) = img.dimensions();
    PixelBuffer::new(width, height, img.to_rgba8().into_raw()).map_err(|e| TextureError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::tempdir;

    #[test]
    fn test_new_rejects_wrong_length() {
        let result = PixelBuffer::new(2, 2, vec![0; 15]);
        assert!(matches!(
            result,
            Err(TextureError::InvalidPixels {
                expected: 16,
                actual: 15,
                ..
            })
        ));
    }

    #[test]
    fn test_new_rejects_zero_size() {
        assert!(PixelBuffer::new(0, 4, Vec::new()).is_err());
        assert!(PixelBuffer::new(4, 0, Vec::new()).is_err());
    }

    #[test]
    fn test_new_rejects_overflowing_size() {
        let result = PixelBuffer::new(u32::MAX, u32::MAX, Vec::new());
        assert!(matches!(
            result,
            Err(TextureError::InvalidPixels { actual: 0, .. })
        ));
        assert!(PixelBuffer::solid(u32::MAX, u32::MAX, Color::BLACK).is_err());
    }

    #[test]
    fn test_color_key_only_touches_matching_pixels() {
        let mut data = Vec::new();
        data.extend_from_slice(&[0, 255, 255, 255]); // cyan
        data.extend_from_slice(&[0, 255, 254, 255]); // almost cyan
        data.extend_from_slice(&[0, 255, 255, 128]); // translucent cyan
        data.extend_from_slice(&[10, 20, 30, 255]);
        let mut buffer = PixelBuffer::new(2, 2, data).unwrap();

        let keyed = buffer.apply_color_key(Color::CYAN);

        assert_eq!(keyed, 2);
        assert_eq!(buffer.pixel(0, 0), Some(Color::rgba(0, 255, 255, 0)));
        assert_eq!(buffer.pixel(1, 0), Some(Color::rgba(0, 255, 254, 255)));
        assert_eq!(buffer.pixel(0, 1), Some(Color::rgba(0, 255, 255, 0)));
        assert_eq!(buffer.pixel(1, 1), Some(Color::rgba(10, 20, 30, 255)));
    }

    #[test]
    fn test_pixel_out_of_bounds() {
        let buffer = PixelBuffer::solid(3, 2, Color::BLACK).unwrap();
        assert_eq!(buffer.pixel(3, 0), None);
        assert_eq!(buffer.pixel(0, 2), None);
        assert_eq!(buffer.pixel(2, 1), Some(Color::BLACK));
    }

    #[test]
    fn test_decode_png_from_disk() {
        let dir = tempdir().expect("Failed to create temporary directory");
        let path = dir.path().join("sprite.png");
        let mut img = RgbaImage::from_pixel(4, 3, Rgba([0, 255, 255, 255]));
        img.put_pixel(1, 1, Rgba([200, 10, 10, 255]));
        img.save(&path).unwrap();

        let buffer = decode_image(&path).unwrap();

        assert_eq!((buffer.width(), buffer.height()), (4, 3));
        assert_eq!(buffer.pitch(), 16);
        assert_eq!(buffer.pixel(1, 1), Some(Color::rgb(200, 10, 10)));
        assert_eq!(buffer.pixel(0, 0), Some(Color::CYAN));
    }

    #[test]
    fn test_decode_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.png");
        match decode_image(&path) {
            Err(TextureError::Decode { path: p, reason }) => {
                assert_eq!(p, path);
                assert!(!reason.is_empty());
            }
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_garbage_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("not_an_image.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        assert!(matches!(decode_image(&path), Err(TextureError::Decode { .. })));
    }
}
