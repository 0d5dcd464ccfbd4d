// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.

//! Narrow contracts the texture wrapper needs from the rendering backend.
//!
//! Errors cross these traits as the backend's own error string, the same
//! thing SDL hands back from `SDL_GetError`.

use crate::geometry::{Color, Rect};
use crate::pixels::PixelBuffer;

/// Anything that can report its drawable size in pixels.
pub trait WindowSize {
    fn size(&self) -> (u32, u32);
}

/// A GPU texture. Dropping it releases the GPU resource.
pub trait GpuTexture {
    /// Multiplies the texture's RGB channels by `color` when drawn.
    fn set_color_mod(&mut self, color: Color);
}

/// Creates textures bound to one rendering context.
pub trait TextureFactory {
    type Texture<'t>: GpuTexture
    where
        Self: 't;

    fn create_texture<'t>(&'t self, pixels: &PixelBuffer) -> Result<Self::Texture<'t>, String>;
}

/// A surface textures can be copied onto.
pub trait DrawTarget<T> {
    /// Copies `src` of `texture` (the whole texture when `None`) into `dst`.
    fn copy(&mut self, texture: &T, src: Option<Rect>, dst: Rect) -> Result<(), String>;
}

/// Turns text into anti-aliased glyph coverage.
pub trait TextRasterizer {
    /// Renders `text` in `color`. With `wrap_width` set, lines break so the
    /// result is never wider than that many pixels.
    fn rasterize(
        &self,
        text: &str,
        color: Color,
        wrap_width: Option<u32>,
    ) -> Result<PixelBuffer, String>;
}

/// Stand-in font type for textures that never render text.
#[derive(Debug, Clone, Copy)]
pub enum NoFont {}

impl TextRasterizer for NoFont {
    fn rasterize(&self, _: &str, _: Color, _: Option<u32>) -> Result<PixelBuffer, String> {
        match *self {}
    }
}
