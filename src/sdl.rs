// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.

//! SDL2 implementations of the backend traits.

use sdl2::pixels::{Color as SdlColor, PixelFormatEnum};
use sdl2::rect::Rect as SdlRect;
use sdl2::render::{BlendMode, Canvas, RenderTarget, Texture as SdlTexture, TextureCreator};
use sdl2::surface::Surface;
use sdl2::ttf::Font;
use sdl2::video::Window;

use crate::backend::{DrawTarget, GpuTexture, TextRasterizer, TextureFactory, WindowSize};
use crate::geometry::{Color, Rect};
use crate::pixels::{PixelBuffer, BYTES_PER_PIXEL};

impl From<Color> for SdlColor {
    fn from(c: Color) -> Self {
        SdlColor::RGBA(c.r, c.g, c.b, c.a)
    }
}

impl From<Rect> for SdlRect {
    fn from(r: Rect) -> Self {
        SdlRect::new(r.x, r.y, r.w, r.h)
    }
}

impl WindowSize for Window {
    fn size(&self) -> (u32, u32) {
        Window::size(self)
    }
}

impl<T> TextureFactory for TextureCreator<T> {
    type Texture<'t>
        = SdlTexture<'t>
    where
        Self: 't;

    fn create_texture<'t>(&'t self, pixels: &PixelBuffer) -> Result<SdlTexture<'t>, String> {
        let mut texture = self
            .create_texture_static(PixelFormatEnum::RGBA32, pixels.width(), pixels.height())
            .map_err(|e| e.to_string())?;
        texture
            .update(None::<SdlRect>, pixels.data(), pixels.pitch())
            .map_err(|e| e.to_string())?;
        texture.set_blend_mode(BlendMode::Blend);
        Ok(texture)
    }
}

impl GpuTexture for SdlTexture<'_> {
    fn set_color_mod(&mut self, color: Color) {
        SdlTexture::set_color_mod(self, color.r, color.g, color.b);
    }
}

impl<'t, T: RenderTarget> DrawTarget<SdlTexture<'t>> for Canvas<T> {
    fn copy(&mut self, texture: &SdlTexture<'t>, src: Option<Rect>, dst: Rect) -> Result<(), String> {
        Canvas::copy(self, texture, src.map(SdlRect::from), SdlRect::from(dst))
    }
}

impl TextRasterizer for Font<'_, '_> {
    fn rasterize(
        &self,
        text: &str,
        color: Color,
        wrap_width: Option<u32>,
    ) -> Result<PixelBuffer, String> {
        let partial = self.render(text);
        let surface = match wrap_width {
            Some(wrap) => partial.blended_wrapped(color, wrap),
            None => partial.blended(color),
        }
        .map_err(|e| e.to_string())?;
        surface_to_pixels(&surface)
    }
}

// SDL rows may be padded past `width * 4`; PixelBuffer is tightly packed.
fn surface_to_pixels(surface: &Surface) -> Result<PixelBuffer, String> {
    let surface = surface.convert_format(PixelFormatEnum::RGBA32)?;
    let (width, height) = surface.size();
    let pitch = surface.pitch() as usize;
    let row = width as usize * BYTES_PER_PIXEL;

    let data = surface.with_lock(|pixels| {
        pixels
            .chunks(pitch)
            .take(height as usize)
            .flat_map(|line| line[..row].iter().copied())
            .collect::<Vec<u8>>()
    });
    PixelBuffer::new(width, height, data).map_err(|e| e.to_string())
}
