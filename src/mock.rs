// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.

//! In-memory backend for tests. Counts texture creation, destruction and draw
//! calls so lifecycle properties can be checked without a GPU.

use std::cell::Cell;
use std::rc::Rc;

use crate::backend::{DrawTarget, GpuTexture, TextRasterizer, TextureFactory, WindowSize};
use crate::geometry::{Color, Rect};
use crate::pixels::PixelBuffer;

#[derive(Debug, Default)]
pub struct BackendStats {
    created: Cell<usize>,
    destroyed: Cell<usize>,
}

impl BackendStats {
    pub fn created(&self) -> usize {
        self.created.get()
    }

    pub fn destroyed(&self) -> usize {
        self.destroyed.get()
    }

    pub fn live(&self) -> usize {
        self.created() - self.destroyed()
    }
}

#[derive(Debug, Default)]
pub struct MockFactory {
    pub stats: Rc<BackendStats>,
    pub fail_create: Cell<bool>,
}

#[derive(Debug)]
pub struct MockTexture {
    pub id: usize,
    pub pixels: PixelBuffer,
    pub color_mod: Option<Color>,
    stats: Rc<BackendStats>,
}

impl GpuTexture for MockTexture {
    fn set_color_mod(&mut self, color: Color) {
        self.color_mod = Some(color);
    }
}

impl Drop for MockTexture {
    fn drop(&mut self) {
        self.stats.destroyed.set(self.stats.destroyed.get() + 1);
    }
}

impl TextureFactory for MockFactory {
    type Texture<'t> = MockTexture;

    fn create_texture<'t>(&'t self, pixels: &PixelBuffer) -> Result<MockTexture, String> {
        if self.fail_create.get() {
            return Err(String::from("Out of video memory"));
        }
        let id = self.stats.created.get();
        self.stats.created.set(id + 1);
        Ok(MockTexture {
            id,
            pixels: pixels.clone(),
            color_mod: None,
            stats: Rc::clone(&self.stats),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall {
    pub texture_id: usize,
    pub src: Option<Rect>,
    pub dst: Rect,
}

#[derive(Debug, Default)]
pub struct MockCanvas {
    pub draws: Vec<DrawCall>,
    pub fail: bool,
}

impl DrawTarget<MockTexture> for MockCanvas {
    fn copy(&mut self, texture: &MockTexture, src: Option<Rect>, dst: Rect) -> Result<(), String> {
        if self.fail {
            return Err(String::from("Invalid renderer"));
        }
        self.draws.push(DrawCall {
            texture_id: texture.id,
            src,
            dst,
        });
        Ok(())
    }
}

/// Monospaced fake font: every character is `glyph_width` wide.
#[derive(Debug)]
pub struct MockFont {
    pub glyph_width: u32,
    pub line_height: u32,
}

impl Default for MockFont {
    fn default() -> Self {
        Self {
            glyph_width: 8,
            line_height: 16,
        }
    }
}

impl TextRasterizer for MockFont {
    fn rasterize(
        &self,
        text: &str,
        color: Color,
        wrap_width: Option<u32>,
    ) -> Result<PixelBuffer, String> {
        let chars = text.chars().count() as u32;
        if chars == 0 {
            return Err(String::from("Text has zero width"));
        }
        let per_line = match wrap_width {
            Some(wrap) => (wrap / self.glyph_width).max(1),
            None => chars,
        };
        let lines = chars.div_ceil(per_line);
        let width = chars.min(per_line) * self.glyph_width;
        PixelBuffer::solid(width, lines * self.line_height, color).map_err(|e| e.to_string())
    }
}

pub struct MockWindow(pub u32, pub u32);

impl WindowSize for MockWindow {
    fn size(&self) -> (u32, u32) {
        (self.0, self.1)
    }
}
