// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.

use log::{debug, error, trace};
use std::path::Path;

use crate::backend::{DrawTarget, GpuTexture, NoFont, TextRasterizer, TextureFactory, WindowSize};
use crate::error::TextureError;
use crate::geometry::{Color, Rect};
use crate::pixels::{decode_image, PixelBuffer};

/// Where and how big a texture is drawn.
///
/// The destination size is `size` when set. Otherwise it is the clip size (or
/// the native texture size without a clip) multiplied by `scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub x: i32,
    pub y: i32,
    pub size: Option<(u32, u32)>,
    pub scale: Option<(f64, f64)>,
    pub clip: Option<Rect>,
}

impl RenderOptions {
    pub fn at(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            size: None,
            scale: None,
            clip: None,
        }
    }

    pub fn with_scale(mut self, width_scale: f64, height_scale: f64) -> Self {
        self.scale = Some((width_scale, height_scale));
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = Some((width, height));
        self
    }

    pub fn with_clip(mut self, clip: Option<Rect>) -> Self {
        self.clip = clip;
        self
    }

    /// Destination rectangle for a texture of `native` size.
    pub fn destination(&self, native: (u32, u32)) -> Rect {
        if let Some((w, h)) = self.size {
            return Rect::new(self.x, self.y, w, h);
        }
        let (base_w, base_h) = self.clip.map(|c| c.size()).unwrap_or(native);
        let (sx, sy) = self.scale.unwrap_or((1.0, 1.0));
        Rect::new(
            self.x,
            self.y,
            scale_dimension(base_w, sx),
            scale_dimension(base_h, sy),
        )
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::at(0, 0)
    }
}

// Truncates toward zero; negative and NaN factors give zero.
fn scale_dimension(length: u32, factor: f64) -> u32 {
    (length as f64 * factor).max(0.0) as u32
}

/// Holds at most one GPU texture loaded from an image file or rendered text.
///
/// The factory and font are borrowed and must outlive the wrapper. Loading
/// always releases the previous texture first, and dropping the wrapper
/// releases whatever it still holds.
pub struct Texture<'a, C, F = NoFont>
where
    C: TextureFactory + 'a,
    F: TextRasterizer,
{
    factory: &'a C,
    font: Option<&'a F>,
    handle: Option<C::Texture<'a>>,
    width: u32,
    height: u32,
    screen_size: (u32, u32),
    color_key: Option<Color>,
}

impl<'a, C> Texture<'a, C, NoFont>
where
    C: TextureFactory + 'a,
{
    /// A wrapper that only ever loads images.
    pub fn without_font<W: WindowSize + ?Sized>(window: &W, factory: &'a C) -> Self {
        Self::new(window, factory, None)
    }
}

impl<'a, C, F> Texture<'a, C, F>
where
    C: TextureFactory + 'a,
    F: TextRasterizer,
{
    pub fn new<W: WindowSize + ?Sized>(window: &W, factory: &'a C, font: Option<&'a F>) -> Self {
        Self {
            factory,
            font,
            handle: None,
            width: 0,
            height: 0,
            screen_size: window.size(),
            color_key: Some(Color::CYAN),
        }
    }

    /// Loads an image, keying out `color_key` pixels before upload.
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), TextureError> {
        self.free();
        let path = path.as_ref();

        let mut pixels = match decode_image(path) {
            Ok(pixels) => pixels,
            Err(e) => {
                error!("{}", e);
                return Err(e);
            }
        };
        if let Some(key) = self.color_key {
            let keyed = pixels.apply_color_key(key);
            trace!("Keyed out {} pixels of {}", keyed, path.display());
        }

        self.upload(&pixels, &path.display().to_string())?;
        debug!(
            "Loaded {} ({}x{})",
            path.display(),
            self.width,
            self.height
        );
        Ok(())
    }

    /// Renders a single line of text with the current font.
    pub fn load_from_rendered_text(&mut self, text: &str, color: Color) -> Result<(), TextureError> {
        self.load_text(text, color, None)
    }

    /// Renders text that wraps so no line is wider than `wrap_width` pixels.
    pub fn load_from_rendered_text_wrapped(
        &mut self,
        text: &str,
        color: Color,
        wrap_width: u32,
    ) -> Result<(), TextureError> {
        self.load_text(text, color, Some(wrap_width))
    }

    /// Uploads an already decoded buffer.
    pub fn load_from_pixels(&mut self, pixels: PixelBuffer) -> Result<(), TextureError> {
        self.free();
        self.upload(&pixels, "pixel buffer")
    }

    fn load_text(
        &mut self,
        text: &str,
        color: Color,
        wrap_width: Option<u32>,
    ) -> Result<(), TextureError> {
        self.free();

        let Some(font) = self.font else {
            error!("Unable to render text surface! No font set");
            return Err(TextureError::NoFont);
        };
        if text.is_empty() {
            error!("Unable to render text surface! Text is empty");
            return Err(TextureError::EmptyText);
        }

        let pixels = font.rasterize(text, color, wrap_width).map_err(|reason| {
            error!("Unable to render text surface! {}", reason);
            TextureError::Rasterize { reason }
        })?;
        self.upload(&pixels, "rendered text")
    }

    // Expects the wrapper to be empty. The pixel buffer is dropped by the
    // caller on every path.
    fn upload(&mut self, pixels: &PixelBuffer, source: &str) -> Result<(), TextureError> {
        let factory = self.factory;
        match factory.create_texture(pixels) {
            Ok(texture) => {
                self.handle = Some(texture);
                self.width = pixels.width();
                self.height = pixels.height();
                Ok(())
            }
            Err(reason) => {
                error!("Unable to create texture from {}! {}", source, reason);
                Err(TextureError::TextureCreation { reason })
            }
        }
    }

    /// Releases the texture if one is held. Safe to call repeatedly.
    pub fn free(&mut self) {
        if self.handle.take().is_some() {
            self.width = 0;
            self.height = 0;
        }
    }

    /// Draws the texture as described by `options`. An empty wrapper, or a
    /// destination that scales down to zero pixels, draws nothing.
    pub fn render<D>(&self, target: &mut D, options: &RenderOptions) -> Result<(), TextureError>
    where
        D: DrawTarget<C::Texture<'a>>,
    {
        let Some(texture) = self.handle.as_ref() else {
            return Ok(());
        };
        let dst = options.destination((self.width, self.height));
        if dst.w == 0 || dst.h == 0 {
            return Ok(());
        }
        trace!("Render copy {:?} -> {:?}", options.clip, dst);
        target.copy(texture, options.clip, dst).map_err(|reason| {
            error!("Render copy failed! {}", reason);
            TextureError::Draw { reason }
        })
    }

    /// Draws at native size, or native clip size.
    pub fn render_at<D>(
        &self,
        target: &mut D,
        x: i32,
        y: i32,
        clip: Option<Rect>,
    ) -> Result<(), TextureError>
    where
        D: DrawTarget<C::Texture<'a>>,
    {
        self.render(target, &RenderOptions::at(x, y).with_clip(clip))
    }

    /// Draws scaled by the given proportions.
    pub fn render_scaled<D>(
        &self,
        target: &mut D,
        x: i32,
        y: i32,
        width_scale: f64,
        height_scale: f64,
        clip: Option<Rect>,
    ) -> Result<(), TextureError>
    where
        D: DrawTarget<C::Texture<'a>>,
    {
        let options = RenderOptions::at(x, y)
            .with_scale(width_scale, height_scale)
            .with_clip(clip);
        self.render(target, &options)
    }

    /// Draws into an exact destination size, ignoring the native size.
    pub fn render_sized<D>(
        &self,
        target: &mut D,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        clip: Option<Rect>,
    ) -> Result<(), TextureError>
    where
        D: DrawTarget<C::Texture<'a>>,
    {
        let options = RenderOptions::at(x, y).with_size(width, height).with_clip(clip);
        self.render(target, &options)
    }

    /// Font used by later text loads. The current texture is untouched.
    pub fn set_font(&mut self, font: Option<&'a F>) {
        self.font = font;
    }

    /// Tints the held texture. Does nothing when empty.
    pub fn set_color(&mut self, color: Color) {
        if let Some(texture) = self.handle.as_mut() {
            texture.set_color_mod(color);
        }
    }

    /// Color treated as transparent by `load_from_file`. `None` disables
    /// keying.
    pub fn set_color_key(&mut self, key: Option<Color>) {
        self.color_key = key;
    }

    pub fn color_key(&self) -> Option<Color> {
        self.color_key
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_loaded(&self) -> bool {
        self.handle.is_some()
    }

    /// Window size at construction time.
    pub fn screen_size(&self) -> (u32, u32) {
        self.screen_size
    }
}

impl<'a, C, F> Drop for Texture<'a, C, F>
where
    C: TextureFactory + 'a,
    F: TextRasterizer,
{
    fn drop(&mut self) {
        self.free();
    }
}
