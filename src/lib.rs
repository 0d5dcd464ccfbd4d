// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.

//! Texture loading and blitting for NomNom's levels.
//!
//! [`Texture`] owns one GPU texture created from an image file or from
//! rendered text and draws it with optional clipping and scaling. The
//! rendering backend is reached through the traits in [`backend`]; the `sdl`
//! feature implements them for SDL2.

pub mod backend;
pub mod error;
pub mod geometry;
pub mod pixels;
pub mod settings;
pub mod texture;

#[cfg(feature = "sdl")]
pub mod sdl;

#[cfg(test)]
mod mock;

pub use backend::{DrawTarget, GpuTexture, NoFont, TextRasterizer, TextureFactory, WindowSize};
pub use error::TextureError;
pub use geometry::{Color, Rect};
pub use pixels::PixelBuffer;
pub use settings::{Settings, SettingsError};
pub use texture::{RenderOptions, Texture};
