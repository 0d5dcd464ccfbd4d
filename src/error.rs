// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("Unable to load image {}: {reason}", .path.display())]
    Decode { path: PathBuf, reason: String },

    #[error("Unable to create texture: {reason}")]
    TextureCreation { reason: String },

    #[error("Unable to render text surface: {reason}")]
    Rasterize { reason: String },

    #[error("No font set for text rendering")]
    NoFont,

    #[error("Refusing to render empty text")]
    EmptyText,

    #[error("Render copy failed: {reason}")]
    Draw { reason: String },

    #[error("Pixel buffer of {width}x{height} needs {expected} bytes, got {actual}")]
    InvalidPixels {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}
