// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.

use dirs_next::config_dir;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::geometry::Color;

const APP_DIR: &str = "NomNom";

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TextSettings {
    pub font_path: PathBuf,
    pub point_size: u16,
    pub wrap_width: u32,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TextureSettings {
    pub color_key: [u8; 3],
    pub use_color_key: bool,
    pub sprite_path: PathBuf,
}

impl TextureSettings {
    /// The key to hand to `Texture::set_color_key`.
    pub fn color_key(&self) -> Option<Color> {
        self.use_color_key.then(|| Color::from(self.color_key))
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    pub window: WindowSettings,
    pub text: TextSettings,
    pub texture: TextureSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window: WindowSettings {
                title: String::from("NomNom"),
                width: 800,
                height: 600,
            },
            text: TextSettings {
                font_path: PathBuf::from("assets/fonts/lazy.ttf"),
                point_size: 28,
                wrap_width: 400,
            },
            texture: TextureSettings {
                color_key: [0, 0xFF, 0xFF],
                use_color_key: true,
                sprite_path: PathBuf::from("assets/images/nomnom.png"),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Deserialization Error: {0}")]
    Serde(#[from] toml::de::Error),

    #[error("Serialization Error: {0}")]
    SerdeSer(#[from] toml::ser::Error),

    #[error("Configuration Directory Not Found")]
    ConfigDirNotFound,
}

impl Settings {
    fn settings_dir() -> Result<PathBuf, SettingsError> {
        let config_dir = config_dir().ok_or(SettingsError::ConfigDirNotFound)?;
        Ok(config_dir.join(APP_DIR).join("settings"))
    }

    /// Path to the user settings file.
    pub fn user_settings_path() -> Result<PathBuf, SettingsError> {
        Ok(Self::settings_dir()?.join("user_settings.toml"))
    }

    /// Path to the default settings file.
    pub fn default_settings_path() -> Result<PathBuf, SettingsError> {
        Ok(Self::settings_dir()?.join("default_settings.toml"))
    }

    pub fn load_from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Saves settings, creating parent directories as needed.
    pub fn save_to_file(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn save_user_settings(&self) -> Result<(), SettingsError> {
        let user_path = Settings::user_settings_path()?;
        self.save_to_file(&user_path)
    }

    /// Loads user settings, falling back to defaults. Never fails; the worst
    /// case is the hardcoded defaults.
    pub fn load_user_settings() -> Settings {
        match Settings::initialize_settings() {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Error initializing settings: {}", e);
                Settings::default()
            }
        }
    }

    fn initialize_settings() -> Result<Self, SettingsError> {
        let user_settings_path = Settings::user_settings_path()?;
        let default_settings_path = Settings::default_settings_path()?;

        if user_settings_path.exists() {
            match Settings::load_from_file(&user_settings_path) {
                Ok(settings) => Ok(settings),
                Err(e) => {
                    warn!(
                        "Failed to load user settings: {}. Attempting to load defaults.",
                        e
                    );
                    Settings::load_defaults(&user_settings_path, &default_settings_path)
                }
            }
        } else {
            info!("User settings not found. Loading default settings.");
            Settings::load_defaults(&user_settings_path, &default_settings_path)
        }
    }

    /// Loads the default file and copies it over the user file. Without a
    /// default file, writes the hardcoded defaults to both.
    fn load_defaults(user_path: &Path, default_path: &Path) -> Result<Self, SettingsError> {
        if default_path.exists() {
            let settings = Settings::load_from_file(default_path)?;
            settings.save_to_file(user_path)?;
            info!("Default settings loaded and saved as user settings.");
            Ok(settings)
        } else {
            warn!("Default settings file not found. Using hardcoded defaults.");
            let settings = Settings::default();
            settings.save_to_file(default_path)?;
            settings.save_to_file(user_path)?;
            Ok(settings)
        }
    }
}
