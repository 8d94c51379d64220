//! Viewer settings.
//!
//! Settings can be serialized to JSON and passed to the viewer binary as its
//! second argument. Missing keys fall back to their defaults.
//!
//! ```json
//! { "step": 4, "padding": 10, "sprite_size": 3.0 }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::SettingsError;
use crate::field::{FieldLayout, DEFAULT_PADDING, DEFAULT_PARALLEL_THRESHOLD, DEFAULT_STEP};
use crate::pixels::PixelBuffer;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Sampling stride in source pixels.
    pub step: u32,
    /// Margin around the image in the output area.
    pub padding: u32,
    /// Particle count from which ticks run on the rayon pool.
    pub parallel_threshold: usize,
    /// Edge length of one sprite before the image scale is applied.
    pub sprite_size: f32,
    /// Clear color as sRGB components in 0.0-1.0, written to the screen as is.
    pub background: [f64; 3],
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            padding: DEFAULT_PADDING,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            sprite_size: DEFAULT_STEP as f32,
            // #16203a
            background: [22.0 / 255.0, 32.0 / 255.0, 58.0 / 255.0],
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Field layout for `pixels`, sized to the image itself.
    pub fn layout_for(&self, pixels: &PixelBuffer) -> FieldLayout {
        FieldLayout::for_image(pixels)
            .with_step(self.step)
            .with_padding(self.padding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "step": 5 }"#).unwrap();
        assert_eq!(settings.step, 5);
        assert_eq!(settings.padding, DEFAULT_PADDING);
        assert_eq!(settings.sprite_size, 3.0);
    }

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(Settings::from_json("{}").unwrap(), Settings::default());
    }

    #[test]
    fn test_invalid_json() {
        let err = Settings::from_json(r#"{ "step": "many" }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("image-particles-settings-{}.json", std::process::id()));
        let settings = Settings {
            step: 2,
            padding: 4,
            ..Settings::default()
        };
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_layout_for_image() {
        let pixels = PixelBuffer::solid(64, 48, [0, 0, 0, 255]);
        let layout = Settings::default().layout_for(&pixels);
        assert_eq!(layout.target, (64, 48));
        assert_eq!(layout.step, 3);
        assert_eq!(layout.padding, 10);
    }
}
