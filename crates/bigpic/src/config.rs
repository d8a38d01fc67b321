use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::overlay::{OverlaySettings, ease::Easing};

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "bigpic";

/// Relative paths matching this are presentable. Case-insensitive
/// extension match, like the browser treats image sources.
pub const DEFAULT_PATTERN: &str = r"(?i)\.(png|jpe?g|gif|webp)$";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presentation: Option<PresentationConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    /// Regex over the path relative to the viewed directory deciding
    /// which files are presentable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PresentationConfig {
    /// Morph animation duration in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<f32>,

    /// Easing name: linear, ease, ease-in, ease-out, ease-in-out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing: Option<String>,

    /// Fraction of the viewport the enlarged image may fill.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backdrop_opacity: Option<f32>,

    /// Arrow-key navigation between images while presenting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigate: Option<bool>,

    /// Wrap around at the ends of a group instead of clamping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrap: Option<bool>,

    /// Zoom-in cursor over presentable thumbnails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<bool>,

    /// Reserved: filename caption under the enlarged image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<bool>,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("No config found. Run `bigpic config show` to see defaults.")
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# bigpic configuration - https://github.com/mklab-se/bigpic\n{yaml}");
        std::fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn theme(&self) -> &str {
        self.defaults
            .as_ref()
            .and_then(|d| d.theme.as_deref())
            .unwrap_or("dark")
    }

    pub fn pattern(&self) -> &str {
        self.defaults
            .as_ref()
            .and_then(|d| d.pattern.as_deref())
            .unwrap_or(DEFAULT_PATTERN)
    }

    pub fn cursor(&self) -> bool {
        self.presentation
            .as_ref()
            .and_then(|p| p.cursor)
            .unwrap_or(true)
    }

    /// The overlay's immutable per-run settings, defaults filled in.
    pub fn overlay_settings(&self) -> OverlaySettings {
        let base = OverlaySettings::default();
        let Some(p) = self.presentation.as_ref() else {
            return base;
        };
        OverlaySettings {
            duration: p
                .transition
                .map(|s| Duration::from_secs_f32(s.max(0.0)))
                .unwrap_or(base.duration),
            easing: p
                .easing
                .as_deref()
                .map(Easing::from_name)
                .unwrap_or(base.easing),
            fill: p.fill.map(|f| f.clamp(0.05, 1.0)).unwrap_or(base.fill),
            backdrop_opacity: p
                .backdrop_opacity
                .map(|o| o.clamp(0.0, 1.0))
                .unwrap_or(base.backdrop_opacity),
            navigate: p.navigate.unwrap_or(base.navigate),
            wrap: p.wrap.unwrap_or(base.wrap),
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "defaults.theme" => {
                match value {
                    "light" | "dark" => {}
                    _ => anyhow::bail!("Invalid theme: {value}. Must be 'light' or 'dark'."),
                }
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .theme = Some(value.to_string());
            }
            "defaults.pattern" => {
                regex::Regex::new(value)
                    .map_err(|e| anyhow::anyhow!("Invalid pattern: {e}"))?;
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .pattern = Some(value.to_string());
            }
            "presentation.transition" => {
                let secs: f32 = value
                    .parse()
                    .map_err(|_| anyhow::anyhow!("Invalid transition: {value}. Must be seconds."))?;
                if !(0.0..=10.0).contains(&secs) {
                    anyhow::bail!("Invalid transition: {value}. Must be between 0 and 10 seconds.");
                }
                self.presentation
                    .get_or_insert_with(PresentationConfig::default)
                    .transition = Some(secs);
            }
            "presentation.easing" => {
                match value {
                    "linear" | "ease" | "ease-in" | "ease-out" | "ease-in-out" => {}
                    _ => anyhow::bail!(
                        "Invalid easing: {value}. Must be 'linear', 'ease', 'ease-in', 'ease-out', or 'ease-in-out'."
                    ),
                }
                self.presentation
                    .get_or_insert_with(PresentationConfig::default)
                    .easing = Some(value.to_string());
            }
            "presentation.fill" => {
                let fill: f32 = value
                    .parse()
                    .map_err(|_| anyhow::anyhow!("Invalid fill: {value}. Must be a fraction."))?;
                if !(0.05..=1.0).contains(&fill) {
                    anyhow::bail!("Invalid fill: {value}. Must be between 0.05 and 1.0.");
                }
                self.presentation
                    .get_or_insert_with(PresentationConfig::default)
                    .fill = Some(fill);
            }
            "presentation.backdrop_opacity" => {
                let opacity: f32 = value.parse().map_err(|_| {
                    anyhow::anyhow!("Invalid backdrop_opacity: {value}. Must be a fraction.")
                })?;
                if !(0.0..=1.0).contains(&opacity) {
                    anyhow::bail!("Invalid backdrop_opacity: {value}. Must be between 0 and 1.");
                }
                self.presentation
                    .get_or_insert_with(PresentationConfig::default)
                    .backdrop_opacity = Some(opacity);
            }
            "presentation.navigate" | "presentation.wrap" | "presentation.cursor" => {
                let flag: bool = value
                    .parse()
                    .map_err(|_| anyhow::anyhow!("Invalid {key}: {value}. Must be true or false."))?;
                let p = self
                    .presentation
                    .get_or_insert_with(PresentationConfig::default);
                match key {
                    "presentation.navigate" => p.navigate = Some(flag),
                    "presentation.wrap" => p.wrap = Some(flag),
                    _ => p.cursor = Some(flag),
                }
            }
            _ => anyhow::bail!(
                "Unknown config key: {key}. Valid keys: defaults.theme, defaults.pattern, \
                 presentation.transition, presentation.easing, presentation.fill, \
                 presentation.backdrop_opacity, presentation.navigate, presentation.wrap, \
                 presentation.cursor"
            ),
        }
        Ok(())
    }
}
