// ABOUTME: Configuration file loading, validation, and hierarchical merging for termpreview
// ABOUTME: Supports TOML config files with XDG Base Directory specification compliance

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use termpreview::{KittyPlacement, PreviewSettings, RendererCommand, SixelSettings};

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub preview: Option<PreviewConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct PreviewConfig {
    #[serde(default, deserialize_with = "validate_cells")]
    pub cols: Option<u32>,
    #[serde(default, deserialize_with = "validate_cells")]
    pub rows: Option<u32>,
    #[serde(default)]
    pub debug: Option<bool>,
    #[serde(default)]
    pub inline_last_resort: Option<bool>,
    #[serde(default)]
    pub save_on_failure: Option<bool>,
    #[serde(default)]
    pub renderers: Option<Vec<RendererCommand>>,
}

impl Config {
    /// Load configuration from standard XDG-compliant locations
    pub fn load() -> Result<Self> {
        let paths = Self::get_config_paths();
        Self::load_from_paths(&paths)
    }

    /// Load from paths ordered highest precedence first; missing files are skipped
    pub fn load_from_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut config = Config::default();

        // Apply lowest precedence first so higher ones override
        for path in paths.iter().rev() {
            let path = path.as_ref();
            if !path.is_file() {
                continue;
            }
            log::debug!("loading config from {}", path.display());
            config = config.merge(Self::load_from_file(path)?);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a single file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content).with_context(|| {
            format!(
                "Failed to parse TOML config file: {}",
                path.as_ref().display()
            )
        })?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))?;
        Ok(config)
    }

    /// Get standard config file paths in order of precedence (highest first)
    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. Project-specific config (highest precedence)
        if let Ok(current_dir) = std::env::current_dir() {
            paths.push(current_dir.join("termpreview.toml"));
        }

        // 2. XDG config home
        if let Some(config_home) = std::env::var_os("XDG_CONFIG_HOME") {
            paths.push(
                PathBuf::from(config_home)
                    .join("termpreview")
                    .join("config.toml"),
            );
        }

        // 3. User config directory fallback
        if let Some(home_dir) = dirs::home_dir() {
            paths.push(
                home_dir
                    .join(".config")
                    .join("termpreview")
                    .join("config.toml"),
            );
        }

        paths
    }

    /// Merge this config with another, giving precedence to the other config
    pub fn merge(self, other: Config) -> Config {
        Config {
            preview: match (self.preview, other.preview) {
                (Some(base), Some(other)) => Some(base.merge(other)),
                (base, None) => base,
                (None, other) => other,
            },
        }
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(ref preview) = self.preview {
            preview
                .validate()
                .context("Invalid [preview] configuration")?;
        }
        Ok(())
    }

    pub fn preview(&self) -> PreviewConfig {
        self.preview.clone().unwrap_or_default()
    }
}

impl PreviewConfig {
    pub fn merge(self, other: PreviewConfig) -> PreviewConfig {
        PreviewConfig {
            cols: other.cols.or(self.cols),
            rows: other.rows.or(self.rows),
            debug: other.debug.or(self.debug),
            inline_last_resort: other.inline_last_resort.or(self.inline_last_resort),
            save_on_failure: other.save_on_failure.or(self.save_on_failure),
            renderers: other.renderers.or(self.renderers),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(ref renderers) = self.renderers {
            for renderer in renderers {
                if renderer.program.trim().is_empty() {
                    return Err(anyhow!("Renderer entries need a non-empty program"));
                }
            }
        }
        Ok(())
    }

    /// Library settings; environment placement overrides are applied later, per preview
    pub fn to_settings(&self) -> PreviewSettings {
        let defaults = KittyPlacement::default();
        let sixel_defaults = SixelSettings::default();

        PreviewSettings {
            placement: KittyPlacement {
                cols: self.cols.unwrap_or(defaults.cols),
                rows: self.rows.unwrap_or(defaults.rows),
            },
            sixel: SixelSettings {
                renderers: self
                    .renderers
                    .clone()
                    .unwrap_or(sixel_defaults.renderers),
                inline_last_resort: self
                    .inline_last_resort
                    .unwrap_or(sixel_defaults.inline_last_resort),
                output: sixel_defaults.output,
            },
        }
    }
}

// Custom deserializer for placement cell counts
fn validate_cells<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value: Option<i64> = Option::deserialize(deserializer)?;

    match value {
        Some(n) if n > 0 => u32::try_from(n)
            .map(Some)
            .map_err(|_| D::Error::custom(format!("Cell count {} is too large", n))),
        Some(n) => Err(D::Error::custom(format!(
            "Invalid cell count {}. Must be a positive integer",
            n
        ))),
        None => Ok(None),
    }
}
