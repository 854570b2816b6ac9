use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::app_dirs::AppDirs;
use crate::geometry::{CellScale, Geometry};
use crate::transition::Timings;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("target size must be greater than zero")]
    ZeroTargetSize,
    #[error("cell dimensions must be greater than zero (got {width}x{height})")]
    ZeroCellSize { width: u32, height: u32 },
    #[error("expiry must be greater than zero milliseconds")]
    ZeroExpiry,
    #[error("cell dimensions must be at most {max} units (got {width}x{height})")]
    CellSizeTooLarge { width: u32, height: u32, max: u32 },
}

/// Upper bound for `cell_width`/`cell_height`; keeps terminal-to-unit
/// conversion well inside `u32`
pub const MAX_CELL_UNITS: u32 = 10_000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub target_size: u32,
    pub padding: u32,
    pub top_inset: u32,
    pub bottom_inset: u32,
    pub expiry_ms: u64,
    pub tap_reshow_ms: u64,
    pub flee_reshow_ms: u64,
    pub cell_width: u32,
    pub cell_height: u32,
}

impl Default for Config {
    fn default() -> Self {
        let geometry = Geometry::default();
        let timings = Timings::default();
        Self {
            target_size: geometry.target_size,
            padding: geometry.padding,
            top_inset: geometry.top_inset,
            bottom_inset: geometry.bottom_inset,
            expiry_ms: timings.expiry.as_millis() as u64,
            tap_reshow_ms: timings.tap_reshow.as_millis() as u64,
            flee_reshow_ms: timings.flee_reshow.as_millis() as u64,
            cell_width: 12,
            cell_height: 24,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_size == 0 {
            return Err(ConfigError::ZeroTargetSize);
        }
        if self.cell_width == 0 || self.cell_height == 0 {
            return Err(ConfigError::ZeroCellSize {
                width: self.cell_width,
                height: self.cell_height,
            });
        }
        if self.cell_width > MAX_CELL_UNITS || self.cell_height > MAX_CELL_UNITS {
            return Err(ConfigError::CellSizeTooLarge {
                width: self.cell_width,
                height: self.cell_height,
                max: MAX_CELL_UNITS,
            });
        }
        if self.expiry_ms == 0 {
            return Err(ConfigError::ZeroExpiry);
        }
        Ok(())
    }

    pub fn geometry(&self) -> Geometry {
        Geometry {
            target_size: self.target_size,
            padding: self.padding,
            top_inset: self.top_inset,
            bottom_inset: self.bottom_inset,
        }
    }

    pub fn timings(&self) -> Timings {
        Timings {
            expiry: Duration::from_millis(self.expiry_ms),
            tap_reshow: Duration::from_millis(self.tap_reshow_ms),
            flee_reshow: Duration::from_millis(self.flee_reshow_ms),
        }
    }

    pub fn cell_scale(&self) -> CellScale {
        CellScale {
            width: self.cell_width,
            height: self.cell_height,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("dogtap_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg,
                Err(error) => {
                    tracing::warn!(path = %self.path.display(), %error, "ignoring unreadable config")
                }
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_game_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.geometry(), Geometry::default());
        assert_eq!(cfg.timings(), Timings::default());
        assert_eq!(cfg.cell_scale(), CellScale { width: 12, height: 24 });
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn roundtrip_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            target_size: 96,
            expiry_ms: 1200,
            cell_width: 10,
            ..Config::default()
        };
        store.save(&cfg).unwrap();
        assert_eq!(store.load(), cfg);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("absent.json"));
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "expiry_ms": 900 }"#).unwrap();

        let loaded = FileConfigStore::with_path(&path).load();
        assert_eq!(loaded.expiry_ms, 900);
        assert_eq!(loaded.target_size, 120);
        assert_eq!(loaded.tap_reshow_ms, 500);
    }

    #[test]
    fn garbage_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, b"not json").unwrap();
        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());
    }

    #[test]
    fn validation_rejects_zero_values() {
        let zero_size = Config {
            target_size: 0,
            ..Config::default()
        };
        assert_eq!(zero_size.validate(), Err(ConfigError::ZeroTargetSize));

        let zero_cell = Config {
            cell_height: 0,
            ..Config::default()
        };
        assert_eq!(
            zero_cell.validate(),
            Err(ConfigError::ZeroCellSize {
                width: 12,
                height: 0
            })
        );

        let zero_expiry = Config {
            expiry_ms: 0,
            ..Config::default()
        };
        assert_eq!(zero_expiry.validate(), Err(ConfigError::ZeroExpiry));
        assert_eq!(
            zero_expiry.validate().unwrap_err().to_string(),
            "expiry must be greater than zero milliseconds"
        );
    }

    #[test]
    fn validation_rejects_oversized_cells() {
        let huge = Config {
            cell_width: 100_000_000,
            ..Config::default()
        };
        assert_eq!(
            huge.validate(),
            Err(ConfigError::CellSizeTooLarge {
                width: 100_000_000,
                height: 24,
                max: MAX_CELL_UNITS
            })
        );

        let at_limit = Config {
            cell_width: MAX_CELL_UNITS,
            cell_height: MAX_CELL_UNITS,
            ..Config::default()
        };
        assert_eq!(at_limit.validate(), Ok(()));
        // u16::MAX cells at the limit still fit in u32 units
        let viewport = at_limit.cell_scale().viewport(u16::MAX, u16::MAX);
        assert_eq!(viewport.width, u16::MAX as u32 * MAX_CELL_UNITS);
    }
}
