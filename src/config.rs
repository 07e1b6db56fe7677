/// Application configuration
///
/// Read from `<config_dir>/health-map/config.json`, or from the file named by
/// `HEALTH_MAP_CONFIG`. Every field is optional; a missing file means defaults.
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::state::data::Coordinate;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "HEALTH_MAP_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub map: MapConfig,
    /// Facility dataset (JSON array). The bundled dataset is used when unset.
    pub dataset: Option<PathBuf>,
    pub location: LocationSource,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            map: MapConfig::default(),
            dataset: None,
            location: LocationSource::None,
        }
    }
}

/// Viewport defaults and the tile layer description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Center used at startup and on reset
    pub default_center: Coordinate,
    pub default_zoom: u8,
    /// Zoom used when a facility is selected from the list
    pub focus_zoom: u8,
    /// Zoom used after a successful location fix
    pub located_zoom: u8,
    pub min_zoom: u8,
    pub tiles: TileLayer,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            // Kampala
            default_center: Coordinate::new(0.3476, 32.5825),
            default_zoom: 13,
            focus_zoom: 16,
            located_zoom: 14,
            min_zoom: 2,
            tiles: TileLayer::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileLayer {
    pub attribution: String,
    pub max_zoom: u8,
}

impl Default for TileLayer {
    fn default() -> Self {
        Self {
            attribution: "© OpenStreetMap contributors".to_string(),
            max_zoom: 19,
        }
    }
}

/// Where "locate me" gets its position from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum LocationSource {
    /// No location capability on this system
    None,
    /// A fixed, known position
    Fixed { lat: f64, lng: f64 },
    /// A JSON position report written by an external GPS bridge
    ReportFile { path: PathBuf },
}

impl AppConfig {
    /// Load the config from the default location (or `HEALTH_MAP_CONFIG`)
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("no config directory available, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load the config from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "config file not found, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(AppError::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config: AppConfig = serde_json::from_str(&json).map_err(|source| AppError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

        info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Get the path where the config file should be stored
    fn config_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }

        let mut path = dirs::config_dir().or_else(dirs::home_dir)?;
        path.push("health-map");
        path.push("config.json");
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/health-map.json")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.map.default_zoom, 13);
        assert_eq!(config.map.tiles.max_zoom, 19);
    }

    #[test]
    fn test_partial_config() {
        let json = r#"{
            "map": { "focus_zoom": 17 },
            "location": { "kind": "fixed", "lat": 0.31, "lng": 32.58 }
        }"#;

        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.map.focus_zoom, 17);
        assert_eq!(config.map.default_zoom, 13);
        assert_eq!(config.location, LocationSource::Fixed { lat: 0.31, lng: 32.58 });
        assert!(config.dataset.is_none());
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let path = std::env::temp_dir().join(format!("health-map-bad-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, AppError::ConfigParse { .. }));

        let _ = std::fs::remove_file(&path);
    }
}
