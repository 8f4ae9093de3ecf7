//! Configuration and settings management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::tools::ToolKind;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub scan: ScanSettings,
    #[serde(default)]
    pub ui: UiSettings,
}

/// Knobs consumed by the scanning backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSettings {
    #[serde(default)]
    pub included_directories: Vec<String>,
    #[serde(default)]
    pub excluded_directories: Vec<String>,
    /// Extensions (without dot) to scan; empty means all.
    #[serde(default)]
    pub allowed_extensions: Vec<String>,
    #[serde(default = "default_minimum_file_size")]
    pub minimum_file_size: u64,
    #[serde(default = "default_maximum_file_size")]
    pub maximum_file_size: u64,
    #[serde(default = "default_true")]
    pub recursive_search: bool,
    #[serde(default = "default_true")]
    pub move_deleted_files_to_trash: bool,
    #[serde(default = "default_big_files_count")]
    pub big_files_count: usize,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            included_directories: Vec::new(),
            excluded_directories: Vec::new(),
            allowed_extensions: Vec::new(),
            minimum_file_size: default_minimum_file_size(),
            maximum_file_size: default_maximum_file_size(),
            recursive_search: true,
            move_deleted_files_to_trash: true,
            big_files_count: default_big_files_count(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiSettings {
    #[serde(default = "default_tool")]
    pub default_tool: ToolKind,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            default_tool: default_tool(),
        }
    }
}

fn default_minimum_file_size() -> u64 {
    16 * 1024
}

// TOML integers are i64, so "no limit" is a large finite cap (4 TiB).
fn default_maximum_file_size() -> u64 {
    4 << 40
}

fn default_big_files_count() -> usize {
    50
}

fn default_true() -> bool {
    true
}

fn default_tool() -> ToolKind {
    ToolKind::DuplicateFiles
}

impl Settings {
    /// Load settings from a file, or return defaults if file doesn't exist
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        let settings: Settings = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))?;

        Ok(settings)
    }

    /// Save settings to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize settings")?;

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;

        Ok(())
    }

    /// Get the default settings file path
    pub fn default_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dupkit");

        config_dir.join("settings.toml")
    }
}

// Minimal cross-platform config-directory lookup, to avoid pulling in a
// crate for one path.
mod dirs {
    use std::path::PathBuf;

    pub fn config_dir() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var_os("XDG_CONFIG_HOME")
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
                })
        }
        #[cfg(target_os = "windows")]
        {
            std::env::var_os("APPDATA").map(PathBuf::from)
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(settings.scan.included_directories.is_empty());
        assert!(settings.scan.recursive_search);
        assert!(settings.scan.move_deleted_files_to_trash);
        assert_eq!(settings.scan.big_files_count, 50);
        assert_eq!(settings.ui.default_tool, ToolKind::DuplicateFiles);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let settings_path = temp_dir.path().join("settings.toml");

        let mut settings = Settings::default();
        settings.scan.included_directories = vec!["/data/photos".to_string()];
        settings.scan.minimum_file_size = 1;
        settings.ui.default_tool = ToolKind::SimilarImages;

        settings.save(&settings_path).unwrap();

        let loaded = Settings::load(&settings_path).unwrap();
        assert_eq!(loaded.scan.included_directories, vec!["/data/photos"]);
        assert_eq!(loaded.scan.minimum_file_size, 1);
        assert_eq!(loaded.ui.default_tool, ToolKind::SimilarImages);
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let settings_path = temp_dir.path().join("nonexistent.toml");

        let settings = Settings::load(&settings_path).unwrap();
        assert!(settings.scan.included_directories.is_empty());
        assert_eq!(settings.ui.default_tool, ToolKind::DuplicateFiles);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let settings_path = temp_dir.path().join("settings.toml");
        std::fs::write(&settings_path, "[scan]\nincluded_directories = [\"/srv\"]\n").unwrap();

        let settings = Settings::load(&settings_path).unwrap();
        assert_eq!(settings.scan.included_directories, vec!["/srv"]);
        assert!(settings.scan.recursive_search);
        assert_eq!(settings.scan.big_files_count, 50);
    }

    #[test]
    fn test_settings_creates_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested_path = temp_dir
            .path()
            .join("subdir")
            .join("nested")
            .join("settings.toml");

        assert!(!nested_path.parent().unwrap().exists());

        let settings = Settings::default();
        settings.save(&nested_path).unwrap();

        assert!(nested_path.exists());

        let loaded = Settings::load(&nested_path).unwrap();
        assert_eq!(loaded.ui.default_tool, ToolKind::DuplicateFiles);
    }
}
