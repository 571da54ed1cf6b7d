//! Selector configuration stored under `.pageselect/config.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Default config location relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = ".pageselect/config.toml";

/// Selector configuration (TOML).
///
/// Missing fields default to the values the artwork listing uses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SelectorConfig {
    /// Rows per page; also the `limit` sent to the API.
    pub page_size: u32,

    pub api: ApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiConfig {
    /// Collection endpoint queried with `page`, `limit` and `fields`.
    pub base_url: String,

    /// Fields requested from the API.
    pub fields: Vec<String>,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.artic.edu/api/v1/artworks".to_string(),
            fields: [
                "id",
                "title",
                "place_of_origin",
                "artist_display",
                "inscriptions",
                "date_start",
                "date_end",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            timeout_secs: 30,
        }
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            page_size: 12,
            api: ApiConfig::default(),
        }
    }
}

impl SelectorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(anyhow!("page_size must be > 0"));
        }
        if self.api.base_url.trim().is_empty() {
            return Err(anyhow!("api.base_url must be non-empty"));
        }
        if self.api.timeout_secs == 0 {
            return Err(anyhow!("api.timeout_secs must be > 0"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `SelectorConfig::default()`.
pub fn load_config(path: &Path) -> Result<SelectorConfig> {
    if !path.exists() {
        let cfg = SelectorConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: SelectorConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &SelectorConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, &buf)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, SelectorConfig::default());
        assert_eq!(cfg.page_size, 12);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "page_size = 25\n").expect("write");
        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.page_size, 25);
        assert_eq!(cfg.api, ApiConfig::default());
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "page_size = 0\n").expect("write");
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("page_size"));
    }

    #[test]
    fn write_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("nested").join("config.toml");
        let cfg = SelectorConfig::default();
        write_config(&path, &cfg).expect("write");
        let loaded = load_config(&path).expect("load");
        assert_eq!(loaded, cfg);
    }
}
