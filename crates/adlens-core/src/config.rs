use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::types::{CoercionPolicy, Platform};

pub const CONFIG_ENV_VAR: &str = "ADLENS_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "adlens.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketingSourceConfig {
    pub platform: Platform,
    pub file: String,
}

/// Where the dataset lives and how strictly to treat numeric gaps.
/// Defaults reproduce the conventional export layout: a `dataset/` folder
/// holding `business.csv` plus one file per advertising platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub data_dir: PathBuf,
    pub business_file: String,
    pub marketing_files: Vec<MarketingSourceConfig>,
    pub coercion: CoercionPolicy,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("dataset"),
            business_file: "business.csv".to_string(),
            marketing_files: Platform::all()
                .into_iter()
                .map(|platform| MarketingSourceConfig {
                    platform,
                    file: format!("{platform}.csv"),
                })
                .collect(),
            coercion: CoercionPolicy::default(),
        }
    }
}

impl DatasetConfig {
    pub fn business_path(&self) -> PathBuf {
        self.data_dir.join(&self.business_file)
    }

    pub fn marketing_path(&self, source: &MarketingSourceConfig) -> PathBuf {
        self.data_dir.join(&source.file)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|err| PipelineError::Config(err.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Resolution order: explicit path, then the `ADLENS_CONFIG`
    /// environment variable, then `adlens.toml` in the working directory,
    /// then built-in defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Self::load(Path::new(&path));
        }
        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            return Self::load(default_path);
        }
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_all_platforms() {
        let config = DatasetConfig::default();
        assert_eq!(config.marketing_files.len(), 3);
        assert_eq!(config.business_path(), PathBuf::from("dataset/business.csv"));
        assert_eq!(
            config.marketing_path(&config.marketing_files[0]),
            PathBuf::from("dataset/Facebook.csv")
        );
    }

    #[test]
    fn parses_toml_overrides() {
        let config = DatasetConfig::from_toml_str(
            r#"
            data_dir = "exports"
            business_file = "daily.csv"
            coercion = "reject"

            [[marketing_files]]
            platform = "TikTok"
            file = "tiktok_export.csv"
            "#,
        )
        .expect("config parse failed");

        assert_eq!(config.data_dir, PathBuf::from("exports"));
        assert_eq!(config.coercion, CoercionPolicy::Reject);
        assert_eq!(config.marketing_files.len(), 1);
        assert_eq!(config.marketing_files[0].platform, Platform::TikTok);
    }

    #[test]
    fn bad_toml_is_a_config_error() {
        let err = DatasetConfig::from_toml_str("data_dir = 42").expect_err("should fail");
        assert!(matches!(err, PipelineError::Config(_)));
    }
}
