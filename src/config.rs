use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::io::catalog::MASTER_FILE;
use crate::io::output::EXPORT_PREFIX;

/// Runtime settings, usually read from `vercalc.toml`.
///
/// ```toml
/// catalog_dir = "public/data"
/// export_dir = "exports"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerCalcConfig {
    pub catalog_dir: PathBuf,
    pub master_file: String,
    pub export_dir: PathBuf,
    pub export_prefix: String,
}

impl Default for VerCalcConfig {
    fn default() -> Self {
        Self {
            catalog_dir: PathBuf::from("data"),
            master_file: MASTER_FILE.to_string(),
            export_dir: PathBuf::from("."),
            export_prefix: EXPORT_PREFIX.to_string(),
        }
    }
}

impl VerCalcConfig {
    pub fn from_toml_str(text: &str) -> crate::error::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::from_toml_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        tracing::debug!(?config, "loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_empty() {
        let config = VerCalcConfig::from_toml_str("").unwrap();
        assert_eq!(config, VerCalcConfig::default());
        assert_eq!(config.master_file, "master_coil_database_new.json");
        assert_eq!(config.export_prefix, "vercalc_export");
    }

    #[test]
    fn test_partial_override() {
        let config = VerCalcConfig::from_toml_str(
            r#"
catalog_dir = "public/data"
export_dir = "exports"
"#,
        )
        .unwrap();
        assert_eq!(config.catalog_dir, PathBuf::from("public/data"));
        assert_eq!(config.export_dir, PathBuf::from("exports"));
        assert_eq!(config.master_file, MASTER_FILE);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(VerCalcConfig::from_toml_str("catalog = 'x'").is_err());
    }

    #[test]
    fn test_load_missing_file_has_context() {
        let dir = tempfile::tempdir().unwrap();
        let err = VerCalcConfig::load(dir.path().join("missing.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vercalc.toml");
        std::fs::write(&path, "export_prefix = \"case_01\"\n").unwrap();
        let config = VerCalcConfig::load(&path).unwrap();
        assert_eq!(config.export_prefix, "case_01");
    }
}
