//! Generator configuration profiles on disk
//!
//! A profile is a `GeneratorConfig` stored as pretty JSON. Single files are
//! read and written with `load_config` / `save_config`; a `ProfileStore`
//! keeps named profiles together in one directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{ExciterError, ExciterResult, GeneratorConfig};

/// Read a profile. Missing fields take their defaults.
pub fn load_config(path: &Path) -> ExciterResult<GeneratorConfig> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

pub fn save_config(path: &Path, config: &GeneratorConfig) -> ExciterResult<()> {
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)?;
    Ok(())
}

/// Reject anything that could escape the profile directory.
/// Allows alphanumerics, spaces, hyphens and underscores.
fn sanitize_name(name: &str) -> ExciterResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ExciterError::Config("Profile name cannot be empty".into()));
    }
    if trimmed.contains("..") || trimmed.contains('/') || trimmed.contains('\\') {
        return Err(ExciterError::Config(format!("Invalid profile name '{trimmed}'")));
    }
    if !trimmed
        .chars()
        .all(|c| c.is_alphanumeric() || c == ' ' || c == '-' || c == '_')
    {
        return Err(ExciterError::Config(format!(
            "Profile name '{trimmed}' contains invalid characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Named profiles kept as `<name>.json` in one directory
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    /// Open (creating if needed) a profile directory
    pub fn open(dir: impl Into<PathBuf>) -> ExciterResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, name: &str) -> ExciterResult<PathBuf> {
        let name = sanitize_name(name)?;
        Ok(self.dir.join(format!("{name}.json")))
    }

    pub fn save(&self, name: &str, config: &GeneratorConfig) -> ExciterResult<()> {
        let path = self.path_for(name)?;
        save_config(&path, config)?;
        log::info!("Saved profile '{}' to {}", name.trim(), path.display());
        Ok(())
    }

    pub fn load(&self, name: &str) -> ExciterResult<GeneratorConfig> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Err(ExciterError::Config(format!(
                "Profile '{}' not found",
                name.trim()
            )));
        }
        load_config(&path)
    }

    /// Profile names, sorted
    pub fn list(&self) -> ExciterResult<Vec<String>> {
        let mut names: Vec<String> = fs::read_dir(&self.dir)?
            .filter_map(|entry| {
                let path = entry.ok()?.path();
                if path.extension()?.to_str()? == "json" {
                    path.file_stem()?.to_str().map(String::from)
                } else {
                    None
                }
            })
            .collect();
        names.sort();
        Ok(names)
    }

    pub fn delete(&self, name: &str) -> ExciterResult<()> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Err(ExciterError::Config(format!(
                "Profile '{}' not found",
                name.trim()
            )));
        }
        fs::remove_file(&path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MixtureParams, Sideband};

    fn custom_config() -> GeneratorConfig {
        GeneratorConfig {
            modulation_index: 0.8,
            mixture: MixtureParams {
                means: vec![0.0, 0.6],
                variances: vec![0.5, 0.1],
                weights: vec![2.0, 1.0],
            },
            tap_count: 63,
            interp_taps: Some(vec![0.25, 0.5, 0.25]),
            interp: 2,
            sideband: Sideband::Lower,
            threaded: false,
            ..Default::default()
        }
    }

    #[test]
    fn save_then_load_preserves_every_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        let config = custom_config();

        save_config(&path, &config).unwrap();
        assert_eq!(load_config(&path).unwrap(), config);
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ \"tap_count\": ").unwrap();
        assert!(matches!(load_config(&path), Err(ExciterError::Json(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ExciterError::Io(_)));
    }

    #[test]
    fn store_lists_loads_and_deletes_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::open(dir.path().join("profiles")).unwrap();

        store.save("wide usb", &GeneratorConfig::default()).unwrap();
        store.save("narrow-lsb", &custom_config()).unwrap();
        assert_eq!(store.list().unwrap(), vec!["narrow-lsb", "wide usb"]);

        assert_eq!(store.load("narrow-lsb").unwrap(), custom_config());

        store.delete("wide usb").unwrap();
        assert_eq!(store.list().unwrap(), vec!["narrow-lsb"]);
        assert!(store.load("wide usb").is_err());
        assert!(store.delete("wide usb").is_err());
    }

    #[test]
    fn sanitize_name_rejects_path_traversal() {
        assert!(sanitize_name("../evil").is_err());
        assert!(sanitize_name("foo/bar").is_err());
        assert!(sanitize_name("foo\\bar").is_err());
        assert!(sanitize_name("").is_err());
        assert!(sanitize_name("  ").is_err());
        assert!(sanitize_name("profile;rm").is_err());
    }

    #[test]
    fn sanitize_name_accepts_valid_names() {
        assert_eq!(sanitize_name(" lsb_2k ").unwrap(), "lsb_2k");
        assert_eq!(sanitize_name("Bench Profile-1").unwrap(), "Bench Profile-1");
    }
}
