//! Local persistence bridge
//!
//! One JSON blob under the platform config directory holding the last-saved
//! configuration record. It is written on every save and read back only as
//! a fallback when the daemon's autodetect endpoint is unavailable.

use chrono::Utc;
use pangolin_pilot_core::StackConfig;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const BLOB_FILE: &str = "saved-config.json";

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Could not determine config directory")]
    NoConfigDir,
}

/// Where the wizard hydrated its initial state from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HydrationSource {
    Autodetect,
    LocalBlob,
    Defaults,
}

impl HydrationSource {
    pub fn label(&self) -> &'static str {
        match self {
            HydrationSource::Autodetect => "autodetected by the setup daemon",
            HydrationSource::LocalBlob => "restored from the last saved config",
            HydrationSource::Defaults => "initial defaults",
        }
    }
}

/// Resolve the blob path, honoring an explicit `--config-dir` override
pub fn blob_path(override_dir: Option<&Path>) -> Result<PathBuf, PersistError> {
    let dir = match override_dir {
        Some(dir) => dir.to_path_buf(),
        None => dirs_next::config_dir()
            .ok_or(PersistError::NoConfigDir)?
            .join("pangolin-pilot"),
    };
    Ok(dir.join(BLOB_FILE))
}

/// Write the full configuration record plus a `saved_at` stamp
pub fn store_blob(path: &Path, config: &StackConfig) -> Result<(), PersistError> {
    let mut blob = serde_json::to_value(config)?;
    if let Some(obj) = blob.as_object_mut() {
        obj.insert(
            "saved_at".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(&blob)?)?;
    Ok(())
}

/// Read the saved blob, best-effort. A missing or garbled file is `None`.
pub fn load_blob(path: &Path) -> Option<Value> {
    let raw = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Ignoring unreadable saved config at {:?}: {}", path, e);
            None
        }
    }
}

/// Merge startup defaults into the record: the autodetect response when the
/// daemon answered, otherwise the local blob, otherwise nothing. Both
/// sources are shallow-merged; neither is an error when absent.
pub fn hydrate(
    config: &mut StackConfig,
    autodetect: Option<Value>,
    local_blob: Option<Value>,
) -> HydrationSource {
    if let Some(overlay) = autodetect {
        config.apply_overlay(&overlay);
        return HydrationSource::Autodetect;
    }
    if let Some(overlay) = local_blob {
        config.apply_overlay(&overlay);
        return HydrationSource::LocalBlob;
    }
    HydrationSource::Defaults
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hydrate_prefers_autodetect() {
        let mut config = StackConfig::default();
        let source = hydrate(
            &mut config,
            Some(json!({"media_server": "plex"})),
            Some(json!({"media_server": "emby"})),
        );
        assert_eq!(source, HydrationSource::Autodetect);
        assert_eq!(config.media_server, "plex");
    }

    #[test]
    fn hydrate_falls_back_to_local_blob() {
        let mut config = StackConfig::default();
        let source = hydrate(
            &mut config,
            None,
            Some(json!({"media_server": "emby", "storage_path": "/srv/media"})),
        );
        assert_eq!(source, HydrationSource::LocalBlob);
        assert_eq!(config.media_server, "emby");
        assert_eq!(config.storage_path, "/srv/media");
    }

    #[test]
    fn hydrate_without_sources_keeps_defaults() {
        let mut config = StackConfig::default();
        let source = hydrate(&mut config, None, None);
        assert_eq!(source, HydrationSource::Defaults);
        assert_eq!(config, StackConfig::default());
    }

    #[test]
    fn blob_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(BLOB_FILE);

        let mut config = StackConfig::default();
        config.media_server = "jellyfin".to_string();
        config.storage_path = "/mnt/media".to_string();
        store_blob(&path, &config).unwrap();

        let blob = load_blob(&path).unwrap();
        assert_eq!(blob["media_server"], "jellyfin");
        assert!(blob["saved_at"].is_string());

        // The stamp must not disturb hydration
        let mut restored = StackConfig::default();
        hydrate(&mut restored, None, Some(blob));
        assert_eq!(restored.storage_path, "/mnt/media");
    }

    #[test]
    fn missing_blob_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_blob(&dir.path().join("nope.json")).is_none());
    }

    #[test]
    fn garbled_blob_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(BLOB_FILE);
        fs::write(&path, "{not json").unwrap();
        assert!(load_blob(&path).is_none());
    }
}
