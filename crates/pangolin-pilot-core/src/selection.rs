//! Per-category service selection maps
//!
//! One boolean map per wizard category. Keys come from the catalog on
//! first initialization and are only ever flipped, never removed. Toggling
//! a key the catalog does not know simply inserts it; the maps do not
//! validate against the registry.

use crate::catalog::{self, ServiceCategory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selections {
    #[serde(default)]
    pub media_automation: BTreeMap<String, bool>,
    #[serde(default)]
    pub download_tools: BTreeMap<String, bool>,
    #[serde(default)]
    pub content_enhancement: BTreeMap<String, bool>,
    #[serde(default)]
    pub monitoring: BTreeMap<String, bool>,
}

impl Selections {
    /// Seed every category from the catalog's default-enabled flags
    pub fn with_defaults() -> Self {
        let mut selections = Self::default();
        for category in [
            ServiceCategory::MediaAutomation,
            ServiceCategory::DownloadTools,
            ServiceCategory::ContentEnhancement,
            ServiceCategory::Monitoring,
        ] {
            let map = selections.map_mut(category);
            for entry in catalog::services(category) {
                map.insert(entry.key.to_string(), entry.enabled_by_default);
            }
        }
        selections
    }

    pub fn map(&self, category: ServiceCategory) -> &BTreeMap<String, bool> {
        match category {
            ServiceCategory::MediaAutomation => &self.media_automation,
            ServiceCategory::DownloadTools => &self.download_tools,
            ServiceCategory::ContentEnhancement => &self.content_enhancement,
            ServiceCategory::Monitoring => &self.monitoring,
        }
    }

    fn map_mut(&mut self, category: ServiceCategory) -> &mut BTreeMap<String, bool> {
        match category {
            ServiceCategory::MediaAutomation => &mut self.media_automation,
            ServiceCategory::DownloadTools => &mut self.download_tools,
            ServiceCategory::ContentEnhancement => &mut self.content_enhancement,
            ServiceCategory::Monitoring => &mut self.monitoring,
        }
    }

    /// Flip one key, leaving every other key untouched. Absent keys are
    /// treated as disabled, so the first toggle of an unknown key enables it.
    pub fn toggle(&mut self, category: ServiceCategory, key: &str) {
        let flag = self
            .map_mut(category)
            .entry(key.to_string())
            .or_insert(false);
        *flag = !*flag;
    }

    pub fn is_enabled(&self, category: ServiceCategory, key: &str) -> bool {
        self.map(category).get(key).copied().unwrap_or(false)
    }

    /// Keys currently enabled in a category, in map order
    pub fn enabled(&self, category: ServiceCategory) -> Vec<&str> {
        self.map(category)
            .iter()
            .filter(|(_, on)| **on)
            .map(|(key, _)| key.as_str())
            .collect()
    }

    /// Total enabled services across all categories
    pub fn enabled_count(&self) -> usize {
        [
            ServiceCategory::MediaAutomation,
            ServiceCategory::DownloadTools,
            ServiceCategory::ContentEnhancement,
            ServiceCategory::Monitoring,
        ]
        .iter()
        .map(|c| self.enabled(*c).len())
        .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_seed_every_catalog_key() {
        let selections = Selections::with_defaults();
        assert_eq!(
            selections.media_automation.len(),
            catalog::services(ServiceCategory::MediaAutomation).len()
        );
        assert!(selections.is_enabled(ServiceCategory::MediaAutomation, "sonarr"));
        assert!(!selections.is_enabled(ServiceCategory::MediaAutomation, "bazarr"));
    }

    #[test]
    fn double_toggle_restores_original_and_leaves_others_alone() {
        let mut selections = Selections::with_defaults();
        let before = selections.media_automation.clone();

        selections.toggle(ServiceCategory::MediaAutomation, "lidarr");
        assert!(selections.is_enabled(ServiceCategory::MediaAutomation, "lidarr"));
        selections.toggle(ServiceCategory::MediaAutomation, "lidarr");

        assert_eq!(selections.media_automation, before);
    }

    #[test]
    fn toggling_unknown_key_inserts_it_enabled() {
        let mut selections = Selections::with_defaults();
        selections.toggle(ServiceCategory::Monitoring, "grafana");
        assert!(selections.is_enabled(ServiceCategory::Monitoring, "grafana"));
    }

    #[test]
    fn enabled_lists_only_active_keys() {
        let mut selections = Selections::default();
        selections.toggle(ServiceCategory::DownloadTools, "qbittorrent");
        selections.toggle(ServiceCategory::DownloadTools, "sabnzbd");
        selections.toggle(ServiceCategory::DownloadTools, "sabnzbd");

        assert_eq!(
            selections.enabled(ServiceCategory::DownloadTools),
            vec!["qbittorrent"]
        );
    }
}
