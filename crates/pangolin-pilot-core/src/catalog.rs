//! Static service catalog
//!
//! The registry of services the wizard knows how to configure. This is
//! fixed data: keys, display names, default ports, and which services are
//! enabled out of the box. The deploy backend is the only thing that knows
//! how to actually run them.

use serde::{Deserialize, Serialize};

/// Wizard category a service belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceCategory {
    MediaAutomation,
    DownloadTools,
    ContentEnhancement,
    Monitoring,
}

impl ServiceCategory {
    pub fn title(&self) -> &'static str {
        match self {
            ServiceCategory::MediaAutomation => "Media Automation",
            ServiceCategory::DownloadTools => "Download Tools",
            ServiceCategory::ContentEnhancement => "Content Enhancement",
            ServiceCategory::Monitoring => "Monitoring",
        }
    }
}

impl std::fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// One entry in the service registry
#[derive(Debug, Clone, Copy)]
pub struct ServiceEntry {
    /// Stable key used in selection maps and the configuration record
    pub key: &'static str,
    /// Human-readable name
    pub name: &'static str,
    /// Port the service listens on by default
    pub default_port: u16,
    /// Whether the service starts enabled on first initialization
    pub enabled_by_default: bool,
}

const MEDIA_AUTOMATION: &[ServiceEntry] = &[
    ServiceEntry {
        key: "sonarr",
        name: "Sonarr",
        default_port: 8989,
        enabled_by_default: true,
    },
    ServiceEntry {
        key: "radarr",
        name: "Radarr",
        default_port: 7878,
        enabled_by_default: true,
    },
    ServiceEntry {
        key: "lidarr",
        name: "Lidarr",
        default_port: 8686,
        enabled_by_default: false,
    },
    ServiceEntry {
        key: "readarr",
        name: "Readarr",
        default_port: 8787,
        enabled_by_default: false,
    },
    ServiceEntry {
        key: "prowlarr",
        name: "Prowlarr",
        default_port: 9696,
        enabled_by_default: true,
    },
    ServiceEntry {
        key: "bazarr",
        name: "Bazarr",
        default_port: 6767,
        enabled_by_default: false,
    },
];

const DOWNLOAD_TOOLS: &[ServiceEntry] = &[
    ServiceEntry {
        key: "qbittorrent",
        name: "qBittorrent",
        default_port: 8080,
        enabled_by_default: true,
    },
    ServiceEntry {
        key: "sabnzbd",
        name: "SABnzbd",
        default_port: 8081,
        enabled_by_default: false,
    },
    ServiceEntry {
        key: "transmission",
        name: "Transmission",
        default_port: 9091,
        enabled_by_default: false,
    },
    ServiceEntry {
        key: "nzbget",
        name: "NZBGet",
        default_port: 6789,
        enabled_by_default: false,
    },
];

const CONTENT_ENHANCEMENT: &[ServiceEntry] = &[
    ServiceEntry {
        key: "overseerr",
        name: "Overseerr",
        default_port: 5055,
        enabled_by_default: true,
    },
    ServiceEntry {
        key: "jellyseerr",
        name: "Jellyseerr",
        default_port: 5056,
        enabled_by_default: false,
    },
    ServiceEntry {
        key: "tdarr",
        name: "Tdarr",
        default_port: 8265,
        enabled_by_default: false,
    },
    ServiceEntry {
        key: "unpackerr",
        name: "Unpackerr",
        default_port: 5656,
        enabled_by_default: false,
    },
];

const MONITORING: &[ServiceEntry] = &[
    ServiceEntry {
        key: "tautulli",
        name: "Tautulli",
        default_port: 8181,
        enabled_by_default: true,
    },
    ServiceEntry {
        key: "uptime-kuma",
        name: "Uptime Kuma",
        default_port: 3001,
        enabled_by_default: false,
    },
    ServiceEntry {
        key: "netdata",
        name: "Netdata",
        default_port: 19999,
        enabled_by_default: false,
    },
    ServiceEntry {
        key: "homarr",
        name: "Homarr",
        default_port: 7575,
        enabled_by_default: false,
    },
];

/// All services registered for a category
pub fn services(category: ServiceCategory) -> &'static [ServiceEntry] {
    match category {
        ServiceCategory::MediaAutomation => MEDIA_AUTOMATION,
        ServiceCategory::DownloadTools => DOWNLOAD_TOOLS,
        ServiceCategory::ContentEnhancement => CONTENT_ENHANCEMENT,
        ServiceCategory::Monitoring => MONITORING,
    }
}

/// Look up a service entry by key, across all categories
pub fn entry(key: &str) -> Option<&'static ServiceEntry> {
    [
        ServiceCategory::MediaAutomation,
        ServiceCategory::DownloadTools,
        ServiceCategory::ContentEnhancement,
        ServiceCategory::Monitoring,
    ]
    .iter()
    .flat_map(|c| services(*c).iter())
    .find(|e| e.key == key)
}

/// Media server choice offered on the media-server step
#[derive(Debug, Clone, Copy)]
pub struct MediaServerOption {
    pub key: &'static str,
    pub name: &'static str,
    pub default_port: u16,
}

pub const MEDIA_SERVERS: &[MediaServerOption] = &[
    MediaServerOption {
        key: "plex",
        name: "Plex",
        default_port: 32400,
    },
    MediaServerOption {
        key: "jellyfin",
        name: "Jellyfin",
        default_port: 8096,
    },
    MediaServerOption {
        key: "emby",
        name: "Emby",
        default_port: 8096,
    },
];

/// Services whose URL/API-key pair can be probed via the connection test
pub const TESTABLE_SERVICES: &[&str] = &["sonarr", "radarr", "prowlarr"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_finds_services_across_categories() {
        assert_eq!(entry("sonarr").unwrap().default_port, 8989);
        assert_eq!(entry("tautulli").unwrap().name, "Tautulli");
        assert!(entry("definitely-not-a-service").is_none());
    }

    #[test]
    fn testable_services_exist_in_catalog() {
        for key in TESTABLE_SERVICES {
            assert!(entry(key).is_some(), "unknown testable service: {}", key);
        }
    }

    #[test]
    fn keys_are_unique() {
        let mut seen = std::collections::BTreeSet::new();
        for category in [
            ServiceCategory::MediaAutomation,
            ServiceCategory::DownloadTools,
            ServiceCategory::ContentEnhancement,
            ServiceCategory::Monitoring,
        ] {
            for entry in services(category) {
                assert!(seen.insert(entry.key), "duplicate key: {}", entry.key);
            }
        }
    }
}
