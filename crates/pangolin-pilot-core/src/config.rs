//! The configuration record
//!
//! A single typed aggregate holding every field the wizard collects. The
//! record is sparse: absent fields serialize to nothing and fall back to
//! placeholder defaults at render time. Hydration from the backend's
//! autodetect response (or the locally saved copy) is a shallow merge that
//! tolerates any JSON shape.

use crate::catalog;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Per-service settings sub-object
///
/// Every field is optional; only what the user actually typed is stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_port: Option<String>,
}

/// Editable field within a service settings sub-object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServiceField {
    #[default]
    Url,
    ApiKey,
    Port,
    AuthMethod,
    LogLevel,
    Branch,
    UrlBase,
    ProxyHost,
    ProxyPort,
}

pub const SERVICE_FIELDS: &[ServiceField] = &[
    ServiceField::Url,
    ServiceField::ApiKey,
    ServiceField::Port,
    ServiceField::AuthMethod,
    ServiceField::LogLevel,
    ServiceField::Branch,
    ServiceField::UrlBase,
    ServiceField::ProxyHost,
    ServiceField::ProxyPort,
];

impl ServiceField {
    pub fn label(&self) -> &'static str {
        match self {
            ServiceField::Url => "URL",
            ServiceField::ApiKey => "API Key",
            ServiceField::Port => "Port",
            ServiceField::AuthMethod => "Auth Method",
            ServiceField::LogLevel => "Log Level",
            ServiceField::Branch => "Branch",
            ServiceField::UrlBase => "URL Base",
            ServiceField::ProxyHost => "Proxy Host",
            ServiceField::ProxyPort => "Proxy Port",
        }
    }

    /// Whether the field only accepts digits
    pub fn is_numeric(&self) -> bool {
        matches!(self, ServiceField::Port | ServiceField::ProxyPort)
    }

    pub fn next(&self) -> Self {
        let idx = SERVICE_FIELDS.iter().position(|f| f == self).unwrap_or(0);
        SERVICE_FIELDS[(idx + 1) % SERVICE_FIELDS.len()]
    }

    pub fn prev(&self) -> Self {
        let idx = SERVICE_FIELDS.iter().position(|f| f == self).unwrap_or(0);
        SERVICE_FIELDS[(idx + SERVICE_FIELDS.len() - 1) % SERVICE_FIELDS.len()]
    }
}

impl ServiceSettings {
    pub fn get(&self, field: ServiceField) -> Option<&str> {
        let value = match field {
            ServiceField::Url => &self.url,
            ServiceField::ApiKey => &self.api_key,
            ServiceField::Port => &self.port,
            ServiceField::AuthMethod => &self.auth_method,
            ServiceField::LogLevel => &self.log_level,
            ServiceField::Branch => &self.branch,
            ServiceField::UrlBase => &self.url_base,
            ServiceField::ProxyHost => &self.proxy_host,
            ServiceField::ProxyPort => &self.proxy_port,
        };
        value.as_deref()
    }

    pub fn set(&mut self, field: ServiceField, value: Option<String>) {
        let slot = match field {
            ServiceField::Url => &mut self.url,
            ServiceField::ApiKey => &mut self.api_key,
            ServiceField::Port => &mut self.port,
            ServiceField::AuthMethod => &mut self.auth_method,
            ServiceField::LogLevel => &mut self.log_level,
            ServiceField::Branch => &mut self.branch,
            ServiceField::UrlBase => &mut self.url_base,
            ServiceField::ProxyHost => &mut self.proxy_host,
            ServiceField::ProxyPort => &mut self.proxy_port,
        };
        *slot = value;
    }
}

/// The aggregate configuration record handed to save and deploy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StackConfig {
    /// Media server choice; empty until the user picks one
    #[serde(default)]
    pub media_server: String,
    /// Root path for the media library; empty until set
    #[serde(default)]
    pub storage_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloads_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub puid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pgid: Option<String>,
    /// Per-service settings, keyed by catalog service key
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub services: BTreeMap<String, ServiceSettings>,
}

/// Strip everything but ASCII digits
pub fn sanitize_numeric(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

impl StackConfig {
    /// Deploy is permitted only once a media server and a storage path are set
    pub fn deploy_ready(&self) -> bool {
        !self.media_server.is_empty() && !self.storage_path.is_empty()
    }

    /// Write one field of a service's settings sub-object, creating the
    /// sub-object if absent and leaving its sibling fields untouched.
    /// Numeric fields are sanitized to digits; an empty result clears the
    /// field back to absent.
    pub fn set_service_field(&mut self, service: &str, field: ServiceField, value: &str) {
        let stored = if field.is_numeric() {
            sanitize_numeric(value)
        } else {
            value.to_string()
        };
        let settings = self.services.entry(service.to_string()).or_default();
        settings.set(field, if stored.is_empty() { None } else { Some(stored) });
    }

    pub fn service(&self, key: &str) -> Option<&ServiceSettings> {
        self.services.get(key)
    }

    /// Placeholder port shown when the user has not set one
    pub fn port_placeholder(key: &str) -> String {
        catalog::entry(key)
            .map(|e| e.default_port.to_string())
            .unwrap_or_default()
    }

    /// Shallow-merge an arbitrary JSON object into the record.
    ///
    /// Used to hydrate from the autodetect response or the locally saved
    /// blob. Any shape is tolerated: non-objects are ignored, unknown keys
    /// are skipped, and nested service settings merge field-wise so sibling
    /// fields already present survive.
    pub fn apply_overlay(&mut self, overlay: &Value) {
        let Some(obj) = overlay.as_object() else {
            return;
        };

        if let Some(v) = str_field(obj, &["media_server", "mediaServer"]) {
            self.media_server = v;
        }
        if let Some(v) = str_field(obj, &["storage_path", "storagePath"]) {
            self.storage_path = v;
        }
        if let Some(v) = str_field(obj, &["downloads_path", "downloadsPath"]) {
            self.downloads_path = Some(v);
        }
        if let Some(v) = str_field(obj, &["config_path", "configPath"]) {
            self.config_path = Some(v);
        }
        if let Some(v) = str_field(obj, &["timezone"]) {
            self.timezone = Some(v);
        }
        if let Some(v) = str_field(obj, &["puid", "PUID"]) {
            self.puid = Some(sanitize_numeric(&v));
        }
        if let Some(v) = str_field(obj, &["pgid", "PGID"]) {
            self.pgid = Some(sanitize_numeric(&v));
        }

        let Some(services) = obj.get("services").and_then(|v| v.as_object()) else {
            return;
        };
        for (key, value) in services {
            let Some(fields) = value.as_object() else {
                continue;
            };
            let settings = self.services.entry(key.clone()).or_default();
            for field in SERVICE_FIELDS {
                let names = overlay_names(*field);
                if let Some(v) = str_field(fields, names) {
                    let v = if field.is_numeric() {
                        sanitize_numeric(&v)
                    } else {
                        v
                    };
                    if !v.is_empty() {
                        settings.set(*field, Some(v));
                    }
                }
            }
        }
    }
}

/// Accepted spellings for each settings field in overlay JSON
fn overlay_names(field: ServiceField) -> &'static [&'static str] {
    match field {
        ServiceField::Url => &["url"],
        ServiceField::ApiKey => &["api_key", "apiKey"],
        ServiceField::Port => &["port"],
        ServiceField::AuthMethod => &["auth_method", "authMethod"],
        ServiceField::LogLevel => &["log_level", "logLevel"],
        ServiceField::Branch => &["branch"],
        ServiceField::UrlBase => &["url_base", "urlBase"],
        ServiceField::ProxyHost => &["proxy_host", "proxyHost"],
        ServiceField::ProxyPort => &["proxy_port", "proxyPort"],
    }
}

/// First present key wins; numbers are accepted and stringified
fn str_field(obj: &serde_json::Map<String, Value>, names: &[&str]) -> Option<String> {
    for name in names {
        match obj.get(*name) {
            Some(Value::String(s)) => return Some(s.clone()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sanitize_numeric_strips_non_digits() {
        assert_eq!(sanitize_numeric("81a2b"), "812");
        assert_eq!(sanitize_numeric("8989"), "8989");
        assert_eq!(sanitize_numeric("abc"), "");
    }

    #[test]
    fn deploy_ready_requires_both_gating_fields() {
        let mut config = StackConfig {
            media_server: String::new(),
            storage_path: "/data".to_string(),
            ..Default::default()
        };
        assert!(!config.deploy_ready());

        config.media_server = "plex".to_string();
        assert!(config.deploy_ready());
    }

    #[test]
    fn set_service_field_preserves_siblings() {
        let mut config = StackConfig::default();
        config.set_service_field("sonarr", ServiceField::ApiKey, "abc123");
        config.set_service_field("sonarr", ServiceField::Port, "8989");

        let settings = config.service("sonarr").unwrap();
        assert_eq!(settings.api_key.as_deref(), Some("abc123"));
        assert_eq!(settings.port.as_deref(), Some("8989"));
    }

    #[test]
    fn set_service_field_sanitizes_numeric_input() {
        let mut config = StackConfig::default();
        config.set_service_field("sonarr", ServiceField::Port, "81a2b");
        assert_eq!(
            config.service("sonarr").unwrap().port.as_deref(),
            Some("812")
        );
    }

    #[test]
    fn clearing_a_field_removes_it_from_the_record() {
        let mut config = StackConfig::default();
        config.set_service_field("radarr", ServiceField::Branch, "develop");
        config.set_service_field("radarr", ServiceField::Branch, "");
        assert_eq!(config.service("radarr").unwrap().branch, None);
    }

    #[test]
    fn sparse_record_serializes_without_absent_fields() {
        let mut config = StackConfig::default();
        config.media_server = "jellyfin".to_string();
        let json = serde_json::to_value(&config).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("timezone"));
        assert!(!obj.contains_key("services"));
        assert_eq!(obj["media_server"], "jellyfin");
    }

    #[test]
    fn overlay_merges_known_top_level_fields() {
        let mut config = StackConfig::default();
        config.apply_overlay(&json!({
            "mediaServer": "plex",
            "storage_path": "/mnt/media",
            "timezone": "Europe/Vienna",
            "totally_unknown": {"nested": true},
        }));
        assert_eq!(config.media_server, "plex");
        assert_eq!(config.storage_path, "/mnt/media");
        assert_eq!(config.timezone.as_deref(), Some("Europe/Vienna"));
    }

    #[test]
    fn overlay_preserves_existing_service_siblings() {
        let mut config = StackConfig::default();
        config.set_service_field("sonarr", ServiceField::ApiKey, "keep-me");
        config.apply_overlay(&json!({
            "services": {"sonarr": {"port": 8989}}
        }));

        let settings = config.service("sonarr").unwrap();
        assert_eq!(settings.api_key.as_deref(), Some("keep-me"));
        assert_eq!(settings.port.as_deref(), Some("8989"));
    }

    #[test]
    fn overlay_tolerates_any_shape() {
        let mut config = StackConfig::default();
        config.apply_overlay(&json!("not an object"));
        config.apply_overlay(&json!(["also", "fine"]));
        config.apply_overlay(&json!({"services": "not an object either"}));
        assert_eq!(config, StackConfig::default());
    }

    #[test]
    fn port_placeholder_comes_from_catalog() {
        assert_eq!(StackConfig::port_placeholder("sonarr"), "8989");
        assert_eq!(StackConfig::port_placeholder("nope"), "");
    }
}
