// ─── Launcher Profile Registry ───
// Typed view of the official launcher's `launcher_profiles.json`. Fields this
// installer does not know about are captured in `extra` and written back
// untouched.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LauncherProfiles {
    #[serde(default)]
    pub profiles: BTreeMap<String, LauncherProfile>,
    #[serde(default)]
    pub settings: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub version: i64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl LauncherProfiles {
    pub fn contains_profile_named(&self, name: &str) -> bool {
        self.profiles
            .values()
            .any(|profile| profile.name.as_deref() == Some(name))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LauncherProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub java_args: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub java_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_version_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<ProfileResolution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_jre_version_check: Option<bool>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub profile_type: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResolution {
    pub height: u32,
    pub width: u32,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The launcher stores instants as `YYYY-MM-DDTHH:mm:ss.SSSZ`. Only profiles
/// this installer creates are stamped; existing values are kept verbatim.
pub fn launcher_timestamp(instant: DateTime<Utc>) -> serde_json::Value {
    serde_json::Value::String(instant.to_rfc3339_opts(SecondsFormat::Millis, true))
}
