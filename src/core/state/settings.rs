use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::artifact::CURSEFORGE_DOWNLOAD_TEMPLATE;

pub const SETTINGS_FILE: &str = "installer_settings.json";
pub const DEFAULT_MANIFEST_FILE: &str = "config.yaml";

const APP_USER_AGENT: &str = concat!("modpack-installer/", env!("CARGO_PKG_VERSION"));

/// Tunables for one installer run. Every field has a default so a partial
/// `installer_settings.json` is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallerSettings {
    pub manifest_file: PathBuf,
    pub user_agent: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// Upper bound on redirect hops followed while resolving a file name.
    pub max_redirects: usize,
    /// Overrides the platform lookup of `launcher_profiles.json`.
    pub launcher_profiles_path: Option<PathBuf>,
    /// When false the mod loader installer is never started, whatever the
    /// manifest asks for.
    pub launch_installer: bool,
    /// CurseForge download endpoint with `{project_id}` and `{file_id}`
    /// placeholders.
    pub curseforge_download_template: String,
}

impl Default for InstallerSettings {
    fn default() -> Self {
        Self {
            manifest_file: PathBuf::from(DEFAULT_MANIFEST_FILE),
            user_agent: APP_USER_AGENT.to_string(),
            connect_timeout_secs: 30,
            request_timeout_secs: 300,
            max_redirects: 20,
            launcher_profiles_path: None,
            launch_installer: true,
            curseforge_download_template: CURSEFORGE_DOWNLOAD_TEMPLATE.to_string(),
        }
    }
}

impl InstallerSettings {
    /// Reads `installer_settings.json` from `install_dir`, falling back to
    /// defaults when it is absent or unreadable.
    pub fn load(install_dir: &Path) -> Self {
        load_settings_from_disk(install_dir).unwrap_or_default()
    }

    pub fn manifest_path(&self, install_dir: &Path) -> PathBuf {
        install_dir.join(&self.manifest_file)
    }
}

fn load_settings_from_disk(install_dir: &Path) -> Option<InstallerSettings> {
    let path = install_dir.join(SETTINGS_FILE);
    let raw = std::fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&raw) {
        Ok(settings) => {
            debug!("Loaded installer settings from {:?}", path);
            Some(settings)
        }
        Err(e) => {
            warn!("Ignoring corrupt settings file {:?}: {}", path, e);
            None
        }
    }
}
