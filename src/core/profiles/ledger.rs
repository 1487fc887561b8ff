use std::ffi::OsString;
use std::future::Future;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::artifact::ProfileSpec;

use super::model::{launcher_timestamp, LauncherProfile, LauncherProfiles};

const PROFILES_FILE: &str = "launcher_profiles.json";
const BACKUP_SUFFIX: &str = ".bak";

/// Result of one attempt to register the pack with the launcher. Every
/// `Skipped*` variant is a warning, never a pipeline failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AppendOutcome {
    Appended {
        profile_id: String,
        backup_path: PathBuf,
    },
    SkippedUnsupportedPlatform,
    SkippedNoRegistryFile,
    SkippedNameCollision,
    SkippedBackupFailed,
    SkippedWriteFailed,
}

impl AppendOutcome {
    pub fn is_appended(&self) -> bool {
        matches!(self, AppendOutcome::Appended { .. })
    }
}

/// Well-known location of the official launcher's profile file. Only the
/// Windows layout (`%APPDATA%\.minecraft`) is known.
pub fn default_registry_path() -> Option<PathBuf> {
    if !cfg!(target_os = "windows") {
        return None;
    }
    dirs::config_dir().map(|appdata| appdata.join(".minecraft").join(PROFILES_FILE))
}

/// Read-modify-write access to `launcher_profiles.json`.
pub struct ProfileLedger {
    registry_path: Option<PathBuf>,
}

impl ProfileLedger {
    pub fn new(registry_path: Option<PathBuf>) -> Self {
        Self { registry_path }
    }

    pub async fn append_profile(&self, spec: &ProfileSpec, install_dir: &Path) -> AppendOutcome {
        self.append_profile_at(spec, install_dir, Utc::now()).await
    }

    /// Insert a profile for `spec` unless one with the same name exists.
    ///
    /// The original file is renamed to the first free `.bak`, `.bak1`, ...
    /// before the new registry is written. If the write fails the backup is
    /// moved back so the launcher keeps a registry.
    pub async fn append_profile_at(
        &self,
        spec: &ProfileSpec,
        install_dir: &Path,
        now: DateTime<Utc>,
    ) -> AppendOutcome {
        let Some(path) = self.registry_path.as_deref() else {
            warn!(
                "'{}' is not supported. Skip adding profile.",
                std::env::consts::OS
            );
            return AppendOutcome::SkippedUnsupportedPlatform;
        };

        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            warn!("No profile file found at {:?}. Skip adding profile.", path);
            return AppendOutcome::SkippedNoRegistryFile;
        }

        let mut registry = match load_registry(path).await {
            Ok(registry) => registry,
            Err(e) => {
                warn!("Failed to load profile file {:?}: {}. Skip adding profile.", path, e);
                return AppendOutcome::SkippedNoRegistryFile;
            }
        };

        if registry.contains_profile_named(&spec.name) {
            warn!("Profile '{}' already exists. Skip adding profile.", spec.name);
            return AppendOutcome::SkippedNameCollision;
        }

        let profile_id = generate_profile_id(&registry);
        let stamp = launcher_timestamp(now);
        registry.profiles.insert(
            profile_id.clone(),
            LauncherProfile {
                created: Some(stamp.clone()),
                game_dir: Some(install_dir.to_path_buf()),
                icon: spec.icon.clone(),
                java_args: spec.java_args.clone(),
                java_dir: None,
                last_used: Some(stamp),
                last_version_id: Some(spec.version_id.clone()),
                name: Some(spec.name.clone()),
                resolution: None,
                skip_jre_version_check: Some(false),
                profile_type: Some("custom".to_string()),
                extra: Default::default(),
            },
        );

        let json = match serde_json::to_string_pretty(&registry) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize profile file: {}. Skip adding profile.", e);
                return AppendOutcome::SkippedWriteFailed;
            }
        };

        let backup_path = match swap_in(path, json, write_registry).await {
            Ok(backup_path) => backup_path,
            Err(skipped) => return skipped,
        };

        info!("Added profile: {} ({})", spec.name, profile_id);
        AppendOutcome::Appended {
            profile_id,
            backup_path,
        }
    }
}

async fn load_registry(path: &Path) -> Result<LauncherProfiles, String> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| e.to_string())?;
    serde_json::from_str(&raw).map_err(|e| e.to_string())
}

async fn write_registry(path: PathBuf, json: String) -> std::io::Result<()> {
    tokio::fs::write(path, json).await
}

/// Move the registry at `path` to the next free backup name, then let `write`
/// put the new contents in place. A failed write moves the backup back.
async fn swap_in<W, Fut>(path: &Path, json: String, write: W) -> Result<PathBuf, AppendOutcome>
where
    W: FnOnce(PathBuf, String) -> Fut,
    Fut: Future<Output = std::io::Result<()>>,
{
    let backup_path = match next_backup_path(path).await {
        Ok(backup_path) => backup_path,
        Err(e) => {
            warn!("Failed to check backup names for {:?}: {}. Skip adding profile.", path, e);
            return Err(AppendOutcome::SkippedBackupFailed);
        }
    };

    if let Err(e) = tokio::fs::rename(path, &backup_path).await {
        warn!(
            "Failed to backup profile file to {:?}: {}. Skip adding profile.",
            backup_path, e
        );
        return Err(AppendOutcome::SkippedBackupFailed);
    }
    info!("Backed up {:?} to {:?}", path, backup_path);

    if let Err(e) = write(path.to_path_buf(), json).await {
        warn!("Failed to save profile file {:?}: {}. Skip adding profile.", path, e);
        restore_backup(path, &backup_path).await;
        return Err(AppendOutcome::SkippedWriteFailed);
    }

    Ok(backup_path)
}

/// 32 hex characters, unique among the registry's existing keys.
fn generate_profile_id(registry: &LauncherProfiles) -> String {
    loop {
        let id = Uuid::new_v4().simple().to_string();
        if !registry.profiles.contains_key(&id) {
            return id;
        }
    }
}

/// First of `<path>.bak`, `<path>.bak1`, `<path>.bak2`, ... that does not
/// exist yet. A candidate whose existence cannot be checked is an error, so an
/// earlier backup is never overwritten.
async fn next_backup_path(path: &Path) -> std::io::Result<PathBuf> {
    let mut index = 0u32;
    loop {
        let candidate = backup_candidate(path, index);
        if !tokio::fs::try_exists(&candidate).await? {
            return Ok(candidate);
        }
        index += 1;
    }
}

fn backup_candidate(path: &Path, index: u32) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(BACKUP_SUFFIX);
    if index > 0 {
        name.push(index.to_string());
    }
    PathBuf::from(name)
}

async fn restore_backup(path: &Path, backup_path: &Path) {
    let _ = tokio::fs::remove_file(path).await;
    match tokio::fs::rename(backup_path, path).await {
        Ok(()) => info!("Restored {:?} from {:?}", path, backup_path),
        Err(e) => warn!(
            "Failed to restore {:?} from {:?}: {}. The backup is left in place.",
            path, backup_path, e
        ),
    }
}
