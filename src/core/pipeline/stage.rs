use serde::Serialize;
use thiserror::Error;

use crate::core::error::InstallerError;
use crate::core::profiles::AppendOutcome;

/// Pipeline stages in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    LoadConfig,
    DownloadModLoader,
    DownloadMods,
    DownloadResources,
    AppendProfile,
    LaunchModLoaderInstaller,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Stage::LoadConfig => "loading the manifest",
            Stage::DownloadModLoader => "downloading the mod loader",
            Stage::DownloadMods => "downloading mods",
            Stage::DownloadResources => "downloading resources",
            Stage::AppendProfile => "adding the launcher profile",
            Stage::LaunchModLoaderInstaller => "launching the mod loader installer",
        };
        f.write_str(label)
    }
}

/// What a successful run did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InstallReport {
    pub downloaded: usize,
    pub skipped: usize,
    pub profile: AppendOutcome,
    pub installer_launched: bool,
}

/// A fatal failure, tagged with the stage it ended.
#[derive(Debug, Error)]
#[error("Failed while {stage}: {source}")]
pub struct StageFailure {
    pub stage: Stage,
    #[source]
    pub source: InstallerError,
}

/// Where a pipeline is. `Done` and `Failed` are terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Running(Stage),
    Done,
    Failed(Stage),
}
