// ─── Installation Pipeline ───
// Strictly sequential: each stage runs as its own task and the next one only
// starts after the previous task finished successfully.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::core::artifact::Configuration;
use crate::core::downloader::{ArtifactDownloader, BatchSummary, DownloadBatchRunner};
use crate::core::error::{InstallerError, InstallerResult};
use crate::core::launch;
use crate::core::manifest::Manifest;
use crate::core::profiles::{default_registry_path, AppendOutcome, ProfileLedger};
use crate::core::state::InstallContext;

use super::events::{AlertLevel, InstallEvent};
use super::stage::{InstallReport, PipelineState, Stage, StageFailure};

pub struct InstallationPipeline {
    ctx: Arc<InstallContext>,
    ledger: Arc<ProfileLedger>,
    state: PipelineState,
}

impl InstallationPipeline {
    pub fn new(ctx: InstallContext) -> Self {
        let registry_path = ctx
            .settings()
            .launcher_profiles_path
            .clone()
            .or_else(default_registry_path);
        Self::with_ledger(ctx, ProfileLedger::new(registry_path))
    }

    pub fn with_ledger(ctx: InstallContext, ledger: ProfileLedger) -> Self {
        Self {
            ctx: Arc::new(ctx),
            ledger: Arc::new(ledger),
            state: PipelineState::Idle,
        }
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    pub fn context(&self) -> &InstallContext {
        &self.ctx
    }

    /// Load the manifest at `manifest_path`, then run every stage.
    pub async fn run_from_manifest(
        &mut self,
        manifest_path: &Path,
    ) -> Result<InstallReport, StageFailure> {
        let path = manifest_path.to_path_buf();
        let ctx = self.ctx.clone();
        let config = self
            .run_stage(Stage::LoadConfig, async move {
                let template = &ctx.settings().curseforge_download_template;
                Manifest::load_from_path(&path)
                    .await
                    .map(|manifest| manifest.into_configuration(template))
            })
            .await?;

        self.run(config).await
    }

    /// Run every stage after `LoadConfig` against an already parsed
    /// configuration.
    pub async fn run(&mut self, config: Configuration) -> Result<InstallReport, StageFailure> {
        let config = Arc::new(config);
        info!(
            "Installing '{}' ({} artifacts) into {:?}",
            config.profile.name,
            config.artifact_count(),
            self.ctx.install_dir()
        );

        let mut summary = BatchSummary::default();

        let ctx = self.ctx.clone();
        let cfg = config.clone();
        let loader = self
            .run_stage(Stage::DownloadModLoader, async move {
                download_mod_loader(&ctx, &cfg).await
            })
            .await?;
        summary = summary.merge(loader);

        let ctx = self.ctx.clone();
        let cfg = config.clone();
        let mods = self
            .run_stage(Stage::DownloadMods, async move {
                DownloadBatchRunner::new(&ctx, "mods")
                    .run(&cfg.mod_batch())
                    .await
            })
            .await?;
        summary = summary.merge(mods);

        let ctx = self.ctx.clone();
        let cfg = config.clone();
        let resources = self
            .run_stage(Stage::DownloadResources, async move {
                DownloadBatchRunner::new(&ctx, "resources")
                    .run(&cfg.resource_batch())
                    .await
            })
            .await?;
        summary = summary.merge(resources);

        let ctx = self.ctx.clone();
        let cfg = config.clone();
        let ledger = self.ledger.clone();
        let profile = self
            .run_stage(Stage::AppendProfile, async move {
                Ok(ledger
                    .append_profile(&cfg.profile, ctx.install_dir())
                    .await)
            })
            .await?;
        if !matches!(
            profile,
            AppendOutcome::Appended { .. } | AppendOutcome::SkippedNameCollision
        ) {
            self.alert(AlertLevel::Warning, "alertOnFailedAddProfile");
        }

        let installer_launched = self.launch_mod_loader_installer(&config).await;

        let report = InstallReport {
            downloaded: summary.downloaded,
            skipped: summary.skipped,
            profile,
            installer_launched,
        };
        self.state = PipelineState::Done;
        self.ctx.emit(InstallEvent::Finished {
            report: report.clone(),
        });
        info!(
            "Installation completed: {} downloaded, {} already present.",
            report.downloaded, report.skipped
        );
        Ok(report)
    }

    /// Best effort: any problem is logged and reported as an alert.
    async fn launch_mod_loader_installer(&mut self, config: &Arc<Configuration>) -> bool {
        if !config.auto_launch_mod_loader() {
            return false;
        }
        if !self.ctx.settings().launch_installer {
            info!("Mod loader installer launch disabled by settings.");
            return false;
        }

        self.enter(Stage::LaunchModLoaderInstaller);
        let ctx = self.ctx.clone();
        let cfg = config.clone();
        let launched = tokio::spawn(async move { start_installer(&ctx, &cfg).await }).await;

        match launched {
            Ok(Ok(())) => {
                self.alert(AlertLevel::Info, "alertOnLaunchModLoader");
                true
            }
            Ok(Err(e)) => {
                warn!("Failed to start mod loader installer: {}", e);
                self.alert(AlertLevel::Warning, "alertOnFailedLaunchModLoader");
                false
            }
            Err(e) => {
                warn!("Mod loader installer task failed: {}", e);
                self.alert(AlertLevel::Warning, "alertOnFailedLaunchModLoader");
                false
            }
        }
    }

    async fn run_stage<T, Fut>(&mut self, stage: Stage, work: Fut) -> Result<T, StageFailure>
    where
        T: Send + 'static,
        Fut: Future<Output = InstallerResult<T>> + Send + 'static,
    {
        self.enter(stage);

        let result = match tokio::spawn(work).await {
            Ok(result) => result,
            Err(join) => Err(InstallerError::Other(format!("stage task aborted: {join}"))),
        };

        result.map_err(|source| {
            error!("Failed while {}: {}", stage, source);
            self.state = PipelineState::Failed(stage);
            self.ctx.emit(InstallEvent::Failed {
                stage,
                message: source.to_string(),
            });
            StageFailure { stage, source }
        })
    }

    fn enter(&mut self, stage: Stage) {
        self.state = PipelineState::Running(stage);
        self.ctx.emit(InstallEvent::StageChanged { stage });
    }

    fn alert(&self, level: AlertLevel, key: &str) {
        self.ctx.emit(InstallEvent::Alert {
            level,
            key: key.to_string(),
        });
    }
}

async fn download_mod_loader(
    ctx: &InstallContext,
    config: &Configuration,
) -> InstallerResult<BatchSummary> {
    let Some(loader) = config.mod_loader.as_ref() else {
        info!("No mod loader declared.");
        return Ok(BatchSummary::default());
    };

    ctx.emit(InstallEvent::ItemStarted {
        index: 0,
        total: 1,
        name: loader.name().to_string(),
    });
    let downloaded = ArtifactDownloader::new(ctx)
        .download(loader)
        .await
        .map_err(|e| InstallerError::for_artifact(loader.name(), e))?;
    ctx.emit(InstallEvent::ItemProgress {
        completed: 1,
        total: 1,
    });

    if downloaded {
        info!("Mod loader downloaded.");
        Ok(BatchSummary {
            downloaded: 1,
            skipped: 0,
        })
    } else {
        info!("Skipping download mod loader.");
        Ok(BatchSummary {
            downloaded: 0,
            skipped: 1,
        })
    }
}

async fn start_installer(ctx: &InstallContext, config: &Configuration) -> InstallerResult<()> {
    let loader = config
        .mod_loader
        .as_ref()
        .ok_or_else(|| InstallerError::InstallerLaunch("no mod loader declared".into()))?;
    let installer = ArtifactDownloader::new(ctx).target_path(loader).await?;
    let working_dir = ctx.install_dir().to_path_buf();

    tokio::task::spawn_blocking(move || launch::launch_installer(&installer, &working_dir))
        .await
        .map_err(|e| InstallerError::InstallerLaunch(e.to_string()))??;
    Ok(())
}
