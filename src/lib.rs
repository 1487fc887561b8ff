pub mod core;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::core::error::InstallerError;
use crate::core::pipeline::{EventSink, InstallEvent, InstallReport, InstallationPipeline, StageFailure};
use crate::core::state::{InstallContext, InstallerSettings};

pub use crate::core::artifact::{ArtifactEntry, Configuration, ProfileSpec};
pub use crate::core::error::InstallerResult;

const LOG_FILE: &str = "installer.log";

/// Console logging plus a plain `installer.log` in `install_dir` when it can
/// be created. Safe to call more than once; later calls are ignored.
pub fn init_logging(install_dir: &Path) {
    let filter = || {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,modpack_installer_lib=debug"))
    };

    let file_layer = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(install_dir.join(LOG_FILE))
        .ok()
        .map(|file| {
            fmt::layer()
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .with_filter(filter())
        });

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_filter(filter()))
        .with(file_layer)
        .try_init();
}

/// Headless entry point: installs the pack described by `manifest` (or the
/// settings' default manifest) into `install_dir`.
pub async fn run(
    install_dir: PathBuf,
    manifest: Option<PathBuf>,
    events: Arc<dyn EventSink>,
) -> Result<InstallReport, StageFailure> {
    let settings = InstallerSettings::load(&install_dir);
    let manifest_path = manifest.unwrap_or_else(|| settings.manifest_path(&install_dir));

    tracing::info!("{}", "=".repeat(80));
    tracing::info!("Modpack installer {} starting...", env!("CARGO_PKG_VERSION"));

    let ctx = InstallContext::new(install_dir, settings)
        .map_err(|source| StageFailure {
            stage: crate::core::pipeline::Stage::LoadConfig,
            source,
        })?
        .with_events(events);

    InstallationPipeline::new(ctx)
        .run_from_manifest(&manifest_path)
        .await
}

/// Human readable one-line description of a progress event, for consoles.
pub fn describe_event(event: &InstallEvent) -> Option<String> {
    match event {
        InstallEvent::StageChanged { stage } => Some(format!("==> {}", capitalize(&stage.to_string()))),
        InstallEvent::ItemStarted { index, total, name } => {
            Some(format!("[{}/{}] {}", index + 1, total, name))
        }
        InstallEvent::Alert { key, .. } => Some(format!("(!) {}", key)),
        InstallEvent::Failed { stage, message } => {
            Some(format!("Failed while {}: {}", stage, message))
        }
        InstallEvent::Finished { report } => Some(format!(
            "Installation complete: {} downloaded, {} already present",
            report.downloaded, report.skipped
        )),
        InstallEvent::ItemProgress { .. } | InstallEvent::BytesProgress { .. } => None,
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Exit code for a failed run: manifest problems differ from download ones.
pub fn exit_code(failure: &StageFailure) -> i32 {
    match failure.source {
        InstallerError::ManifestMissing { .. }
        | InstallerError::ManifestParse { .. }
        | InstallerError::InvalidManifest(_) => 2,
        _ => 1,
    }
}
