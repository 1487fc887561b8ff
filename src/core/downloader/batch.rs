use tracing::{error, info};

use crate::core::artifact::ArtifactEntry;
use crate::core::error::{InstallerError, InstallerResult};
use crate::core::pipeline::events::InstallEvent;
use crate::core::state::InstallContext;

use super::client::ArtifactDownloader;

/// Counts for one completed batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct BatchSummary {
    pub downloaded: usize,
    pub skipped: usize,
}

impl BatchSummary {
    pub fn merge(self, other: BatchSummary) -> Self {
        Self {
            downloaded: self.downloaded + other.downloaded,
            skipped: self.skipped + other.skipped,
        }
    }
}

/// Downloads a list of artifacts strictly one after another.
pub struct DownloadBatchRunner<'a> {
    ctx: &'a InstallContext,
    label: &'a str,
}

impl<'a> DownloadBatchRunner<'a> {
    /// `label` names the batch in logs ("mods", "resources", ...).
    pub fn new(ctx: &'a InstallContext, label: &'a str) -> Self {
        Self { ctx, label }
    }

    /// Run the batch in order.
    ///
    /// Emits `ItemStarted` before each attempt and `ItemProgress` after each
    /// success. The first failure stops the batch; later entries are never
    /// attempted and the error is returned wrapped with the entry's name.
    pub async fn run(&self, entries: &[&ArtifactEntry]) -> InstallerResult<BatchSummary> {
        let total = entries.len();
        let downloader = ArtifactDownloader::new(self.ctx);
        let mut summary = BatchSummary::default();

        info!("Start downloading {} ({} entries)...", self.label, total);

        for (index, entry) in entries.iter().enumerate() {
            self.ctx.emit(InstallEvent::ItemStarted {
                index,
                total,
                name: entry.name().to_string(),
            });

            match downloader.download(entry).await {
                Ok(true) => {
                    info!("\tDownloaded: {}", entry.name());
                    summary.downloaded += 1;
                }
                Ok(false) => {
                    info!("\tSkipping download: {}", entry.name());
                    summary.skipped += 1;
                }
                Err(e) => {
                    error!("Failed to download {} {}: {}", entry.kind(), entry.name(), e);
                    return Err(InstallerError::for_artifact(entry.name(), e));
                }
            }

            self.ctx.emit(InstallEvent::ItemProgress {
                completed: index + 1,
                total,
            });
        }

        Ok(summary)
    }
}
