use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::error::{InstallerError, InstallerResult};
use crate::core::http;
use crate::core::pipeline::events::{EventSink, InstallEvent, NullSink};

use super::settings::InstallerSettings;

/// Everything a pipeline stage needs, owned by the orchestrator for the
/// duration of one run and shared with stage tasks through an `Arc`.
pub struct InstallContext {
    install_dir: PathBuf,
    settings: InstallerSettings,
    http_client: reqwest::Client,
    resolver_client: reqwest::Client,
    events: Arc<dyn EventSink>,
}

impl InstallContext {
    pub fn new(install_dir: PathBuf, settings: InstallerSettings) -> InstallerResult<Self> {
        let http_client = http::build_http_client(&settings)?;
        let resolver_client = http::build_resolver_client(&settings)?;
        let install_dir = std::path::absolute(&install_dir).map_err(|source| InstallerError::Io {
            path: install_dir.clone(),
            source,
        })?;

        Ok(Self {
            install_dir,
            settings,
            http_client,
            resolver_client,
            events: Arc::new(NullSink),
        })
    }

    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// Absolute root every artifact target directory is relative to.
    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    pub fn settings(&self) -> &InstallerSettings {
        &self.settings
    }

    pub fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }

    pub fn resolver_client(&self) -> &reqwest::Client {
        &self.resolver_client
    }

    pub fn emit(&self, event: InstallEvent) {
        self.events.emit(event);
    }
}
