use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the installer core.
/// Every module returns `Result<T, InstallerError>`.
#[derive(Debug, Error)]
pub enum InstallerError {
    // ── Manifest ────────────────────────────────────────
    #[error("No manifest file found: {path:?}")]
    ManifestMissing { path: PathBuf },

    #[error("Failed to parse manifest {path:?}: {source}")]
    ManifestParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Download failed for {url}: HTTP {status}")]
    DownloadFailed { url: String, status: u16 },

    #[error("Too many redirects ({hops}) while resolving {url}")]
    TooManyRedirects { url: String, hops: usize },

    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Could not determine a file name for {url}")]
    MissingFileName { url: String },

    #[error("Refusing unsafe file name {name:?}")]
    UnsafeFileName { name: String },

    // ── Batch ───────────────────────────────────────────
    #[error("Failed to download {name}: {source}")]
    Artifact {
        name: String,
        source: Box<InstallerError>,
    },

    // ── Mod loader installer ────────────────────────────
    #[error("Failed to launch mod loader installer: {0}")]
    InstallerLaunch(String),

    // ── Generic ─────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type InstallerResult<T> = Result<T, InstallerError>;

impl InstallerError {
    /// Wraps `source` with the display name of the artifact that produced it.
    pub fn for_artifact(name: impl Into<String>, source: InstallerError) -> Self {
        InstallerError::Artifact {
            name: name.into(),
            source: Box::new(source),
        }
    }

    /// True for failures caused by the remote side or the transport.
    pub fn is_remote_fetch(&self) -> bool {
        match self {
            InstallerError::Http(_)
            | InstallerError::DownloadFailed { .. }
            | InstallerError::TooManyRedirects { .. }
            | InstallerError::InvalidUrl { .. }
            | InstallerError::MissingFileName { .. }
            | InstallerError::UnsafeFileName { .. } => true,
            InstallerError::Artifact { source, .. } => source.is_remote_fetch(),
            _ => false,
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            InstallerError::DownloadFailed { status, .. } => Some(*status),
            InstallerError::Http(e) => e.status().map(|s| s.as_u16()),
            InstallerError::Artifact { source, .. } => source.status(),
            _ => None,
        }
    }
}

// ── Serialization for front-end IPC ─────────────────────
// Progress events carry errors across process boundaries as plain strings.
impl serde::Serialize for InstallerError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
