use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use reqwest::StatusCode;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::core::artifact::ArtifactEntry;
use crate::core::error::{InstallerError, InstallerResult};
use crate::core::pipeline::events::InstallEvent;
use crate::core::state::InstallContext;

use super::resolver::RemoteReferenceResolver;

const PARTIAL_SUFFIX: &str = ".part";

/// Idempotent fetch-and-persist of a single artifact.
pub struct ArtifactDownloader<'a> {
    ctx: &'a InstallContext,
}

impl<'a> ArtifactDownloader<'a> {
    pub fn new(ctx: &'a InstallContext) -> Self {
        Self { ctx }
    }

    /// Final on-disk location of `entry`, resolving its file name if needed.
    pub async fn target_path(&self, entry: &ArtifactEntry) -> InstallerResult<PathBuf> {
        let resolver = RemoteReferenceResolver::new(
            self.ctx.resolver_client(),
            self.ctx.settings().max_redirects,
        );
        let file_name = entry
            .file_name_or_resolve(|| resolver.resolve_file_name(entry.source_url()))
            .await?;

        Ok(self
            .ctx
            .install_dir()
            .join(entry.target_dir())
            .join(file_name))
    }

    /// Download `entry` unless its target file already exists.
    ///
    /// Returns `true` when the file was fetched now and `false` when it was
    /// already present. The body is buffered fully in memory and written to a
    /// sibling `.part` file that is renamed into place, so readers never see a
    /// truncated artifact.
    pub async fn download(&self, entry: &ArtifactEntry) -> InstallerResult<bool> {
        let dest = self.target_path(entry).await?;
        let present = tokio::fs::try_exists(&dest)
            .await
            .map_err(|source| InstallerError::Io {
                path: dest.clone(),
                source,
            })?;
        if present {
            debug!("Already present: {:?}", dest);
            return Ok(false);
        }

        let dir = self.ctx.install_dir().join(entry.target_dir());
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| InstallerError::Io {
                path: dir.clone(),
                source,
            })?;

        let url = entry.source_url();
        let response = self.ctx.http_client().get(url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(InstallerError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let total_bytes = response.content_length();
        let mut body = Vec::with_capacity(total_bytes.unwrap_or(0).min(64 << 20) as usize);
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            body.extend_from_slice(&chunk);
            self.ctx.emit(InstallEvent::BytesProgress {
                name: entry.name().to_string(),
                received: body.len() as u64,
                total: total_bytes,
            });
        }

        write_atomically(&dest, &body).await?;

        info!("Downloaded {} ({} bytes) -> {:?}", url, body.len(), dest);
        Ok(true)
    }
}

async fn write_atomically(dest: &Path, bytes: &[u8]) -> InstallerResult<()> {
    let mut partial = dest.as_os_str().to_owned();
    partial.push(PARTIAL_SUFFIX);
    let partial = PathBuf::from(partial);

    // Write inside a block so the handle is closed before the rename.
    {
        let mut file =
            tokio::fs::File::create(&partial)
                .await
                .map_err(|source| InstallerError::Io {
                    path: partial.clone(),
                    source,
                })?;
        file.write_all(bytes)
            .await
            .map_err(|source| InstallerError::Io {
                path: partial.clone(),
                source,
            })?;
        file.flush().await.map_err(|source| InstallerError::Io {
            path: partial.clone(),
            source,
        })?;
    }

    if let Err(source) = tokio::fs::rename(&partial, dest).await {
        let _ = tokio::fs::remove_file(&partial).await;
        return Err(InstallerError::Io {
            path: dest.to_path_buf(),
            source,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn atomic_write_leaves_no_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("mod.jar");
        std::fs::write(dir.path().join("mod.jar.part"), b"stale").unwrap();

        write_atomically(&dest, b"payload").await.unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"payload");
        assert!(!dir.path().join("mod.jar.part").exists());
    }
}
