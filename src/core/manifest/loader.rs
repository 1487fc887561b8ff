use std::path::{Component, Path, PathBuf};

use tracing::info;

use crate::core::artifact::{is_safe_file_name, ArtifactEntry, Configuration};
use crate::core::error::{InstallerError, InstallerResult};

use super::model::Manifest;

impl Manifest {
    /// Read and validate a manifest from disk.
    pub async fn load_from_path(path: &Path) -> InstallerResult<Self> {
        if !path.exists() {
            return Err(InstallerError::ManifestMissing {
                path: path.to_path_buf(),
            });
        }

        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| InstallerError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let manifest = Self::parse(&raw).map_err(|e| match e {
            InstallerError::ManifestParse { source, .. } => InstallerError::ManifestParse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;

        info!(
            "Loaded manifest {:?} for profile '{}'",
            path, manifest.profile.name
        );
        Ok(manifest)
    }

    /// Parse and validate manifest text.
    pub fn parse(raw: &str) -> InstallerResult<Self> {
        let manifest: Manifest =
            serde_yaml::from_str(raw).map_err(|source| InstallerError::ManifestParse {
                path: PathBuf::new(),
                source,
            })?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn validate(&self) -> InstallerResult<()> {
        if self.profile.name.trim().is_empty() {
            return invalid("Profile.name must not be empty");
        }
        if self.profile.version_id.trim().is_empty() {
            return invalid("Profile.versionId must not be empty");
        }

        if let Some(loader) = &self.mod_loader {
            validate_url(&loader.url, "ModLoader.url")?;
        }
        for entry in self.other_mods.iter().flatten() {
            validate_url(&entry.url, "OtherMods.url")?;
            validate_file_name(entry.filename.as_deref(), "OtherMods.filename")?;
        }
        for entry in self.curseforge_resources.iter().flatten() {
            if let Some(dir) = &entry.directory {
                validate_relative_dir(dir, "CurseForgeResources.directory")?;
            }
        }
        for entry in self.other_resources.iter().flatten() {
            validate_url(&entry.url, "OtherResources.url")?;
            validate_file_name(entry.filename.as_deref(), "OtherResources.filename")?;
            if let Some(dir) = &entry.directory {
                validate_relative_dir(dir, "OtherResources.directory")?;
            }
        }

        Ok(())
    }

    /// Turn the document into typed download entries. Absent lists become
    /// empty ones. CurseForge entries get their URL from `curseforge_template`.
    pub fn into_configuration(self, curseforge_template: &str) -> Configuration {
        Configuration {
            profile: self.profile,
            mod_loader: self
                .mod_loader
                .map(|l| ArtifactEntry::mod_loader(l.name, l.url, l.auto_open)),
            curseforge_mods: self
                .curseforge_mods
                .unwrap_or_default()
                .into_iter()
                .map(|m| {
                    ArtifactEntry::curseforge_mod(
                        curseforge_template,
                        m.name,
                        m.project_id,
                        m.file_id,
                    )
                })
                .collect(),
            other_mods: self
                .other_mods
                .unwrap_or_default()
                .into_iter()
                .map(|m| ArtifactEntry::direct_mod(m.name, m.url, m.filename))
                .collect(),
            curseforge_resources: self
                .curseforge_resources
                .unwrap_or_default()
                .into_iter()
                .map(|r| {
                    ArtifactEntry::curseforge_resource(
                        curseforge_template,
                        r.name,
                        r.project_id,
                        r.file_id,
                        r.directory,
                    )
                })
                .collect(),
            other_resources: self
                .other_resources
                .unwrap_or_default()
                .into_iter()
                .map(|r| ArtifactEntry::direct_resource(r.name, r.url, r.directory, r.filename))
                .collect(),
        }
    }
}

fn invalid<T>(message: impl Into<String>) -> InstallerResult<T> {
    Err(InstallerError::InvalidManifest(message.into()))
}

fn validate_url(url: &str, field: &str) -> InstallerResult<()> {
    match reqwest::Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        Ok(parsed) => invalid(format!(
            "{field} uses unsupported scheme '{}': {url}",
            parsed.scheme()
        )),
        Err(e) => invalid(format!("{field} is not a valid URL ({e}): {url}")),
    }
}

fn validate_file_name(name: Option<&str>, field: &str) -> InstallerResult<()> {
    match name {
        Some(name) if !is_safe_file_name(name) => {
            invalid(format!("{field} must be a plain file name: {name:?}"))
        }
        _ => Ok(()),
    }
}

fn validate_relative_dir(dir: &Path, field: &str) -> InstallerResult<()> {
    for component in dir.components() {
        match component {
            Component::ParentDir => {
                return invalid(format!("{field} must not contain '..' segments"));
            }
            Component::RootDir | Component::Prefix(_) => {
                return invalid(format!("{field} must be a relative path"));
            }
            Component::Normal(segment) => {
                if segment.to_string_lossy().contains(['\\', ':']) {
                    return invalid(format!("{field} contains invalid characters"));
                }
            }
            Component::CurDir => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::artifact::{ArtifactKind, CURSEFORGE_DOWNLOAD_TEMPLATE};

    const FULL: &str = r#"
Profile:
  name: Test Pack
  icon: Furnace
  versionId: 1.20.1-forge-47.2.0
  javaArgs: -Xmx4G
ModLoader:
  name: Forge
  url: https://maven.minecraftforge.net/forge-installer.jar
  autoOpen: true
CurseForgeMods:
  - name: JEI
    projectId: 238222
    fileId: 4712868
  - name: Legacy
    modId: 1
    fileId: 2
OtherMods:
  - name: Sodium
    url: https://example.com/sodium.jar
    filename: sodium.jar
CurseForgeResources:
  - name: Faithful
    projectId: 10
    fileId: 20
    directory: resourcepacks
OtherResources:
  - name: Options
    url: https://example.com/options.txt
"#;

    #[test]
    fn parses_full_manifest() {
        let config = Manifest::parse(FULL).unwrap().into_configuration(CURSEFORGE_DOWNLOAD_TEMPLATE);
        assert_eq!(config.profile.name, "Test Pack");
        assert_eq!(config.profile.java_args.as_deref(), Some("-Xmx4G"));
        assert!(config.auto_launch_mod_loader());
        assert_eq!(config.curseforge_mods.len(), 2);
        assert_eq!(
            config.curseforge_mods[1].kind(),
            &ArtifactKind::CurseForgeMod {
                project_id: 1,
                file_id: 2
            }
        );
        assert_eq!(config.other_mods[0].cached_file_name(), Some("sodium.jar"));
        assert_eq!(
            config.curseforge_resources[0].target_dir(),
            Path::new("resourcepacks")
        );
        assert_eq!(config.other_resources[0].target_dir(), Path::new("."));
    }

    #[test]
    fn absent_sections_are_empty() {
        let config = Manifest::parse("Profile:\n  name: P\n  versionId: 1.20.1\n")
            .unwrap()
            .into_configuration(CURSEFORGE_DOWNLOAD_TEMPLATE);
        assert!(config.mod_loader.is_none());
        assert_eq!(config.artifact_count(), 0);
    }

    #[test]
    fn rejects_escaping_resource_directory() {
        let raw = "Profile:\n  name: P\n  versionId: v\nOtherResources:\n  - name: x\n    url: https://example.com/x\n    directory: ../outside\n";
        assert!(matches!(
            Manifest::parse(raw),
            Err(InstallerError::InvalidManifest(_))
        ));
    }

    #[test]
    fn rejects_non_http_url() {
        let raw = "Profile:\n  name: P\n  versionId: v\nOtherMods:\n  - name: x\n    url: file:///etc/passwd\n";
        assert!(matches!(
            Manifest::parse(raw),
            Err(InstallerError::InvalidManifest(_))
        ));
    }

    #[test]
    fn syntax_error_is_parse_error() {
        assert!(matches!(
            Manifest::parse("Profile: [unterminated"),
            Err(InstallerError::ManifestParse { .. })
        ));
    }

    #[tokio::test]
    async fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = Manifest::load_from_path(&dir.path().join("config.yaml"))
            .await
            .unwrap_err();
        assert!(matches!(err, InstallerError::ManifestMissing { .. }));
    }
}
