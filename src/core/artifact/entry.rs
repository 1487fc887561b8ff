use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::sync::OnceCell;

pub const CURSEFORGE_DOWNLOAD_TEMPLATE: &str =
    "https://www.curseforge.com/api/v1/mods/{project_id}/files/{file_id}/download";

pub const MODS_DIR: &str = "mods";

/// Download URL for one file of one CurseForge project. `template` carries
/// `{project_id}` and `{file_id}` placeholders.
pub fn curseforge_download_url(template: &str, project_id: u64, file_id: u64) -> String {
    template
        .replace("{project_id}", &project_id.to_string())
        .replace("{file_id}", &file_id.to_string())
}

/// True when `name` can be joined onto a directory without escaping it.
pub fn is_safe_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.contains('\0')
}

/// What kind of artifact an entry is. Fixed at construction, together with
/// the URL and target directory rules that go with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArtifactKind {
    ModLoader { auto_launch: bool },
    Mod,
    CurseForgeMod { project_id: u64, file_id: u64 },
    Resource,
    CurseForgeResource { project_id: u64, file_id: u64 },
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactKind::ModLoader { .. } => write!(f, "mod loader"),
            ArtifactKind::Mod | ArtifactKind::CurseForgeMod { .. } => write!(f, "mod"),
            ArtifactKind::Resource | ArtifactKind::CurseForgeResource { .. } => {
                write!(f, "resource")
            }
        }
    }
}

/// A single downloadable artifact declared by the manifest.
///
/// The concrete file name is resolved lazily and memoized: the first call to
/// [`ArtifactEntry::file_name_or_resolve`] stores it and every later call
/// reuses it. A name supplied by the manifest is stored up front and
/// short-circuits resolution entirely.
#[derive(Debug)]
pub struct ArtifactEntry {
    name: String,
    kind: ArtifactKind,
    source_url: String,
    /// Relative to the install root.
    target_dir: PathBuf,
    file_name: OnceCell<String>,
}

impl ArtifactEntry {
    /// Mod loader installer, stored at the install root.
    pub fn mod_loader(name: impl Into<String>, url: impl Into<String>, auto_launch: bool) -> Self {
        Self::build(
            name.into(),
            ArtifactKind::ModLoader { auto_launch },
            url.into(),
            PathBuf::from("."),
            None,
        )
    }

    /// Mod fetched from a direct URL into `mods/`.
    pub fn direct_mod(
        name: impl Into<String>,
        url: impl Into<String>,
        file_name: Option<String>,
    ) -> Self {
        Self::build(
            name.into(),
            ArtifactKind::Mod,
            url.into(),
            PathBuf::from(MODS_DIR),
            file_name,
        )
    }

    /// Mod hosted on CurseForge, stored in `mods/`.
    pub fn curseforge_mod(
        template: &str,
        name: impl Into<String>,
        project_id: u64,
        file_id: u64,
    ) -> Self {
        Self::build(
            name.into(),
            ArtifactKind::CurseForgeMod {
                project_id,
                file_id,
            },
            curseforge_download_url(template, project_id, file_id),
            PathBuf::from(MODS_DIR),
            None,
        )
    }

    /// Resource fetched from a direct URL. `directory` defaults to the
    /// install root.
    pub fn direct_resource(
        name: impl Into<String>,
        url: impl Into<String>,
        directory: Option<PathBuf>,
        file_name: Option<String>,
    ) -> Self {
        Self::build(
            name.into(),
            ArtifactKind::Resource,
            url.into(),
            directory.unwrap_or_else(|| PathBuf::from(".")),
            file_name,
        )
    }

    /// Resource hosted on CurseForge (resource packs, shader packs, ...).
    pub fn curseforge_resource(
        template: &str,
        name: impl Into<String>,
        project_id: u64,
        file_id: u64,
        directory: Option<PathBuf>,
    ) -> Self {
        Self::build(
            name.into(),
            ArtifactKind::CurseForgeResource {
                project_id,
                file_id,
            },
            curseforge_download_url(template, project_id, file_id),
            directory.unwrap_or_else(|| PathBuf::from(".")),
            None,
        )
    }

    fn build(
        name: String,
        kind: ArtifactKind,
        source_url: String,
        target_dir: PathBuf,
        file_name: Option<String>,
    ) -> Self {
        let cell = match file_name {
            Some(known) => OnceCell::new_with(Some(known)),
            None => OnceCell::new(),
        };
        Self {
            name,
            kind,
            source_url,
            target_dir,
            file_name: cell,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ArtifactKind {
        &self.kind
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    /// File name if it was supplied or already resolved.
    pub fn cached_file_name(&self) -> Option<&str> {
        self.file_name.get().map(String::as_str)
    }

    /// Returns the memoized file name, running `resolve` only if none is
    /// stored yet. A failed resolution stores nothing.
    pub async fn file_name_or_resolve<F, Fut, E>(&self, resolve: F) -> Result<&str, E>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<String, E>>,
    {
        self.file_name
            .get_or_try_init(resolve)
            .await
            .map(String::as_str)
    }

    pub fn auto_launch(&self) -> bool {
        matches!(self.kind, ArtifactKind::ModLoader { auto_launch: true })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curseforge_url_uses_template() {
        let entry = ArtifactEntry::curseforge_mod(CURSEFORGE_DOWNLOAD_TEMPLATE, "JEI", 238222, 4712868);
        assert_eq!(
            entry.source_url(),
            "https://www.curseforge.com/api/v1/mods/238222/files/4712868/download"
        );
        assert_eq!(entry.target_dir(), Path::new("mods"));
        assert_eq!(entry.cached_file_name(), None);
    }

    #[test]
    fn curseforge_url_follows_custom_template() {
        let entry = ArtifactEntry::curseforge_mod(
            "http://127.0.0.1:8080/cf/{project_id}/{file_id}",
            "JEI",
            1,
            2,
        );
        assert_eq!(entry.source_url(), "http://127.0.0.1:8080/cf/1/2");
    }

    #[test]
    fn resources_default_to_install_root() {
        let entry = ArtifactEntry::direct_resource("Shaders", "https://example.com/s.zip", None, None);
        assert_eq!(entry.target_dir(), Path::new("."));

        let entry = ArtifactEntry::curseforge_resource(
            CURSEFORGE_DOWNLOAD_TEMPLATE,
            "Faithful",
            1,
            2,
            Some(PathBuf::from("resourcepacks")),
        );
        assert_eq!(entry.target_dir(), Path::new("resourcepacks"));
    }

    #[test]
    fn only_flagged_mod_loader_auto_launches() {
        assert!(ArtifactEntry::mod_loader("Forge", "https://example.com/f.jar", true).auto_launch());
        assert!(!ArtifactEntry::mod_loader("Forge", "https://example.com/f.jar", false).auto_launch());
        assert!(!ArtifactEntry::direct_mod("x", "https://example.com/x.jar", None).auto_launch());
    }

    #[test]
    fn file_name_safety() {
        assert!(is_safe_file_name("jei-1.20.1.jar"));
        assert!(is_safe_file_name("Faithful 32x.zip"));
        assert!(!is_safe_file_name(""));
        assert!(!is_safe_file_name(".."));
        assert!(!is_safe_file_name("../evil.jar"));
        assert!(!is_safe_file_name("dir\\evil.jar"));
    }

    #[tokio::test]
    async fn supplied_file_name_short_circuits_resolution() {
        let entry = ArtifactEntry::direct_mod(
            "Sodium",
            "https://example.com/download?id=1",
            Some("sodium.jar".to_string()),
        );
        let name = entry
            .file_name_or_resolve(|| async { Err::<String, ()>(()) })
            .await
            .unwrap();
        assert_eq!(name, "sodium.jar");
    }

    #[tokio::test]
    async fn resolution_is_memoized() {
        let entry = ArtifactEntry::curseforge_mod(CURSEFORGE_DOWNLOAD_TEMPLATE, "JEI", 1, 2);
        let calls = std::sync::atomic::AtomicUsize::new(0);
        for _ in 0..3 {
            let name = entry
                .file_name_or_resolve(|| async {
                    calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                    Ok::<_, ()>("jei.jar".to_string())
                })
                .await
                .unwrap();
            assert_eq!(name, "jei.jar");
        }
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_resolution_is_retried() {
        let entry = ArtifactEntry::curseforge_mod(CURSEFORGE_DOWNLOAD_TEMPLATE, "JEI", 1, 2);
        assert!(entry
            .file_name_or_resolve(|| async { Err::<String, &str>("offline") })
            .await
            .is_err());
        assert_eq!(entry.cached_file_name(), None);
        let name = entry
            .file_name_or_resolve(|| async { Ok::<_, &str>("jei.jar".to_string()) })
            .await
            .unwrap();
        assert_eq!(name, "jei.jar");
    }
}
