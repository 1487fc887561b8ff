use serde::{Deserialize, Serialize};

use super::entry::ArtifactEntry;

/// The launcher profile fields a manifest controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSpec {
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    pub version_id: String,
    #[serde(default)]
    pub java_args: Option<String>,
}

/// Parsed, validated description of one modpack. Built once and only read
/// afterwards.
#[derive(Debug, Default)]
pub struct Configuration {
    pub profile: ProfileSpec,
    pub mod_loader: Option<ArtifactEntry>,
    pub curseforge_mods: Vec<ArtifactEntry>,
    pub other_mods: Vec<ArtifactEntry>,
    pub curseforge_resources: Vec<ArtifactEntry>,
    pub other_resources: Vec<ArtifactEntry>,
}

impl Configuration {
    /// Mods in declaration order: CurseForge mods, then the rest.
    pub fn mod_batch(&self) -> Vec<&ArtifactEntry> {
        self.curseforge_mods
            .iter()
            .chain(self.other_mods.iter())
            .collect()
    }

    /// Resources in declaration order: CurseForge resources, then the rest.
    pub fn resource_batch(&self) -> Vec<&ArtifactEntry> {
        self.curseforge_resources
            .iter()
            .chain(self.other_resources.iter())
            .collect()
    }

    pub fn auto_launch_mod_loader(&self) -> bool {
        self.mod_loader
            .as_ref()
            .map(ArtifactEntry::auto_launch)
            .unwrap_or(false)
    }

    pub fn artifact_count(&self) -> usize {
        usize::from(self.mod_loader.is_some())
            + self.curseforge_mods.len()
            + self.other_mods.len()
            + self.curseforge_resources.len()
            + self.other_resources.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::artifact::CURSEFORGE_DOWNLOAD_TEMPLATE;

    #[test]
    fn batches_keep_sub_list_order() {
        let config = Configuration {
            curseforge_mods: vec![
                ArtifactEntry::curseforge_mod(CURSEFORGE_DOWNLOAD_TEMPLATE, "b", 2, 2),
                ArtifactEntry::curseforge_mod(CURSEFORGE_DOWNLOAD_TEMPLATE, "a", 1, 1),
            ],
            other_mods: vec![ArtifactEntry::direct_mod("c", "https://example.com/c.jar", None)],
            other_resources: vec![ArtifactEntry::direct_resource(
                "r",
                "https://example.com/r.zip",
                None,
                None,
            )],
            ..Default::default()
        };

        let names: Vec<_> = config.mod_batch().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert_eq!(config.resource_batch().len(), 1);
        assert_eq!(config.artifact_count(), 4);
        assert!(!config.auto_launch_mod_loader());
    }
}
