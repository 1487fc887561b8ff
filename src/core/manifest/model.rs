// ─── Manifest Schema ───
// Serde mirror of the user-authored `config.yaml`.

use std::path::PathBuf;

use serde::Deserialize;

use crate::core::artifact::ProfileSpec;

/// Top-level manifest document.
#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(rename = "Profile")]
    pub profile: ProfileSpec,
    #[serde(rename = "ModLoader", default)]
    pub mod_loader: Option<ModLoaderSection>,
    #[serde(rename = "CurseForgeMods", default)]
    pub curseforge_mods: Option<Vec<CurseForgeModSection>>,
    #[serde(rename = "OtherMods", default)]
    pub other_mods: Option<Vec<OtherModSection>>,
    #[serde(rename = "CurseForgeResources", default)]
    pub curseforge_resources: Option<Vec<CurseForgeResourceSection>>,
    #[serde(rename = "OtherResources", default)]
    pub other_resources: Option<Vec<OtherResourceSection>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModLoaderSection {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub auto_open: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurseForgeModSection {
    pub name: String,
    #[serde(alias = "modId")]
    pub project_id: u64,
    pub file_id: u64,
}

#[derive(Debug, Deserialize)]
pub struct OtherModSection {
    pub name: String,
    pub url: String,
    #[serde(default, alias = "fileName")]
    pub filename: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurseForgeResourceSection {
    pub name: String,
    #[serde(alias = "modId")]
    pub project_id: u64,
    pub file_id: u64,
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct OtherResourceSection {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub directory: Option<PathBuf>,
    #[serde(default, alias = "fileName")]
    pub filename: Option<String>,
}
