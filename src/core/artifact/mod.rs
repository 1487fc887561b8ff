pub mod configuration;
pub mod entry;

pub use configuration::{Configuration, ProfileSpec};
pub use entry::{
    curseforge_download_url, is_safe_file_name, ArtifactEntry, ArtifactKind,
    CURSEFORGE_DOWNLOAD_TEMPLATE,
};
