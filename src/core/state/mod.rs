pub mod context;
pub mod settings;

pub use context::InstallContext;
pub use settings::InstallerSettings;
