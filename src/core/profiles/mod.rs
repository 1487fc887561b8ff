pub mod ledger;
pub mod model;

pub use ledger::{default_registry_path, AppendOutcome, ProfileLedger};
pub use model::{LauncherProfile, LauncherProfiles};
