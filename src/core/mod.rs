// ─── Modpack Installer Core ───
//
// Architecture:
//   core/
//     artifact/   Download entries + the parsed Configuration
//     manifest/   config.yaml schema, loading and validation
//     downloader/ Name resolution, idempotent fetch, sequential batches
//     profiles/   launcher_profiles.json model + backup-then-write merge
//     java/       Java discovery for the mod loader installer
//     launch/     Spawning the mod loader installer
//     pipeline/   Stage state machine + progress events
//     state/      Settings and the per-run InstallContext

pub mod artifact;
pub mod downloader;
pub mod error;
pub mod http;
pub mod java;
pub mod launch;
pub mod manifest;
pub mod pipeline;
pub mod profiles;
pub mod state;
