// ─── Installer Launch ───
// Starts the downloaded mod loader installer as a detached child process.

use std::path::Path;
use std::process::Stdio;

#[cfg(target_os = "windows")]
use std::os::windows::process::CommandExt;

use tracing::{debug, info};

use crate::core::error::{InstallerError, InstallerResult};
use crate::core::java;

/// Run `java -jar <installer>` from `working_dir` and return once the
/// process is spawned. The installer is not waited on.
pub fn launch_installer(installer: &Path, working_dir: &Path) -> InstallerResult<std::process::Child> {
    if !installer.is_file() {
        return Err(InstallerError::InstallerLaunch(format!(
            "installer not found at {:?}",
            installer
        )));
    }

    let java_bin = java::find_java_binary()
        .ok_or_else(|| InstallerError::InstallerLaunch("Java executable not found".into()))?;
    info!("Using Java: {:?}", java_bin);

    let mut cmd = std::process::Command::new(&java_bin);
    cmd.arg("-jar")
        .arg(installer)
        .current_dir(working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    configure_platform_spawn(&mut cmd);

    debug!("Command: {:?}", cmd);

    let child = cmd
        .spawn()
        .map_err(|e| InstallerError::InstallerLaunch(e.to_string()))?;

    info!("Launched mod loader installer {:?} (pid {})", installer, child.id());
    Ok(child)
}

#[cfg(target_os = "windows")]
fn configure_platform_spawn(cmd: &mut std::process::Command) {
    const CREATE_NO_WINDOW: u32 = 0x0800_0000;
    cmd.creation_flags(CREATE_NO_WINDOW);
}

#[cfg(not(target_os = "windows"))]
fn configure_platform_spawn(_cmd: &mut std::process::Command) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_installer_is_reported_before_java_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let err = launch_installer(&dir.path().join("forge-installer.jar"), dir.path()).unwrap_err();
        assert!(matches!(err, InstallerError::InstallerLaunch(_)));
    }
}
