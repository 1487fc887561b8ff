// ─── Java Discovery ───
// Finds a `java` binary able to run a mod loader installer jar.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

/// Package folder of the Microsoft Store build of the official launcher.
const STORE_LAUNCHER_PACKAGE: &str = "Microsoft.4297127D64EC6_8wekyb3d8bbwe";

fn java_exe() -> &'static str {
    if cfg!(windows) {
        "java.exe"
    } else {
        "java"
    }
}

/// Locate Java, in order: `JAVA_HOME`, `PATH`, then the runtimes bundled
/// with the official launcher.
pub fn find_java_binary() -> Option<PathBuf> {
    if let Some(home) = std::env::var_os("JAVA_HOME") {
        let candidate = PathBuf::from(home).join("bin").join(java_exe());
        if candidate.is_file() {
            debug!("Using JAVA_HOME java: {:?}", candidate);
            return Some(candidate);
        }
    }

    if let Some(path) = std::env::var_os("PATH") {
        if let Some(found) = search_path(&path) {
            debug!("Using java from PATH: {:?}", found);
            return Some(found);
        }
    }

    info!("Searching for java from the Minecraft launcher...");
    launcher_runtime_roots()
        .iter()
        .find_map(|root| search_runtime_dir(root))
}

fn search_path(path: &std::ffi::OsStr) -> Option<PathBuf> {
    std::env::split_paths(path)
        .map(|dir| dir.join(java_exe()))
        .find(|candidate| candidate.is_file())
}

fn launcher_runtime_roots() -> Vec<PathBuf> {
    let mut roots = Vec::new();
    if !cfg!(target_os = "windows") {
        return roots;
    }

    match std::env::var_os("LOCALAPPDATA") {
        Some(local) => roots.push(
            PathBuf::from(local)
                .join("Packages")
                .join(STORE_LAUNCHER_PACKAGE)
                .join("LocalCache")
                .join("Local")
                .join("runtime"),
        ),
        None => warn!("LOCALAPPDATA environment variable not found"),
    }
    if let Some(appdata) = dirs::config_dir() {
        roots.push(appdata.join(".minecraft").join("runtime"));
    }
    roots
}

/// Pick the best runtime below `runtime_dir`. `java-runtime-*` folders
/// (Java 16+) win over legacy `jre-*` ones; within a family the
/// lexicographically greatest name wins.
pub fn search_runtime_dir(runtime_dir: &Path) -> Option<PathBuf> {
    let mut dirs: Vec<PathBuf> = std::fs::read_dir(runtime_dir)
        .ok()?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort_by(|a, b| compare_runtime_dirs(a, b));

    dirs.iter().find_map(|dir| {
        let java = dir.join("bin").join(java_exe());
        java.is_file().then_some(java)
    })
}

fn compare_runtime_dirs(a: &Path, b: &Path) -> Ordering {
    let name_a = a.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let name_b = b.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let modern_a = name_a.starts_with("java-runtime-");
    let modern_b = name_b.starts_with("java-runtime-");
    match (modern_a, modern_b) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => name_b.cmp(&name_a),
    }
}
