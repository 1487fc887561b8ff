use std::path::PathBuf;
use std::sync::Arc;

use modpack_installer_lib::core::pipeline::{FnSink, InstallEvent};

#[tokio::main]
async fn main() {
    let install_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Cannot determine the working directory: {e}");
            std::process::exit(1);
        }
    };
    let manifest = std::env::args_os().nth(1).map(PathBuf::from);

    modpack_installer_lib::init_logging(&install_dir);

    let events = Arc::new(FnSink(|event: InstallEvent| {
        if let Some(line) = modpack_installer_lib::describe_event(&event) {
            println!("{line}");
        }
    }));

    if let Err(failure) = modpack_installer_lib::run(install_dir, manifest, events).await {
        eprintln!("{failure}");
        std::process::exit(modpack_installer_lib::exit_code(&failure));
    }
}
