pub mod task;

pub use task::launch_installer;
