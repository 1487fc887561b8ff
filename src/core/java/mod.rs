pub mod runtime;

pub use runtime::find_java_binary;
pub use runtime::search_runtime_dir;
