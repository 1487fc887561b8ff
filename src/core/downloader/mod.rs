pub mod batch;
pub mod client;
pub mod resolver;

pub use batch::{BatchSummary, DownloadBatchRunner};
pub use client::ArtifactDownloader;
pub use resolver::RemoteReferenceResolver;
