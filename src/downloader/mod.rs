//! Download orchestration module

pub mod client;
pub mod engine;

// Re-export for convenience
pub use client::build_http_client;
pub use engine::AudioDownloader;
