//! Configuration for the content HTTP server.

use std::path::Path;

use clap::Parser;
use common::{LocalStorageConfig, StorageConfig};

use crate::Config;
use crate::uploads::UploadLimits;

const MIB: usize = 1024 * 1024;

/// CLI arguments for the content server.
#[derive(Debug, Parser)]
#[command(name = "content-server")]
#[command(about = "Academy content portal HTTP server")]
pub struct CliArgs {
    /// HTTP server port.
    #[arg(long, default_value = "5000")]
    pub port: u16,

    /// Directory holding the collection JSON files.
    #[arg(long, default_value = "data")]
    pub data_dir: String,

    /// Directory holding uploaded files. Defaults to `<data-dir>/uploads`.
    #[arg(long)]
    pub uploads_dir: Option<String>,

    /// Use in-memory storage (for testing).
    #[arg(long, default_value = "false")]
    pub in_memory: bool,

    /// Largest accepted video upload, in MiB.
    #[arg(long, default_value = "200")]
    pub max_video_mb: usize,

    /// Largest accepted cheat sheet upload, in MiB.
    #[arg(long, default_value = "50")]
    pub max_document_mb: usize,
}

impl CliArgs {
    /// Convert CLI args to content store configuration.
    pub fn to_content_config(&self) -> Config {
        let (data, uploads) = if self.in_memory {
            (StorageConfig::InMemory, StorageConfig::InMemory)
        } else {
            let uploads_dir = match &self.uploads_dir {
                Some(dir) => dir.clone(),
                None => Path::new(&self.data_dir)
                    .join("uploads")
                    .to_string_lossy()
                    .into_owned(),
            };
            (
                StorageConfig::Local(LocalStorageConfig {
                    path: self.data_dir.clone(),
                }),
                StorageConfig::Local(LocalStorageConfig { path: uploads_dir }),
            )
        };

        Config {
            data,
            uploads,
            upload_limits: UploadLimits {
                video: self.max_video_mb.saturating_mul(MIB),
                document: self.max_document_mb.saturating_mul(MIB),
            },
            ..Default::default()
        }
    }
}

/// Configuration for the content HTTP server.
#[derive(Debug, Clone)]
pub struct ContentServerConfig {
    /// HTTP server port.
    pub port: u16,
}

impl Default for ContentServerConfig {
    fn default() -> Self {
        Self { port: 5000 }
    }
}

impl From<&CliArgs> for ContentServerConfig {
    fn from(args: &CliArgs) -> Self {
        Self { port: args.port }
    }
}
