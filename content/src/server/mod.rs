//! HTTP server for the content portal.
//!
//! Exposes list/create endpoints for videos, strategies and cheat sheets,
//! file uploads, and a static route serving the uploaded files.

mod config;
mod error;
pub mod handlers;
mod http;
pub mod metrics;
mod middleware;
mod request;

pub use config::{CliArgs, ContentServerConfig};
pub use http::ContentServer;
