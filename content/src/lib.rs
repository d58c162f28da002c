//! Content API for the academy portal.
//!
//! Videos, strategy write-ups and cheat sheets are kept as three JSON array
//! collections, most recent first. Videos and cheat sheets may carry an
//! uploaded file, stored next to the collections and served back under
//! `/uploads/`.
//!
//! The entry point is [`ContentDb`]; [`server`] exposes it over HTTP.

mod collection;
mod config;
mod db;
mod error;
pub mod model;
pub mod server;
pub mod uploads;

pub use config::Config;
pub use db::{ContentDb, ContentDbBuilder};
pub use error::{Error, Result};
pub use model::{
    CheatSheetRecord, NewCheatSheet, NewStrategy, NewVideoLink, NewVideoUpload, StrategyRecord,
    UploadedFile, VideoRecord, VideoSource,
};
