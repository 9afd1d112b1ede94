#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod builder;
pub mod config;
pub mod duration;
pub mod error;
pub mod filesystem;
pub mod hashing;
pub mod models;
pub mod paths;
pub mod pattern;
pub mod selection;

pub use builder::{DEFAULT_NAVIGATION_URLS, ManifestBuilder};
pub use config::Config;
pub use error::{ManifestError, ManifestResult};
pub use filesystem::{DiskFilesystem, Filesystem, MemoryFilesystem};
pub use models::Manifest;
