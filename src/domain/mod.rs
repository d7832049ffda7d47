//! Core build-configuration types: paths, globs, config, errors.

pub mod config;
pub mod error;
pub mod paths;

pub use config::{BuildConfig, FileConfig};
pub use error::AppError;
pub use paths::{BuildPaths, FileGroup};
