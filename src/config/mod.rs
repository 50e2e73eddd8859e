//! Configuration module for splitkro
//!
//! - Platform path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::SplitPaths;
pub use settings::Settings;
