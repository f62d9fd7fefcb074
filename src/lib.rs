pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use adapters::{source_from_config, LetPubConfig, LetPubSource, WosConfig, WosSource};
pub use core::{engine::ScoutEngine, pipeline::ImpactPipeline};
pub use utils::error::{Result, ScoutError};
