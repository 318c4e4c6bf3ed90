//! Configuration handling for clipforge.
//!
//! Settings are explicit enumerated structs passed into each component
//! call, never ambient mutable state. The manager handles TOML
//! load/create/save with atomic writes.

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    CensorSettings, EngineSettings, FusionSettings, LayoutSettings, LoggingSettings, PathSettings,
    Settings, SubtitleSettings, UploadSettings,
};
