//! Application configuration.
//!
//! Settings live in a TOML file with one table per section. The manager
//! handles load-or-create and atomic writes.

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    CollisionPolicy, LimitSettings, OutputSettings, PathSettings, Settings,
};
