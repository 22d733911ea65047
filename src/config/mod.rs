//! The `config` module loads server, hub and logging settings.
//!
//! Sources are layered: an optional config file, then `CHATHUB_`-prefixed
//! environment variables (`__` separates sections, e.g.
//! `CHATHUB_SERVER__PORT=9000`). Anything left unset keeps its default.

mod settings;

use config::{Config, ConfigError, Environment, File};

use settings::PartialSettings;

pub use settings::{HubSettings, LogSettings, ServerSettings, Settings};

/// Default location of the optional config file, without extension.
pub const DEFAULT_CONFIG_PATH: &str = "config/default";

/// Loads the configuration from `config/default` and the environment.
///
/// A `.env` file in the working directory, if present, is read first.
pub fn load_config() -> Result<Settings, ConfigError> {
    let _ = dotenvy::dotenv();
    load_config_from(DEFAULT_CONFIG_PATH)
}

/// Loads the configuration from the given file (if it exists) and the
/// environment, merged over `Settings::default()`.
pub fn load_config_from(path: &str) -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name(path).required(false))
        .add_source(
            Environment::with_prefix("CHATHUB")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    let partial: PartialSettings = builder.build()?.try_deserialize()?;

    Ok(partial.merge_onto(Settings::default()))
}
