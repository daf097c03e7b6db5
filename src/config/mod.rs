//! Optional YAML settings file.

mod settings;

pub use settings::{Settings, SettingsError};
