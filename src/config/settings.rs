use compio::fs;
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::ext::BestEffortPathExt;

const SETTINGS_FILE_NAME: &str = "treeforge.yaml";

/// Values read from the optional settings file. Unset keys stay `None` so
/// command line flags and built-in defaults can fill them in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub output_dir: Option<PathBuf>,
    pub default_root_name: Option<String>,
    pub marker: Option<String>,
    pub open_explorer: Option<bool>,
    pub overwrite: Option<bool>,
}

impl Settings {
    /// Reads `explicit` when given, otherwise `treeforge.yaml` in the current
    /// directory if it exists.
    pub async fn read(explicit: Option<&Path>) -> Result<Self, SettingsError> {
        match explicit {
            Some(path) => Self::from_path(path).await,
            None => {
                let path = PathBuf::from(SETTINGS_FILE_NAME);
                if fs::metadata(&path).await.is_err() {
                    debug!("No {} found, using defaults", SETTINGS_FILE_NAME);
                    return Ok(Self::default());
                }
                Self::from_path(&path).await
            }
        }
    }

    pub async fn from_path(path: &Path) -> Result<Self, SettingsError> {
        debug!("Opening settings file: {}", path.best_effort_path_display());
        let bytes = fs::read(path).await.context(ReadSnafu {
            file_path: path.best_effort_path_display(),
        })?;
        let contents = String::from_utf8(bytes).context(EncodingSnafu {
            file_path: path.best_effort_path_display(),
        })?;
        debug!("Read settings file: {} bytes", contents.len());
        contents.as_str().try_into()
    }

    fn from_mapping(mapping: &LinkedHashMap<Yaml, Yaml>) -> Result<Self, SettingsError> {
        for key in mapping.keys() {
            let known = matches!(
                key,
                Yaml::Value(Scalar::String(name)) if KNOWN_KEYS.iter().any(|known| name == known)
            );
            if !known {
                tracing::warn!("Ignoring unknown settings key: {:?}", key);
            }
        }

        Ok(Settings {
            output_dir: string_entry(mapping, "output_dir")?.map(PathBuf::from),
            default_root_name: string_entry(mapping, "default_root_name")?,
            marker: string_entry(mapping, "marker")?,
            open_explorer: bool_entry(mapping, "open_explorer")?,
            overwrite: bool_entry(mapping, "overwrite")?,
        })
    }
}

const KNOWN_KEYS: [&str; 5] = [
    "output_dir",
    "default_root_name",
    "marker",
    "open_explorer",
    "overwrite",
];

fn lookup<'a, 'y>(
    mapping: &'a LinkedHashMap<Yaml<'y>, Yaml<'y>>,
    key: &'static str,
) -> Option<&'a Yaml<'y>> {
    match mapping.get(&Yaml::Value(Scalar::String(Cow::Borrowed(key)))) {
        None | Some(Yaml::Value(Scalar::Null)) => None,
        Some(value) => Some(value),
    }
}

fn string_entry(
    mapping: &LinkedHashMap<Yaml, Yaml>,
    key: &'static str,
) -> Result<Option<String>, SettingsError> {
    match lookup(mapping, key) {
        None => Ok(None),
        Some(Yaml::Value(Scalar::String(value))) => Ok(Some(value.to_string())),
        Some(_) => InvalidValueSnafu {
            key,
            expected: "a string",
        }
        .fail(),
    }
}

fn bool_entry(
    mapping: &LinkedHashMap<Yaml, Yaml>,
    key: &'static str,
) -> Result<Option<bool>, SettingsError> {
    match lookup(mapping, key) {
        None => Ok(None),
        Some(Yaml::Value(Scalar::Boolean(value))) => Ok(Some(*value)),
        Some(_) => InvalidValueSnafu {
            key,
            expected: "true or false",
        }
        .fail(),
    }
}

impl TryFrom<&str> for Settings {
    type Error = SettingsError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents =
            Yaml::load_from_str(contents).map_err(|e| SettingsError::ParseError { source: e })?;
        let Some(document) = documents.first() else {
            return Ok(Self::default());
        };
        if matches!(document, Yaml::Value(Scalar::Null)) {
            return Ok(Self::default());
        }

        let top_level = document
            .as_mapping()
            .ok_or(SettingsError::TopLevelNotMap)?;
        Self::from_mapping(top_level)
    }
}

#[derive(Debug, Snafu)]
pub enum SettingsError {
    #[snafu(display("Failed to read the settings file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("The settings file is not valid UTF-8: {}", file_path))]
    EncodingError {
        file_path: String,
        source: std::string::FromUtf8Error,
    },
    #[snafu(display("Failed to parse the settings file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Top level of the settings file should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Setting '{}' should be {}", key, expected))]
    InvalidValue {
        key: &'static str,
        expected: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[compio::test]
    async fn explicit_missing_file_is_an_error() {
        let result = Settings::read(Some(Path::new("nonexistent-settings.yaml"))).await;
        assert!(matches!(result, Err(SettingsError::ReadError { .. })));
    }

    #[compio::test]
    async fn settings_are_read_from_a_file() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(file, "output_dir: /srv/scaffolds\nopen_explorer: true")
            .expect("Failed to write to temp file");

        let settings = Settings::read(Some(file.path())).await.unwrap();
        assert_eq!(settings.output_dir, Some(PathBuf::from("/srv/scaffolds")));
        assert_eq!(settings.open_explorer, Some(true));
        assert_eq!(settings.marker, None);
    }

    #[test]
    fn all_keys_are_parsed() {
        let yaml = r#"
output_dir: out
default_root_name: scaffold
marker: "Generated by treeforge"
open_explorer: false
overwrite: true
"#;
        let settings: Settings = yaml.try_into().unwrap();
        assert_eq!(
            settings,
            Settings {
                output_dir: Some(PathBuf::from("out")),
                default_root_name: Some("scaffold".into()),
                marker: Some("Generated by treeforge".into()),
                open_explorer: Some(false),
                overwrite: Some(true),
            }
        );
    }

    #[test]
    fn empty_file_gives_defaults() {
        let settings: Settings = "".try_into().unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn null_values_are_unset() {
        let settings: Settings = "marker: ~\noverwrite: null".try_into().unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let settings: Settings = "colour: blue\noverwrite: true".try_into().unwrap();
        assert_eq!(settings.overwrite, Some(true));
    }

    #[test]
    fn invalid_yaml_is_a_parse_error() {
        let result: Result<Settings, _> = "invalid: yaml: content: [unclosed".try_into();
        assert!(matches!(result, Err(SettingsError::ParseError { .. })));
    }

    #[test]
    fn list_top_level_is_rejected() {
        let result: Result<Settings, _> = "- item1\n- item2".try_into();
        assert!(matches!(result, Err(SettingsError::TopLevelNotMap)));
    }

    #[test]
    fn wrong_value_types_are_rejected() {
        let result: Result<Settings, _> = "overwrite: sometimes".try_into();
        assert!(matches!(
            result,
            Err(SettingsError::InvalidValue {
                key: "overwrite",
                ..
            })
        ));

        let result: Result<Settings, _> = "output_dir: [a, b]".try_into();
        assert!(matches!(
            result,
            Err(SettingsError::InvalidValue {
                key: "output_dir",
                ..
            })
        ));
    }
}
