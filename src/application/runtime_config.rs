use std::path::PathBuf;

use crate::cli::Cli;
use crate::config::Settings;
use crate::input::InputSource;
use crate::materializer::{DEFAULT_MARKER, MaterializeOptions};
use crate::parser::{DEFAULT_ROOT_NAME, is_safe_root_name};
use crate::tree::RenderStyle;

/// Everything a run needs, with command line flags layered over the
/// settings file and built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub source: InputSource,
    pub dry_run: bool,
    pub render_style: RenderStyle,
    pub output_dir: Option<PathBuf>,
    pub root_name: Option<String>,
    pub default_root_name: String,
    pub materialize: MaterializeOptions,
    pub open_explorer: bool,
}

impl RuntimeConfig {
    pub fn resolve(cli: Cli, settings: Settings, color: bool) -> Self {
        let source = if cli.sample {
            InputSource::Sample
        } else {
            cli.input_file.map_or(InputSource::Stdin, InputSource::File)
        };
        let render_style = if cli.plain {
            RenderStyle::Plain
        } else {
            RenderStyle::Decorated { color }
        };

        Self {
            source,
            dry_run: cli.dry_run,
            render_style,
            output_dir: cli.output.or(settings.output_dir),
            root_name: cli.root_name,
            default_root_name: settings
                .default_root_name
                .unwrap_or_else(|| DEFAULT_ROOT_NAME.to_string()),
            materialize: MaterializeOptions {
                marker: settings
                    .marker
                    .unwrap_or_else(|| DEFAULT_MARKER.to_string()),
                overwrite: cli.overwrite || settings.overwrite.unwrap_or(false),
            },
            open_explorer: cli.open || settings.open_explorer.unwrap_or(false),
        }
    }

    /// First configured root name that would place the tree outside the
    /// destination folder.
    pub fn unsafe_root_name(&self) -> Option<&str> {
        self.root_name
            .iter()
            .chain(std::iter::once(&self.default_root_name))
            .map(String::as_str)
            .find(|name| !is_safe_root_name(name))
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use rstest::rstest;

    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("treeforge").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_without_settings() {
        let config = RuntimeConfig::resolve(cli(&[]), Settings::default(), false);
        assert_eq!(config.source, InputSource::Stdin);
        assert_eq!(config.render_style, RenderStyle::Decorated { color: false });
        assert_eq!(config.output_dir, None);
        assert_eq!(config.default_root_name, DEFAULT_ROOT_NAME);
        assert_eq!(config.materialize, MaterializeOptions::default());
        assert!(!config.open_explorer);
    }

    #[test]
    fn settings_fill_in_unset_flags() {
        let settings = Settings {
            output_dir: Some(PathBuf::from("from-settings")),
            default_root_name: Some("scaffold".into()),
            marker: Some("generated".into()),
            open_explorer: Some(true),
            overwrite: Some(true),
        };
        let config = RuntimeConfig::resolve(cli(&["tree.txt"]), settings, true);
        assert_eq!(config.source, InputSource::File(PathBuf::from("tree.txt")));
        assert_eq!(config.output_dir, Some(PathBuf::from("from-settings")));
        assert_eq!(config.default_root_name, "scaffold");
        assert_eq!(config.materialize.marker, "generated");
        assert!(config.materialize.overwrite);
        assert!(config.open_explorer);
    }

    #[test]
    fn flags_override_settings() {
        let settings = Settings {
            output_dir: Some(PathBuf::from("from-settings")),
            ..Settings::default()
        };
        let config = RuntimeConfig::resolve(
            cli(&["--sample", "--plain", "-o", "from-flag", "--root-name", "x"]),
            settings,
            true,
        );
        assert_eq!(config.source, InputSource::Sample);
        assert_eq!(config.render_style, RenderStyle::Plain);
        assert_eq!(config.output_dir, Some(PathBuf::from("from-flag")));
        assert_eq!(config.root_name.as_deref(), Some("x"));
        assert_eq!(config.unsafe_root_name(), None);
    }

    #[rstest]
    #[case(&["--root-name", ".."], None, Some(".."))]
    #[case(&["--root-name", "/tmp/elsewhere"], None, Some("/tmp/elsewhere"))]
    #[case(&[], Some("../scaffold"), Some("../scaffold"))]
    #[case(&["--root-name", "."], Some("scaffold"), None)]
    fn root_names_escaping_the_destination(
        #[case] args: &[&str],
        #[case] default_root_name: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        let settings = Settings {
            default_root_name: default_root_name.map(str::to_string),
            ..Settings::default()
        };
        let config = RuntimeConfig::resolve(cli(args), settings, false);
        assert_eq!(config.unsafe_root_name(), expected);
    }
}
