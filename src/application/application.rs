use std::path::PathBuf;

use colored::Colorize;
use snafu::Snafu;
use snafu::prelude::*;
use supports_color::Stream;
use tracing::{debug, info, warn};

use crate::application::RuntimeConfig;
use crate::cli::Cli;
use crate::config::{Settings, SettingsError};
use crate::destination::{DestinationError, open_in_file_explorer, resolve_destination};
use crate::ext::BestEffortPathExt;
use crate::input::InputError;
use crate::materializer::{MaterializeError, MaterializeReport, Materializer};
use crate::parser::{ParseWarning, ParsedTree, StructureError, TreeParser};
use crate::tree::{Node, render};

pub struct Application;

impl Application {
    pub async fn run(cli: Cli) -> Result<(), ApplicationError> {
        let settings = Settings::read(cli.config.as_deref())
            .await
            .context(SettingsSnafu)?;
        debug!("Loaded settings: {:?}", settings);

        let color = supports_color::on(Stream::Stdout).is_some();
        colored::control::set_override(color);
        let config = RuntimeConfig::resolve(cli, settings, color);
        debug!("Resolved runtime config: {:?}", config);
        if let Some(name) = config.unsafe_root_name() {
            return UnsafeRootNameSnafu { name }.fail();
        }

        let text = config.source.read().await.context(InputSnafu)?;
        let ParsedTree { mut root, warnings } = TreeParser::new()
            .with_default_root_name(config.default_root_name.as_str())
            .parse(&text)
            .context(StructureSnafu)?;
        if let Some(root_name) = &config.root_name {
            root.name = root_name.clone();
        }
        info!("Parsed {} entries below '{}'", root.count() - 1, root.name);

        if config.dry_run {
            Self::preview(&config, &root);
            report_warnings(&warnings);
            return Ok(());
        }

        let Some(base) = resolve_destination(config.output_dir.clone()).context(DestinationSnafu)?
        else {
            println!("No folder selected. Operation cancelled.");
            return Ok(());
        };

        let materializer = Materializer::new(base, config.materialize.clone());
        let report = materializer
            .apply(&root)
            .await
            .context(MaterializeSnafu)?;
        let target = materializer.root_path(&root);

        println!(
            "{} {}",
            "Structure created in:".green().bold(),
            target.best_effort_path_display()
        );
        print_report(&report);
        report_warnings(&warnings);

        if config.open_explorer {
            if let Err(err) = open_in_file_explorer(&target).await {
                warn!(
                    "Could not open folder automatically: {}",
                    snafu::Report::from_error(err)
                );
            }
        }

        Ok(())
    }

    fn preview(config: &RuntimeConfig, root: &Node) {
        println!("{}", "DRY RUN: structure to be created".bold());
        print!("{}", render(root, config.render_style));

        let base = config
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        let materializer = Materializer::new(base, config.materialize.clone());
        println!(
            "\nTarget path: {}",
            materializer.root_path(root).best_effort_path_display()
        );
        for (path, node) in materializer.plan(root) {
            info!("Would create {}: {}", node.kind, path.display());
        }
    }
}

fn print_report(report: &MaterializeReport) {
    println!(
        "{} directories, {} files created",
        report.directories, report.files
    );
    if report.skipped > 0 {
        println!("{} existing files left untouched", report.skipped);
    }
    if report.failed > 0 {
        println!(
            "{}",
            format!("{} entries could not be created", report.failed).red()
        );
    }
}

fn report_warnings(warnings: &[ParseWarning]) {
    if warnings.is_empty() {
        return;
    }
    for warning in warnings {
        warn!("{}", warning);
    }
    eprintln!(
        "{}",
        format!("{} line(s) of the tree were skipped or adjusted:", warnings.len()).yellow()
    );
    for warning in warnings {
        eprintln!("  {warning}");
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while loading settings"))]
    SettingsError { source: SettingsError },
    #[snafu(display("Root name '{}' would escape the destination folder", name))]
    UnsafeRootName { name: String },
    #[snafu(display("Critical failure encountered while reading the tree"))]
    InputError { source: InputError },
    #[snafu(display("The tree could not be parsed"))]
    StructureError { source: StructureError },
    #[snafu(display("Critical failure encountered while choosing the destination"))]
    DestinationError { source: DestinationError },
    #[snafu(display("Critical failure encountered while creating the structure"))]
    MaterializeError { source: MaterializeError },
}
