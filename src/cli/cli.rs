use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;

/// Turn an ASCII tree diagram into real folders and files
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// File holding the ASCII tree; paste it interactively when omitted
    pub input_file: Option<PathBuf>,

    /// Use the built-in sample tree
    #[clap(long, conflicts_with = "input_file")]
    pub sample: bool,

    /// Preview the structure without touching the filesystem
    #[clap(long)]
    pub dry_run: bool,

    /// Print the preview as plain text that can be parsed again
    #[clap(long)]
    pub plain: bool,

    /// Folder in which the root directory is created
    #[clap(long, short)]
    pub output: Option<PathBuf>,

    /// Override the name of the root folder
    #[clap(long)]
    pub root_name: Option<String>,

    /// Replace files that already exist
    #[clap(long)]
    pub overwrite: bool,

    /// Open the created folder in the file explorer
    #[clap(long)]
    pub open: bool,

    /// Settings file, defaults to ./treeforge.yaml when present
    #[clap(long, short)]
    pub config: Option<PathBuf>,

    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,
}
