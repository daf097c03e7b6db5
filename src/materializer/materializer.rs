use std::path::{Path, PathBuf};

use compio::{BufResult, fs};
use snafu::{ResultExt, Snafu};
use tracing::{debug, error, info};

use crate::ext::BestEffortPathExt;
use crate::tree::{Node, NodeKind};

/// Last line of every generated file
pub const DEFAULT_MARKER: &str = "Auto-generated file";

/// Root name that stands for the destination folder itself, as printed by `tree`
const CURRENT_DIR: &str = ".";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializeOptions {
    pub marker: String,
    pub overwrite: bool,
}

impl Default for MaterializeOptions {
    fn default() -> Self {
        MaterializeOptions {
            marker: DEFAULT_MARKER.to_string(),
            overwrite: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterializeReport {
    pub directories: usize,
    pub files: usize,
    /// Existing files left untouched
    pub skipped: usize,
    pub failed: usize,
}

enum Outcome {
    Directory,
    File,
    Skipped,
}

/// Creates the directories and files of a parsed tree below `base`.
pub struct Materializer {
    base: PathBuf,
    options: MaterializeOptions,
}

impl Materializer {
    pub fn new(base: impl Into<PathBuf>, options: MaterializeOptions) -> Self {
        Materializer {
            base: base.into(),
            options,
        }
    }

    /// Where the root node ends up on disk.
    pub fn root_path(&self, root: &Node) -> PathBuf {
        entry_path(&self.base, &root.name)
    }

    /// Every node with its target path, parents before their children.
    pub fn plan<'a>(&self, root: &'a Node) -> impl Iterator<Item = (PathBuf, &'a Node)> + use<'a> {
        let mut pending = vec![(self.base.clone(), root)];
        std::iter::from_fn(move || {
            let (parent, node) = pending.pop()?;
            let path = entry_path(&parent, &node.name);
            pending.extend(
                node.children
                    .iter()
                    .rev()
                    .map(|child| (path.clone(), child)),
            );
            Some((path, node))
        })
    }

    /// Creates the tree on disk. Failures of single entries are logged and
    /// counted; only an unusable destination folder aborts.
    pub async fn apply(&self, root: &Node) -> Result<MaterializeReport, MaterializeError> {
        debug!(
            "Materializing '{}' into {}",
            root.name,
            self.base.best_effort_path_display()
        );
        fs::create_dir_all(&self.base)
            .await
            .context(CreateDirSnafu {
                path: self.base.best_effort_path_display(),
            })?;

        let mut report = MaterializeReport::default();
        for (path, node) in self.plan(root) {
            let outcome = match node.kind {
                NodeKind::Directory => self.create_directory(&path).await,
                NodeKind::File => self.create_file(&path, node).await,
            };
            match outcome {
                Ok(Outcome::Directory) => report.directories += 1,
                Ok(Outcome::File) => report.files += 1,
                Ok(Outcome::Skipped) => report.skipped += 1,
                Err(err) => {
                    error!("{}", snafu::Report::from_error(err));
                    report.failed += 1;
                }
            }
        }

        info!("Materialization finished: {:?}", report);
        Ok(report)
    }

    async fn create_directory(&self, path: &Path) -> Result<Outcome, MaterializeError> {
        debug!("Creating directory {}", path.display());
        fs::create_dir_all(path).await.context(CreateDirSnafu {
            path: path.best_effort_path_display(),
        })?;
        Ok(Outcome::Directory)
    }

    async fn create_file(&self, path: &Path, node: &Node) -> Result<Outcome, MaterializeError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.context(CreateDirSnafu {
                path: parent.best_effort_path_display(),
            })?;
        }

        if !self.options.overwrite && fs::metadata(path).await.is_ok() {
            info!("Keeping existing {}", path.best_effort_path_display());
            return Ok(Outcome::Skipped);
        }

        debug!("Writing file {}", path.display());
        let contents = file_header(node, &self.options.marker);
        let BufResult(result, _) = fs::write(path, contents.into_bytes()).await;
        result.context(WriteFileSnafu {
            path: path.best_effort_path_display(),
        })?;
        Ok(Outcome::File)
    }
}

fn entry_path(parent: &Path, name: &str) -> PathBuf {
    if name == CURRENT_DIR {
        parent.to_path_buf()
    } else {
        parent.join(name)
    }
}

/// Header written into a new file: the comment (if any), the file name and
/// the marker line, each on its own line.
pub fn file_header(node: &Node, marker: &str) -> String {
    let mut header = String::new();
    if let Some(comment) = &node.comment {
        header.push_str(&format!("# {comment}\n"));
    }
    header.push_str(&format!("# {}\n{marker}\n", node.name));
    header
}

#[derive(Debug, Snafu)]
pub enum MaterializeError {
    #[snafu(display("Failed to create directory {}", path))]
    CreateDirError {
        path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to write file {}", path))]
    WriteFileError {
        path: String,
        source: std::io::Error,
    },
}
