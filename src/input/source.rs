use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use compio::fs;
use snafu::{ResultExt, Snafu};
use tracing::debug;

use crate::ext::BestEffortPathExt;

pub const SAMPLE_TREE: &str = "\
my-project
├── README.md # Project overview
├── src
│   ├── main.py # Entry point
│   └── utils.py # Helper functions
└── tests
    └── test_main.py # Unit tests
";

/// Where the ASCII tree comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Sample,
    File(PathBuf),
    Stdin,
}

impl InputSource {
    pub async fn read(&self) -> Result<String, InputError> {
        match self {
            InputSource::Sample => {
                debug!("Using the built-in sample tree");
                Ok(SAMPLE_TREE.to_string())
            }
            InputSource::File(path) => read_tree_file(path).await,
            InputSource::Stdin => {
                eprintln!(
                    "Paste your folder tree below. Press ENTER on an empty line to finish:"
                );
                read_pasted_tree(io::stdin().lock()).context(StdinSnafu)
            }
        }
    }
}

async fn read_tree_file(path: &Path) -> Result<String, InputError> {
    debug!("Reading tree from {}", path.best_effort_path_display());
    let bytes = fs::read(path).await.context(ReadSnafu {
        file_path: path.best_effort_path_display(),
    })?;
    String::from_utf8(bytes).context(EncodingSnafu {
        file_path: path.best_effort_path_display(),
    })
}

/// Collects pasted lines until an empty line follows some content, or EOF.
/// Blank lines before the first entry are ignored.
pub fn read_pasted_tree(reader: impl BufRead) -> io::Result<String> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            if lines.is_empty() {
                continue;
            }
            break;
        }
        lines.push(line);
    }
    debug!("Read {} pasted lines", lines.len());
    Ok(lines.join("\n"))
}

#[derive(Debug, Snafu)]
pub enum InputError {
    #[snafu(display("Failed to read the tree file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("The tree file is not valid UTF-8: {}", file_path))]
    EncodingError {
        file_path: String,
        source: std::string::FromUtf8Error,
    },
    #[snafu(display("Failed to read the tree from standard input"))]
    StdinError { source: std::io::Error },
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use rstest::rstest;
    use tempfile::NamedTempFile;

    use super::*;

    #[rstest]
    #[case("a\nb\n\nc\n", "a\nb")]
    #[case("\n\n  \na\n", "a")]
    #[case("a\n├── b\n", "a\n├── b")]
    #[case("", "")]
    fn pasted_tree_stops_at_first_blank_after_content(
        #[case] typed: &str,
        #[case] expected: &str,
    ) {
        let result = read_pasted_tree(Cursor::new(typed)).unwrap();
        assert_eq!(result, expected);
    }

    #[compio::test]
    async fn sample_is_returned_verbatim() {
        let text = InputSource::Sample.read().await.unwrap();
        assert_eq!(text, SAMPLE_TREE);
    }

    #[compio::test]
    async fn file_input_is_read() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        write!(file, "root\n└── a.txt\n").expect("Failed to write to temp file");

        let text = InputSource::File(file.path().to_path_buf())
            .read()
            .await
            .unwrap();
        assert_eq!(text, "root\n└── a.txt\n");
    }

    #[compio::test]
    async fn missing_file_is_a_read_error() {
        let result = InputSource::File(PathBuf::from("nonexistent-tree.txt"))
            .read()
            .await;
        assert!(matches!(result, Err(InputError::ReadError { .. })));
    }

    #[compio::test]
    async fn invalid_utf8_is_reported() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(&[0xff, 0xfe, 0x00]).unwrap();

        let result = InputSource::File(file.path().to_path_buf()).read().await;
        assert!(matches!(result, Err(InputError::EncodingError { .. })));
    }
}
