//! Choosing the destination folder and showing the result in a file explorer.

mod explorer;
mod picker;
mod prompt;

pub use explorer::open_in_file_explorer;
pub use prompt::resolve_destination;

use snafu::Snafu;

#[derive(Debug, Snafu)]
pub enum DestinationError {
    #[snafu(display("Failed to ask for the destination folder"))]
    PromptError { source: std::io::Error },
    #[snafu(display("Failed to read the destination folder"))]
    AnswerError { source: std::io::Error },
    #[snafu(display("Failed to start '{}' to open the folder", program))]
    SpawnError {
        program: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to wait for '{}'", program))]
    WaitError {
        program: String,
        source: std::io::Error,
    },
    #[snafu(display("'{}' exited with code {}", program, status))]
    UnsuccessfulOpen { program: String, status: i32 },
}

