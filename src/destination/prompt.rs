use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use snafu::ResultExt;
use tracing::debug;

use super::picker::pick_folder;
use super::{AnswerSnafu, DestinationError, PromptSnafu};
use crate::ext::expand_home;

const PROMPT: &str = "Type full path of destination folder (or leave blank to cancel): ";

/// Picks the folder the tree is created in.
///
/// A configured folder wins. Without one, an interactive run opens a folder
/// dialog, or asks on the terminal when no dialog can be shown; `None` means
/// the user cancelled. Non-interactive runs use the current directory.
pub fn resolve_destination(configured: Option<PathBuf>) -> Result<Option<PathBuf>, DestinationError> {
    if let Some(path) = configured {
        return Ok(Some(expand_home(&path)));
    }

    let stdin = io::stdin();
    if !stdin.is_terminal() {
        debug!("No destination configured and stdin is not a terminal, using current directory");
        return Ok(Some(PathBuf::from(".")));
    }
    if let Some(choice) = pick_folder() {
        return Ok(choice);
    }
    prompt_for_destination(stdin.lock(), io::stderr())
}

pub fn prompt_for_destination(
    mut input: impl BufRead,
    mut output: impl Write,
) -> Result<Option<PathBuf>, DestinationError> {
    write!(output, "{PROMPT}").context(PromptSnafu)?;
    output.flush().context(PromptSnafu)?;

    let mut answer = String::new();
    input.read_line(&mut answer).context(AnswerSnafu)?;
    let answer = answer.trim();
    if answer.is_empty() {
        return Ok(None);
    }
    Ok(Some(expand_home(&PathBuf::from(answer))))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("/srv/projects\n", Some("/srv/projects"))]
    #[case("  relative/dir  \n", Some("relative/dir"))]
    #[case("\n", None)]
    #[case("", None)]
    fn prompt_answers(#[case] typed: &str, #[case] expected: Option<&str>) {
        let mut shown = Vec::new();
        let result = prompt_for_destination(Cursor::new(typed), &mut shown).unwrap();
        assert_eq!(result, expected.map(PathBuf::from));
        assert_eq!(String::from_utf8(shown).unwrap(), PROMPT);
    }

    #[test]
    fn configured_destination_skips_the_prompt() {
        let result = resolve_destination(Some(PathBuf::from("/tmp/out"))).unwrap();
        assert_eq!(result, Some(PathBuf::from("/tmp/out")));
    }
}
