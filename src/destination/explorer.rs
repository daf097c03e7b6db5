use std::path::Path;
use std::process::Stdio;

use compio::process::Command;
use snafu::ResultExt;
use tracing::debug;

use super::{DestinationError, SpawnSnafu, UnsuccessfulOpenSnafu, WaitSnafu};

/// Program used to reveal a folder on this platform.
fn explorer_program() -> &'static str {
    #[cfg(target_os = "windows")]
    {
        "explorer"
    }
    #[cfg(target_os = "macos")]
    {
        "open"
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        "xdg-open"
    }
}

pub async fn open_in_file_explorer(path: &Path) -> Result<(), DestinationError> {
    let program = explorer_program();
    debug!("Opening {} with {}", path.display(), program);

    let mut cmd = Command::new(program);
    cmd.arg(path);
    let _ = cmd.stdout(Stdio::null());
    let _ = cmd.stderr(Stdio::null());

    let mut handle = cmd.spawn().context(SpawnSnafu { program })?;
    let status = handle.wait().await.context(WaitSnafu { program })?;

    // explorer.exe reports 1 even when the window opened
    if status.success() || cfg!(target_os = "windows") {
        Ok(())
    } else {
        UnsuccessfulOpenSnafu {
            program,
            status: status.code().unwrap_or(-1),
        }
        .fail()
    }
}
