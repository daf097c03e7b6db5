use std::ffi::OsString;
use std::path::PathBuf;

#[cfg(feature = "folder-picker")]
use tracing::debug;

const DISPLAY_VARIABLES: [&str; 2] = ["DISPLAY", "WAYLAND_DISPLAY"];

/// Asks for the destination with a native folder dialog.
///
/// `None` when no dialog can be shown, `Some(None)` when the user closed it
/// without choosing.
#[cfg(feature = "folder-picker")]
pub fn pick_folder() -> Option<Option<PathBuf>> {
    if !has_display(|name| std::env::var_os(name)) {
        debug!("No graphical session, skipping the folder dialog");
        return None;
    }
    debug!("Opening the folder dialog");
    Some(
        rfd::FileDialog::new()
            .set_title("Select destination folder")
            .pick_folder(),
    )
}

#[cfg(not(feature = "folder-picker"))]
pub fn pick_folder() -> Option<Option<PathBuf>> {
    None
}

/// Whether a folder dialog has somewhere to appear. Windows and macOS always
/// have a desktop; elsewhere an X11 or Wayland display must be set.
#[cfg_attr(not(feature = "folder-picker"), allow(dead_code))]
fn has_display(var: impl Fn(&str) -> Option<OsString>) -> bool {
    if cfg!(any(target_os = "windows", target_os = "macos")) {
        return true;
    }
    DISPLAY_VARIABLES
        .iter()
        .any(|name| var(name).is_some_and(|value| !value.is_empty()))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    #[rstest]
    #[case(None, None, false)]
    #[case(Some(":0"), None, true)]
    #[case(None, Some("wayland-0"), true)]
    #[case(Some(""), None, false)]
    fn display_detection(
        #[case] x11: Option<&str>,
        #[case] wayland: Option<&str>,
        #[case] expected: bool,
    ) {
        let lookup = |name: &str| {
            match name {
                "DISPLAY" => x11,
                "WAYLAND_DISPLAY" => wayland,
                _ => None,
            }
            .map(OsString::from)
        };
        assert_eq!(has_display(lookup), expected);
    }
}
