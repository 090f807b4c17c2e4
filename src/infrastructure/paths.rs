//! Path resolution for the data directory and user-supplied paths.
//!
//! Resolution only reads environment variables; nothing here touches the
//! filesystem.

use std::path::PathBuf;

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "MEALCAST_DATA_DIR";

/// Returns the user's home directory from `$HOME`, falling back to `.`.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME").map_or_else(|| PathBuf::from("."), PathBuf::from)
}

/// Returns the data directory for Mealcast files.
///
/// Uses `$MEALCAST_DATA_DIR` when set, otherwise
/// `$HOME/.local/share/mealcast`.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    match std::env::var_os(DATA_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => home_dir().join(".local").join("share").join("mealcast"),
    }
}

/// Expands a leading `~` to the home directory.
///
/// # Examples
///
/// ```
/// use mealcast::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/absolute/path"), std::path::PathBuf::from("/absolute/path"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        home_dir()
    } else if let Some(rest) = path.strip_prefix("~/") {
        home_dir().join(rest)
    } else {
        PathBuf::from(path)
    }
}
