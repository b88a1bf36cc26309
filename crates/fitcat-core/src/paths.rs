//! Locations for client-side durable state.

use std::path::PathBuf;

/// Return the fitcat data directory.
///
/// Always uses XDG layout: `$XDG_DATA_HOME/fitcat` or `~/.local/share/fitcat`.
/// We intentionally ignore the platform-specific `dirs::data_dir()`
/// (which returns `~/Library/Application Support` on macOS).
pub fn data_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(xdg).join("fitcat");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".local")
        .join("share")
        .join("fitcat")
}

/// Path of the persisted plan selection.
pub fn selection_path() -> PathBuf {
    data_dir().join("selected_plans.json")
}

/// Path of the persisted user profile.
pub fn profile_path() -> PathBuf {
    data_dir().join("profile.json")
}
