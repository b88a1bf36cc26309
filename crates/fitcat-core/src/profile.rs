//! The user profile record (name, level, goal), persisted as JSON.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Client-held profile used to prefill filters and greet the user.
/// No schema version field; a format change is a breaking change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub level: String,
    pub goal: String,
}

impl UserProfile {
    /// Load the profile from `path`, returning the default (all fields
    /// empty) when no profile has been saved yet.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents)
                .with_context(|| format!("corrupt profile file at {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => {
                Err(e).with_context(|| format!("failed to read profile file at {}", path.display()))
            }
        }
    }

    /// Persist the profile, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create data directory {}", dir.display()))?;
        }
        let contents = serde_json::to_string_pretty(self).context("failed to serialize profile")?;
        std::fs::write(path, contents)
            .with_context(|| format!("failed to write profile file at {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let tmp = tempfile::TempDir::new().unwrap();
        let profile = UserProfile::load(&tmp.path().join("profile.json")).unwrap();
        assert_eq!(profile, UserProfile::default());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("profile.json");

        let profile = UserProfile {
            name: "Fitness Enthusiast".to_owned(),
            level: "Beginner".to_owned(),
            goal: "Fat Loss".to_owned(),
        };
        profile.save(&path).unwrap();

        assert_eq!(UserProfile::load(&path).unwrap(), profile);
    }

    #[test]
    fn wire_format_is_camel_case() {
        let parsed: UserProfile =
            serde_json::from_str(r#"{"name":"A","level":"Beginner","goal":"Muscle Gain"}"#).unwrap();
        assert_eq!(parsed.goal, "Muscle Gain");
    }
}
