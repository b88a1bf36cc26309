//! `fitcat profile` commands: the local user profile.

use std::path::Path;

use anyhow::Result;

use fitcat_core::profile::UserProfile;

/// Show the stored profile.
pub fn run_profile_show(path: &Path) -> Result<()> {
    let profile = UserProfile::load(path)?;

    if profile == UserProfile::default() {
        println!("No profile set. Use `fitcat profile set` to create one.");
        return Ok(());
    }

    println!("Name:  {}", display_or_unset(&profile.name));
    println!("Level: {}", display_or_unset(&profile.level));
    println!("Goal:  {}", display_or_unset(&profile.goal));
    Ok(())
}

/// Update the stored profile. Only the supplied fields change.
pub fn run_profile_set(
    path: &Path,
    name: Option<String>,
    level: Option<String>,
    goal: Option<String>,
) -> Result<()> {
    let mut profile = UserProfile::load(path)?;

    if let Some(name) = name {
        profile.name = name;
    }
    if let Some(level) = level {
        profile.level = level;
    }
    if let Some(goal) = goal {
        profile.goal = goal;
    }

    profile.save(path)?;
    println!("Profile saved to {}", path.display());
    Ok(())
}

fn display_or_unset(value: &str) -> &str {
    if value.is_empty() { "(unset)" } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_merges_only_supplied_fields() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("profile.json");

        run_profile_set(&path, Some("Sam".into()), Some("Beginner".into()), None).unwrap();
        run_profile_set(&path, None, None, Some("Endurance".into())).unwrap();

        let profile = UserProfile::load(&path).unwrap();
        assert_eq!(profile.name, "Sam");
        assert_eq!(profile.level, "Beginner");
        assert_eq!(profile.goal, "Endurance");
    }
}
