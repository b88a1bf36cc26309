//! The user's plan selection and its durable persistence.
//!
//! The selection holds weak references (plan ids only, never embedded
//! copies) into the catalog. It is owned by a single [`SelectionStore`]
//! rather than ambient shared state, and every mutation persists before it
//! counts: if the durable write fails, the in-memory change is rolled back
//! so memory and disk never disagree.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Plan kind
// ---------------------------------------------------------------------------

/// Discriminator between the two plan collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanKind {
    Training,
    Diet,
}

impl fmt::Display for PlanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Training => "training",
            Self::Diet => "diet",
        };
        f.write_str(s)
    }
}

impl FromStr for PlanKind {
    type Err = PlanKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "training" => Ok(Self::Training),
            "diet" => Ok(Self::Diet),
            other => Err(PlanKindParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`PlanKind`] string.
#[derive(Debug, Clone, Error)]
#[error("invalid plan kind: {0:?} (expected training or diet)")]
pub struct PlanKindParseError(pub String);

// ---------------------------------------------------------------------------
// Selection state
// ---------------------------------------------------------------------------

/// The selected plan ids, one list per kind.
///
/// Membership is what matters; insertion order is kept only for display
/// stability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    pub trainings: Vec<Uuid>,
    pub diets: Vec<Uuid>,
}

impl SelectionState {
    pub fn ids(&self, kind: PlanKind) -> &[Uuid] {
        match kind {
            PlanKind::Training => &self.trainings,
            PlanKind::Diet => &self.diets,
        }
    }

    fn ids_mut(&mut self, kind: PlanKind) -> &mut Vec<Uuid> {
        match kind {
            PlanKind::Training => &mut self.trainings,
            PlanKind::Diet => &mut self.diets,
        }
    }

    pub fn contains(&self, kind: PlanKind, id: Uuid) -> bool {
        self.ids(kind).contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.trainings.is_empty() && self.diets.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Durable store
// ---------------------------------------------------------------------------

/// Owns the selection state and the JSON file it persists to.
#[derive(Debug)]
pub struct SelectionStore {
    path: PathBuf,
    state: SelectionState,
}

impl SelectionStore {
    /// Load the selection from `path`, starting empty when the file does
    /// not exist yet. A file that exists but cannot be parsed is an error;
    /// silently resetting would throw away the user's selections.
    pub fn open(path: PathBuf) -> Result<Self> {
        let state = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)
                .with_context(|| format!("corrupt selection file at {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => SelectionState::default(),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("failed to read selection file at {}", path.display())
                });
            }
        };
        Ok(Self { path, state })
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Toggle membership of `id` in the kind's selection set and persist.
    ///
    /// Returns whether the id is selected after the toggle. On a failed
    /// durable write the in-memory state is rolled back and the error
    /// returned, so the mutation never half-happens.
    pub fn toggle(&mut self, kind: PlanKind, id: Uuid) -> Result<bool> {
        let previous = self.state.clone();

        let ids = self.state.ids_mut(kind);
        let now_selected = match ids.iter().position(|existing| *existing == id) {
            Some(index) => {
                ids.remove(index);
                false
            }
            None => {
                ids.push(id);
                true
            }
        };

        if let Err(e) = self.persist() {
            self.state = previous;
            return Err(e);
        }
        Ok(now_selected)
    }

    /// Remove `id` from the kind's selection set and persist. Returns
    /// whether the id was selected. Removing an absent id is a no-op that
    /// still succeeds.
    pub fn remove(&mut self, kind: PlanKind, id: Uuid) -> Result<bool> {
        if !self.state.contains(kind, id) {
            return Ok(false);
        }
        self.toggle(kind, id)?;
        Ok(true)
    }

    fn persist(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create data directory {}", dir.display()))?;
        }
        let contents =
            serde_json::to_string_pretty(&self.state).context("failed to serialize selection")?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("failed to write selection file at {}", self.path.display()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
