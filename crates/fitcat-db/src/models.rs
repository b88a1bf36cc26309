use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error returned when a create payload is missing required fields.
///
/// A required field counts as missing when it is absent or blank, so an
/// empty name is rejected the same way as no name at all.
#[derive(Debug, Clone, Error)]
#[error("Missing required fields: {}", .missing.join(", "))]
pub struct ValidationError {
    pub missing: Vec<&'static str>,
}

// ---------------------------------------------------------------------------
// Sort orders
// ---------------------------------------------------------------------------

/// Sort order for training plan listings.
///
/// Unrecognized sort parameters fall back to the default (newest first),
/// mirroring the behaviour of absent parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrainingSort {
    /// Shortest sessions first.
    Duration,
    /// Highest estimated burn first.
    Calories,
    /// Newest plans first.
    #[default]
    Newest,
}

impl TrainingSort {
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("duration") => Self::Duration,
            Some("calories") => Self::Calories,
            _ => Self::Newest,
        }
    }

    /// Query-string value, `None` for the default order.
    pub fn as_param(self) -> Option<&'static str> {
        match self {
            Self::Duration => Some("duration"),
            Self::Calories => Some("calories"),
            Self::Newest => None,
        }
    }

    pub(crate) fn order_clause(self) -> &'static str {
        match self {
            Self::Duration => "duration ASC",
            Self::Calories => "calories_burned DESC",
            Self::Newest => "created_at DESC",
        }
    }
}

/// Sort order for diet plan listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DietSort {
    /// Lowest calorie target first.
    Calories,
    /// Newest plans first.
    #[default]
    Newest,
}

impl DietSort {
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("calories") => Self::Calories,
            _ => Self::Newest,
        }
    }

    pub fn as_param(self) -> Option<&'static str> {
        match self {
            Self::Calories => Some("calories"),
            Self::Newest => None,
        }
    }

    pub(crate) fn order_clause(self) -> &'static str {
        match self {
            Self::Calories => "calorie_target ASC",
            Self::Newest => "created_at DESC",
        }
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Equality filters for training plan listings. Absent fields impose no
/// constraint; present fields are combined with AND semantics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingFilter {
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub intensity: Option<String>,
}

/// Equality filter for diet plan listings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DietFilter {
    pub goal: Option<String>,
}

// ---------------------------------------------------------------------------
// Row structs
// ---------------------------------------------------------------------------

/// Macro nutrient breakdown for a diet plan, in grams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Macros {
    pub protein: i32,
    pub carbs: i32,
    pub fats: i32,
}

/// A training plan document.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TrainingPlan {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub duration: i32,
    pub intensity: String,
    pub difficulty: String,
    pub category: String,
    pub exercises: Vec<String>,
    pub target_muscles: Vec<String>,
    pub calories_burned: i32,
    pub frequency: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A diet plan document.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DietPlan {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub goal: String,
    pub calorie_target: i32,
    #[sqlx(json)]
    pub macros: Macros,
    pub meals: Vec<String>,
    pub meal_count: i32,
    pub supplements: Vec<String>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Create drafts
// ---------------------------------------------------------------------------

/// Incoming fields for creating a training plan, before validation.
///
/// [`TrainingDraft::validate`] is the single defaulting/required-field step
/// shared by every write path.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrainingDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration: Option<i32>,
    pub intensity: Option<String>,
    pub difficulty: Option<String>,
    pub category: Option<String>,
    pub exercises: Option<Vec<String>>,
    pub target_muscles: Option<Vec<String>>,
    pub calories_burned: Option<i32>,
    pub frequency: Option<String>,
    pub notes: Option<String>,
}

/// A fully validated and defaulted training plan, ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTraining {
    pub name: String,
    pub description: String,
    pub duration: i32,
    pub intensity: String,
    pub difficulty: String,
    pub category: String,
    pub exercises: Vec<String>,
    pub target_muscles: Vec<String>,
    pub calories_burned: i32,
    pub frequency: String,
    pub notes: String,
}

impl TrainingDraft {
    /// Check required fields (name, duration, intensity) and apply defaults
    /// for everything optional.
    pub fn validate(self) -> Result<NewTraining, ValidationError> {
        let mut missing = Vec::new();

        let name = non_blank(self.name);
        if name.is_none() {
            missing.push("name");
        }
        if self.duration.is_none() {
            missing.push("duration");
        }
        let intensity = non_blank(self.intensity);
        if intensity.is_none() {
            missing.push("intensity");
        }

        if !missing.is_empty() {
            return Err(ValidationError { missing });
        }

        Ok(NewTraining {
            name: name.unwrap(),
            description: self.description.unwrap_or_default(),
            duration: self.duration.unwrap(),
            intensity: intensity.unwrap(),
            difficulty: non_blank(self.difficulty).unwrap_or_else(|| "Beginner".to_owned()),
            category: non_blank(self.category).unwrap_or_else(|| "Full Body".to_owned()),
            exercises: self.exercises.unwrap_or_default(),
            target_muscles: self.target_muscles.unwrap_or_default(),
            calories_burned: self.calories_burned.filter(|c| *c != 0).unwrap_or(150),
            frequency: non_blank(self.frequency).unwrap_or_else(|| "1x per week".to_owned()),
            notes: self.notes.unwrap_or_default(),
        })
    }
}

/// Incoming fields for creating a diet plan, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DietDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub goal: Option<String>,
    pub calorie_target: Option<i32>,
    pub macros: Option<Macros>,
    pub meals: Option<Vec<String>>,
    pub meal_count: Option<i32>,
    pub supplements: Option<Vec<String>>,
    pub notes: Option<String>,
}

/// A fully validated and defaulted diet plan, ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDiet {
    pub name: String,
    pub description: String,
    pub goal: String,
    pub calorie_target: i32,
    pub macros: Macros,
    pub meals: Vec<String>,
    pub meal_count: i32,
    pub supplements: Vec<String>,
    pub notes: String,
}

impl DietDraft {
    /// Check required fields (name, calorieTarget, goal) and apply defaults.
    ///
    /// `mealCount` defaults to the number of meals when omitted or zero.
    pub fn validate(self) -> Result<NewDiet, ValidationError> {
        let mut missing = Vec::new();

        let name = non_blank(self.name);
        if name.is_none() {
            missing.push("name");
        }
        if self.calorie_target.is_none() {
            missing.push("calorieTarget");
        }
        let goal = non_blank(self.goal);
        if goal.is_none() {
            missing.push("goal");
        }

        if !missing.is_empty() {
            return Err(ValidationError { missing });
        }

        let meals = self.meals.unwrap_or_default();
        let meal_count = self
            .meal_count
            .filter(|n| *n != 0)
            .unwrap_or(meals.len() as i32);

        Ok(NewDiet {
            name: name.unwrap(),
            description: self.description.unwrap_or_default(),
            goal: goal.unwrap(),
            calorie_target: self.calorie_target.unwrap(),
            macros: self.macros.unwrap_or_default(),
            meals,
            meal_count,
            supplements: self.supplements.unwrap_or_default(),
            notes: self.notes.unwrap_or_default(),
        })
    }
}

// ---------------------------------------------------------------------------
// Update patches
// ---------------------------------------------------------------------------

/// Partial update for a training plan. Only the whitelisted fields below can
/// change after creation.
///
/// Merge semantics: a field present with a blank string or zero number is
/// treated as not supplied. List fields are applied whenever present, empty
/// or not. This means a blank value can never clear a field through an
/// update -- a known limitation of the contract, kept deliberately.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrainingPatch {
    pub name: Option<String>,
    pub duration: Option<i32>,
    pub intensity: Option<String>,
    pub exercises: Option<Vec<String>>,
    pub target_muscles: Option<Vec<String>>,
    pub notes: Option<String>,
}

impl TrainingPatch {
    /// Drop fields that the merge policy treats as not supplied.
    pub fn normalized(&self) -> Self {
        Self {
            name: non_blank(self.name.clone()),
            duration: self.duration.filter(|d| *d != 0),
            intensity: non_blank(self.intensity.clone()),
            exercises: self.exercises.clone(),
            target_muscles: self.target_muscles.clone(),
            notes: non_blank(self.notes.clone()),
        }
    }
}

/// Partial update for a diet plan. Same merge semantics as
/// [`TrainingPatch`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DietPatch {
    pub name: Option<String>,
    pub calorie_target: Option<i32>,
    pub macros: Option<Macros>,
    pub meals: Option<Vec<String>>,
    pub notes: Option<String>,
}

impl DietPatch {
    pub fn normalized(&self) -> Self {
        Self {
            name: non_blank(self.name.clone()),
            calorie_target: self.calorie_target.filter(|c| *c != 0),
            macros: self.macros,
            meals: self.meals.clone(),
            notes: non_blank(self.notes.clone()),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
