//! Database query functions for the `trainings` collection.

use anyhow::{Context, Result};
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::models::{NewTraining, TrainingFilter, TrainingPatch, TrainingPlan, TrainingSort};

/// Insert a validated training plan. Returns the stored document with
/// server-generated id and timestamps.
pub async fn insert_training(pool: &PgPool, new: &NewTraining) -> Result<TrainingPlan> {
    let training = sqlx::query_as::<_, TrainingPlan>(
        "INSERT INTO trainings \
         (name, description, duration, intensity, difficulty, category, \
          exercises, target_muscles, calories_burned, frequency, notes) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
         RETURNING *",
    )
    .bind(&new.name)
    .bind(&new.description)
    .bind(new.duration)
    .bind(&new.intensity)
    .bind(&new.difficulty)
    .bind(&new.category)
    .bind(&new.exercises)
    .bind(&new.target_muscles)
    .bind(new.calories_burned)
    .bind(&new.frequency)
    .bind(&new.notes)
    .fetch_one(pool)
    .await
    .context("failed to insert training plan")?;

    Ok(training)
}

/// Fetch a training plan by its ID.
pub async fn get_training(pool: &PgPool, id: Uuid) -> Result<Option<TrainingPlan>> {
    let training = sqlx::query_as::<_, TrainingPlan>("SELECT * FROM trainings WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch training plan")?;

    Ok(training)
}

/// List training plans matching every given filter, in the requested order.
///
/// Absent filter fields impose no constraint; an empty result is not an
/// error.
pub async fn list_trainings(
    pool: &PgPool,
    filter: &TrainingFilter,
    sort: TrainingSort,
) -> Result<Vec<TrainingPlan>> {
    let mut qb = QueryBuilder::new("SELECT * FROM trainings");

    let mut sep = " WHERE ";
    if let Some(category) = &filter.category {
        qb.push(sep).push("category = ").push_bind(category);
        sep = " AND ";
    }
    if let Some(difficulty) = &filter.difficulty {
        qb.push(sep).push("difficulty = ").push_bind(difficulty);
        sep = " AND ";
    }
    if let Some(intensity) = &filter.intensity {
        qb.push(sep).push("intensity = ").push_bind(intensity);
    }

    qb.push(" ORDER BY ").push(sort.order_clause());

    let trainings = qb
        .build_query_as::<TrainingPlan>()
        .fetch_all(pool)
        .await
        .context("failed to list training plans")?;

    Ok(trainings)
}

/// Fetch the subset of training plans that exist for the given ids, in
/// store-native order (newest first). Missing ids are silently omitted.
pub async fn list_trainings_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<TrainingPlan>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let trainings = sqlx::query_as::<_, TrainingPlan>(
        "SELECT * FROM trainings WHERE id = ANY($1) ORDER BY created_at DESC",
    )
    .bind(ids)
    .fetch_all(pool)
    .await
    .context("failed to fetch training plans by ids")?;

    Ok(trainings)
}

/// Apply a partial update to a training plan.
///
/// Merges only the fields the patch supplies (after normalization) and
/// always re-stamps `updated_at`. Returns the updated document, or `None`
/// if no plan with this id exists.
pub async fn update_training(
    pool: &PgPool,
    id: Uuid,
    patch: &TrainingPatch,
) -> Result<Option<TrainingPlan>> {
    let patch = patch.normalized();

    let mut qb = QueryBuilder::new("UPDATE trainings SET updated_at = now()");
    if let Some(name) = &patch.name {
        qb.push(", name = ").push_bind(name);
    }
    if let Some(duration) = patch.duration {
        qb.push(", duration = ").push_bind(duration);
    }
    if let Some(intensity) = &patch.intensity {
        qb.push(", intensity = ").push_bind(intensity);
    }
    if let Some(exercises) = &patch.exercises {
        qb.push(", exercises = ").push_bind(exercises);
    }
    if let Some(target_muscles) = &patch.target_muscles {
        qb.push(", target_muscles = ").push_bind(target_muscles);
    }
    if let Some(notes) = &patch.notes {
        qb.push(", notes = ").push_bind(notes);
    }
    qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

    let training = qb
        .build_query_as::<TrainingPlan>()
        .fetch_optional(pool)
        .await
        .context("failed to update training plan")?;

    Ok(training)
}

/// Delete a training plan. Returns `false` if no plan with this id existed.
pub async fn delete_training(pool: &PgPool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM trainings WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .context("failed to delete training plan")?;

    Ok(result.rows_affected() > 0)
}
