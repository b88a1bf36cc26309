//! Database query functions for the `diets` collection.

use anyhow::{Context, Result};
use sqlx::types::Json;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::models::{DietFilter, DietPatch, DietPlan, DietSort, NewDiet};

/// Insert a validated diet plan. Returns the stored document with
/// server-generated id and timestamps.
pub async fn insert_diet(pool: &PgPool, new: &NewDiet) -> Result<DietPlan> {
    let diet = sqlx::query_as::<_, DietPlan>(
        "INSERT INTO diets \
         (name, description, goal, calorie_target, macros, meals, meal_count, supplements, notes) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         RETURNING *",
    )
    .bind(&new.name)
    .bind(&new.description)
    .bind(&new.goal)
    .bind(new.calorie_target)
    .bind(Json(&new.macros))
    .bind(&new.meals)
    .bind(new.meal_count)
    .bind(&new.supplements)
    .bind(&new.notes)
    .fetch_one(pool)
    .await
    .context("failed to insert diet plan")?;

    Ok(diet)
}

/// Fetch a diet plan by its ID.
pub async fn get_diet(pool: &PgPool, id: Uuid) -> Result<Option<DietPlan>> {
    let diet = sqlx::query_as::<_, DietPlan>("SELECT * FROM diets WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch diet plan")?;

    Ok(diet)
}

/// List diet plans matching the filter, in the requested order.
pub async fn list_diets(pool: &PgPool, filter: &DietFilter, sort: DietSort) -> Result<Vec<DietPlan>> {
    let mut qb = QueryBuilder::new("SELECT * FROM diets");

    if let Some(goal) = &filter.goal {
        qb.push(" WHERE goal = ").push_bind(goal);
    }

    qb.push(" ORDER BY ").push(sort.order_clause());

    let diets = qb
        .build_query_as::<DietPlan>()
        .fetch_all(pool)
        .await
        .context("failed to list diet plans")?;

    Ok(diets)
}

/// Fetch the subset of diet plans that exist for the given ids, in
/// store-native order (newest first). Missing ids are silently omitted.
pub async fn list_diets_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<DietPlan>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let diets = sqlx::query_as::<_, DietPlan>(
        "SELECT * FROM diets WHERE id = ANY($1) ORDER BY created_at DESC",
    )
    .bind(ids)
    .fetch_all(pool)
    .await
    .context("failed to fetch diet plans by ids")?;

    Ok(diets)
}

/// Apply a partial update to a diet plan. Same merge semantics as
/// [`crate::queries::trainings::update_training`].
pub async fn update_diet(pool: &PgPool, id: Uuid, patch: &DietPatch) -> Result<Option<DietPlan>> {
    let patch = patch.normalized();

    let mut qb = QueryBuilder::new("UPDATE diets SET updated_at = now()");
    if let Some(name) = &patch.name {
        qb.push(", name = ").push_bind(name);
    }
    if let Some(calorie_target) = patch.calorie_target {
        qb.push(", calorie_target = ").push_bind(calorie_target);
    }
    if let Some(macros) = &patch.macros {
        qb.push(", macros = ").push_bind(Json(*macros));
    }
    if let Some(meals) = &patch.meals {
        qb.push(", meals = ").push_bind(meals);
    }
    if let Some(notes) = &patch.notes {
        qb.push(", notes = ").push_bind(notes);
    }
    qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

    let diet = qb
        .build_query_as::<DietPlan>()
        .fetch_optional(pool)
        .await
        .context("failed to update diet plan")?;

    Ok(diet)
}

/// Delete a diet plan. Returns `false` if no plan with this id existed.
pub async fn delete_diet(pool: &PgPool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM diets WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .context("failed to delete diet plan")?;

    Ok(result.rows_affected() > 0)
}
