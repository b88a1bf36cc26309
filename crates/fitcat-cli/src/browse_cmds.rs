//! `fitcat trainings` / `fitcat diets` commands: browse the catalog.

use anyhow::{Context, Result};
use uuid::Uuid;

use fitcat_core::catalog::Catalog;
use fitcat_core::selection::{PlanKind, SelectionState};
use fitcat_db::models::{DietFilter, DietSort, TrainingFilter, TrainingSort};

/// List training plans, marking the ones in the current selection.
pub fn run_trainings_list(
    catalog: &dyn Catalog,
    selection: &SelectionState,
    filter: &TrainingFilter,
    sort: TrainingSort,
) -> Result<()> {
    let trainings = catalog.list_trainings(filter, sort)?;

    if trainings.is_empty() {
        println!("No training plans found.");
        return Ok(());
    }

    println!(
        "  {:<38} {:<28} {:<14} {:>6} {:>6}",
        "ID", "NAME", "DIFFICULTY", "MIN", "KCAL"
    );
    println!("  {}", "-".repeat(96));
    for training in &trainings {
        let marker = if selection.contains(PlanKind::Training, training.id) {
            "*"
        } else {
            " "
        };
        println!(
            "{marker} {:<38} {:<28} {:<14} {:>6} {:>6}",
            training.id,
            truncate(&training.name, 28),
            training.difficulty,
            training.duration,
            training.calories_burned,
        );
    }

    Ok(())
}

/// Show full details for one training plan.
pub fn run_trainings_show(catalog: &dyn Catalog, id_str: &str) -> Result<()> {
    let id = parse_plan_id(id_str)?;
    let training = catalog
        .get_training(id)?
        .with_context(|| format!("training {id} not found"))?;

    println!("Training: {} ({})", training.name, training.id);
    if !training.description.is_empty() {
        println!("  {}", training.description);
    }
    println!("Difficulty: {} / Intensity: {}", training.difficulty, training.intensity);
    println!("Category: {}", training.category);
    println!("Duration: {} min, ~{} kcal", training.duration, training.calories_burned);
    println!("Frequency: {}", training.frequency);
    if !training.exercises.is_empty() {
        println!("Exercises: {}", training.exercises.join(", "));
    }
    if !training.target_muscles.is_empty() {
        println!("Target muscles: {}", training.target_muscles.join(", "));
    }
    if !training.notes.is_empty() {
        println!("Notes: {}", training.notes);
    }
    println!("Created: {}", training.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("Updated: {}", training.updated_at.format("%Y-%m-%d %H:%M:%S UTC"));

    Ok(())
}

/// List diet plans, marking the ones in the current selection.
pub fn run_diets_list(
    catalog: &dyn Catalog,
    selection: &SelectionState,
    filter: &DietFilter,
    sort: DietSort,
) -> Result<()> {
    let diets = catalog.list_diets(filter, sort)?;

    if diets.is_empty() {
        println!("No diet plans found.");
        return Ok(());
    }

    println!(
        "  {:<38} {:<28} {:<14} {:>6} {:>6}",
        "ID", "NAME", "GOAL", "KCAL", "MEALS"
    );
    println!("  {}", "-".repeat(96));
    for diet in &diets {
        let marker = if selection.contains(PlanKind::Diet, diet.id) {
            "*"
        } else {
            " "
        };
        println!(
            "{marker} {:<38} {:<28} {:<14} {:>6} {:>6}",
            diet.id,
            truncate(&diet.name, 28),
            truncate(&diet.goal, 14),
            diet.calorie_target,
            diet.meal_count,
        );
    }

    Ok(())
}

/// Show full details for one diet plan.
pub fn run_diets_show(catalog: &dyn Catalog, id_str: &str) -> Result<()> {
    let id = parse_plan_id(id_str)?;
    let diet = catalog
        .get_diet(id)?
        .with_context(|| format!("diet plan {id} not found"))?;

    println!("Diet plan: {} ({})", diet.name, diet.id);
    if !diet.description.is_empty() {
        println!("  {}", diet.description);
    }
    println!("Goal: {}", diet.goal);
    println!(
        "Calories: {} kcal/day over {} meals",
        diet.calorie_target, diet.meal_count
    );
    println!(
        "Macros: {}g protein / {}g carbs / {}g fats",
        diet.macros.protein, diet.macros.carbs, diet.macros.fats
    );
    if !diet.meals.is_empty() {
        println!("Meals: {}", diet.meals.join(", "));
    }
    if !diet.supplements.is_empty() {
        println!("Supplements: {}", diet.supplements.join(", "));
    }
    if !diet.notes.is_empty() {
        println!("Notes: {}", diet.notes);
    }
    println!("Created: {}", diet.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("Updated: {}", diet.updated_at.format("%Y-%m-%d %H:%M:%S UTC"));

    Ok(())
}

pub fn parse_plan_id(id_str: &str) -> Result<Uuid> {
    Uuid::parse_str(id_str).with_context(|| format!("invalid plan id: {id_str}"))
}

// Counts chars, not bytes; names are free text and may be multi-byte.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}
