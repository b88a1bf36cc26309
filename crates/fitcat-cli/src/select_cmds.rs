//! `fitcat select` / `fitcat my-plans` commands: the plan selection.

use anyhow::{Context, Result};

use fitcat_core::catalog::{Catalog, fetch_my_plans};
use fitcat_core::selection::{PlanKind, SelectionStore};

use crate::browse_cmds::parse_plan_id;

/// Toggle a plan in or out of the selection.
///
/// The id is checked against the catalog first so a typo cannot add a
/// dangling reference.
pub fn run_select(
    catalog: &dyn Catalog,
    store: &mut SelectionStore,
    kind: PlanKind,
    id_str: &str,
) -> Result<()> {
    let id = parse_plan_id(id_str)?;

    let name = match kind {
        PlanKind::Training => catalog
            .get_training(id)?
            .map(|t| t.name)
            .with_context(|| format!("training {id} not found in the catalog"))?,
        PlanKind::Diet => catalog
            .get_diet(id)?
            .map(|d| d.name)
            .with_context(|| format!("diet plan {id} not found in the catalog"))?,
    };

    let now_selected = store.toggle(kind, id)?;
    if now_selected {
        println!("Added {kind} plan \"{name}\" to your plans.");
    } else {
        println!("Removed {kind} plan \"{name}\" from your plans.");
    }

    Ok(())
}

/// Remove a plan from the selection without consulting the catalog, so
/// dangling ids can be dropped after their plan was deleted server-side.
pub fn run_unselect(store: &mut SelectionStore, kind: PlanKind, id_str: &str) -> Result<()> {
    let id = parse_plan_id(id_str)?;
    if store.remove(kind, id)? {
        println!("Removed {kind} plan {id} from your plans.");
    } else {
        println!("{kind} plan {id} was not selected.");
    }
    Ok(())
}

/// Show the selected plans, resolved against the catalog.
///
/// Plans deleted server-side since they were selected are reported but not
/// pruned; `fitcat unselect` drops them explicitly.
pub fn run_my_plans(catalog: &dyn Catalog, store: &SelectionStore) -> Result<()> {
    let selection = store.state();
    if selection.is_empty() {
        println!("No plans selected. Use `fitcat select` to add some.");
        return Ok(());
    }

    let plans = fetch_my_plans(catalog, selection)?;

    println!("My training plans:");
    if plans.trainings.is_empty() {
        println!("  (none)");
    }
    for training in &plans.trainings {
        println!(
            "  {} {} ({} min, {})",
            training.id, training.name, training.duration, training.difficulty
        );
    }

    println!();
    println!("My diet plans:");
    if plans.diets.is_empty() {
        println!("  (none)");
    }
    for diet in &plans.diets {
        println!(
            "  {} {} ({} kcal, {})",
            diet.id, diet.name, diet.calorie_target, diet.goal
        );
    }

    let missing = (selection.trainings.len() - plans.trainings.len())
        + (selection.diets.len() - plans.diets.len());
    if missing > 0 {
        println!();
        println!(
            "Note: {missing} selected plan(s) no longer exist in the catalog. \
             Use `fitcat unselect` to drop them."
        );
    }

    Ok(())
}
