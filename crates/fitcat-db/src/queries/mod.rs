//! Query functions for the plan collections.

pub mod diets;
pub mod trainings;
