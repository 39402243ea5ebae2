use anyhow::{Result, bail};
use std::process;
use tabled::{Table, Tabled, settings::Style};

use larder_core::models::{Day, MealSlot, PlannedMeal};
use larder_core::service::Planner;

use super::helpers::{parse_day, report_missing, truncate};

const EMPTY_SLOT: &str = "No meal planned";

pub(crate) fn cmd_plan_set(
    planner: &Planner,
    day: &str,
    slot: &str,
    recipe_id: i64,
    json: bool,
) -> Result<()> {
    let day = parse_day(day)?;
    let slot = slot.parse::<MealSlot>()?;

    let Some(recipe) = planner.recipe(recipe_id) else {
        report_missing(&format!("Recipe {recipe_id} not found"), json);
        process::exit(2);
    };

    if !planner.set_meal(day, slot, recipe_id) {
        bail!("Failed to add {} to {day} {slot}", recipe.name);
    }

    if json {
        let placed = PlannedMeal {
            day,
            meal_slot: slot,
            recipe_name: recipe.name,
            recipe_id,
        };
        println!("{}", serde_json::to_string_pretty(&placed)?);
    } else {
        println!("Added {} to {day} {slot}", recipe.name);
    }
    Ok(())
}

pub(crate) fn cmd_plan_show(planner: &Planner, all_days: bool, json: bool) -> Result<()> {
    let plan = planner.meal_plan();

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }
    if plan.is_empty() && !all_days {
        eprintln!("No meal plan found! Start planning with `larder plan set`.");
        return Ok(());
    }

    let table = Table::new(week_rows(&plan, all_days))
        .with(Style::rounded())
        .to_string();
    println!("{table}");
    Ok(())
}

pub(crate) fn cmd_plan_remove(planner: &Planner, day: &str, slot: &str, json: bool) -> Result<()> {
    let day = parse_day(day)?;
    let slot = slot.parse::<MealSlot>()?;

    if !planner.remove_meal(day, slot) {
        bail!("Failed to remove meal from {day} {slot}");
    }

    if json {
        println!(
            "{}",
            serde_json::json!({ "removed": { "day": day, "meal_slot": slot } })
        );
    } else {
        println!("Cleared {day} {slot}");
    }
    Ok(())
}

#[derive(Tabled)]
pub(crate) struct DayRow {
    #[tabled(rename = "Day")]
    day: String,
    #[tabled(rename = "Breakfast")]
    breakfast: String,
    #[tabled(rename = "Lunch")]
    lunch: String,
    #[tabled(rename = "Dinner")]
    dinner: String,
}

/// One row per day that has something planned (or every day with `all_days`).
pub(crate) fn week_rows(plan: &[PlannedMeal], all_days: bool) -> Vec<DayRow> {
    Day::ALL
        .iter()
        .filter(|day| all_days || plan.iter().any(|m| m.day == **day))
        .map(|day| {
            let cell = |slot: MealSlot| {
                plan.iter()
                    .find(|m| m.day == *day && m.meal_slot == slot)
                    .map_or_else(
                        || EMPTY_SLOT.to_string(),
                        |m| format!("{} (#{})", truncate(&m.recipe_name, 24), m.recipe_id),
                    )
            };
            DayRow {
                day: day.to_string(),
                breakfast: cell(MealSlot::Breakfast),
                lunch: cell(MealSlot::Lunch),
                dinner: cell(MealSlot::Dinner),
            }
        })
        .collect()
}
