use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{Category, MealSlot, PlannedMeal, Recipe};

pub const UNSPECIFIED_CUISINE: &str = "Not Specified";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share {
    pub label: String,
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PlanStats {
    pub recipe_count: usize,
    pub planned_meals: usize,
    pub by_category: Vec<Share>,
    pub by_cuisine: Vec<Share>,
    pub by_meal_slot: Vec<Share>,
}

#[must_use]
pub fn plan_stats(recipes: &[Recipe], plan: &[PlannedMeal]) -> PlanStats {
    PlanStats {
        recipe_count: recipes.len(),
        planned_meals: plan.len(),
        by_category: category_distribution(recipes),
        by_cuisine: cuisine_distribution(recipes),
        by_meal_slot: meal_slot_distribution(plan),
    }
}

/// Recipe counts per category, in category order, skipping empty ones.
#[must_use]
pub fn category_distribution(recipes: &[Recipe]) -> Vec<Share> {
    let total = recipes.len();
    Category::ALL
        .iter()
        .map(|c| (c.as_str(), recipes.iter().filter(|r| r.category == *c).count()))
        .filter(|(_, count)| *count > 0)
        .map(|(label, count)| share(label, count, total))
        .collect()
}

/// Recipe counts per cuisine, most common first. Missing cuisine is grouped
/// under "Not Specified".
#[must_use]
pub fn cuisine_distribution(recipes: &[Recipe]) -> Vec<Share> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for recipe in recipes {
        let cuisine = recipe
            .cuisine
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(UNSPECIFIED_CUISINE);
        *counts.entry(cuisine).or_default() += 1;
    }

    let total = recipes.len();
    let mut shares: Vec<Share> = counts
        .into_iter()
        .map(|(label, count)| share(label, count, total))
        .collect();
    // Stable sort keeps the alphabetical order among equal counts.
    shares.sort_by(|a, b| b.count.cmp(&a.count));
    shares
}

/// Planned meals per slot, Breakfast..Dinner, skipping empty slots.
#[must_use]
pub fn meal_slot_distribution(plan: &[PlannedMeal]) -> Vec<Share> {
    let total = plan.len();
    MealSlot::ALL
        .iter()
        .map(|s| (s.as_str(), plan.iter().filter(|m| m.meal_slot == *s).count()))
        .filter(|(_, count)| *count > 0)
        .map(|(label, count)| share(label, count, total))
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn share(label: &str, count: usize, total: usize) -> Share {
    let percent = if total == 0 {
        0.0
    } else {
        count as f64 * 100.0 / total as f64
    };
    Share {
        label: label.to_string(),
        count,
        percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Day;

    fn recipe(id: i64, category: Category, cuisine: Option<&str>) -> Recipe {
        Recipe {
            id,
            name: format!("Recipe {id}"),
            ingredients: "Salt".to_string(),
            instructions: "Season.".to_string(),
            category,
            cuisine: cuisine.map(String::from),
            cook_time: 0,
            created_at: "2025-01-01T00:00:00.000Z".to_string(),
        }
    }

    fn meal(day: Day, slot: MealSlot) -> PlannedMeal {
        PlannedMeal {
            day,
            meal_slot: slot,
            recipe_name: "Recipe 1".to_string(),
            recipe_id: 1,
        }
    }

    #[test]
    fn test_category_distribution() {
        let recipes = vec![
            recipe(1, Category::Dinner, None),
            recipe(2, Category::Breakfast, None),
            recipe(3, Category::Dinner, None),
            recipe(4, Category::Dinner, None),
        ];
        let shares = category_distribution(&recipes);
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].label, "Breakfast");
        assert_eq!(shares[0].count, 1);
        assert!((shares[0].percent - 25.0).abs() < f64::EPSILON);
        assert_eq!(shares[1].label, "Dinner");
        assert_eq!(shares[1].count, 3);
        assert!((shares[1].percent - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cuisine_distribution_groups_missing() {
        let recipes = vec![
            recipe(1, Category::Lunch, Some("Thai")),
            recipe(2, Category::Lunch, None),
            recipe(3, Category::Lunch, Some("")),
            recipe(4, Category::Lunch, Some("Indian")),
            recipe(5, Category::Lunch, Some("Thai")),
        ];
        let shares = cuisine_distribution(&recipes);
        let labels: Vec<(&str, usize)> =
            shares.iter().map(|s| (s.label.as_str(), s.count)).collect();
        assert_eq!(
            labels,
            vec![("Not Specified", 2), ("Thai", 2), ("Indian", 1)]
        );
    }

    #[test]
    fn test_meal_slot_distribution() {
        let plan = vec![
            meal(Day::Monday, MealSlot::Dinner),
            meal(Day::Tuesday, MealSlot::Dinner),
            meal(Day::Tuesday, MealSlot::Breakfast),
        ];
        let shares = meal_slot_distribution(&plan);
        let labels: Vec<(&str, usize)> =
            shares.iter().map(|s| (s.label.as_str(), s.count)).collect();
        assert_eq!(labels, vec![("Breakfast", 1), ("Dinner", 2)]);
    }

    #[test]
    fn test_empty_inputs() {
        let stats = plan_stats(&[], &[]);
        assert_eq!(stats.recipe_count, 0);
        assert_eq!(stats.planned_meals, 0);
        assert!(stats.by_category.is_empty());
        assert!(stats.by_cuisine.is_empty());
        assert!(stats.by_meal_slot.is_empty());
    }
}
