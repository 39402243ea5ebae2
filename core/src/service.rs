use std::path::Path;

use tracing::{debug, error, warn};

use crate::db::Database;
use crate::error::{Result, StoreError};
use crate::models::{Day, MealSlot, NewRecipe, PlannedMeal, Recipe, SearchField};
use crate::stats::{PlanStats, plan_stats};

/// The presentation-facing boundary over the store.
///
/// Every operation traps persistence failures: they are logged and turned into
/// `false`, `None`, or an empty collection. When the database could not be
/// opened the planner still exists and simply returns nothing.
pub struct Planner {
    db: Option<Database>,
}

impl Planner {
    pub fn open(path: &Path) -> Self {
        match Database::open(path) {
            Ok(db) => {
                debug!(path = %path.display(), "opened recipe database");
                Self { db: Some(db) }
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "recipe database unavailable");
                Self { db: None }
            }
        }
    }

    pub fn open_in_memory() -> Self {
        match Database::open_in_memory() {
            Ok(db) => Self { db: Some(db) },
            Err(e) => {
                error!(error = %e, "in-memory database unavailable");
                Self { db: None }
            }
        }
    }

    /// A planner with no backing store, as left behind by a failed open.
    #[cfg(test)]
    pub(crate) fn disconnected() -> Self {
        Self { db: None }
    }

    #[cfg(test)]
    pub(crate) fn from_database(db: Database) -> Self {
        Self { db: Some(db) }
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.db.is_some()
    }

    fn with_db<T>(&self, op: &str, f: impl FnOnce(&Database) -> Result<T>) -> Result<T> {
        let db = self
            .db
            .as_ref()
            .ok_or_else(|| StoreError::Connection("no database connection".to_string()))?;
        f(db).inspect_err(|e| warn!(op, error = %e, "store operation failed"))
    }

    // --- Recipes ---

    pub fn create_recipe(&self, recipe: &NewRecipe) -> Option<Recipe> {
        self.with_db("create_recipe", |db| db.insert_recipe(recipe))
            .ok()
    }

    pub fn recipe(&self, id: i64) -> Option<Recipe> {
        self.with_db("get_recipe", |db| db.get_recipe(id)).ok()
    }

    pub fn list_recipes(&self) -> Vec<Recipe> {
        self.with_db("list_recipes", Database::list_recipes)
            .unwrap_or_default()
    }

    /// Search recipes; a blank term lists everything.
    pub fn find_recipes(&self, term: &str, field: SearchField) -> Vec<Recipe> {
        if term.trim().is_empty() {
            return self.list_recipes();
        }
        self.with_db("find_recipes", |db| db.find_recipes(term, field))
            .unwrap_or_default()
    }

    pub fn update_recipe(&self, id: i64, recipe: &NewRecipe) -> bool {
        self.with_db("update_recipe", |db| db.update_recipe(id, recipe))
            .is_ok()
    }

    /// Returns `false` if the store failed or no recipe had that id.
    pub fn delete_recipe(&self, id: i64) -> bool {
        match self.with_db("delete_recipe", |db| db.delete_recipe(id)) {
            Ok(true) => true,
            Ok(false) => {
                debug!(id, "delete of unknown recipe");
                false
            }
            Err(_) => false,
        }
    }

    // --- Meal plan ---

    pub fn set_meal(&self, day: Day, slot: MealSlot, recipe_id: i64) -> bool {
        self.with_db("set_meal", |db| db.set_meal(day, slot, recipe_id))
            .is_ok()
    }

    pub fn meal_plan(&self) -> Vec<PlannedMeal> {
        self.with_db("meal_plan", Database::meal_plan)
            .unwrap_or_default()
    }

    /// Clearing an empty slot still counts as success.
    pub fn remove_meal(&self, day: Day, slot: MealSlot) -> bool {
        self.with_db("remove_meal", |db| db.remove_meal(day, slot))
            .is_ok()
    }

    // --- Derived views ---

    pub fn shopping_list(&self) -> Vec<String> {
        self.with_db("shopping_list", Database::shopping_list)
            .unwrap_or_default()
    }

    pub fn stats(&self) -> PlanStats {
        plan_stats(&self.list_recipes(), &self.meal_plan())
    }
}
