use std::path::Path;
use std::str::FromStr;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params, types::Type};

use crate::error::{Result, StoreError};
use crate::models::{Day, MealSlot, NewRecipe, PlannedMeal, Recipe, SearchField};
use crate::shopping::derive_shopping_list;

const RECIPE_COLUMNS: &str =
    "recipe_id, name, ingredients, instructions, category, cuisine, cook_time, created_date";

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|e| {
            StoreError::Connection(format!("Failed to open database {}: {e}", path.display()))
        })?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::Connection(format!("Failed to open in-memory database: {e}")))?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        // Cascading deletes from recipes to mealplan rely on this being on.
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let db = Database { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        let version: i64 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;

        if version < 1 {
            self.conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS recipes (
                    recipe_id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    ingredients TEXT NOT NULL,
                    instructions TEXT NOT NULL,
                    category TEXT NOT NULL,
                    cuisine TEXT,
                    cook_time INTEGER,
                    created_date TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
                );

                CREATE TABLE IF NOT EXISTS mealplan (
                    plan_id INTEGER PRIMARY KEY AUTOINCREMENT,
                    day TEXT NOT NULL,
                    meal_type TEXT NOT NULL,
                    recipe_id INTEGER NOT NULL REFERENCES recipes(recipe_id) ON DELETE CASCADE
                );

                CREATE INDEX IF NOT EXISTS idx_recipes_created ON recipes(created_date);
                CREATE INDEX IF NOT EXISTS idx_mealplan_slot ON mealplan(day, meal_type);
                CREATE INDEX IF NOT EXISTS idx_mealplan_recipe ON mealplan(recipe_id);

                PRAGMA user_version = 1;",
            )?;
        }

        Ok(())
    }

    // --- Row mapping helpers ---

    fn recipe_from_row(row: &rusqlite::Row) -> rusqlite::Result<Recipe> {
        let cook_time: Option<i64> = row.get(6)?;
        Ok(Recipe {
            id: row.get(0)?,
            name: row.get(1)?,
            ingredients: row.get(2)?,
            instructions: row.get(3)?,
            category: parse_text_column(row, 4)?,
            cuisine: row.get(5)?,
            cook_time: cook_time.and_then(|m| u32::try_from(m).ok()).unwrap_or(0),
            created_at: row.get(7)?,
        })
    }

    // Expects columns: 0: mp.day, 1: mp.meal_type, 2: r.name, 3: r.recipe_id
    fn planned_meal_from_row(row: &rusqlite::Row) -> rusqlite::Result<PlannedMeal> {
        Ok(PlannedMeal {
            day: parse_text_column(row, 0)?,
            meal_slot: parse_text_column(row, 1)?,
            recipe_name: row.get(2)?,
            recipe_id: row.get(3)?,
        })
    }

    // --- Recipes ---

    pub fn insert_recipe(&self, recipe: &NewRecipe) -> Result<Recipe> {
        recipe.validate()?;
        let now = Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        self.conn.execute(
            "INSERT INTO recipes (name, ingredients, instructions, category, cuisine, cook_time, created_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                recipe.name.trim(),
                recipe.ingredients.trim(),
                recipe.instructions.trim(),
                recipe.category.as_str(),
                recipe.stored_cuisine(),
                recipe.cook_time,
                now,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.get_recipe(id)
    }

    pub fn get_recipe(&self, id: i64) -> Result<Recipe> {
        self.conn
            .query_row(
                &format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE recipe_id = ?1"),
                params![id],
                Self::recipe_from_row,
            )
            .optional()?
            .ok_or(StoreError::NotFound(id))
    }

    /// All recipes, newest first.
    pub fn list_recipes(&self) -> Result<Vec<Recipe>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes ORDER BY created_date DESC, recipe_id DESC"
        ))?;
        let recipes = stmt
            .query_map([], Self::recipe_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(recipes)
    }

    /// Recipes whose `field` contains `term`, case-sensitively, newest first.
    pub fn find_recipes(&self, term: &str, field: SearchField) -> Result<Vec<Recipe>> {
        // instr() is a byte-exact substring test, unlike LIKE which folds ASCII case.
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes WHERE instr({}, ?1) > 0
             ORDER BY created_date DESC, recipe_id DESC",
            field.column()
        ))?;
        let recipes = stmt
            .query_map(params![term], Self::recipe_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(recipes)
    }

    pub fn update_recipe(&self, id: i64, recipe: &NewRecipe) -> Result<Recipe> {
        recipe.validate()?;
        let rows = self.conn.execute(
            "UPDATE recipes SET name = ?1, ingredients = ?2, instructions = ?3,
                    category = ?4, cuisine = ?5, cook_time = ?6
             WHERE recipe_id = ?7",
            params![
                recipe.name.trim(),
                recipe.ingredients.trim(),
                recipe.instructions.trim(),
                recipe.category.as_str(),
                recipe.stored_cuisine(),
                recipe.cook_time,
                id,
            ],
        )?;
        if rows == 0 {
            return Err(StoreError::NotFound(id));
        }
        self.get_recipe(id)
    }

    /// Deletes a recipe and, through the foreign key, every plan slot using it.
    pub fn delete_recipe(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM recipes WHERE recipe_id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // --- Meal plan ---

    /// Put `recipe_id` in the given slot, replacing whatever was there.
    ///
    /// The delete and insert share one transaction: if the insert fails (for
    /// example on an unknown recipe) the previous entry is left in place.
    pub fn set_meal(&self, day: Day, slot: MealSlot, recipe_id: i64) -> Result<PlannedMeal> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM mealplan WHERE day = ?1 AND meal_type = ?2",
            params![day.as_str(), slot.as_str()],
        )?;
        tx.execute(
            "INSERT INTO mealplan (day, meal_type, recipe_id) VALUES (?1, ?2, ?3)",
            params![day.as_str(), slot.as_str(), recipe_id],
        )?;
        tx.commit()?;

        self.get_meal(day, slot)?.ok_or(StoreError::NotFound(recipe_id))
    }

    pub fn get_meal(&self, day: Day, slot: MealSlot) -> Result<Option<PlannedMeal>> {
        let meal = self
            .conn
            .query_row(
                "SELECT mp.day, mp.meal_type, r.name, r.recipe_id
                 FROM mealplan mp
                 JOIN recipes r ON mp.recipe_id = r.recipe_id
                 WHERE mp.day = ?1 AND mp.meal_type = ?2
                 ORDER BY mp.plan_id DESC
                 LIMIT 1",
                params![day.as_str(), slot.as_str()],
                Self::planned_meal_from_row,
            )
            .optional()?;
        Ok(meal)
    }

    /// The whole week, Monday..Sunday, then Breakfast, Lunch, Dinner.
    pub fn meal_plan(&self) -> Result<Vec<PlannedMeal>> {
        let mut stmt = self.conn.prepare(
            "SELECT mp.day, mp.meal_type, r.name, r.recipe_id
             FROM mealplan mp
             JOIN recipes r ON mp.recipe_id = r.recipe_id
             ORDER BY mp.plan_id",
        )?;
        let mut meals = stmt
            .query_map([], Self::planned_meal_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        meals.sort_by_key(|m| (m.day, m.meal_slot));
        Ok(meals)
    }

    /// Clear a slot. Returns whether anything was there.
    pub fn remove_meal(&self, day: Day, slot: MealSlot) -> Result<bool> {
        let rows = self.conn.execute(
            "DELETE FROM mealplan WHERE day = ?1 AND meal_type = ?2",
            params![day.as_str(), slot.as_str()],
        )?;
        Ok(rows > 0)
    }

    // --- Shopping list ---

    /// Ingredient text of each distinct recipe referenced by the plan.
    pub fn planned_ingredient_texts(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT r.recipe_id, r.ingredients
             FROM mealplan mp
             JOIN recipes r ON mp.recipe_id = r.recipe_id
             ORDER BY r.recipe_id",
        )?;
        let texts = stmt
            .query_map([], |row| row.get(1))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(texts)
    }

    pub fn shopping_list(&self) -> Result<Vec<String>> {
        let texts = self.planned_ingredient_texts()?;
        Ok(derive_shopping_list(texts.iter().map(String::as_str)))
    }
}

fn parse_text_column<T>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = StoreError>,
{
    let text: String = row.get(idx)?;
    text.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn recipe(name: &str, ingredients: &str) -> NewRecipe {
        NewRecipe {
            name: name.to_string(),
            ingredients: ingredients.to_string(),
            instructions: "Cook it.".to_string(),
            category: Category::Dinner,
            cuisine: None,
            cook_time: 0,
        }
    }

    fn pancakes() -> NewRecipe {
        NewRecipe {
            name: "Pancakes".to_string(),
            ingredients: "Eggs, Milk, Flour".to_string(),
            instructions: "Whisk, rest, fry.".to_string(),
            category: Category::Breakfast,
            cuisine: Some("American".to_string()),
            cook_time: 25,
        }
    }

    #[test]
    fn test_insert_and_get_recipe() {
        let db = Database::open_in_memory().unwrap();
        let created = db.insert_recipe(&pancakes()).unwrap();

        assert_eq!(created.name, "Pancakes");
        assert_eq!(created.ingredients, "Eggs, Milk, Flour");
        assert_eq!(created.category, Category::Breakfast);
        assert_eq!(created.cuisine.as_deref(), Some("American"));
        assert_eq!(created.cook_time, 25);
        assert!(!created.created_at.is_empty());

        let fetched = db.get_recipe(created.id).unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.instructions, "Whisk, rest, fry.");
    }

    #[test]
    fn test_insert_rejects_empty_fields() {
        let db = Database::open_in_memory().unwrap();
        let mut r = pancakes();
        r.instructions = "  ".to_string();
        assert!(matches!(
            db.insert_recipe(&r),
            Err(StoreError::Validation(_))
        ));
        assert!(db.list_recipes().unwrap().is_empty());
    }

    #[test]
    fn test_blank_cuisine_stored_as_none() {
        let db = Database::open_in_memory().unwrap();
        let mut r = pancakes();
        r.cuisine = Some(String::new());
        let created = db.insert_recipe(&r).unwrap();
        assert!(created.cuisine.is_none());
    }

    #[test]
    fn test_get_recipe_not_found() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(db.get_recipe(99), Err(StoreError::NotFound(99))));
    }

    #[test]
    fn test_list_recipes_newest_first() {
        let db = Database::open_in_memory().unwrap();
        let a = db.insert_recipe(&recipe("A", "x")).unwrap();
        let b = db.insert_recipe(&recipe("B", "y")).unwrap();
        let c = db.insert_recipe(&recipe("C", "z")).unwrap();

        let ids: Vec<i64> = db.list_recipes().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![c.id, b.id, a.id]);
    }

    #[test]
    fn test_find_recipes_by_name_case_sensitive() {
        let db = Database::open_in_memory().unwrap();
        db.insert_recipe(&recipe("Tomato Soup", "Tomato, Water")).unwrap();
        db.insert_recipe(&recipe("Green Salad", "Lettuce")).unwrap();
        db.insert_recipe(&recipe("tomato bake", "tomato")).unwrap();

        let found = db.find_recipes("Tomato", SearchField::Name).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Tomato Soup");

        let found = db.find_recipes("tomato", SearchField::Name).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "tomato bake");

        assert!(db.find_recipes("Pizza", SearchField::Name).unwrap().is_empty());
    }

    #[test]
    fn test_find_recipes_by_category_and_ingredients() {
        let db = Database::open_in_memory().unwrap();
        db.insert_recipe(&pancakes()).unwrap();
        db.insert_recipe(&recipe("Stew", "Beef, Carrot")).unwrap();

        let found = db.find_recipes("Break", SearchField::Category).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Pancakes");

        let found = db.find_recipes("Carrot", SearchField::Ingredients).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Stew");

        assert!(
            db.find_recipes("carrot", SearchField::Ingredients)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_find_recipes_treats_wildcards_literally() {
        let db = Database::open_in_memory().unwrap();
        db.insert_recipe(&recipe("100% Rye", "Rye")).unwrap();
        db.insert_recipe(&recipe("Rye_Bread", "Rye")).unwrap();

        assert_eq!(db.find_recipes("%", SearchField::Name).unwrap().len(), 1);
        assert_eq!(db.find_recipes("_", SearchField::Name).unwrap().len(), 1);
    }

    #[test]
    fn test_update_recipe() {
        let db = Database::open_in_memory().unwrap();
        let created = db.insert_recipe(&pancakes()).unwrap();

        let mut changed = pancakes();
        changed.name = "Fluffy Pancakes".to_string();
        changed.cook_time = 30;
        changed.category = Category::Dessert;
        let updated = db.update_recipe(created.id, &changed).unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Fluffy Pancakes");
        assert_eq!(updated.cook_time, 30);
        assert_eq!(updated.category, Category::Dessert);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[test]
    fn test_update_recipe_not_found() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(
            db.update_recipe(7, &pancakes()),
            Err(StoreError::NotFound(7))
        ));
    }

    #[test]
    fn test_delete_recipe() {
        let db = Database::open_in_memory().unwrap();
        let created = db.insert_recipe(&pancakes()).unwrap();

        assert!(db.delete_recipe(created.id).unwrap());
        assert!(db.list_recipes().unwrap().is_empty());
        assert!(!db.delete_recipe(created.id).unwrap());
    }

    #[test]
    fn test_delete_recipe_cascades_meal_plan() {
        let db = Database::open_in_memory().unwrap();
        let a = db.insert_recipe(&pancakes()).unwrap();
        let b = db.insert_recipe(&recipe("Stew", "Beef")).unwrap();
        db.set_meal(Day::Monday, MealSlot::Breakfast, a.id).unwrap();
        db.set_meal(Day::Friday, MealSlot::Lunch, a.id).unwrap();
        db.set_meal(Day::Friday, MealSlot::Dinner, b.id).unwrap();

        db.delete_recipe(a.id).unwrap();

        let plan = db.meal_plan().unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].recipe_id, b.id);
        let raw: i64 = db
            .conn
            .query_row(
                "SELECT COUNT(*) FROM mealplan WHERE recipe_id = ?1",
                params![a.id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(raw, 0);
    }

    #[test]
    fn test_set_meal_replaces_slot() {
        let db = Database::open_in_memory().unwrap();
        let a = db.insert_recipe(&recipe("A", "x")).unwrap();
        let b = db.insert_recipe(&recipe("B", "y")).unwrap();

        db.set_meal(Day::Monday, MealSlot::Breakfast, a.id).unwrap();
        let placed = db.set_meal(Day::Monday, MealSlot::Breakfast, b.id).unwrap();
        assert_eq!(placed.recipe_id, b.id);
        assert_eq!(placed.recipe_name, "B");

        let plan = db.meal_plan().unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].day, Day::Monday);
        assert_eq!(plan[0].meal_slot, MealSlot::Breakfast);
        assert_eq!(plan[0].recipe_id, b.id);
    }

    #[test]
    fn test_set_meal_unknown_recipe_keeps_previous() {
        let db = Database::open_in_memory().unwrap();
        let a = db.insert_recipe(&recipe("A", "x")).unwrap();
        db.set_meal(Day::Tuesday, MealSlot::Lunch, a.id).unwrap();

        let result = db.set_meal(Day::Tuesday, MealSlot::Lunch, 9999);
        assert!(matches!(result, Err(StoreError::Constraint(_))));

        let meal = db.get_meal(Day::Tuesday, MealSlot::Lunch).unwrap().unwrap();
        assert_eq!(meal.recipe_id, a.id);
    }

    #[test]
    fn test_meal_plan_ordering() {
        let db = Database::open_in_memory().unwrap();
        let a = db.insert_recipe(&recipe("A", "x")).unwrap();
        db.set_meal(Day::Sunday, MealSlot::Breakfast, a.id).unwrap();
        db.set_meal(Day::Monday, MealSlot::Dinner, a.id).unwrap();
        db.set_meal(Day::Wednesday, MealSlot::Lunch, a.id).unwrap();
        db.set_meal(Day::Monday, MealSlot::Breakfast, a.id).unwrap();
        db.set_meal(Day::Monday, MealSlot::Lunch, a.id).unwrap();

        let order: Vec<(Day, MealSlot)> = db
            .meal_plan()
            .unwrap()
            .iter()
            .map(|m| (m.day, m.meal_slot))
            .collect();
        assert_eq!(
            order,
            vec![
                (Day::Monday, MealSlot::Breakfast),
                (Day::Monday, MealSlot::Lunch),
                (Day::Monday, MealSlot::Dinner),
                (Day::Wednesday, MealSlot::Lunch),
                (Day::Sunday, MealSlot::Breakfast),
            ]
        );
    }

    #[test]
    fn test_remove_meal() {
        let db = Database::open_in_memory().unwrap();
        let a = db.insert_recipe(&recipe("A", "x")).unwrap();
        db.set_meal(Day::Thursday, MealSlot::Dinner, a.id).unwrap();

        assert!(db.remove_meal(Day::Thursday, MealSlot::Dinner).unwrap());
        assert!(db.meal_plan().unwrap().is_empty());
        // Removing an empty slot is a no-op
        assert!(!db.remove_meal(Day::Thursday, MealSlot::Dinner).unwrap());
    }

    #[test]
    fn test_shopping_list_scenario() {
        let db = Database::open_in_memory().unwrap();
        let a = db.insert_recipe(&recipe("A", "Eggs, Milk, Flour")).unwrap();
        let b = db.insert_recipe(&recipe("B", "Milk, Sugar")).unwrap();
        db.set_meal(Day::Monday, MealSlot::Breakfast, a.id).unwrap();
        db.set_meal(Day::Tuesday, MealSlot::Dinner, b.id).unwrap();

        assert_eq!(
            db.shopping_list().unwrap(),
            vec!["Eggs", "Flour", "Milk", "Sugar"]
        );
    }

    #[test]
    fn test_shopping_list_counts_repeated_recipe_once() {
        let db = Database::open_in_memory().unwrap();
        let a = db.insert_recipe(&recipe("A", "Rice, Beans")).unwrap();
        db.set_meal(Day::Monday, MealSlot::Lunch, a.id).unwrap();
        db.set_meal(Day::Tuesday, MealSlot::Lunch, a.id).unwrap();
        db.set_meal(Day::Friday, MealSlot::Dinner, a.id).unwrap();

        assert_eq!(db.planned_ingredient_texts().unwrap().len(), 1);
        assert_eq!(db.shopping_list().unwrap(), vec!["Beans", "Rice"]);
    }

    #[test]
    fn test_shopping_list_ignores_unplanned_recipes() {
        let db = Database::open_in_memory().unwrap();
        db.insert_recipe(&recipe("A", "Eggs")).unwrap();
        assert!(db.shopping_list().unwrap().is_empty());
    }

    #[test]
    fn test_shopping_list_idempotent() {
        let db = Database::open_in_memory().unwrap();
        let a = db.insert_recipe(&recipe("A", "b, a, c")).unwrap();
        db.set_meal(Day::Saturday, MealSlot::Dinner, a.id).unwrap();

        let first = db.shopping_list().unwrap();
        let second = db.shopping_list().unwrap();
        assert_eq!(first, second);
        assert_eq!(first, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_reopen_file_database() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("larder.db");
        {
            let db = Database::open(&path).unwrap();
            let a = db.insert_recipe(&pancakes()).unwrap();
            db.set_meal(Day::Monday, MealSlot::Breakfast, a.id).unwrap();
        }

        let db = Database::open(&path).unwrap();
        assert_eq!(db.list_recipes().unwrap().len(), 1);
        assert_eq!(db.meal_plan().unwrap().len(), 1);
    }

    #[test]
    fn test_open_unreachable_path_is_connection_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("missing").join("dir").join("larder.db");
        assert!(matches!(
            Database::open(&path),
            Err(StoreError::Connection(_))
        ));
    }
}
