use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    pub ingredients: String,
    pub instructions: String,
    pub category: Category,
    pub cuisine: Option<String>,
    pub cook_time: u32,
    pub created_at: String,
}

impl Recipe {
    /// Ingredient names as the shopping list sees them: comma-split, trimmed, non-empty.
    #[must_use]
    pub fn ingredient_list(&self) -> Vec<&str> {
        crate::shopping::split_ingredients(&self.ingredients).collect()
    }
}

impl From<&Recipe> for NewRecipe {
    fn from(recipe: &Recipe) -> Self {
        NewRecipe {
            name: recipe.name.clone(),
            ingredients: recipe.ingredients.clone(),
            instructions: recipe.instructions.clone(),
            category: recipe.category,
            cuisine: recipe.cuisine.clone(),
            cook_time: recipe.cook_time,
        }
    }
}

/// Editable recipe fields, used for both create and full-replacement update.
#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub name: String,
    pub ingredients: String,
    pub instructions: String,
    pub category: Category,
    pub cuisine: Option<String>,
    pub cook_time: u32,
}

impl NewRecipe {
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.name.trim().is_empty() {
            return Err(StoreError::Validation(
                "Recipe name must not be empty".to_string(),
            ));
        }
        if self.ingredients.trim().is_empty() {
            return Err(StoreError::Validation(
                "Ingredients must not be empty".to_string(),
            ));
        }
        if self.instructions.trim().is_empty() {
            return Err(StoreError::Validation(
                "Instructions must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Cuisine as stored: trimmed, with blank input collapsed to `None`.
    #[must_use]
    pub fn stored_cuisine(&self) -> Option<&str> {
        self.cuisine
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// One filled slot of the weekly plan, joined with its recipe name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedMeal {
    pub day: Day,
    pub meal_slot: MealSlot,
    pub recipe_name: String,
    pub recipe_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Breakfast,
    Lunch,
    Dinner,
    Dessert,
    Snack,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Breakfast,
        Category::Lunch,
        Category::Dinner,
        Category::Dessert,
        Category::Snack,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Breakfast => "Breakfast",
            Category::Lunch => "Lunch",
            Category::Dinner => "Dinner",
            Category::Dessert => "Dessert",
            Category::Snack => "Snack",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                StoreError::Validation(format!(
                    "Invalid category '{s}'. Must be one of: {}",
                    join_names(Category::ALL.iter().map(|c| c.as_str()))
                ))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }

    #[must_use]
    pub fn today() -> Self {
        Local::now().weekday().into()
    }
}

impl From<Weekday> for Day {
    fn from(weekday: Weekday) -> Self {
        Day::ALL[weekday.num_days_from_monday() as usize]
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Day {
    type Err = StoreError;

    /// Accepts full names and three-letter abbreviations, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Day::ALL
            .into_iter()
            .find(|d| {
                d.as_str().eq_ignore_ascii_case(wanted)
                    || (wanted.len() == 3 && d.as_str()[..3].eq_ignore_ascii_case(wanted))
            })
            .ok_or_else(|| {
                StoreError::Validation(format!(
                    "Invalid day '{s}'. Must be one of: {}",
                    join_names(Day::ALL.iter().map(|d| d.as_str()))
                ))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealSlot {
    pub const ALL: [MealSlot; 3] = [MealSlot::Breakfast, MealSlot::Lunch, MealSlot::Dinner];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "Breakfast",
            MealSlot::Lunch => "Lunch",
            MealSlot::Dinner => "Dinner",
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealSlot {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        MealSlot::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                StoreError::Validation(format!(
                    "Invalid meal slot '{s}'. Must be one of: {}",
                    join_names(MealSlot::ALL.iter().map(|m| m.as_str()))
                ))
            })
    }
}

/// Which recipe column a search matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchField {
    Name,
    Category,
    Ingredients,
}

impl SearchField {
    pub(crate) fn column(self) -> &'static str {
        match self {
            SearchField::Name => "name",
            SearchField::Category => "category",
            SearchField::Ingredients => "ingredients",
        }
    }
}

impl FromStr for SearchField {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(SearchField::Name),
            "category" => Ok(SearchField::Category),
            "ingredient" | "ingredients" => Ok(SearchField::Ingredients),
            _ => Err(StoreError::Validation(format!(
                "Invalid search field '{s}'. Must be one of: name, category, ingredients"
            ))),
        }
    }
}

/// Parse a cook time in minutes. Blank, non-numeric, or negative input becomes 0.
#[must_use]
pub fn parse_cook_time(s: &str) -> u32 {
    s.trim().parse().unwrap_or(0)
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(", ")
}
