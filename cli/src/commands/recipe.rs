use anyhow::{Result, bail};
use std::process;
use tracing::info;

use larder_core::models::{Category, NewRecipe, Recipe, SearchField, parse_cook_time};
use larder_core::service::Planner;

use super::helpers::{format_minutes, print_recipe_table, prompt_confirm, report_missing};

/// Fields a user may change on an existing recipe; `None` keeps the stored value.
#[derive(Debug, Default)]
pub(crate) struct RecipeEdit {
    pub name: Option<String>,
    pub ingredients: Option<String>,
    pub instructions: Option<String>,
    pub category: Option<String>,
    pub cuisine: Option<String>,
    pub cook_time: Option<String>,
}

impl RecipeEdit {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.ingredients.is_none()
            && self.instructions.is_none()
            && self.category.is_none()
            && self.cuisine.is_none()
            && self.cook_time.is_none()
    }

    fn apply(self, existing: &Recipe) -> Result<NewRecipe> {
        let mut fields = NewRecipe::from(existing);
        if let Some(name) = self.name {
            fields.name = name;
        }
        if let Some(ingredients) = self.ingredients {
            fields.ingredients = ingredients;
        }
        if let Some(instructions) = self.instructions {
            fields.instructions = instructions;
        }
        if let Some(category) = self.category {
            fields.category = category.parse::<Category>()?;
        }
        if let Some(cuisine) = self.cuisine {
            fields.cuisine = Some(cuisine);
        }
        if let Some(cook_time) = self.cook_time {
            fields.cook_time = parse_cook_time(&cook_time);
        }
        Ok(fields)
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn cmd_recipe_add(
    planner: &Planner,
    name: &str,
    ingredients: &str,
    instructions: &str,
    category: &str,
    cuisine: Option<String>,
    cook_time: &str,
    json: bool,
) -> Result<()> {
    let recipe = NewRecipe {
        name: name.trim().to_string(),
        ingredients: ingredients.trim().to_string(),
        instructions: instructions.trim().to_string(),
        category: category.parse::<Category>()?,
        cuisine,
        cook_time: parse_cook_time(cook_time),
    };
    recipe.validate()?;

    let Some(created) = planner.create_recipe(&recipe) else {
        bail!("Failed to save recipe");
    };
    info!(id = created.id, name = %created.name, "recipe created");

    if json {
        println!("{}", serde_json::to_string_pretty(&created)?);
    } else {
        let id = created.id;
        println!("Saved recipe: {} (id: {id})", created.name);
        println!("Plan it with: larder plan set <day> <slot> {id}");
    }
    Ok(())
}

pub(crate) fn cmd_recipe_list(planner: &Planner, json: bool) -> Result<()> {
    let recipes = planner.list_recipes();
    print_recipes(&recipes, json)
}

pub(crate) fn cmd_recipe_search(planner: &Planner, term: &str, by: &str, json: bool) -> Result<()> {
    let field = by.parse::<SearchField>()?;
    let recipes = planner.find_recipes(term, field);
    print_recipes(&recipes, json)
}

fn print_recipes(recipes: &[Recipe], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(recipes)?);
    } else if recipes.is_empty() {
        eprintln!("No recipes found. Add one with `larder recipe add`.");
    } else {
        print_recipe_table(recipes);
    }
    Ok(())
}

pub(crate) fn cmd_recipe_show(planner: &Planner, id: i64, json: bool) -> Result<()> {
    let Some(recipe) = planner.recipe(id) else {
        report_missing(&format!("Recipe {id} not found"), json);
        process::exit(2);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&recipe)?);
        return Ok(());
    }

    let name = &recipe.name;
    println!("=== {name} ===");
    println!(
        "  Category: {}  |  Cuisine: {}  |  Cook time: {}",
        recipe.category,
        recipe.cuisine.as_deref().unwrap_or("Not specified"),
        format_minutes(recipe.cook_time)
    );
    println!("  Added: {}\n", recipe.created_at);

    println!("  INGREDIENTS:");
    for ingredient in recipe.ingredient_list() {
        println!("    • {ingredient}");
    }

    println!("\n  INSTRUCTIONS:");
    for line in recipe.instructions.lines() {
        println!("    {line}");
    }

    Ok(())
}

pub(crate) fn cmd_recipe_update(
    planner: &Planner,
    id: i64,
    edit: RecipeEdit,
    json: bool,
) -> Result<()> {
    if edit.is_empty() {
        bail!(
            "Nothing to update. Provide at least one of --name, --ingredients, --instructions, --category, --cuisine, or --cook-time"
        );
    }

    let Some(existing) = planner.recipe(id) else {
        report_missing(&format!("Recipe {id} not found"), json);
        process::exit(2);
    };

    let fields = edit.apply(&existing)?;
    fields.validate()?;
    if !planner.update_recipe(id, &fields) {
        bail!("Failed to update recipe {id}");
    }

    let Some(updated) = planner.recipe(id) else {
        bail!("Recipe {id} disappeared after update");
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&updated)?);
    } else {
        println!("Updated recipe {id}: {}", updated.name);
    }
    Ok(())
}

pub(crate) fn cmd_recipe_delete(planner: &Planner, id: i64, yes: bool, json: bool) -> Result<()> {
    let Some(recipe) = planner.recipe(id) else {
        report_missing(&format!("Recipe {id} not found"), json);
        process::exit(2);
    };

    if !yes && !json {
        let question = format!(
            "Delete '{}'? It will also be removed from the meal plan.",
            recipe.name
        );
        if !prompt_confirm(&question)? {
            eprintln!("Cancelled");
            return Ok(());
        }
    }

    if !planner.delete_recipe(id) {
        bail!("Failed to delete recipe {id}");
    }

    if json {
        println!("{}", serde_json::json!({ "deleted": id }));
    } else {
        println!("Deleted recipe {id}: {}", recipe.name);
    }
    Ok(())
}
