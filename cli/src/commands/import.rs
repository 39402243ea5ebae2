use anyhow::{Context, Result, bail};
use cooklang::{Content, Item};
use std::path::Path;
use tracing::{debug, info};

use larder_core::models::{Category, NewRecipe, parse_cook_time};
use larder_core::service::Planner;

/// Options a Cooklang file cannot carry, supplied on the command line.
pub(crate) struct ImportOptions {
    pub name: Option<String>,
    pub category: String,
    pub cuisine: Option<String>,
    pub cook_time: String,
}

pub(crate) fn cmd_recipe_import(
    planner: &Planner,
    file: &Path,
    options: ImportOptions,
    json: bool,
) -> Result<()> {
    let input = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read file: {}", file.display()))?;

    let (recipe_data, _report) = cooklang::parse(&input)
        .into_result()
        .map_err(|e| anyhow::anyhow!("Failed to parse Cooklang file: {e}"))?;

    let name = options
        .name
        .or_else(|| recipe_data.metadata.title().map(String::from))
        .or_else(|| file.file_stem().and_then(|s| s.to_str()).map(String::from))
        .context("Could not determine recipe name. Use --name to specify one")?;

    let converter = cooklang::Converter::default();
    let names: Vec<String> = recipe_data
        .group_ingredients(&converter)
        .iter()
        .map(|gi| gi.ingredient.display_name().to_string())
        .collect();
    let ingredients = join_unique(&names);
    if ingredients.is_empty() {
        bail!("No ingredients found in recipe");
    }
    debug!(count = names.len(), "parsed cooklang ingredients");

    let instructions = recipe_instructions(&recipe_data);
    if instructions.is_empty() {
        bail!("No steps found in recipe");
    }

    let recipe = NewRecipe {
        name,
        ingredients,
        instructions,
        category: options.category.parse::<Category>()?,
        cuisine: options.cuisine,
        cook_time: parse_cook_time(&options.cook_time),
    };
    recipe.validate()?;

    let Some(created) = planner.create_recipe(&recipe) else {
        bail!("Failed to save imported recipe");
    };
    info!(id = created.id, file = %file.display(), "recipe imported");

    if json {
        println!("{}", serde_json::to_string_pretty(&created)?);
    } else {
        let count = created.ingredient_list().len();
        println!(
            "Imported recipe: {} (id: {}, {count} ingredients)",
            created.name, created.id
        );
    }
    Ok(())
}

/// Comma-join names, keeping the first occurrence of each.
fn join_unique(names: &[String]) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for name in names {
        let name = name.trim();
        if !name.is_empty() && !seen.contains(&name) {
            seen.push(name);
        }
    }
    seen.join(", ")
}

/// Step text of a parsed Cooklang recipe, one line per step or text block.
/// Ingredients and cookware render as their display names, timers and inline
/// quantities as their amounts.
fn recipe_instructions(recipe: &cooklang::Recipe) -> String {
    let mut lines: Vec<String> = Vec::new();
    for section in &recipe.sections {
        for content in &section.content {
            let text = match content {
                Content::Step(step) => step
                    .items
                    .iter()
                    .map(|item| render_item(recipe, item))
                    .collect::<String>(),
                Content::Text(text) => text.clone(),
            };
            let line = text.split_whitespace().collect::<Vec<_>>().join(" ");
            if !line.is_empty() {
                lines.push(line);
            }
        }
    }
    lines.join("\n")
}

fn render_item(recipe: &cooklang::Recipe, item: &Item) -> String {
    match item {
        Item::Text { value } => value.clone(),
        Item::Ingredient { index } => recipe.ingredients[*index].display_name().into_owned(),
        Item::Cookware { index } => recipe.cookware[*index].display_name().to_string(),
        Item::Timer { index } => {
            let timer = &recipe.timers[*index];
            timer
                .quantity
                .as_ref()
                .map(ToString::to_string)
                .or_else(|| timer.name.clone())
                .unwrap_or_default()
        }
        Item::InlineQuantity { index } => recipe.inline_quantities[*index].to_string(),
    }
}
