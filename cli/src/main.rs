mod commands;
mod config;
mod logging;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing::debug;

use crate::commands::{
    ImportOptions, RecipeEdit, cmd_plan_remove, cmd_plan_set, cmd_plan_show, cmd_recipe_add,
    cmd_recipe_delete, cmd_recipe_import, cmd_recipe_list, cmd_recipe_search, cmd_recipe_show,
    cmd_recipe_update, cmd_shopping, cmd_stats,
};
use crate::config::Config;
use larder_core::service::Planner;

#[derive(Parser)]
#[command(
    name = "larder",
    version,
    about = "A recipe catalog and weekly meal planner",
    long_about = "Store recipes, plan a week of breakfasts, lunches and dinners,\n\
                  and turn the plan into a shopping list."
)]
struct Cli {
    /// Database file (default: larder.db in the user data directory)
    #[arg(long, global = true, env = "LARDER_DB", value_name = "PATH")]
    db: Option<PathBuf>,
    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage recipes
    Recipe {
        #[command(subcommand)]
        command: RecipeCommands,
    },
    /// Manage the weekly meal plan
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Show the shopping list for everything in the meal plan
    Shopping {
        /// Write the list to a spreadsheet (.xlsx) or .csv file instead
        #[arg(short, long, value_name = "PATH")]
        export: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show recipe and meal plan distributions
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum RecipeCommands {
    /// Add a new recipe
    Add {
        /// Recipe name
        name: String,
        /// Ingredients, comma separated (e.g. "Eggs, Milk, Flour")
        #[arg(short, long)]
        ingredients: String,
        /// Preparation instructions
        #[arg(long)]
        instructions: String,
        /// Category: breakfast, lunch, dinner, dessert, snack
        #[arg(short, long, default_value = "Breakfast")]
        category: String,
        /// Cuisine (e.g. Italian, Thai)
        #[arg(long)]
        cuisine: Option<String>,
        /// Cook time in minutes (anything non-numeric counts as 0)
        #[arg(short = 't', long, default_value = "")]
        cook_time: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List all recipes, newest first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search recipes (case-sensitive substring match)
    Search {
        /// Text to look for; empty lists everything
        term: String,
        /// Field to search: name, category, ingredients
        #[arg(short, long, default_value = "name")]
        by: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a recipe with its ingredients and instructions
    Show {
        /// Recipe ID
        id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change fields of an existing recipe
    Update {
        /// Recipe ID
        id: i64,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New ingredients, comma separated
        #[arg(short, long)]
        ingredients: Option<String>,
        /// New instructions
        #[arg(long)]
        instructions: Option<String>,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
        /// New cuisine (empty to clear)
        #[arg(long)]
        cuisine: Option<String>,
        /// New cook time in minutes
        #[arg(short = 't', long)]
        cook_time: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a recipe and remove it from the meal plan
    Delete {
        /// Recipe ID
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Import a recipe from a Cooklang (.cook) file
    Import {
        /// Path to the .cook file
        file: PathBuf,
        /// Recipe name override (defaults to metadata title or filename)
        #[arg(long)]
        name: Option<String>,
        /// Category: breakfast, lunch, dinner, dessert, snack
        #[arg(short, long, default_value = "Dinner")]
        category: String,
        /// Cuisine
        #[arg(long)]
        cuisine: Option<String>,
        /// Cook time in minutes
        #[arg(short = 't', long, default_value = "")]
        cook_time: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum PlanCommands {
    /// Put a recipe in a day's meal slot, replacing what was there
    Set {
        /// Day: monday-sunday, mon-sun, or today
        day: String,
        /// Meal slot: breakfast, lunch, dinner
        slot: String,
        /// Recipe ID
        recipe_id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the weekly plan
    Show {
        /// Include days with nothing planned
        #[arg(short, long)]
        all: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Clear a day's meal slot
    Remove {
        /// Day: monday-sunday, mon-sun, or today
        day: String,
        /// Meal slot: breakfast, lunch, dinner
        slot: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.db)?;
    debug!(db = %config.db_path.display(), data_dir = %config.data_dir.display(), "config loaded");
    let planner = Planner::open(&config.db_path);
    if !planner.is_connected() {
        eprintln!(
            "Warning: could not open {}; nothing will be saved",
            config.db_path.display()
        );
    }

    match cli.command {
        Commands::Recipe { command } => match command {
            RecipeCommands::Add {
                name,
                ingredients,
                instructions,
                category,
                cuisine,
                cook_time,
                json,
            } => cmd_recipe_add(
                &planner,
                &name,
                &ingredients,
                &instructions,
                &category,
                cuisine,
                &cook_time,
                json,
            ),
            RecipeCommands::List { json } => cmd_recipe_list(&planner, json),
            RecipeCommands::Search { term, by, json } => {
                cmd_recipe_search(&planner, &term, &by, json)
            }
            RecipeCommands::Show { id, json } => cmd_recipe_show(&planner, id, json),
            RecipeCommands::Update {
                id,
                name,
                ingredients,
                instructions,
                category,
                cuisine,
                cook_time,
                json,
            } => cmd_recipe_update(
                &planner,
                id,
                RecipeEdit {
                    name,
                    ingredients,
                    instructions,
                    category,
                    cuisine,
                    cook_time,
                },
                json,
            ),
            RecipeCommands::Delete { id, yes, json } => {
                cmd_recipe_delete(&planner, id, yes, json)
            }
            RecipeCommands::Import {
                file,
                name,
                category,
                cuisine,
                cook_time,
                json,
            } => cmd_recipe_import(
                &planner,
                &file,
                ImportOptions {
                    name,
                    category,
                    cuisine,
                    cook_time,
                },
                json,
            ),
        },
        Commands::Plan { command } => match command {
            PlanCommands::Set {
                day,
                slot,
                recipe_id,
                json,
            } => cmd_plan_set(&planner, &day, &slot, recipe_id, json),
            PlanCommands::Show { all, json } => cmd_plan_show(&planner, all, json),
            PlanCommands::Remove { day, slot, json } => {
                cmd_plan_remove(&planner, &day, &slot, json)
            }
        },
        Commands::Shopping { export, json } => cmd_shopping(&planner, export.as_deref(), json),
        Commands::Stats { json } => cmd_stats(&planner, json),
    }
}
