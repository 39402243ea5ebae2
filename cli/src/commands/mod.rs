mod helpers;
mod import;
mod plan;
mod recipe;
mod shopping;
mod stats;

pub(crate) use import::{ImportOptions, cmd_recipe_import};
pub(crate) use plan::{cmd_plan_remove, cmd_plan_set, cmd_plan_show};
pub(crate) use recipe::{
    RecipeEdit, cmd_recipe_add, cmd_recipe_delete, cmd_recipe_list, cmd_recipe_search,
    cmd_recipe_show, cmd_recipe_update,
};
pub(crate) use shopping::cmd_shopping;
pub(crate) use stats::cmd_stats;
