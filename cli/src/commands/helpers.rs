use anyhow::{Context, Result};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use larder_core::models::{Day, Recipe};

/// Parse a day name, accepting "today" for the current weekday.
pub(crate) fn parse_day(s: &str) -> Result<Day> {
    if s.trim().eq_ignore_ascii_case("today") {
        return Ok(Day::today());
    }
    Ok(s.parse::<Day>()?)
}

pub(crate) fn prompt_confirm(question: &str) -> Result<bool> {
    eprint!("{question} [y/N]: ");
    io::stderr().flush()?;
    let stdin = io::stdin();
    let line = stdin.lock().lines().next().context("No input")??;
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}

pub(crate) fn print_recipe_table(recipes: &[Recipe]) {
    #[derive(Tabled)]
    struct RecipeRow {
        #[tabled(rename = "ID")]
        id: i64,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Category")]
        category: String,
        #[tabled(rename = "Cuisine")]
        cuisine: String,
        #[tabled(rename = "Cook time")]
        cook_time: String,
        #[tabled(rename = "Ingredients")]
        ingredients: String,
    }

    let rows: Vec<RecipeRow> = recipes
        .iter()
        .map(|r| RecipeRow {
            id: r.id,
            name: truncate(&r.name, 30),
            category: r.category.to_string(),
            cuisine: r.cuisine.as_deref().map(|c| truncate(c, 15)).unwrap_or_default(),
            cook_time: format_minutes(r.cook_time),
            ingredients: truncate(&r.ingredients, 40),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::single(4)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}

pub(crate) fn format_minutes(minutes: u32) -> String {
    if minutes == 0 {
        "-".to_string()
    } else {
        format!("{minutes} min")
    }
}

pub(crate) fn json_error(message: &str) -> String {
    #[derive(Serialize)]
    struct CliError<'a> {
        error: &'a str,
    }
    serde_json::to_string(&CliError { error: message })
        .unwrap_or_else(|_| format!("{{\"error\":\"{message}\"}}"))
}

/// Print a not-found style message (plain or JSON) to the right stream.
pub(crate) fn report_missing(message: &str, json: bool) {
    if json {
        println!("{}", json_error(message));
    } else {
        eprintln!("{message}");
    }
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let end = s.char_indices().nth(max - 3).map_or(s.len(), |(i, _)| i);
        format!("{}...", &s[..end])
    }
}
