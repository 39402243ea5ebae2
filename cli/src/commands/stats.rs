use anyhow::Result;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use larder_core::service::Planner;
use larder_core::stats::Share;

pub(crate) fn cmd_stats(planner: &Planner, json: bool) -> Result<()> {
    let stats = planner.stats();

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!(
        "{} recipes, {} planned meals\n",
        stats.recipe_count, stats.planned_meals
    );
    print_shares("Recipes by category", &stats.by_category, "No recipe data available!");
    print_shares("Recipes by cuisine", &stats.by_cuisine, "No recipe data available!");
    print_shares(
        "Meal plan by slot",
        &stats.by_meal_slot,
        "No meal plan data available!",
    );
    Ok(())
}

fn print_shares(title: &str, shares: &[Share], empty: &str) {
    #[derive(Tabled)]
    struct ShareRow {
        #[tabled(rename = "")]
        label: String,
        #[tabled(rename = "Count")]
        count: usize,
        #[tabled(rename = "Share")]
        percent: String,
        #[tabled(rename = "")]
        bar: String,
    }

    println!("{title}");
    if shares.is_empty() {
        println!("  {empty}\n");
        return;
    }

    let rows: Vec<ShareRow> = shares
        .iter()
        .map(|s| ShareRow {
            label: s.label.clone(),
            count: s.count,
            percent: format!("{:.1}%", s.percent),
            bar: bar(s.percent),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..3)).with(Alignment::right()))
        .to_string();
    println!("{table}\n");
}

/// A 20-cell horizontal bar for a percentage.
#[allow(clippy::cast_sign_loss)]
fn bar(percent: f64) -> String {
    let cells = (percent.clamp(0.0, 100.0) / 5.0).round() as usize;
    "█".repeat(cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar() {
        assert_eq!(bar(0.0), "");
        assert_eq!(bar(50.0), "█".repeat(10));
        assert_eq!(bar(100.0), "█".repeat(20));
        assert_eq!(bar(140.0), "█".repeat(20));
    }
}
