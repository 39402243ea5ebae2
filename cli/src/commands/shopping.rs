use anyhow::Result;
use std::path::Path;

use larder_core::export::export_shopping_list;
use larder_core::service::Planner;

pub(crate) fn cmd_shopping(planner: &Planner, export: Option<&Path>, json: bool) -> Result<()> {
    let items = planner.shopping_list();

    if let Some(path) = export {
        let format = export_shopping_list(&items, path)?;
        if json {
            println!(
                "{}",
                serde_json::json!({
                    "exported": path.display().to_string(),
                    "items": items.len(),
                    "format": format.extension(),
                })
            );
        } else {
            println!(
                "Shopping list exported to {} ({} items)",
                path.display(),
                items.len()
            );
        }
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else if items.is_empty() {
        eprintln!("No ingredients found! Plan some meals first.");
    } else {
        println!("Shopping List ({} items)", items.len());
        for (i, item) in items.iter().enumerate() {
            println!("{:>4}. {item}", i + 1);
        }
    }
    Ok(())
}
