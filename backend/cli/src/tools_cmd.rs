//! CLI Tools Command
//!
//! Lists the tool catalog, grouped by category.

use anyhow::Result;

use fileedit_core::{ToolCatalog, ToolCategory};

use crate::terminal_output::{paint, render_table, Column, BOLD};

pub fn run(category: Option<ToolCategory>) -> Result<()> {
    let categories: Vec<ToolCategory> = match category {
        Some(c) => vec![c],
        None => ToolCatalog::categories().to_vec(),
    };

    for category in categories {
        println!("\n{}\n", paint(category.label(), BOLD));
        let rows: Vec<Vec<String>> = ToolCatalog::by_category(category)
            .into_iter()
            .map(|t| {
                vec![
                    t.id.to_string(),
                    t.name.to_string(),
                    t.action.to_string(),
                    t.description.to_string(),
                ]
            })
            .collect();
        print!(
            "{}",
            render_table(
                &[
                    Column::left("ID"),
                    Column::left("Name"),
                    Column::left("History label"),
                    Column::left("Description"),
                ],
                &rows,
            )
        );
    }
    println!();
    Ok(())
}
