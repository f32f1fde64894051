use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, CellAlignment, Table};
use serde::Serialize;

use discovery::types::ALL_CATEGORIES;
use discovery::{Catalog, Item};

use crate::context::RunContext;
use crate::examples::ExampleGroup;
use crate::output::{GlobalOptions, OutputManager, TableDisplay, set_table_header, themed_table};

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Category Dropdown",
    commands: &[
        "discovery categories items.json               # Values offered by the category filter",
        "discovery --output json categories items.json # Same, as JSON",
    ],
}];

#[derive(Args, Debug)]
pub struct CategoriesArgs {
    /// Catalog JSON file (array of items or {"items": [...]})
    #[arg(env = "DISCOVERY_CATALOG")]
    pub catalog: Option<PathBuf>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct CategoryCount {
    pub name: String,
    pub items: usize,
}

/// Category dropdown values with the number of items in each
#[derive(Debug, Serialize)]
pub struct CategoryList {
    pub categories: Vec<CategoryCount>,
}

impl CategoryList {
    pub fn from_items(items: &[Item]) -> Self {
        let categories = Catalog::categories(items)
            .into_iter()
            .map(|name| {
                let count = if name == ALL_CATEGORIES {
                    items.len()
                } else {
                    items.iter().filter(|item| item.category == name).count()
                };
                CategoryCount { name, items: count }
            })
            .collect();
        Self { categories }
    }
}

impl TableDisplay for CategoryList {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = themed_table(options);
        set_table_header(&mut table, &["Category", "Items"], options);
        for category in &self.categories {
            table.add_row(vec![
                Cell::new(&category.name),
                Cell::new(category.items).set_alignment(CellAlignment::Right),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        self.categories
            .iter()
            .map(|category| category.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub fn handle_categories(args: CategoriesArgs, ctx: &RunContext, output: &OutputManager) -> Result<()> {
    let catalog_path = ctx.catalog_path(args.catalog)?;
    output.verbose(&format!("Loading catalog from {}", catalog_path.display()));

    let items = Catalog::from_path(&catalog_path)
        .with_context(|| format!("Failed to load catalog {}", catalog_path.display()))?;

    output.heading("Categories");
    output.display(&CategoryList::from_items(&items))?;
    Ok(())
}
