use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, CellAlignment, Table};
use serde::Serialize;

use discovery::search::validate_page_window;
use discovery::{Catalog, DiscoveryQuery, DiscoverySession, DiscoveryView, FilterState, Item, PageMarker};

use crate::context::RunContext;
use crate::examples::ExampleGroup;
use crate::output::{GlobalOptions, OutputManager, TableDisplay, set_table_header, themed_table};
use crate::theme::ICONS;

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Browse",
        commands: &[
            "discovery search items.json                         # First page, most popular first",
            "discovery search items.json --page 2 --per-page 24  # Second page of 24",
        ],
    },
    ExampleGroup {
        title: "Filter",
        commands: &[
            "discovery search items.json --query react --type course",
            "discovery search items.json --price free --min-members 500",
            "discovery search items.json --quick verified --quick high-rated --sort members",
        ],
    },
    ExampleGroup {
        title: "Scripting",
        commands: &["discovery --output json search items.json --category Tech"],
    },
];

#[derive(Args, Debug, Default)]
pub struct SearchArgs {
    /// Catalog JSON file (array of items or {"items": [...]})
    #[arg(env = "DISCOVERY_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Free-text search over name, creator, description and tags
    #[arg(long)]
    pub query: Option<String>,

    /// Item type: community, course, challenge, product, oneToOne, event, all
    #[arg(long = "type", value_name = "TYPE")]
    pub item_type: Option<String>,

    /// Exact category name, or "All"
    #[arg(long)]
    pub category: Option<String>,

    /// Price facet: all, free, paid
    #[arg(long)]
    pub price: Option<String>,

    /// Sort key: popular, newest, members, rating, price-low, price-high
    #[arg(long)]
    pub sort: Option<String>,

    /// Minimum member count (100, 500, 1000, 2000) or "all"
    #[arg(long)]
    pub min_members: Option<String>,

    /// Quick filter, repeatable: free, verified, 1000+, high-rated, recent
    #[arg(long = "quick", value_name = "FILTER")]
    pub quick: Vec<String>,

    /// Page number (1-indexed)
    #[arg(long)]
    pub page: Option<usize>,

    /// Items per page: 8, 12, 16 or 24
    #[arg(long)]
    pub per_page: Option<usize>,

    /// Pages shown on each side of the current page in the page strip
    #[arg(long)]
    pub window: Option<usize>,
}

impl SearchArgs {
    /// Page strip delta: `--window` first, then the configured width
    fn page_window(&self, configured: usize) -> Result<usize> {
        let window = self.window.unwrap_or(configured);
        validate_page_window(window).context("Invalid --window")?;
        Ok(window)
    }

    fn to_query(&self, default_per_page: usize) -> DiscoveryQuery {
        DiscoveryQuery {
            q: self.query.clone(),
            item_type: self.item_type.clone(),
            category: self.category.clone(),
            price: self.price.clone(),
            sort: self.sort.clone(),
            min_members: self.min_members.clone(),
            quick: self.quick.clone(),
            page: self.page,
            per_page: Some(self.per_page.unwrap_or(default_per_page)),
        }
    }
}

/// One search result page as printed by the CLI
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchReport<'a> {
    pub filters: &'a FilterState,
    #[serde(flatten)]
    pub view: DiscoveryView<'a>,
    pub pages: Vec<PageMarker>,
}

impl TableDisplay for SearchReport<'_> {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = themed_table(options);
        set_table_header(
            &mut table,
            &["#", "Name", "Type", "Category", "Creator", "Members", "Rating", "Price", "Flags"],
            options,
        );

        for (offset, item) in self.view.visible_items.iter().enumerate() {
            table.add_row(vec![
                Cell::new(self.view.start_index + offset + 1).set_alignment(CellAlignment::Right),
                Cell::new(&item.name),
                Cell::new(item.item_type.as_str()),
                Cell::new(&item.category),
                Cell::new(&item.creator),
                Cell::new(item.members).set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.1}", item.rating)).set_alignment(CellAlignment::Right),
                Cell::new(format_price(item)),
                Cell::new(format_flags(item)),
            ]);
        }

        table
    }

    fn to_compact(&self) -> String {
        let shown = if self.view.total_items == 0 {
            "no items".to_string()
        } else {
            format!(
                "items {}-{} of {}",
                self.view.start_index + 1,
                self.view.end_index,
                self.view.total_items
            )
        };
        format!(
            "{shown} | page {}/{} | {} active filters",
            self.view.current_page, self.view.total_pages, self.view.active_filters_count
        )
    }
}

fn format_price(item: &Item) -> String {
    if item.price_type.is_free() {
        "Free".to_string()
    } else {
        format!("{:.2} {}", item.price, item.price_type)
    }
}

fn format_flags(item: &Item) -> String {
    let mut flags = Vec::new();
    if item.featured {
        flags.push(ICONS.star);
    }
    if item.verified {
        flags.push(ICONS.check);
    }
    flags.join(" ")
}

/// Render the page strip, e.g. `1 … 4 [5] 6 … 10`
pub fn format_page_strip(pages: &[PageMarker], current: usize) -> String {
    pages
        .iter()
        .map(|marker| match marker {
            PageMarker::Page(page) if *page == current => format!("[{page}]"),
            PageMarker::Page(page) => page.to_string(),
            PageMarker::Ellipsis => ICONS.ellipsis.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn handle_search(args: SearchArgs, ctx: &RunContext, output: &OutputManager) -> Result<()> {
    let catalog_path = ctx.catalog_path(args.catalog.clone())?;
    output.verbose(&format!("Loading catalog from {}", catalog_path.display()));

    let items = Catalog::from_path(&catalog_path)
        .with_context(|| format!("Failed to load catalog {}", catalog_path.display()))?;
    output.verbose(&format!("Loaded {} items", items.len()));

    let (state, request) = args.to_query(ctx.config.display.items_per_page).into_request()?;
    let window = args.page_window(ctx.config.display.page_window)?;
    let session = DiscoverySession::with_request(state, request);
    let view = session.view(&items);

    output.heading("Discovery Results");
    if view.total_items == 0 {
        output.warning("No items match the current filters");
    } else {
        output.success(&format!("Found {} matching items", view.total_items));
    }

    let report = SearchReport {
        filters: session.state(),
        pages: view.page_window(window),
        view,
    };
    output.display(&report)?;

    if report.view.is_paginated() {
        output.key_value("Pages", &format_page_strip(&report.pages, report.view.current_page));
    }
    if report.view.total_items > 0 {
        output.key_value(
            "Showing",
            &format!(
                "{}-{} of {}",
                report.view.start_index + 1,
                report.view.end_index,
                report.view.total_items
            ),
        );
    }
    let active = session.active_filters_count();
    if active > 0 {
        output.info(&format!("Clear Filters ({active})"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use discovery::search;

    fn catalog() -> Vec<Item> {
        Catalog::from_json_str(
            r#"[
                {"id": "1", "type": "community", "name": "Rust Guild", "category": "Tech", "members": 1200,
                 "rating": 4.8, "priceType": "free", "verified": true, "featured": true},
                {"id": "2", "type": "course", "name": "Watercolor", "category": "Art", "members": 40,
                 "rating": 4.2, "priceType": "monthly", "price": 19.5}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn page_strip_marks_current_page() {
        let pages = search::page_window(5, 10, 1);
        assert_eq!(format_page_strip(&pages, 5), "1 … 4 [5] 6 … 10");
    }

    #[test]
    fn args_fall_back_to_configured_page_size() {
        let args = SearchArgs {
            sort: Some("rating".into()),
            ..Default::default()
        };
        let query = args.to_query(16);
        assert_eq!(query.per_page, Some(16));
        assert_eq!(query.sort.as_deref(), Some("rating"));
    }

    #[test]
    fn window_flag_overrides_config_within_bounds() {
        let args = SearchArgs::default();
        assert_eq!(args.page_window(2).unwrap(), 2);

        let args = SearchArgs {
            window: Some(3),
            ..Default::default()
        };
        assert_eq!(args.page_window(1).unwrap(), 3);

        let args = SearchArgs {
            window: Some(1_000_000_000_000),
            ..Default::default()
        };
        assert!(args.page_window(1).is_err());
    }

    #[test]
    fn compact_summary_and_table_rows() {
        let items = catalog();
        let state = FilterState::new();
        let view = search::run(&items, &state, Default::default());
        let report = SearchReport {
            filters: &state,
            pages: view.page_window(1),
            view,
        };
        assert_eq!(report.to_compact(), "items 1-2 of 2 | page 1/1 | 0 active filters");

        let table = report
            .to_table(&GlobalOptions {
                no_color: true,
                ..Default::default()
            })
            .to_string();
        assert!(table.contains("Rust Guild"));
        assert!(table.contains("19.50 monthly"));
        assert!(table.contains("★ ✓"));
    }

    #[test]
    fn json_report_flattens_view() {
        let items = catalog();
        let state = FilterState::new().with_query("water");
        let view = search::run(&items, &state, Default::default());
        let report = SearchReport {
            filters: &state,
            pages: view.page_window(1),
            view,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["totalItems"], 1);
        assert_eq!(json["activeFiltersCount"], 1);
        assert_eq!(json["visibleItems"][0]["id"], "2");
        assert_eq!(json["filters"]["query"], "water");
        assert_eq!(json["filters"]["category"], "All");
        assert_eq!(json["filters"]["minMembers"], "all");
    }
}
