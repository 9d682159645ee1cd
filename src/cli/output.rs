//! Output formatting helpers for CLI commands

use crate::geo::LatLng;
use crate::recommend::{Candidate, Provenance};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde_json::json;

fn price_tier(level: Option<u8>) -> String {
    match level {
        Some(0) => "Free".to_string(),
        Some(n) => "$".repeat(n as usize),
        None => "-".to_string(),
    }
}

/// Format attractions as a table
pub fn format_attractions_table(attractions: &[Candidate]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Name", "Category", "Rating", "Price", "Hours", "Source"]);

    for (i, a) in attractions.iter().enumerate() {
        let rating = match a.rating {
            Some(r) => format!("{:.1}", r),
            None => "-".to_string(),
        };
        let source = match a.provenance {
            Provenance::Provider => "provider".green().to_string(),
            Provenance::Fallback => "fallback".yellow().to_string(),
        };

        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&a.name),
            Cell::new(&a.category),
            Cell::new(rating),
            Cell::new(price_tier(a.price_level)),
            Cell::new(format!("{:.1}h", a.estimated_duration)),
            Cell::new(source),
        ]);
    }

    table.to_string()
}

/// Format attractions as JSON
pub fn format_attractions_json(city: &str, location: LatLng, attractions: &[Candidate]) -> String {
    serde_json::to_string_pretty(&json!({
        "city": city,
        "location": location,
        "attractions": attractions,
    }))
    .unwrap_or_default()
}
