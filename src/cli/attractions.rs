//! Attractions command implementation

use crate::api::AppState;
use crate::cli::output::{format_attractions_json, format_attractions_table};
use crate::cli::AttractionsArgs;
use crate::config::AtlasConfig;
use crate::slots::{SlotField, SlotRecord};
use crate::travel::AttractionQuery;
use colored::Colorize;
use serde_json::Value;
use std::sync::Arc;

fn load_config(args: &AttractionsArgs) -> Result<AtlasConfig, Box<dyn std::error::Error>> {
    let config = if args.config.exists() {
        AtlasConfig::load(Some(&args.config))?
    } else {
        AtlasConfig::default()
    };
    let config = config.with_env_overrides();
    config.validate()?;
    Ok(config)
}

/// Preferences built from the command's flags.
pub fn preferences_from_args(args: &AttractionsArgs) -> SlotRecord {
    let mut prefs = SlotRecord::new();
    prefs.set(SlotField::City, Value::String(args.city.clone()));
    if let Some(hobbies) = args.hobbies.as_deref().filter(|h| !h.trim().is_empty()) {
        prefs.set(SlotField::Hobbies, Value::String(hobbies.to_string()));
    }
    prefs
}

/// Handle `atlas attractions` command
pub async fn handle_attractions(args: &AttractionsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(args)?;
    let maps_key = config.require_maps_api_key()?;
    let state = AppState::from_config(Arc::new(config), maps_key)?;

    let limits = state.travel.limits();
    let number = args.number.unwrap_or(limits.default_number);
    if number == 0 {
        return Err("--number must be at least 1".into());
    }
    let query = AttractionQuery {
        number,
        sort: args.sort_by,
        radius: limits.default_radius,
        ..AttractionQuery::default()
    };

    let prefs = preferences_from_args(args);
    let location = state.travel.city_to_location(&args.city).await;
    let attractions = state
        .travel
        .attractions(location, Some(&args.city), &prefs, None, &query)
        .await;

    if args.json {
        println!("{}", format_attractions_json(&args.city, location, &attractions));
        return Ok(());
    }

    println!(
        "{} {} ({})",
        "Attractions in".bold(),
        args.city.bold(),
        location
    );
    println!("{}", format_attractions_table(&attractions));
    if attractions.iter().any(|a| a.is_fallback()) {
        println!(
            "{}",
            "Some results are built-in substitutes; the places provider did not answer.".yellow()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommend::SortKey;
    use std::path::PathBuf;

    fn args(hobbies: Option<&str>) -> AttractionsArgs {
        AttractionsArgs {
            city: "Cusco".to_string(),
            number: None,
            sort_by: SortKey::Rating,
            hobbies: hobbies.map(String::from),
            json: false,
            config: PathBuf::from("nonexistent.toml"),
        }
    }

    #[test]
    fn test_preferences_from_args_city_only() {
        let prefs = preferences_from_args(&args(None));
        assert_eq!(prefs.get_text(SlotField::City).as_deref(), Some("Cusco"));
        assert!(!prefs.is_filled(SlotField::Hobbies));
    }

    #[test]
    fn test_preferences_from_args_ignores_blank_hobbies() {
        let prefs = preferences_from_args(&args(Some("  ")));
        assert!(!prefs.is_filled(SlotField::Hobbies));

        let prefs = preferences_from_args(&args(Some("hiking")));
        assert_eq!(prefs.get_text(SlotField::Hobbies).as_deref(), Some("hiking"));
    }

    #[test]
    fn test_load_config_defaults_without_file() {
        let config = load_config(&args(None)).unwrap();
        assert_eq!(config.server.port, 8000);
    }
}
