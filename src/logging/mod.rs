//! Structured logging helpers
//!
//! Filter construction for `tracing-subscriber`, session id generation and
//! privacy-aware previews of conversation text.

pub mod fields;
pub mod middleware;

pub use fields::{field_list, message_preview};
pub use middleware::generate_session_id;

/// Build filter directives string from LoggingConfig
///
/// Constructs a tracing filter string that includes the base log level
/// and any component-specific log levels configured in the LoggingConfig.
///
/// # Returns
///
/// A filter string in the format: "base_level,atlas::component1=level1,atlas::component2=level2"
///
/// # Examples
///
/// ```
/// use atlas::config::logging::{LogFormat, LoggingConfig};
/// use atlas::logging::build_filter_directives;
/// use std::collections::HashMap;
///
/// let mut component_levels = HashMap::new();
/// component_levels.insert("oracle".to_string(), "debug".to_string());
///
/// let config = LoggingConfig {
///     level: "info".to_string(),
///     format: LogFormat::Pretty,
///     component_levels: Some(component_levels),
///     log_conversation: false,
/// };
///
/// assert_eq!(build_filter_directives(&config), "info,atlas::oracle=debug");
/// ```
pub fn build_filter_directives(config: &crate::config::LoggingConfig) -> String {
    let mut filter_str = config.level.clone();

    if let Some(component_levels) = &config.component_levels {
        let mut components: Vec<_> = component_levels.iter().collect();
        components.sort();
        for (component, level) in components {
            filter_str.push_str(&format!(",atlas::{}={}", component, level));
        }
    }

    filter_str
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoggingConfig;
    use std::collections::HashMap;

    #[test]
    fn test_filter_without_components() {
        let config = LoggingConfig::default();
        assert_eq!(build_filter_directives(&config), "info");
    }

    #[test]
    fn test_filter_components_are_ordered() {
        let mut levels = HashMap::new();
        levels.insert("session".to_string(), "trace".to_string());
        levels.insert("api".to_string(), "warn".to_string());
        let config = LoggingConfig {
            level: "debug".to_string(),
            component_levels: Some(levels),
            ..Default::default()
        };
        assert_eq!(
            build_filter_directives(&config),
            "debug,atlas::api=warn,atlas::session=trace"
        );
    }
}
