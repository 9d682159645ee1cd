//! Session id generation

use uuid::Uuid;

/// Generate a new session ID using UUID v4
///
/// # Examples
///
/// ```
/// use atlas::logging::generate_session_id;
///
/// let session_id = generate_session_id();
/// assert_eq!(session_id.len(), 36);
/// ```
pub fn generate_session_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_session_id_format() {
        let id = generate_session_id();
        assert_eq!(id.len(), 36);
        assert_eq!(id.chars().filter(|&c| c == '-').count(), 4);
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn test_generate_session_id_uniqueness() {
        assert_ne!(generate_session_id(), generate_session_id());
    }
}
