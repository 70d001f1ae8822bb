//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// License Numbers
// =============================================================================

/// Message reported for every license number format violation
pub const INVALID_LICENSE_MESSAGE: &str = "License number should consist of 8 characters";

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum username length
pub const MAX_USERNAME_LENGTH: usize = 150;

/// Maximum length of a driver's first or last name
pub const MAX_PERSON_NAME_LENGTH: usize = 150;

/// Maximum length of manufacturer names, countries and car models
pub const MAX_NAME_LENGTH: usize = 255;

/// Reported for a missing or blank required field
pub const REQUIRED_FIELD_MESSAGE: &str = "This field is required.";

/// Reported when a referenced record does not exist
pub const INVALID_CHOICE_MESSAGE: &str =
    "Select a valid choice. That choice is not one of the available choices.";

// =============================================================================
// Sessions
// =============================================================================

/// Session key holding the dashboard visit counter
pub const VISITS_SESSION_KEY: &str = "num_visits";

/// Session key holding the authenticated driver id
pub const AUTH_SESSION_KEY: &str = "_auth_user_id";
