//! Validation of caller-chosen short names.
//!
//! Names travel as a single path segment (`GET /{name}`), so they are limited
//! to URL-unreserved characters and may not shadow a fixed route.

use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

use crate::error::AppError;

/// Maximum accepted name length in bytes.
pub const MAX_NAME_LENGTH: usize = 128;

static NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._~-]+$").expect("static regex is valid"));

/// Names that collide with fixed routes.
const RESERVED_NAMES: &[&str] = &["api", "health", ".", ".."];

/// Validates a caller-supplied short name.
///
/// # Rules
///
/// - Length: 1-128 bytes
/// - Allowed characters: ASCII letters, digits, `.`, `_`, `~`, `-`
/// - Cannot be a reserved route name
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
///
/// # Examples
///
/// ```ignore
/// assert!(validate_name("promo").is_ok());
/// assert!(validate_name("Spring_Sale-2026").is_ok());
///
/// assert!(validate_name("").is_err());
/// assert!(validate_name("a/b").is_err());
/// assert!(validate_name("health").is_err());
/// ```
pub fn validate_name(name: &str) -> Result<(), AppError> {
    if name.is_empty() || name.len() > MAX_NAME_LENGTH {
        return Err(AppError::bad_request(
            format!("Name must be 1-{MAX_NAME_LENGTH} characters"),
            json!({ "provided_length": name.len() }),
        ));
    }

    if !NAME_REGEX.is_match(name) {
        return Err(AppError::bad_request(
            "Name can only contain letters, digits, '.', '_', '~' and '-'",
            json!({ "name": name }),
        ));
    }

    if RESERVED_NAMES.contains(&name) {
        return Err(AppError::bad_request(
            "This name is reserved",
            json!({ "name": name }),
        ));
    }

    Ok(())
}
