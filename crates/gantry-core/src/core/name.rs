//! Naming rules for services and providers.

use super::error::{GantryError, GantryResult};

/// Validate a service or provider name.
///
/// Names are lookup keys for the lifetime of the process, so an empty or
/// whitespace-only name is rejected up front rather than surfacing later as
/// an unresolvable parameter.
pub fn validate_name(name: &str) -> GantryResult<()> {
    if name.trim().is_empty() {
        return Err(GantryError::Name(
            "service and provider names must be non-empty".to_string(),
        ));
    }
    Ok(())
}
