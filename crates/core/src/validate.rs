use tailor_protocol::{HexColor, ThemeConfig};

use crate::error::ValidationError;

/// Re-check the invariants of a config without modifying it.
///
/// A config produced by [`crate::load`] always passes; this exists for
/// snapshots that were deserialized or assembled by hand. Errors are
/// reported content first, then colors in declaration order.
pub fn validate(config: &ThemeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.content_globs.iter().all(|glob| glob.trim().is_empty()) {
        errors.push(ValidationError::EmptyContentGlobs);
    }

    for (key, value) in &config.theme_extend.colors {
        if let Err(reason) = HexColor::parse(value) {
            errors.push(ValidationError::MalformedColorValue {
                key: key.clone(),
                value: value.clone(),
                reason,
            });
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
