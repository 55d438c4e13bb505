use serde::{Deserialize, Serialize};
use tailor_protocol::{DarkMode, ThemeConfig, ThemeSource};
use tracing::{debug, warn};

use crate::error::ResolveErrors;
use crate::merge::merge;
use crate::validate::validate;

/// What happens when a later source redefines a `colors` or `fontFamily` key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergePolicy {
    /// The later value silently replaces the earlier one.
    #[default]
    Override,
    /// The later value still wins, but a redefinition with a different value
    /// is reported as `DuplicateKeyConflict`.
    Strict,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolverOptions {
    pub merge_policy: MergePolicy,
    /// Strategy used when no source declares `darkMode`.
    pub default_dark_mode: DarkMode,
}

/// Merges partial declarations into one validated [`ThemeConfig`].
///
/// Holds only options; every [`Resolver::load`] call is independent.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    options: ResolverOptions,
}

impl Resolver {
    pub fn new(options: ResolverOptions) -> Self {
        Self { options }
    }

    pub fn strict() -> Self {
        Self::new(ResolverOptions {
            merge_policy: MergePolicy::Strict,
            ..ResolverOptions::default()
        })
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Merge `sources` in order (later wins per key) and validate the result.
    ///
    /// Merge rules:
    /// - `colors` / `fontFamily`: key union, later value replaces earlier.
    /// - `content`, `plugins`, `safelist`: set union, first-seen order kept.
    /// - `darkMode`: last non-empty declaration, else the configured default.
    ///
    /// All problems are collected; merge errors (conflicts, dark mode) come
    /// before validation errors (content, colors).
    pub fn load(&self, sources: &[ThemeSource]) -> Result<ThemeConfig, ResolveErrors> {
        debug!(
            sources = sources.len(),
            policy = ?self.options.merge_policy,
            "resolving theme configuration"
        );
        let (config, mut errors) = merge(sources, &self.options);
        if let Err(invalid) = validate(&config) {
            errors.extend(invalid);
        }

        if errors.is_empty() {
            debug!(
                content = config.content_globs.len(),
                colors = config.theme_extend.colors.len(),
                fonts = config.theme_extend.font_family.len(),
                safelist = config.safelist.len(),
                dark_mode = %config.dark_mode,
                "theme configuration resolved"
            );
            Ok(config)
        } else {
            warn!(errors = errors.len(), "theme configuration rejected");
            Err(ResolveErrors::new(errors))
        }
    }
}

/// Resolve with default options (override policy, `media` dark mode).
pub fn load(sources: &[ThemeSource]) -> Result<ThemeConfig, ResolveErrors> {
    Resolver::default().load(sources)
}
