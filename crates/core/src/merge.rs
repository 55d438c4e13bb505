use std::collections::HashMap;
use std::fmt::Debug;

use indexmap::{IndexMap, IndexSet};
use tailor_protocol::{DarkMode, DarkModeDecl, ThemeConfig, ThemeExtend, ThemeSource};
use tracing::{debug, trace, warn};

use crate::error::{KeyedMap, ValidationError};
use crate::resolver::{MergePolicy, ResolverOptions};

/// A keyed map assembled from several sources, remembering which sources
/// first and last declared each key.
struct Layered<V> {
    map: KeyedMap,
    values: IndexMap<String, V>,
    defined_by: HashMap<String, (usize, usize)>,
}

impl<V: PartialEq + Debug> Layered<V> {
    fn new(map: KeyedMap) -> Self {
        Self {
            map,
            values: IndexMap::new(),
            defined_by: HashMap::new(),
        }
    }

    /// Later sources win. A key keeps the position of its first declaration.
    ///
    /// A key declared twice within one source, such as `blue-500` next to a
    /// `blue` group with a `500` shade, is a plain override even under
    /// [`MergePolicy::Strict`].
    fn set(
        &mut self,
        key: String,
        value: V,
        source: usize,
        policy: MergePolicy,
    ) -> Option<ValidationError> {
        let defined_by = self.defined_by.get(&key).copied();
        let conflict = match self.values.get(&key) {
            None => None,
            Some(previous) if *previous == value => {
                trace!(map = %self.map, key = %key, source, "identical redefinition");
                None
            }
            Some(previous) if defined_by.is_some_and(|(_, last)| last == source) => {
                debug!(
                    map = %self.map,
                    key = %key,
                    source,
                    previous = ?previous,
                    value = ?value,
                    "key declared twice in one source"
                );
                None
            }
            Some(previous) => {
                debug!(
                    map = %self.map,
                    key = %key,
                    source,
                    previous = ?previous,
                    value = ?value,
                    "overriding earlier value"
                );
                (policy == MergePolicy::Strict).then(|| ValidationError::DuplicateKeyConflict {
                    map: self.map,
                    key: key.clone(),
                    first_source: defined_by.map_or(source, |(first, _)| first),
                    source_index: source,
                })
            }
        };
        let first = defined_by.map_or(source, |(first, _)| first);
        self.defined_by.insert(key.clone(), (first, source));
        self.values.insert(key, value);
        conflict
    }
}

/// Fold `sources` left to right into a single config.
///
/// Returns the merged config together with the errors only the merge itself
/// can see: an unsupported `darkMode` and, under [`MergePolicy::Strict`],
/// conflicting redefinitions. Value-level checks are left to
/// [`crate::validate`].
pub(crate) fn merge(
    sources: &[ThemeSource],
    options: &ResolverOptions,
) -> (ThemeConfig, Vec<ValidationError>) {
    let mut errors = Vec::new();
    let mut content_globs = IndexSet::new();
    let mut plugins = IndexSet::new();
    let mut safelist = IndexSet::new();
    let mut colors = Layered::new(KeyedMap::Colors);
    let mut font_family = Layered::new(KeyedMap::FontFamily);
    let mut dark_mode: Option<&DarkModeDecl> = None;

    for (index, source) in sources.iter().enumerate() {
        if let Some(content) = &source.content {
            union_into(&mut content_globs, content.globs(), "content", index);
        }
        if let Some(decl) = &source.dark_mode
            && !decl.is_empty()
        {
            dark_mode = Some(decl);
        }
        if let Some(extend) = source.extend() {
            for (name, decl) in &extend.colors {
                for (token, value) in decl.flatten(name) {
                    errors.extend(colors.set(token, value, index, options.merge_policy));
                }
            }
            for (role, stack) in &extend.font_family {
                errors.extend(font_family.set(
                    role.clone(),
                    stack.to_stack(),
                    index,
                    options.merge_policy,
                ));
            }
        }
        if let Some(list) = &source.plugins {
            union_into(&mut plugins, list, "plugins", index);
        }
        if let Some(list) = &source.safelist {
            union_into(&mut safelist, list, "safelist", index);
        }
    }

    let dark_mode = match dark_mode {
        None => options.default_dark_mode,
        Some(decl) => dark_mode_from_decl(decl).unwrap_or_else(|| {
            errors.push(ValidationError::UnsupportedDarkModeValue {
                value: decl.to_string(),
            });
            options.default_dark_mode
        }),
    };

    let config = ThemeConfig {
        content_globs,
        dark_mode,
        theme_extend: ThemeExtend {
            colors: colors.values,
            font_family: font_family.values,
        },
        plugins,
        safelist,
    };
    (config, errors)
}

fn dark_mode_from_decl(decl: &DarkModeDecl) -> Option<DarkMode> {
    match decl {
        DarkModeDecl::Name(name) => DarkMode::from_name(name),
        DarkModeDecl::Flag(false) => Some(DarkMode::None),
        DarkModeDecl::Flag(true) => None,
    }
}

/// Set union keeping first-seen order. Blank entries are dropped.
fn union_into(set: &mut IndexSet<String>, items: &[String], field: &'static str, source: usize) {
    for item in items {
        if item.trim().is_empty() {
            warn!(field, source, "dropping blank entry");
            continue;
        }
        if !set.insert(item.clone()) {
            trace!(field, source, item = %item, "duplicate collapsed");
        }
    }
}
