//! Loads partial theme declarations, merges them in order and validates the
//! result into a [`ThemeConfig`] ready for a stylesheet generator.

pub mod error;
mod merge;
pub mod parsers;
pub mod resolver;
pub mod validate;

pub use error::{KeyedMap, ResolveErrors, ValidationError};
pub use resolver::{MergePolicy, Resolver, ResolverOptions, load};
pub use tailor_protocol::{DarkMode, ThemeConfig, ThemeSource};
pub use validate::validate;
