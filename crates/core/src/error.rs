use tailor_protocol::HexColorError;
use thiserror::Error;

/// The keyed maps of `theme.extend` that merge key by key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyedMap {
    Colors,
    FontFamily,
}

impl std::fmt::Display for KeyedMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Colors => write!(f, "colors"),
            Self::FontFamily => write!(f, "fontFamily"),
        }
    }
}

/// A single problem found while resolving a configuration.
///
/// Source indices are zero-based positions in the slice passed to `load`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("color {key:?} has malformed value {value:?}: {reason}")]
    MalformedColorValue {
        key: String,
        value: String,
        reason: HexColorError,
    },
    #[error("unsupported darkMode value {value} (expected \"media\", \"class\" or \"none\")")]
    UnsupportedDarkModeValue { value: String },
    #[error("no content globs declared")]
    EmptyContentGlobs,
    #[error(
        "{map} key {key:?} redefined by source #{source_index} (first defined by source #{first_source})"
    )]
    DuplicateKeyConflict {
        map: KeyedMap,
        key: String,
        first_source: usize,
        source_index: usize,
    },
}

/// Every error found by one resolve call, in detection order. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveErrors(Vec<ValidationError>);

impl ResolveErrors {
    pub(crate) fn new(errors: Vec<ValidationError>) -> Self {
        debug_assert!(!errors.is_empty());
        Self(errors)
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }
}

impl std::fmt::Display for ResolveErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0.as_slice() {
            [single] => write!(f, "{single}"),
            errors => {
                write!(f, "{} errors:", errors.len())?;
                for error in errors {
                    write!(f, "\n  - {error}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ResolveErrors {}

impl IntoIterator for ResolveErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResolveErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
