use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::color::HexColor;

/// How alternate (dark) color values are activated in the generated stylesheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DarkMode {
    /// `prefers-color-scheme` media query. The toolchain's default.
    #[default]
    Media,
    /// An explicit `dark` class on an ancestor element.
    Class,
    /// Dark variants are not generated.
    None,
}

impl DarkMode {
    pub const ALL: [DarkMode; 3] = [DarkMode::Media, DarkMode::Class, DarkMode::None];

    /// Parse the declared strategy name. Matching is exact: `"Class"` is not `"class"`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "media" => Some(Self::Media),
            "class" => Some(Self::Class),
            "none" => Some(Self::None),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Media => "media",
            Self::Class => "class",
            Self::None => "none",
        }
    }
}

impl std::fmt::Display for DarkMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Design tokens layered on top of the generator's default theme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeExtend {
    /// Flat token name (`red-600`, `primary`) to `#rrggbb` / `#rrggbbaa`.
    #[serde(default)]
    pub colors: IndexMap<String, String>,
    /// Role name (`heading`, `sans`) to font stack, most preferred first.
    #[serde(default)]
    pub font_family: IndexMap<String, Vec<String>>,
}

/// The resolved, validated configuration handed to a stylesheet generator.
///
/// Produced once per build by the resolver and never mutated afterwards.
/// Serializes to the same shape the toolchain reads:
///
/// ```json
/// {
///   "content": ["./components/**/*.templ"],
///   "darkMode": "class",
///   "theme": { "extend": { "colors": {}, "fontFamily": {} } },
///   "plugins": [],
///   "safelist": []
/// }
/// ```
///
/// Sets compare by membership, so two configs that differ only in the
/// order safelist entries were declared are equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    #[serde(rename = "content")]
    pub content_globs: IndexSet<String>,
    #[serde(default)]
    pub dark_mode: DarkMode,
    #[serde(rename = "theme", with = "extend_wire", default)]
    pub theme_extend: ThemeExtend,
    #[serde(default)]
    pub plugins: IndexSet<String>,
    #[serde(default)]
    pub safelist: IndexSet<String>,
}

impl ThemeConfig {
    /// Look up a color token and decode it. `None` if the token is missing
    /// or its value is not a valid hex color.
    pub fn color(&self, token: &str) -> Option<HexColor> {
        self.theme_extend
            .colors
            .get(token)
            .and_then(|v| HexColor::parse(v).ok())
    }

    pub fn font_stack(&self, role: &str) -> Option<&[String]> {
        self.theme_extend.font_family.get(role).map(Vec::as_slice)
    }

    pub fn is_safelisted(&self, class: &str) -> bool {
        self.safelist.contains(class)
    }
}

/// `theme_extend` lives under `theme.extend` on the wire.
mod extend_wire {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::ThemeExtend;

    #[derive(Serialize)]
    struct Out<'a> {
        extend: &'a ThemeExtend,
    }

    #[derive(Deserialize)]
    struct In {
        #[serde(default)]
        extend: ThemeExtend,
    }

    pub fn serialize<S: Serializer>(extend: &ThemeExtend, serializer: S) -> Result<S::Ok, S::Error> {
        Out { extend }.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ThemeExtend, D::Error> {
        In::deserialize(deserializer).map(|wire| wire.extend)
    }
}
