use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::ThemeConfig;

/// One partial configuration declaration, exactly as written.
///
/// Every field is optional: a later revision may only touch `colors`, or only
/// add a `safelist`. Values are kept raw (unvalidated) so the resolver can
/// report every problem in one pass instead of failing on the first one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentDecl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark_mode: Option<DarkModeDecl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugins: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safelist: Option<Vec<String>>,
}

/// `content` is either a bare list of globs or `{ files: [...] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentDecl {
    Globs(Vec<String>),
    Files { files: Vec<String> },
}

impl ContentDecl {
    pub fn globs(&self) -> &[String] {
        match self {
            Self::Globs(globs) | Self::Files { files: globs } => globs,
        }
    }
}

/// Raw `darkMode` value: a strategy name, or the legacy `false` switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DarkModeDecl {
    Flag(bool),
    Name(String),
}

impl DarkModeDecl {
    /// Empty names count as "not declared" and never override an earlier value.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Name(name) if name.trim().is_empty())
    }
}

impl std::fmt::Display for DarkModeDecl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flag(flag) => write!(f, "{flag}"),
            Self::Name(name) => write!(f, "{name:?}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemeSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extend: Option<ExtendSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendSection {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub colors: IndexMap<String, ColorDecl>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub font_family: IndexMap<String, FontStackDecl>,
}

/// A color entry: either a single value or a named group of shades.
///
/// `{ "blue": { "DEFAULT": "#...", "500": "#..." } }` declares the tokens
/// `blue` and `blue-500`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorDecl {
    Value(String),
    Group(IndexMap<String, ColorDecl>),
}

/// Group key that names the group token itself rather than a shade.
pub const DEFAULT_SHADE: &str = "DEFAULT";

impl ColorDecl {
    /// Flatten this entry into `(token, value)` pairs, in declaration order.
    pub fn flatten(&self, name: &str) -> Vec<(String, String)> {
        let mut out = Vec::new();
        self.flatten_into(name, &mut out);
        out
    }

    fn flatten_into(&self, name: &str, out: &mut Vec<(String, String)>) {
        match self {
            Self::Value(value) => out.push((name.to_string(), value.clone())),
            Self::Group(shades) => {
                for (shade, decl) in shades {
                    if shade == DEFAULT_SHADE {
                        decl.flatten_into(name, out);
                    } else {
                        decl.flatten_into(&format!("{name}-{shade}"), out);
                    }
                }
            }
        }
    }
}

/// A font stack: a list of family names, or a single name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FontStackDecl {
    One(String),
    Many(Vec<String>),
}

impl FontStackDecl {
    pub fn to_stack(&self) -> Vec<String> {
        match self {
            Self::One(name) => vec![name.clone()],
            Self::Many(names) => names.clone(),
        }
    }
}

impl ThemeSource {
    pub fn extend(&self) -> Option<&ExtendSection> {
        self.theme.as_ref().and_then(|t| t.extend.as_ref())
    }
}

/// A resolved config re-expressed as a source, so it can be layered again.
impl From<&ThemeConfig> for ThemeSource {
    fn from(config: &ThemeConfig) -> Self {
        let extend = ExtendSection {
            colors: config
                .theme_extend
                .colors
                .iter()
                .map(|(k, v)| (k.clone(), ColorDecl::Value(v.clone())))
                .collect(),
            font_family: config
                .theme_extend
                .font_family
                .iter()
                .map(|(k, v)| (k.clone(), FontStackDecl::Many(v.clone())))
                .collect(),
        };
        Self {
            content: Some(ContentDecl::Globs(
                config.content_globs.iter().cloned().collect(),
            )),
            dark_mode: Some(DarkModeDecl::Name(config.dark_mode.as_str().to_string())),
            theme: Some(ThemeSection {
                extend: Some(extend),
            }),
            plugins: Some(config.plugins.iter().cloned().collect()),
            safelist: Some(config.safelist.iter().cloned().collect()),
        }
    }
}

impl From<ThemeConfig> for ThemeSource {
    fn from(config: ThemeConfig) -> Self {
        Self::from(&config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_partial_declarations() {
        let src: ThemeSource =
            serde_json::from_str(r##"{"theme":{"extend":{"colors":{"red-600":"#D62E2E"}}}}"##)
                .unwrap();
        assert!(src.content.is_none());
        assert!(src.dark_mode.is_none());
        let colors = &src.extend().unwrap().colors;
        assert_eq!(colors["red-600"], ColorDecl::Value("#D62E2E".into()));
    }

    #[test]
    fn content_accepts_both_shapes() {
        let bare: ThemeSource = serde_json::from_str(r#"{"content":["a/**/*.templ"]}"#).unwrap();
        let files: ThemeSource =
            serde_json::from_str(r#"{"content":{"files":["a/**/*.templ"]}}"#).unwrap();
        assert_eq!(bare.content.unwrap().globs(), files.content.unwrap().globs());
    }

    #[test]
    fn dark_mode_keeps_raw_value() {
        let src: ThemeSource = serde_json::from_str(r#"{"darkMode":"toggle"}"#).unwrap();
        assert_eq!(src.dark_mode, Some(DarkModeDecl::Name("toggle".into())));
        let legacy: ThemeSource = serde_json::from_str(r#"{"darkMode":false}"#).unwrap();
        assert_eq!(legacy.dark_mode, Some(DarkModeDecl::Flag(false)));
        assert!(DarkModeDecl::Name("  ".into()).is_empty());
    }

    #[test]
    fn color_groups_flatten_with_default() {
        let decl: ColorDecl = serde_json::from_str(
            r##"{"DEFAULT":"#3B82F6","500":"#3B82F6","dark":{"DEFAULT":"#1E3A8A","900":"#172554"}}"##,
        )
        .unwrap();
        let flat = decl.flatten("blue");
        let names: Vec<&str> = flat.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, ["blue", "blue-500", "blue-dark", "blue-dark-900"]);
    }

    #[test]
    fn font_stack_accepts_single_name() {
        let one: FontStackDecl = serde_json::from_str(r#""Raleway""#).unwrap();
        let many: FontStackDecl = serde_json::from_str(r#"["Arial","sans-serif"]"#).unwrap();
        assert_eq!(one.to_stack(), ["Raleway"]);
        assert_eq!(many.to_stack(), ["Arial", "sans-serif"]);
    }

    #[test]
    fn resolved_config_converts_back() {
        let mut config = ThemeConfig::default();
        config.content_globs.insert("x/**/*.html".into());
        config.plugins.insert("@tailwindcss/forms".into());
        let src = ThemeSource::from(&config);
        assert_eq!(src.content.unwrap().globs(), ["x/**/*.html"]);
        assert_eq!(src.dark_mode, Some(DarkModeDecl::Name("media".into())));
        assert_eq!(src.plugins.unwrap(), ["@tailwindcss/forms"]);
    }
}
