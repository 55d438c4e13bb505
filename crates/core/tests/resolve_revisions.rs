//! Integration test: parse successive revisions of a real theme configuration
//! and verify they layer into one resolved snapshot.

use tailor_core::parsers::{js_module, json, parse_auto};
use tailor_core::{
    DarkMode, KeyedMap, Resolver, ThemeSource, ValidationError, load, validate,
};
use tailor_protocol::HexColor;

const TEMPLATES: &str = "./internal/pkg/presentation/web/components/**/*.templ";

fn revisions() -> Vec<ThemeSource> {
    vec![
        js_module::parse_js_module(include_bytes!("fixtures/base.config.js"))
            .expect("failed to parse base config"),
        js_module::parse_js_module(include_bytes!("fixtures/palette.config.js"))
            .expect("failed to parse palette config"),
        json::parse_json(include_bytes!("fixtures/palette-revision.json"))
            .expect("failed to parse palette revision"),
    ]
}

#[test]
fn base_config_resolves_on_its_own() {
    let base = &revisions()[0];
    let config = load(std::slice::from_ref(base)).expect("base config should resolve");

    assert_eq!(config.content_globs.len(), 1);
    assert!(config.content_globs.contains(TEMPLATES));
    assert_eq!(config.dark_mode, DarkMode::Media);
    assert_eq!(config.font_stack("heading"), Some(&["Raleway".to_string()][..]));
    assert!(config.theme_extend.colors.is_empty());
    assert!(config.plugins.is_empty());
    assert!(config.safelist.is_empty());
}

#[test]
fn revisions_layer_key_by_key() {
    let config = load(&revisions()).expect("revisions should resolve");
    let colors = &config.theme_extend.colors;

    // Later revision wins for redefined tokens.
    assert_eq!(colors["red-600"], "#FF0000");
    // Tokens only the earlier revision declared survive.
    assert_eq!(colors["green-700"], "#00733B");
    assert_eq!(colors["blue"], "#1C64F2");
    assert_eq!(colors["blue-600"], "#1F5FAD");
    // New tokens are added.
    assert_eq!(colors["white"], "#FFFFFF");
    assert_eq!(
        config.color("primary-surface-white"),
        Some(HexColor::rgba(0xff, 0xff, 0xff, 0xcc))
    );

    assert_eq!(
        config.font_stack("sans"),
        Some(&["Arial".to_string(), "Helvetica".to_string(), "sans-serif".to_string()][..])
    );
    assert_eq!(config.font_stack("heading"), Some(&["Raleway".to_string()][..]));

    assert_eq!(config.content_globs.len(), 2);
    assert_eq!(config.content_globs.first().map(String::as_str), Some(TEMPLATES));
    assert_eq!(config.dark_mode, DarkMode::Class);
    assert!(config.is_safelisted("bg-red-600"));
    assert_eq!(config.safelist.len(), 3);
    assert_eq!(validate(&config), Ok(()));
}

#[test]
fn strict_resolver_flags_the_tweaked_red() {
    let errors = Resolver::strict()
        .load(&revisions())
        .expect_err("strict resolve should report redefinitions");

    let conflicts: Vec<(&KeyedMap, &str)> = errors
        .iter()
        .filter_map(|e| match e {
            ValidationError::DuplicateKeyConflict { map, key, .. } => Some((map, key.as_str())),
            _ => None,
        })
        .collect();
    // gray-30 is redeclared with the same value and is not a conflict.
    assert_eq!(
        conflicts,
        [(&KeyedMap::Colors, "red-600"), (&KeyedMap::FontFamily, "sans")]
    );
}

#[test]
fn resolved_snapshot_reloads_identically() {
    let once = load(&revisions()).expect("revisions should resolve");
    let json = serde_json::to_vec(&once).expect("config serializes");
    let reparsed = parse_auto(&json).expect("serialized config parses as a source");
    let twice = load(&[reparsed]).expect("snapshot should resolve");
    assert_eq!(twice, once);
}

#[test]
fn broken_config_reports_every_problem() {
    let broken = parse_auto(include_bytes!("fixtures/broken.config.js"))
        .expect("broken config is still well-formed");
    let errors = load(&[broken]).expect_err("broken config must not resolve");

    let kinds: Vec<&str> = errors
        .iter()
        .map(|e| match e {
            ValidationError::MalformedColorValue { .. } => "color",
            ValidationError::UnsupportedDarkModeValue { .. } => "dark-mode",
            ValidationError::EmptyContentGlobs => "content",
            ValidationError::DuplicateKeyConflict { .. } => "conflict",
        })
        .collect();
    assert_eq!(kinds, ["dark-mode", "content", "color"]);
}

#[test]
fn later_content_rescues_an_empty_revision() {
    let broken = parse_auto(b"module.exports = { content: [] }").expect("parses");
    let config = load(&[broken, revisions().remove(0)]).expect("content comes from base");
    assert!(config.content_globs.contains(TEMPLATES));
}
