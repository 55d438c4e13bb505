use serde::Serialize;
use tailor_core::parsers::{js_module, json};
use tailor_core::{MergePolicy, Resolver, ResolverOptions, ThemeSource};
use tailor_protocol::ThemeConfig;
use wasm_bindgen::prelude::*;

/// Resolve a JSON array of source objects (lowest precedence first).
///
/// Returns the resolved config as JSON. On failure the error message is a
/// JSON array of human-readable error strings.
#[wasm_bindgen]
pub fn resolve_theme(sources_json: &str, strict: bool) -> Result<String, JsError> {
    resolve(sources_json, strict).map_err(|e| JsError::new(&e))
}

/// Re-check a previously resolved config. Errors as in [`resolve_theme`].
#[wasm_bindgen]
pub fn validate_theme(config_json: &str) -> Result<(), JsError> {
    validate(config_json).map_err(|e| JsError::new(&e))
}

/// Evaluate a JS configuration module and return it as a JSON source object.
#[wasm_bindgen]
pub fn js_config_to_json(module_text: &str) -> Result<String, JsError> {
    js_to_json(module_text).map_err(|e| JsError::new(&e))
}

fn resolve(sources_json: &str, strict: bool) -> Result<String, String> {
    let sources: Vec<ThemeSource> =
        json::parse_json_sources(sources_json.as_bytes()).map_err(|e| error_list([e]))?;
    let options = ResolverOptions {
        merge_policy: if strict {
            MergePolicy::Strict
        } else {
            MergePolicy::Override
        },
        ..ResolverOptions::default()
    };
    let config = Resolver::new(options)
        .load(&sources)
        .map_err(error_list)?;
    to_json(&config)
}

fn validate(config_json: &str) -> Result<(), String> {
    let config: ThemeConfig = serde_json::from_str(config_json).map_err(|e| error_list([e]))?;
    tailor_core::validate(&config).map_err(error_list)
}

fn js_to_json(module_text: &str) -> Result<String, String> {
    let source = js_module::parse_js_module(module_text.as_bytes()).map_err(|e| error_list([e]))?;
    to_json(&source)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| error_list([e]))
}

fn error_list<E: std::fmt::Display>(errors: impl IntoIterator<Item = E>) -> String {
    let messages: Vec<String> = errors.into_iter().map(|e| e.to_string()).collect();
    serde_json::to_string(&messages).unwrap_or_else(|_| messages.join("\n"))
}
