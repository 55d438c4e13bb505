use serde_json::Value;
use tailor_protocol::ThemeSource;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum JsonSourceError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a configuration object, found {0}")]
    NotAnObject(&'static str),
}

const KNOWN_KEYS: [&str; 5] = ["content", "darkMode", "theme", "plugins", "safelist"];

/// Parse a single JSON configuration object.
pub fn parse_json(data: &[u8]) -> Result<ThemeSource, JsonSourceError> {
    let value: Value = serde_json::from_slice(data)?;
    if !value.is_object() {
        return Err(JsonSourceError::NotAnObject(kind_of(&value)));
    }
    Ok(source_from_value(value)?)
}

/// Parse either one configuration object or an array of them, in order.
pub fn parse_json_sources(data: &[u8]) -> Result<Vec<ThemeSource>, JsonSourceError> {
    let value: Value = serde_json::from_slice(data)?;
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| {
                if item.is_object() {
                    Ok(source_from_value(item)?)
                } else {
                    Err(JsonSourceError::NotAnObject(kind_of(&item)))
                }
            })
            .collect(),
        Value::Object(_) => Ok(vec![source_from_value(value)?]),
        other => Err(JsonSourceError::NotAnObject(kind_of(&other))),
    }
}

/// Convert an already-evaluated configuration object into a [`ThemeSource`].
///
/// Keys outside the supported surface are logged and ignored rather than
/// rejected, since real configs routinely carry generator-only settings.
pub(crate) fn source_from_value(value: Value) -> Result<ThemeSource, serde_json::Error> {
    if let Some(object) = value.as_object() {
        for key in object.keys() {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                debug!(key = %key, "ignoring unsupported configuration key");
            }
        }
        if let Some(theme) = object.get("theme").and_then(Value::as_object) {
            for key in theme.keys().filter(|key| key.as_str() != "extend") {
                warn!(key = %key, "only theme.extend is merged; ignoring theme.{key}");
            }
        }
    }
    serde_json::from_value(value)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_object() {
        let data = br##"{
            "content": ["./web/**/*.templ"],
            "darkMode": "class",
            "prefix": "tw-",
            "theme": {"screens": {}, "extend": {"colors": {"primary": "#1F1F25"}}},
            "plugins": [],
            "safelist": ["hidden"]
        }"##;
        let source = parse_json(data).unwrap();
        assert_eq!(source.content.as_ref().unwrap().globs(), ["./web/**/*.templ"]);
        assert_eq!(source.safelist.as_ref().unwrap(), &["hidden"]);
        assert!(source.extend().unwrap().colors.contains_key("primary"));
    }

    #[test]
    fn rejects_non_objects() {
        assert!(matches!(
            parse_json(b"[1, 2]"),
            Err(JsonSourceError::NotAnObject("an array"))
        ));
        assert!(matches!(parse_json(b"{"), Err(JsonSourceError::Json(_))));
    }

    #[test]
    fn wrong_shape_is_a_json_error() {
        assert!(matches!(
            parse_json(br#"{"content": "not-a-list"}"#),
            Err(JsonSourceError::Json(_))
        ));
    }

    #[test]
    fn parses_source_lists() {
        let sources =
            parse_json_sources(br#"[{"safelist":["a"]},{"darkMode":"class"}]"#).unwrap();
        assert_eq!(sources.len(), 2);
        let single = parse_json_sources(br#"{"safelist":["a"]}"#).unwrap();
        assert_eq!(single.len(), 1);
        assert!(parse_json_sources(br#"[{"safelist":["a"]}, 3]"#).is_err());
    }
}
