pub mod js_module;
pub mod json;

use tailor_protocol::ThemeSource;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("json: {0}")]
    Json(#[from] json::JsonSourceError),
    #[error("js module: {0}")]
    JsModule(#[from] js_module::JsModuleError),
}

/// Detect the declaration format and parse it.
///
/// Detection strategy:
/// 1. Bytes that parse as a JSON object are a JSON declaration.
/// 2. Anything else is treated as a JavaScript config module
///    (`module.exports = {...}` / `export default {...}`).
pub fn parse_auto(data: &[u8]) -> Result<ThemeSource, SourceError> {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(data)
        && value.is_object()
    {
        return Ok(json::source_from_value(value).map_err(json::JsonSourceError::from)?);
    }
    Ok(js_module::parse_js_module(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_json() {
        let source = parse_auto(br#"{"safelist":["a"]}"#).unwrap();
        assert_eq!(source.safelist.unwrap(), ["a"]);
    }

    #[test]
    fn detects_js_module() {
        let source = parse_auto(b"module.exports = { safelist: ['a'] }").unwrap();
        assert_eq!(source.safelist.unwrap(), ["a"]);
    }

    #[test]
    fn json_shape_errors_are_not_retried_as_js() {
        let err = parse_auto(br#"{"content": 7}"#).unwrap_err();
        assert!(matches!(err, SourceError::Json(_)));
    }

    #[test]
    fn garbage_is_a_js_error() {
        let err = parse_auto(b"<html></html>").unwrap_err();
        assert!(matches!(err, SourceError::JsModule(_)));
    }
}
