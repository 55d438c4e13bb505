use std::collections::HashMap;

use serde_json::{Map, Number, Value};
use tailor_protocol::ThemeSource;
use thiserror::Error;
use tracing::trace;

use super::json::source_from_value;

/// Objects and arrays nested deeper than this are rejected.
const MAX_DEPTH: usize = 64;

#[derive(Debug, Error)]
pub enum JsModuleError {
    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("line {line}, column {column}: {kind}")]
    Syntax {
        line: usize,
        column: usize,
        kind: SyntaxErrorKind,
    },
    #[error("invalid configuration: {0}")]
    Shape(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    #[error("no `module.exports =` or `export default` found")]
    MissingExport,
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("unexpected character {0:?}")]
    UnexpectedChar(char),
    #[error("expected {expected}, found {found:?}")]
    Expected { expected: &'static str, found: char },
    #[error("unterminated string")]
    UnterminatedString,
    #[error("unterminated comment")]
    UnterminatedComment,
    #[error("invalid escape sequence")]
    InvalidEscape,
    #[error("invalid number {0:?}")]
    InvalidNumber(String),
    #[error("nesting deeper than {} levels", MAX_DEPTH)]
    TooDeep,
    #[error("unsupported expression: {0}")]
    Unsupported(String),
}

/// Parse a JavaScript configuration module into a [`ThemeSource`].
///
/// Only the data subset of JavaScript is evaluated:
///
/// ```js
/// /** @type {import('tailwindcss').Config} */
/// const defaultTheme = require('tailwindcss/defaultTheme')
///
/// module.exports = {
///   content: ['./components/**/*.templ'],
///   theme: { extend: { fontFamily: { heading: ['Raleway'] } } },
///   plugins: [require('@tailwindcss/forms')],
/// }
/// ```
///
/// Statements before the export are skipped, except `const`/`let`/`var`
/// bindings to literals, which the export may reference by name.
/// `require('pkg')` evaluates to the string `"pkg"`. Spreads, member access
/// and other calls are reported as [`SyntaxErrorKind::Unsupported`].
pub fn parse_js_module(data: &[u8]) -> Result<ThemeSource, JsModuleError> {
    let text = std::str::from_utf8(data)?;
    let value = evaluate_exports(text)?;
    Ok(source_from_value(value)?)
}

/// Evaluate the module's exported value to JSON.
pub fn evaluate_exports(text: &str) -> Result<Value, JsModuleError> {
    Parser::new(text).module()
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
    /// Bound literals with their nesting depth.
    bindings: HashMap<String, (Value, usize)>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            depth: 0,
            bindings: HashMap::new(),
        }
    }

    // --- Cursor ---

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    /// Consume `word` only if it is not the prefix of a longer identifier.
    fn eat_word(&mut self, word: &str) -> bool {
        let rest = self.rest();
        if rest.starts_with(word) && !rest[word.len()..].starts_with(is_ident_continue) {
            self.pos += word.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char, expected: &'static str) -> Result<(), JsModuleError> {
        match self.peek() {
            Some(found) if found == c => {
                self.pos += c.len_utf8();
                Ok(())
            }
            Some(found) => Err(self.error(SyntaxErrorKind::Expected { expected, found })),
            None => Err(self.error(SyntaxErrorKind::UnexpectedEof)),
        }
    }

    fn error(&self, kind: SyntaxErrorKind) -> JsModuleError {
        self.error_at(self.pos, kind)
    }

    fn error_at(&self, at: usize, kind: SyntaxErrorKind) -> JsModuleError {
        let before = &self.src[..at];
        let line = before.matches('\n').count() + 1;
        let column = before
            .rsplit('\n')
            .next()
            .map_or(0, |l| l.chars().count())
            + 1;
        JsModuleError::Syntax { line, column, kind }
    }

    /// Skip whitespace and comments.
    fn skip_trivia(&mut self) -> Result<(), JsModuleError> {
        loop {
            let rest = self.rest();
            if rest.starts_with("//") {
                self.pos += rest.find('\n').unwrap_or(rest.len());
            } else if rest.starts_with("/*") {
                match rest[2..].find("*/") {
                    Some(end) => self.pos += end + 4,
                    None => return Err(self.error(SyntaxErrorKind::UnterminatedComment)),
                }
            } else if self.peek().is_some_and(char::is_whitespace) {
                self.bump();
            } else {
                return Ok(());
            }
        }
    }

    // --- Statements ---

    fn module(&mut self) -> Result<Value, JsModuleError> {
        loop {
            self.skip_trivia()?;
            if self.peek().is_none() {
                return Err(self.error(SyntaxErrorKind::MissingExport));
            }

            if self.rest().starts_with("module.exports") {
                self.pos += "module.exports".len();
                self.skip_trivia()?;
                self.expect('=', "'='")?;
                return self.value();
            }

            if self.eat_word("export") {
                self.skip_trivia()?;
                if self.eat_word("default") {
                    return self.value();
                }
                self.skip_statement()?;
                continue;
            }

            if self.eat_word("const") || self.eat_word("let") || self.eat_word("var") {
                self.binding()?;
                continue;
            }

            self.skip_statement()?;
        }
    }

    /// `const name = <literal>`. Anything that does not evaluate is skipped.
    fn binding(&mut self) -> Result<(), JsModuleError> {
        self.skip_trivia()?;
        let name = self.ident();
        self.skip_trivia()?;
        if name.is_empty() || !self.eat('=') {
            return self.skip_statement();
        }
        self.skip_trivia()?;
        // Module handles are not data.
        if self.rest().starts_with("require") {
            return self.skip_statement();
        }

        let start = self.pos;
        match self.value() {
            Ok(value) => {
                trace!(name = %name, "bound top-level literal");
                let depth = value_depth(&value);
                self.bindings.insert(name, (value, depth));
            }
            Err(error @ JsModuleError::Syntax {
                kind: SyntaxErrorKind::TooDeep,
                ..
            }) => return Err(error),
            Err(error) => {
                trace!(name = %name, %error, "skipping non-literal binding");
                self.pos = start;
            }
        }
        self.skip_statement()
    }

    /// Advance past the current statement: to a `;` or newline outside any
    /// brackets, or to end of input.
    fn skip_statement(&mut self) -> Result<(), JsModuleError> {
        let mut depth = 0usize;
        while let Some(c) = self.peek() {
            match c {
                '\'' | '"' | '`' => {
                    self.string()?;
                    continue;
                }
                '/' if self.rest().starts_with("//") => {
                    let rest = self.rest();
                    self.pos += rest.find('\n').unwrap_or(rest.len());
                    continue;
                }
                '/' if self.rest().starts_with("/*") => {
                    match self.rest()[2..].find("*/") {
                        Some(end) => self.pos += end + 4,
                        None => return Err(self.error(SyntaxErrorKind::UnterminatedComment)),
                    }
                    continue;
                }
                '(' | '[' | '{' => depth += 1,
                ')' | ']' | '}' => depth = depth.saturating_sub(1),
                ';' | '\n' if depth == 0 => {
                    self.bump();
                    return Ok(());
                }
                _ => {}
            }
            self.bump();
        }
        Ok(())
    }

    // --- Values ---

    fn value(&mut self) -> Result<Value, JsModuleError> {
        self.skip_trivia()?;
        if self.rest().starts_with("...") {
            return Err(self.unsupported_spread());
        }
        match self.peek() {
            None => Err(self.error(SyntaxErrorKind::UnexpectedEof)),
            Some('{') => self.nested(Self::object),
            Some('[') => self.nested(Self::array),
            Some('\'' | '"' | '`') => self.string().map(Value::String),
            Some(c) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => self.number(),
            Some(c) if is_ident_start(c) => self.identifier_value(),
            Some(c) => Err(self.error(SyntaxErrorKind::UnexpectedChar(c))),
        }
    }

    fn nested(
        &mut self,
        parse: fn(&mut Self) -> Result<Value, JsModuleError>,
    ) -> Result<Value, JsModuleError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error(SyntaxErrorKind::TooDeep));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn object(&mut self) -> Result<Value, JsModuleError> {
        self.expect('{', "'{'")?;
        let mut map = Map::new();
        loop {
            self.skip_trivia()?;
            if self.eat('}') {
                return Ok(Value::Object(map));
            }
            if self.rest().starts_with("...") {
                return Err(self.unsupported_spread());
            }

            let key_start = self.pos;
            let (key, is_ident) = self.key()?;
            self.skip_trivia()?;
            let value = match self.peek() {
                Some(':') => {
                    self.bump();
                    self.value()?
                }
                // `{ colors }` shorthand
                Some(',' | '}') if is_ident => self.lookup(&key, key_start)?,
                Some(found) => {
                    return Err(self.error(SyntaxErrorKind::Expected {
                        expected: "':'",
                        found,
                    }));
                }
                None => return Err(self.error(SyntaxErrorKind::UnexpectedEof)),
            };
            map.insert(key, value);

            self.skip_trivia()?;
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some('}') => {}
                Some(found) => {
                    return Err(self.error(SyntaxErrorKind::Expected {
                        expected: "',' or '}'",
                        found,
                    }));
                }
                None => return Err(self.error(SyntaxErrorKind::UnexpectedEof)),
            }
        }
    }

    /// Returns the key and whether it was a bare identifier.
    fn key(&mut self) -> Result<(String, bool), JsModuleError> {
        match self.peek() {
            Some('\'' | '"' | '`') => Ok((self.string()?, false)),
            Some(c) if c.is_ascii_digit() => {
                let start = self.pos;
                while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '.') {
                    self.bump();
                }
                Ok((self.src[start..self.pos].to_string(), false))
            }
            Some(c) if is_ident_start(c) => Ok((self.ident(), true)),
            Some('[') => Err(self.error(SyntaxErrorKind::Unsupported("computed key".into()))),
            Some(c) => Err(self.error(SyntaxErrorKind::UnexpectedChar(c))),
            None => Err(self.error(SyntaxErrorKind::UnexpectedEof)),
        }
    }

    fn array(&mut self) -> Result<Value, JsModuleError> {
        self.expect('[', "'['")?;
        let mut items = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.eat(']') {
                return Ok(Value::Array(items));
            }
            items.push(self.value()?);
            self.skip_trivia()?;
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(']') => {}
                Some(found) => {
                    return Err(self.error(SyntaxErrorKind::Expected {
                        expected: "',' or ']'",
                        found,
                    }));
                }
                None => return Err(self.error(SyntaxErrorKind::UnexpectedEof)),
            }
        }
    }

    fn string(&mut self) -> Result<String, JsModuleError> {
        let start = self.pos;
        let Some(quote) = self.bump() else {
            return Err(self.error(SyntaxErrorKind::UnexpectedEof));
        };
        let mut out = String::new();
        loop {
            let Some(c) = self.bump() else {
                return Err(self.error_at(start, SyntaxErrorKind::UnterminatedString));
            };
            match c {
                c if c == quote => return Ok(out),
                '\n' if quote != '`' => {
                    return Err(self.error_at(start, SyntaxErrorKind::UnterminatedString));
                }
                '$' if quote == '`' && self.peek() == Some('{') => {
                    return Err(self.error_at(
                        start,
                        SyntaxErrorKind::Unsupported("template literal interpolation".into()),
                    ));
                }
                '\\' => {
                    let escape_at = self.pos - 1;
                    let Some(escaped) = self.bump() else {
                        return Err(self.error_at(start, SyntaxErrorKind::UnterminatedString));
                    };
                    match escaped {
                        'n' => out.push('\n'),
                        't' => out.push('\t'),
                        'r' => out.push('\r'),
                        'b' => out.push('\u{8}'),
                        'f' => out.push('\u{c}'),
                        'v' => out.push('\u{b}'),
                        '0' => out.push('\0'),
                        'u' => match self.unicode_escape() {
                            Some(ch) => out.push(ch),
                            None => {
                                return Err(
                                    self.error_at(escape_at, SyntaxErrorKind::InvalidEscape)
                                );
                            }
                        },
                        // Line continuation.
                        '\n' => {}
                        other => out.push(other),
                    }
                }
                c => out.push(c),
            }
        }
    }

    /// `\uXXXX` or `\u{X...}`, with the `\u` already consumed.
    fn unicode_escape(&mut self) -> Option<char> {
        let digits = if self.eat('{') {
            let rest = self.rest();
            let end = rest.find('}')?;
            self.pos += end + 1;
            &rest[..end]
        } else {
            let rest = self.rest();
            let digits = rest.get(..4)?;
            self.pos += 4;
            digits
        };
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().and_then(char::from_u32)
    }

    fn number(&mut self) -> Result<Value, JsModuleError> {
        let start = self.pos;
        if matches!(self.peek(), Some('-' | '+')) {
            self.bump();
        }
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_')
        {
            self.bump();
        }
        let text = &self.src[start..self.pos];
        parse_number(text)
            .map(Value::Number)
            .ok_or_else(|| self.error_at(start, SyntaxErrorKind::InvalidNumber(text.into())))
    }

    fn identifier_value(&mut self) -> Result<Value, JsModuleError> {
        let start = self.pos;
        let name = self.ident();
        match name.as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            "null" | "undefined" => Ok(Value::Null),
            "require" => self.require_call(start),
            _ if matches!(self.peek(), Some('.' | '(' | '[')) => {
                while self
                    .peek()
                    .is_some_and(|c| is_ident_continue(c) || c == '.')
                {
                    self.bump();
                }
                let expr = &self.src[start..self.pos];
                Err(self.error_at(start, SyntaxErrorKind::Unsupported(format!("`{expr}`"))))
            }
            _ => self.lookup(&name, start),
        }
    }

    /// `require('pkg')` evaluates to `"pkg"`, the plugin's identifier.
    fn require_call(&mut self, start: usize) -> Result<Value, JsModuleError> {
        self.skip_trivia()?;
        self.expect('(', "'('")?;
        self.skip_trivia()?;
        let module = match self.peek() {
            Some('\'' | '"' | '`') => self.string()?,
            _ => {
                return Err(self.error_at(
                    start,
                    SyntaxErrorKind::Unsupported("require() without a string literal".into()),
                ));
            }
        };
        self.skip_trivia()?;
        self.expect(')', "')'")?;
        if matches!(self.peek(), Some('(' | '.')) {
            return Err(self.error_at(
                start,
                SyntaxErrorKind::Unsupported(format!("configured plugin `{module}`")),
            ));
        }
        Ok(Value::String(module))
    }

    /// A bound value counts its own nesting where it is referenced.
    fn lookup(&self, name: &str, at: usize) -> Result<Value, JsModuleError> {
        let Some((value, depth)) = self.bindings.get(name) else {
            return Err(self.error_at(
                at,
                SyntaxErrorKind::Unsupported(format!("reference to `{name}`")),
            ));
        };
        if self.depth + depth > MAX_DEPTH {
            return Err(self.error_at(at, SyntaxErrorKind::TooDeep));
        }
        Ok(value.clone())
    }

    fn unsupported_spread(&self) -> JsModuleError {
        self.error(SyntaxErrorKind::Unsupported("spread syntax".into()))
    }

    fn ident(&mut self) -> String {
        let start = self.pos;
        if self.peek().is_some_and(is_ident_start) {
            while self.peek().is_some_and(is_ident_continue) {
                self.bump();
            }
        }
        self.src[start..self.pos].to_string()
    }
}

/// Container nesting of an evaluated value. Bounded by `MAX_DEPTH` for
/// anything the parser produced.
fn value_depth(value: &Value) -> usize {
    match value {
        Value::Array(items) => 1 + items.iter().map(value_depth).max().unwrap_or(0),
        Value::Object(map) => 1 + map.values().map(value_depth).max().unwrap_or(0),
        _ => 0,
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}

fn parse_number(text: &str) -> Option<Number> {
    let cleaned = text.replace('_', "");
    let (negative, unsigned) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.strip_prefix('+').unwrap_or(&cleaned)),
    };
    let radix = match unsigned.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let magnitude = i64::from_str_radix(&unsigned[2..], radix).ok()?;
        return Some(Number::from(if negative { -magnitude } else { magnitude }));
    }
    // `f64::from_str` would also accept "inf" and "NaN".
    if !unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }
    if let Ok(int) = cleaned.parse::<i64>() {
        return Some(Number::from(int));
    }
    cleaned.parse::<f64>().ok().and_then(Number::from_f64)
}
