use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexColorError {
    #[error("missing leading '#'")]
    MissingHash,
    #[error("expected 6 or 8 hex digits, found {0}")]
    BadLength(usize),
    #[error("invalid hex digit {0:?}")]
    BadDigit(char),
}

/// An sRGB color declared as `#rrggbb` or `#rrggbbaa`.
///
/// Six-digit colors are opaque (`a == 255`). Digits are case-insensitive;
/// [`HexColor::to_hex`] always renders lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
    has_alpha: bool,
}

impl HexColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r,
            g,
            b,
            a: 255,
            has_alpha: false,
        }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r,
            g,
            b,
            a,
            has_alpha: true,
        }
    }

    /// Parse a strict hex color: `#` followed by exactly 6 or 8 hex digits.
    ///
    /// Shorthand forms (`#fff`), named colors, `rgb()` functions and
    /// surrounding whitespace are all rejected.
    pub fn parse(value: &str) -> Result<Self, HexColorError> {
        let digits = value.strip_prefix('#').ok_or(HexColorError::MissingHash)?;
        if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(HexColorError::BadDigit(bad));
        }
        // All chars are ASCII from here on, so byte slicing is safe.
        let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16);
        match digits.len() {
            6 => match (byte(0), byte(2), byte(4)) {
                (Ok(r), Ok(g), Ok(b)) => Ok(Self::rgb(r, g, b)),
                _ => Err(HexColorError::BadLength(6)),
            },
            8 => match (byte(0), byte(2), byte(4), byte(6)) {
                (Ok(r), Ok(g), Ok(b), Ok(a)) => Ok(Self::rgba(r, g, b, a)),
                _ => Err(HexColorError::BadLength(8)),
            },
            n => Err(HexColorError::BadLength(n)),
        }
    }

    pub fn is_valid(value: &str) -> bool {
        Self::parse(value).is_ok()
    }

    /// Whether the color was declared with an explicit alpha channel.
    pub fn has_alpha(&self) -> bool {
        self.has_alpha
    }

    pub fn to_hex(&self) -> String {
        if self.has_alpha {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        } else {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        }
    }
}

impl std::fmt::Display for HexColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::str::FromStr for HexColor {
    type Err = HexColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_opaque_and_alpha() {
        let red = HexColor::parse("#D62E2E").unwrap();
        assert_eq!((red.r, red.g, red.b, red.a), (0xd6, 0x2e, 0x2e, 255));
        assert!(!red.has_alpha());

        let overlay = HexColor::parse("#1F1F2580").unwrap();
        assert_eq!(overlay.a, 0x80);
        assert!(overlay.has_alpha());
        assert_eq!(overlay.to_hex(), "#1f1f2580");
    }

    #[test]
    fn rejects_malformed_values() {
        assert_eq!(HexColor::parse("#ZZZZZZ"), Err(HexColorError::BadDigit('Z')));
        assert_eq!(HexColor::parse("D62E2E"), Err(HexColorError::MissingHash));
        assert_eq!(HexColor::parse("#fff"), Err(HexColorError::BadLength(3)));
        assert_eq!(HexColor::parse("#1234567"), Err(HexColorError::BadLength(7)));
        assert!(!HexColor::is_valid(" #D62E2E"));
        assert!(!HexColor::is_valid("#D62E2E "));
        assert!(!HexColor::is_valid("#ＡＡＡＡＡＡ"));
    }

    #[test]
    fn serde_uses_hex_string() {
        let json = serde_json::to_string(&HexColor::rgb(255, 0, 0)).unwrap();
        assert_eq!(json, "\"#ff0000\"");
        let back: HexColor = serde_json::from_str("\"#FF0000\"").unwrap();
        assert_eq!(back, HexColor::rgb(255, 0, 0));
        assert!(serde_json::from_str::<HexColor>("\"red\"").is_err());
    }
}
