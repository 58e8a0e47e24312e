//! Colors for style tags.

use lineview_core::StyleTag;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// An opaque RGB color, serialized as `"#RRGGBB"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB`.
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix('#')?;
        if s.len() != 6 || !s.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&s[0..2], 16).ok()?;
        let g = u8::from_str_radix(&s[2..4], 16).ok()?;
        let b = u8::from_str_radix(&s[4..6], 16).ok()?;
        Some(Self { r, g, b })
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid color: {s}")))
    }
}

/// Maps style tags to foreground colors.
///
/// Tags without an entry use [`Theme::foreground`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub foreground: Rgb,
    pub background: Rgb,
    pub caret: Rgb,
    colors: BTreeMap<StyleTag, Rgb>,
}

impl Theme {
    /// A theme where every tag uses `foreground`.
    pub fn monochrome(foreground: Rgb, background: Rgb) -> Self {
        Self {
            foreground,
            background,
            caret: foreground,
            colors: BTreeMap::new(),
        }
    }

    /// Built-in dark theme.
    pub fn dark() -> Self {
        let mut theme = Self::monochrome(Rgb::new(0xA9, 0xB7, 0xC6), Rgb::new(0x2B, 0x2B, 0x2B));
        theme.caret = Rgb::new(0xBB, 0xBB, 0xBB);
        theme.colors.extend([
            (StyleTag::Keyword, Rgb::new(0xCC, 0x78, 0x32)),
            (StyleTag::String, Rgb::new(0x6A, 0x87, 0x59)),
            (StyleTag::Comment, Rgb::new(0x80, 0x80, 0x80)),
            (StyleTag::Type, Rgb::new(0x4E, 0xAD, 0xE5)),
            (StyleTag::Number, Rgb::new(0x68, 0x97, 0xBB)),
            (StyleTag::Operator, Rgb::new(0xA9, 0xB7, 0xC6)),
            (StyleTag::Punctuation, Rgb::new(0xCC, 0x78, 0x32)),
            (StyleTag::Annotation, Rgb::new(0xBB, 0xB5, 0x29)),
            (StyleTag::GenericBracket, Rgb::new(0x50, 0x7B, 0xB4)),
            (StyleTag::LambdaArrow, Rgb::new(0xCC, 0x78, 0x32)),
            (StyleTag::Literal, Rgb::new(0xCC, 0x78, 0x32)),
        ]);
        theme
    }

    /// Color for `tag`.
    pub fn color(&self, tag: StyleTag) -> Rgb {
        self.colors.get(&tag).copied().unwrap_or(self.foreground)
    }

    pub fn set_color(&mut self, tag: StyleTag, color: Rgb) {
        self.colors.insert(tag, color);
    }

    /// Apply overrides keyed by tag name. Unknown names are skipped with a warning.
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, Rgb>) -> Self {
        for (name, color) in overrides {
            match name.as_str() {
                "foreground" => self.foreground = *color,
                "background" => self.background = *color,
                "caret" => self.caret = *color,
                _ => match name.parse::<StyleTag>() {
                    Ok(tag) => self.set_color(tag, *color),
                    Err(e) => tracing::warn!("ignoring color override: {e}"),
                },
            }
        }
        self
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(Rgb::from_hex("#FF8800"), Some(Rgb::new(255, 136, 0)));
        assert_eq!(Rgb::from_hex("#ff8800").map(Rgb::to_hex).as_deref(), Some("#FF8800"));
        assert_eq!(Rgb::from_hex("FF8800"), None);
        assert_eq!(Rgb::from_hex("#FF88"), None);
        assert_eq!(Rgb::from_hex("#GG0000"), None);
    }

    #[test]
    fn test_unmapped_tag_uses_foreground() {
        let theme = Theme::dark();
        assert_eq!(theme.color(StyleTag::Plain), theme.foreground);
        assert_eq!(theme.color(StyleTag::Identifier), theme.foreground);
        assert_ne!(theme.color(StyleTag::Keyword), theme.foreground);
    }

    #[test]
    fn test_overrides() {
        let overrides = BTreeMap::from([
            ("keyword".to_string(), Rgb::new(1, 2, 3)),
            ("background".to_string(), Rgb::new(0, 0, 0)),
            ("bogus".to_string(), Rgb::new(9, 9, 9)),
        ]);
        let theme = Theme::dark().with_overrides(&overrides);
        assert_eq!(theme.color(StyleTag::Keyword), Rgb::new(1, 2, 3));
        assert_eq!(theme.background, Rgb::new(0, 0, 0));
    }
}
