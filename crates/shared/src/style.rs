//! Text styling shared between the scene and the formatting toolbar

use serde::{Deserialize, Serialize};

/// Font weight of a text object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl FontWeight {
    pub fn from_bold(bold: bool) -> Self {
        if bold {
            FontWeight::Bold
        } else {
            FontWeight::Normal
        }
    }

    pub fn is_bold(self) -> bool {
        self == FontWeight::Bold
    }
}

/// Font style of a text object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

impl FontStyle {
    pub fn from_italic(italic: bool) -> Self {
        if italic {
            FontStyle::Italic
        } else {
            FontStyle::Normal
        }
    }

    pub fn is_italic(self) -> bool {
        self == FontStyle::Italic
    }
}

/// Styling of an editable text object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_size: u32,
    pub font_family: String,
    /// Fill color as `#rrggbb`
    pub fill: String,
    #[serde(default)]
    pub font_weight: FontWeight,
    #[serde(default)]
    pub font_style: FontStyle,
    #[serde(default)]
    pub underline: bool,
}

impl TextStyle {
    /// Apply a single property change
    pub fn apply(&mut self, change: &FormatChange) {
        match change {
            FormatChange::FontSize(size) => self.font_size = *size,
            FormatChange::FontFamily(family) => self.font_family = family.clone(),
            FormatChange::Fill(color) => self.fill = color.clone(),
            FormatChange::FontWeight(weight) => self.font_weight = *weight,
            FormatChange::FontStyle(style) => self.font_style = *style,
            FormatChange::Underline(on) => self.underline = *on,
        }
    }
}

/// A change to one text property, as issued by the formatting toolbar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "property", content = "value", rename_all = "snake_case")]
pub enum FormatChange {
    FontSize(u32),
    FontFamily(String),
    Fill(String),
    FontWeight(FontWeight),
    FontStyle(FontStyle),
    Underline(bool),
}

impl FormatChange {
    /// Property name as used on the wire
    pub fn property(&self) -> &'static str {
        match self {
            FormatChange::FontSize(_) => "font_size",
            FormatChange::FontFamily(_) => "font_family",
            FormatChange::Fill(_) => "fill",
            FormatChange::FontWeight(_) => "font_weight",
            FormatChange::FontStyle(_) => "font_style",
            FormatChange::Underline(_) => "underline",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> TextStyle {
        TextStyle {
            font_size: 20,
            font_family: "Arial".into(),
            fill: "#000000".into(),
            font_weight: FontWeight::Normal,
            font_style: FontStyle::Normal,
            underline: false,
        }
    }

    #[test]
    fn test_format_change_wire_format() {
        let json = serde_json::to_string(&FormatChange::FontSize(24)).unwrap();
        assert_eq!(json, r#"{"property":"font_size","value":24}"#);

        let change: FormatChange =
            serde_json::from_str(r#"{"property":"font_weight","value":"bold"}"#).unwrap();
        assert_eq!(change, FormatChange::FontWeight(FontWeight::Bold));
    }

    #[test]
    fn test_apply_changes_only_named_property() {
        let mut s = style();
        s.apply(&FormatChange::Fill("#ff0000".into()));
        assert_eq!(s.fill, "#ff0000");
        assert_eq!(s.font_size, 20);

        s.apply(&FormatChange::FontStyle(FontStyle::Italic));
        assert!(s.font_style.is_italic());
        assert!(!s.font_weight.is_bold());
    }

    #[test]
    fn test_style_defaults_missing_flags() {
        let s: TextStyle =
            serde_json::from_str(r##"{"font_size":12,"font_family":"Georgia","fill":"#112233"}"##)
                .unwrap();
        assert_eq!(s.font_weight, FontWeight::Normal);
        assert!(!s.underline);
    }
}
