//! Formatting toolbar state

use serde::{Deserialize, Serialize};
use shared::{FontStyle, FontWeight, FormatChange, TextStyle};

use super::settings::FormattingSettings;

/// Values shown by the formatting toolbar.
///
/// Mirrors the selected text object when there is one, otherwise holds the
/// style that the next added text will get.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattingState {
    pub font_size: u32,
    pub font_family: String,
    pub text_color: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl Default for FormattingState {
    fn default() -> Self {
        Self::from_settings(&FormattingSettings::default())
    }
}

impl FormattingState {
    pub fn from_settings(settings: &FormattingSettings) -> Self {
        Self {
            font_size: settings.default_size,
            font_family: settings.default_family.clone(),
            text_color: settings.default_color.clone(),
            bold: false,
            italic: false,
            underline: false,
        }
    }

    /// Read every property from a text object's style
    pub fn update_from_style(&mut self, style: &TextStyle) {
        self.font_size = style.font_size;
        self.font_family = style.font_family.clone();
        self.text_color = style.fill.clone();
        self.bold = style.font_weight.is_bold();
        self.italic = style.font_style.is_italic();
        self.underline = style.underline;
    }

    pub fn reset(&mut self, settings: &FormattingSettings) {
        *self = Self::from_settings(settings);
    }

    /// Style for a new text object
    pub fn to_text_style(&self) -> TextStyle {
        TextStyle {
            font_size: self.font_size,
            font_family: self.font_family.clone(),
            fill: self.text_color.clone(),
            font_weight: FontWeight::from_bold(self.bold),
            font_style: FontStyle::from_italic(self.italic),
            underline: self.underline,
        }
    }

    /// Record a change; returns it with the font size clamped to the limits
    pub fn apply(&mut self, change: FormatChange, settings: &FormattingSettings) -> FormatChange {
        match change {
            FormatChange::FontSize(size) => {
                let size = settings.clamp_size(size);
                self.font_size = size;
                FormatChange::FontSize(size)
            }
            FormatChange::FontFamily(family) => {
                if !settings.is_known_family(&family) {
                    tracing::debug!("Font family {family:?} is not in the picker list");
                }
                self.font_family = family.clone();
                FormatChange::FontFamily(family)
            }
            FormatChange::Fill(color) => {
                self.text_color = color.clone();
                FormatChange::Fill(color)
            }
            FormatChange::FontWeight(weight) => {
                self.bold = weight.is_bold();
                FormatChange::FontWeight(weight)
            }
            FormatChange::FontStyle(style) => {
                self.italic = style.is_italic();
                FormatChange::FontStyle(style)
            }
            FormatChange::Underline(on) => {
                self.underline = on;
                FormatChange::Underline(on)
            }
        }
    }

    // ── Toolbar buttons ───────────────────────────────────────

    pub fn larger_size(&self, settings: &FormattingSettings) -> FormatChange {
        FormatChange::FontSize(settings.clamp_size(self.font_size.saturating_add(settings.size_step)))
    }

    pub fn smaller_size(&self, settings: &FormattingSettings) -> FormatChange {
        FormatChange::FontSize(settings.clamp_size(self.font_size.saturating_sub(settings.size_step)))
    }

    pub fn toggled_bold(&self) -> FormatChange {
        FormatChange::FontWeight(FontWeight::from_bold(!self.bold))
    }

    pub fn toggled_italic(&self) -> FormatChange {
        FormatChange::FontStyle(FontStyle::from_italic(!self.italic))
    }

    pub fn toggled_underline(&self) -> FormatChange {
        FormatChange::Underline(!self.underline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let f = FormattingState::default();
        assert_eq!(f.font_size, 20);
        assert_eq!(f.font_family, "Arial");
        assert_eq!(f.text_color, "#000000");
        assert!(!f.bold && !f.italic && !f.underline);
    }

    #[test]
    fn test_update_from_style_and_reset() {
        let settings = FormattingSettings::default();
        let mut f = FormattingState::default();
        f.update_from_style(&TextStyle {
            font_size: 36,
            font_family: "Georgia".into(),
            fill: "#ff0000".into(),
            font_weight: FontWeight::Bold,
            font_style: FontStyle::Italic,
            underline: true,
        });
        assert_eq!(f.font_size, 36);
        assert_eq!(f.font_family, "Georgia");
        assert!(f.bold && f.italic && f.underline);

        f.reset(&settings);
        assert_eq!(f, FormattingState::default());
    }

    #[test]
    fn test_size_buttons_clamp() {
        let settings = FormattingSettings::default();
        let mut f = FormattingState::default();
        f.font_size = 71;
        assert_eq!(f.larger_size(&settings), FormatChange::FontSize(72));
        f.font_size = 72;
        assert_eq!(f.larger_size(&settings), FormatChange::FontSize(72));
        f.font_size = 9;
        assert_eq!(f.smaller_size(&settings), FormatChange::FontSize(8));
    }

    #[test]
    fn test_apply_clamps_and_records() {
        let settings = FormattingSettings::default();
        let mut f = FormattingState::default();
        let applied = f.apply(FormatChange::FontSize(200), &settings);
        assert_eq!(applied, FormatChange::FontSize(72));
        assert_eq!(f.font_size, 72);

        f.apply(f.toggled_bold(), &settings);
        assert!(f.bold);
        f.apply(f.toggled_bold(), &settings);
        assert!(!f.bold);

        f.apply(FormatChange::Fill("#00ff00".into()), &settings);
        assert_eq!(f.to_text_style().fill, "#00ff00");
    }
}
