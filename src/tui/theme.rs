//! Color themes for the TUI.
//!
//! Three built-in themes are available, selected by name from the `[ui]`
//! section of the config file.

use ratatui::style::{Color, Modifier, Style};

/// A color theme for the wizard screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Theme name as written in the config file
    pub name: &'static str,
    /// Titles, the progress bar and active borders
    pub primary: Color,
    /// Chosen options and section headings
    pub accent: Color,
    /// Main text color
    pub text: Color,
    /// Secondary text (exercise notes, details)
    pub text_dim: Color,
    /// Hints and disabled actions
    pub text_muted: Color,
    /// Highlighted row background
    pub selected_bg: Color,
    /// Border color
    pub border: Color,
    /// Ready illustrations
    pub success: Color,
    /// Pending illustrations
    pub warning: Color,
    /// Error screen and failed illustrations
    pub error: Color,
}

const BUILTIN: [(&str, fn() -> Theme); 3] =
    [("default", Theme::default_theme), ("nord", Theme::nord), ("dracula", Theme::dracula)];

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}

impl Theme {
    /// Works on both light and dark terminals.
    pub fn default_theme() -> Self {
        Self {
            name: "default",
            primary: Color::Rgb(16, 185, 129),    // Emerald
            accent: Color::Rgb(251, 146, 60),     // Orange
            text: Color::White,
            text_dim: Color::Rgb(156, 163, 175),  // Gray-400
            text_muted: Color::Rgb(107, 114, 128), // Gray-500
            selected_bg: Color::Rgb(55, 65, 81),  // Gray-700
            border: Color::Rgb(75, 85, 99),       // Gray-600
            success: Color::Rgb(34, 197, 94),
            warning: Color::Rgb(234, 179, 8),
            error: Color::Rgb(239, 68, 68),
        }
    }

    /// Arctic, bluish colors.
    pub fn nord() -> Self {
        Self {
            name: "nord",
            primary: Color::Rgb(136, 192, 208),   // Frost
            accent: Color::Rgb(208, 135, 112),    // Aurora orange
            text: Color::Rgb(236, 239, 244),      // Snow storm
            text_dim: Color::Rgb(216, 222, 233),
            text_muted: Color::Rgb(76, 86, 106),  // Polar night
            selected_bg: Color::Rgb(59, 66, 82),
            border: Color::Rgb(67, 76, 94),
            success: Color::Rgb(163, 190, 140),
            warning: Color::Rgb(235, 203, 139),
            error: Color::Rgb(191, 97, 106),
        }
    }

    /// Dark purple and pink.
    pub fn dracula() -> Self {
        Self {
            name: "dracula",
            primary: Color::Rgb(189, 147, 249),   // Purple
            accent: Color::Rgb(255, 121, 198),    // Pink
            text: Color::Rgb(248, 248, 242),
            text_dim: Color::Rgb(189, 147, 249),
            text_muted: Color::Rgb(98, 114, 164), // Comment
            selected_bg: Color::Rgb(68, 71, 90),
            border: Color::Rgb(68, 71, 90),
            success: Color::Rgb(80, 250, 123),
            warning: Color::Rgb(255, 184, 108),
            error: Color::Rgb(255, 85, 85),
        }
    }

    /// Get a theme by name (case-insensitive).
    pub fn by_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        BUILTIN.iter().find(|(n, _)| *n == name).map(|(_, build)| build())
    }

    /// Names of the built-in themes.
    pub fn available_themes() -> impl Iterator<Item = &'static str> {
        BUILTIN.iter().map(|(name, _)| *name)
    }

    pub fn title(&self) -> Style {
        Style::default().fg(self.primary).add_modifier(Modifier::BOLD)
    }

    pub fn heading(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn body(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn dim(&self) -> Style {
        Style::default().fg(self.text_dim)
    }

    pub fn hint(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    pub fn highlighted(&self) -> Style {
        Style::default().bg(self.selected_bg).fg(self.text).add_modifier(Modifier::BOLD)
    }

    pub fn frame(&self) -> Style {
        Style::default().fg(self.border)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_by_name() {
        assert_eq!(Theme::by_name("nord").map(|t| t.name), Some("nord"));
        assert_eq!(Theme::by_name(" DRACULA ").map(|t| t.name), Some("dracula"));
        assert!(Theme::by_name("solarized").is_none());
    }

    #[test]
    fn test_builtin_names_match() {
        for name in Theme::available_themes() {
            let theme = Theme::by_name(name).unwrap();
            assert_eq!(theme.name, name);
        }
        assert_eq!(Theme::available_themes().count(), 3);
    }

    #[test]
    fn test_themes_differ() {
        assert_ne!(Theme::nord().primary, Theme::dracula().primary);
        assert_ne!(Theme::default().accent, Theme::nord().accent);
    }
}
