//! Colour palette and preset styles for the terminal UI.
//!
//! Slate backgrounds with a teal accent. Category colours come from
//! `ObesityCategory::color` so every view shows a category the same way.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::ObesityCategory;

/// Application colour palette.
pub struct ObescanTheme;

impl ObescanTheme {
    /// Teal accent for focus and highlighted values.
    pub const ACCENT: Color = Color::Rgb(13, 148, 136); // #0D9488
    pub const ACCENT_LIGHT: Color = Color::Rgb(45, 212, 191); // #2DD4BF

    /// Background behind inverted text.
    pub const BACKDROP: Color = Color::Rgb(15, 23, 42); // #0F172A

    pub const TEXT: Color = Color::Rgb(248, 250, 252); // #F8FAFC
    pub const TEXT_DIM: Color = Color::Rgb(148, 163, 184); // #94A3B8
    pub const TEXT_FAINT: Color = Color::Rgb(100, 116, 139); // #64748B

    pub const OUTLINE: Color = Self::TEXT_DIM;

    // Status colours for artifact checks and failures.
    pub const OK: Color = Color::Rgb(16, 185, 129); // #10B981
    pub const CAUTION: Color = Color::Rgb(251, 191, 36); // #FBBF24
    pub const FAILURE: Color = Color::Rgb(244, 63, 94); // #F43F5E

    /// Encoded feature values on the result screen.
    pub const VALUE: Color = Color::Rgb(59, 130, 246); // #3B82F6

    #[must_use]
    pub fn title() -> Style {
        Style::default().fg(Self::TEXT).add_modifier(Modifier::BOLD)
    }

    /// Panel titles.
    #[must_use]
    pub fn subtitle() -> Style {
        Style::default()
            .fg(Self::ACCENT_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT)
    }

    #[must_use]
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_DIM)
    }

    #[must_use]
    pub fn text_muted() -> Style {
        Style::default().fg(Self::TEXT_FAINT)
    }

    /// Failed predictions, unreadable history and form errors.
    #[must_use]
    pub fn error() -> Style {
        Style::default().fg(Self::FAILURE)
    }

    /// Pass/fail marker for a dashboard check.
    #[must_use]
    pub fn status(ok: bool) -> Style {
        Style::default().fg(if ok { Self::OK } else { Self::CAUTION })
    }

    #[must_use]
    pub fn feature_value() -> Style {
        Style::default().fg(Self::VALUE)
    }

    /// Outline of a panel, accented when it holds the focus or the result.
    #[must_use]
    pub fn border(active: bool) -> Style {
        Style::default().fg(if active { Self::ACCENT } else { Self::OUTLINE })
    }

    /// Label above a form row.
    #[must_use]
    pub fn field_label(focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(Self::ACCENT_LIGHT)
                .add_modifier(Modifier::BOLD)
        } else {
            Self::text_secondary()
        }
    }

    /// Current option of a choice row.
    #[must_use]
    pub fn choice(focused: bool) -> Style {
        if focused {
            Self::inverted()
        } else {
            Self::text()
        }
    }

    /// Count printed inside a distribution bar.
    #[must_use]
    pub fn bar_value() -> Style {
        Self::inverted()
    }

    #[must_use]
    pub fn table_header() -> Style {
        Self::field_label(true)
    }

    fn inverted() -> Style {
        Style::default()
            .fg(Self::BACKDROP)
            .bg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::ACCENT_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_desc() -> Style {
        Style::default().fg(Self::TEXT_DIM)
    }

    /// Style for a predicted category, in the category's own colour.
    #[must_use]
    pub fn category(category: ObesityCategory) -> Style {
        Self::category_bar(category).add_modifier(Modifier::BOLD)
    }

    /// Plain bar colour for charts.
    #[must_use]
    pub fn category_bar(category: ObesityCategory) -> Style {
        let (r, g, b) = category.color();
        Style::default().fg(Color::Rgb(r, g, b))
    }

    /// Cursor shown after the focused input.
    #[must_use]
    pub fn cursor() -> Style {
        Style::default().fg(Self::ACCENT_LIGHT)
    }
}
