//! UI module: View components for the TUI.

pub mod dashboard;
pub mod form;
pub mod history;
pub mod result;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::ObescanTheme;

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(vec![Span::styled(
            "DISCLAIMER: Predictions are indicative estimates from a statistical model and do not replace a clinical assessment.",
            ObescanTheme::text_muted(),
        )]),
        Line::from(vec![Span::styled(
            "Consult a healthcare professional before acting on any recommendation.",
            ObescanTheme::text_muted(),
        )]),
    ];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(ObescanTheme::border(false));

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}
