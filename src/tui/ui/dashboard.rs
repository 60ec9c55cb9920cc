//! Dashboard view: Main overview screen.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::domain::{ObesityCategory, Prediction};
use crate::tui::styles::ObescanTheme;

/// Dashboard state for rendering.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub artifact_dir: String,
    pub model_kind: String,
    pub scaler_kind: String,
    pub columns: Vec<&'static str>,
    pub manifest_verified: bool,
    pub prediction_count: usize,
    pub most_frequent: Option<ObesityCategory>,
    pub latest: Option<Box<Prediction>>,
}

/// Render the main dashboard view.
pub fn render_dashboard(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
        ])
        .split(area);

    render_header(f, chunks[0]);
    render_main_content(f, chunks[1], state);
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", ObescanTheme::text()),
        Span::styled("Obescan", ObescanTheme::title()),
        Span::styled(" │ ", ObescanTheme::text_muted()),
        Span::styled("Obesity Category Prediction", ObescanTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(ObescanTheme::border(false)),
    );

    f.render_widget(header, area);
}

fn render_main_content(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(45), // Status panels
            Constraint::Percentage(55), // Session summary
        ])
        .split(area);

    render_status_panels(f, chunks[0], state);
    render_session_summary(f, chunks[1], state);
}

fn render_status_panels(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Model status
            Constraint::Min(0),    // Quick actions
        ])
        .margin(1)
        .split(area);

    let status_items = vec![
        format_status_item("Artifacts loaded", true),
        format_status_item("Manifest verified", state.manifest_verified),
        Line::from(vec![
            Span::styled("  Directory: ", ObescanTheme::text_secondary()),
            Span::styled(state.artifact_dir.clone(), ObescanTheme::text()),
        ]),
        Line::from(vec![
            Span::styled("  Model: ", ObescanTheme::text_secondary()),
            Span::styled(
                format!("{} + {} scaler", state.model_kind, state.scaler_kind),
                ObescanTheme::text(),
            ),
        ]),
        Line::from(vec![
            Span::styled("  Columns: ", ObescanTheme::text_secondary()),
            Span::styled(state.columns.len().to_string(), ObescanTheme::text()),
            Span::styled(
                format!(" ({})", state.columns.join(", ")),
                ObescanTheme::text_muted(),
            ),
        ]),
    ];

    let status_block = Block::default()
        .title(Span::styled(" Model Status ", ObescanTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(ObescanTheme::border(false));

    f.render_widget(Paragraph::new(status_items).block(status_block), chunks[0]);

    let actions = vec![
        Line::from(vec![
            Span::styled("[N] ", ObescanTheme::key_hint()),
            Span::styled("New Prediction", ObescanTheme::key_desc()),
        ]),
        Line::from(vec![
            Span::styled("[H] ", ObescanTheme::key_hint()),
            Span::styled("History", ObescanTheme::key_desc()),
        ]),
        Line::from(vec![
            Span::styled("[R] ", ObescanTheme::key_hint()),
            Span::styled("Reset Session", ObescanTheme::key_desc()),
        ]),
        Line::from(vec![
            Span::styled("[Q] ", ObescanTheme::key_hint()),
            Span::styled("Quit", ObescanTheme::key_desc()),
        ]),
    ];

    let actions_block = Block::default()
        .title(Span::styled(" Quick Actions ", ObescanTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(ObescanTheme::border(false));

    f.render_widget(Paragraph::new(actions).block(actions_block), chunks[1]);
}

fn format_status_item(label: &str, ok: bool) -> Line<'static> {
    let icon = if ok { "OK" } else { "--" };

    Line::from(vec![
        Span::styled(format!("  {icon} "), ObescanTheme::status(ok)),
        Span::styled(label.to_string(), ObescanTheme::text()),
    ])
}

fn render_session_summary(f: &mut Frame, area: Rect, state: &DashboardState) {
    let block = Block::default()
        .title(Span::styled(" This Session ", ObescanTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(ObescanTheme::border(false));

    let Some(latest) = state.latest.as_deref() else {
        let empty_msg = Paragraph::new(Line::from(vec![Span::styled(
            "No predictions yet. Press [N] to start.",
            ObescanTheme::text_muted(),
        )]))
        .block(block);
        f.render_widget(empty_msg, area);
        return;
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Predictions: ", ObescanTheme::text_secondary()),
            Span::styled(state.prediction_count.to_string(), ObescanTheme::text()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Latest: ", ObescanTheme::text_secondary()),
            Span::styled(latest.result.label.clone(), ObescanTheme::category(latest.category())),
        ]),
    ];

    if let Some(category) = state.most_frequent {
        lines.push(Line::from(vec![
            Span::styled("Most frequent: ", ObescanTheme::text_secondary()),
            Span::styled(category.label(), ObescanTheme::category(category)),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "History is kept in memory and discarded on exit.",
        ObescanTheme::text_muted(),
    )));

    f.render_widget(Paragraph::new(lines).block(block), area);
}
