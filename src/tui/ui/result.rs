//! Result view: predicted category, advice and the encoded vector.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::domain::Prediction;
use crate::tui::styles::ObescanTheme;

/// Result state
#[derive(Debug, Clone, Default)]
pub enum ResultState {
    /// Nothing submitted yet
    #[default]
    Idle,
    /// Completed with a prediction
    Complete { prediction: Box<Prediction> },
    /// Submission failed outside input validation
    Error { message: String },
}

/// Render the result view
pub fn render_result(f: &mut Frame, area: Rect, state: &ResultState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_result_header(f, chunks[0]);
    match state {
        ResultState::Idle => render_idle(f, chunks[1]),
        ResultState::Complete { prediction } => render_prediction(f, chunks[1], prediction),
        ResultState::Error { message } => render_error(f, chunks[1], message),
    }
    render_result_footer(f, chunks[2], state);
}

fn render_result_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", ObescanTheme::text()),
        Span::styled("Prediction Result", ObescanTheme::title()),
        Span::styled(" │ Obesity Category", ObescanTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(ObescanTheme::border(false)),
    );

    f.render_widget(header, area);
}

fn render_idle(f: &mut Frame, area: Rect) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("No prediction yet", ObescanTheme::text_secondary())),
        Line::from(""),
        Line::from(Span::styled(
            "Fill in the form to begin",
            ObescanTheme::text_muted(),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(ObescanTheme::border(false)),
    );

    f.render_widget(content, area);
}

fn render_prediction(f: &mut Frame, area: Rect, prediction: &Prediction) {
    let block = Block::default()
        .title(Span::styled(" Result ", ObescanTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(ObescanTheme::border(true));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Category
            Constraint::Length(6), // Recommendation
            Constraint::Min(0),    // Encoded input
        ])
        .margin(1)
        .split(inner);

    let category = Paragraph::new(vec![
        Line::from(Span::styled(
            prediction.result.label.clone(),
            ObescanTheme::category(prediction.category()),
        )),
        Line::from(Span::styled(
            format!("class {} · {}", prediction.result.class_index, prediction.result.raw_label),
            ObescanTheme::text_muted(),
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(category, chunks[0]);

    let advice = Paragraph::new(Line::from(Span::styled(
        prediction.recommendation.clone(),
        ObescanTheme::text(),
    )))
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title(Span::styled(" Recommendation ", ObescanTheme::text_secondary()))
            .borders(Borders::ALL)
            .border_style(ObescanTheme::border(false)),
    );
    f.render_widget(advice, chunks[1]);

    let encoded: Vec<Span> = prediction
        .features
        .iter()
        .flat_map(|(feature, value)| {
            [
                Span::styled(format!("{}=", feature.column_name()), ObescanTheme::text_secondary()),
                Span::styled(format!("{value} "), ObescanTheme::feature_value()),
            ]
        })
        .collect();

    let vector = Paragraph::new(Line::from(encoded))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(Span::styled(" Encoded Input ", ObescanTheme::text_secondary()))
                .borders(Borders::ALL)
                .border_style(ObescanTheme::border(false)),
        );
    f.render_widget(vector, chunks[2]);
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("! Prediction Failed", ObescanTheme::error())),
        Line::from(""),
        Line::from(Span::styled(message, ObescanTheme::text())),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(ObescanTheme::error()),
    );

    f.render_widget(content, area);
}

fn render_result_footer(f: &mut Frame, area: Rect, state: &ResultState) {
    let content = match state {
        ResultState::Error { .. } => Line::from(vec![
            Span::styled("[Enter] ", ObescanTheme::key_hint()),
            Span::styled("Back to Form ", ObescanTheme::key_desc()),
            Span::styled("[Esc] ", ObescanTheme::key_hint()),
            Span::styled("Dashboard", ObescanTheme::key_desc()),
        ]),
        _ => Line::from(vec![
            Span::styled("[N] ", ObescanTheme::key_hint()),
            Span::styled("New Prediction ", ObescanTheme::key_desc()),
            Span::styled("[H] ", ObescanTheme::key_hint()),
            Span::styled("History ", ObescanTheme::key_desc()),
            Span::styled("[Esc] ", ObescanTheme::key_hint()),
            Span::styled("Dashboard", ObescanTheme::key_desc()),
        ]),
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(ObescanTheme::border(false)),
    );

    f.render_widget(footer, area);
}
