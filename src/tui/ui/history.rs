//! History view: category distribution, age/weight spread and recent results.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::application::{BoxSummary, HistoryStatistics};
use crate::ports::HistoryPage;
use crate::tui::styles::ObescanTheme;

/// History state
#[derive(Default)]
pub struct HistoryState {
    pub statistics: Option<HistoryStatistics>,
    pub page: Option<HistoryPage>,
    pub error: Option<String>,
}

/// Render the history view
pub fn render_history(f: &mut Frame, area: Rect, state: &HistoryState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_history_header(f, chunks[0], state);
    render_history_content(f, chunks[1], state);
    render_history_footer(f, chunks[2], state);
}

fn render_history_header(f: &mut Frame, area: Rect, state: &HistoryState) {
    let total = state.statistics.as_ref().map_or(0, |s| s.total);
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", ObescanTheme::text()),
        Span::styled("Session History", ObescanTheme::title()),
        Span::styled(format!(" │ {total} predictions"), ObescanTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(ObescanTheme::border(false)),
    );

    f.render_widget(header, area);
}

fn render_history_content(f: &mut Frame, area: Rect, state: &HistoryState) {
    if let Some(err) = &state.error {
        render_history_error(f, area, err);
        return;
    }

    let stats = match &state.statistics {
        Some(stats) if stats.total > 0 => stats,
        _ => {
            render_empty(f, area);
            return;
        }
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .margin(1)
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(rows[0]);

    render_distribution(f, top[0], stats);
    render_spread(f, top[1], stats);
    render_recent(f, rows[1], state.page.as_ref());
}

fn render_empty(f: &mut Frame, area: Rect) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("No predictions yet", ObescanTheme::text_muted())),
        Line::from(""),
        Line::from(Span::styled(
            "Press [N] to make one",
            ObescanTheme::text_secondary(),
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

fn render_history_error(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("! Cannot Load History", ObescanTheme::error())),
        Line::from(""),
        Line::from(Span::styled(message, ObescanTheme::text())),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(ObescanTheme::error()),
    );

    f.render_widget(content, area);
}

fn render_distribution(f: &mut Frame, area: Rect, stats: &HistoryStatistics) {
    let bars: Vec<Bar> = stats
        .counts
        .iter()
        .map(|&(category, n)| {
            Bar::default()
                .value(n as u64)
                .label(Line::from(category.short_label()))
                .style(ObescanTheme::category_bar(category))
                .value_style(ObescanTheme::bar_value())
        })
        .collect();

    let title = match stats.most_frequent {
        Some(c) => format!(" Categories · most frequent: {} ", c.label()),
        None => " Categories ".to_string(),
    };

    let chart = BarChart::default()
        .block(
            Block::default()
                .title(Span::styled(title, ObescanTheme::subtitle()))
                .borders(Borders::ALL)
                .border_style(ObescanTheme::border(false)),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(9)
        .bar_gap(1);

    f.render_widget(chart, area);
}

fn box_row(name: &'static str, summary: Option<BoxSummary>) -> Row<'static> {
    let cells = match summary {
        Some(b) => [b.min, b.q1, b.median, b.q3, b.max]
            .iter()
            .map(|v| Cell::from(format!("{v:.1}")))
            .collect::<Vec<_>>(),
        None => (0..5).map(|_| Cell::from("-")).collect(),
    };
    Row::new(std::iter::once(Cell::from(name)).chain(cells)).style(ObescanTheme::text())
}

fn render_spread(f: &mut Frame, area: Rect, stats: &HistoryStatistics) {
    let header = Row::new(["", "min", "q1", "med", "q3", "max"]).style(ObescanTheme::table_header());
    let widths = [
        Constraint::Length(7),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(6),
    ];

    let table = Table::new(
        [box_row("Age", stats.age), box_row("Weight", stats.weight)],
        widths,
    )
    .header(header)
    .block(
        Block::default()
            .title(Span::styled(" Spread ", ObescanTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(ObescanTheme::border(false)),
    );

    f.render_widget(table, area);
}

fn render_recent(f: &mut Frame, area: Rect, page: Option<&HistoryPage>) {
    let block = Block::default()
        .title(Span::styled(" Recent ", ObescanTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(ObescanTheme::border(false));

    let Some(page) = page else {
        f.render_widget(block, area);
        return;
    };

    let rows = page.items.iter().map(|p| {
        Row::new(vec![
            Cell::from(p.created_at.format("%H:%M:%S").to_string()).style(ObescanTheme::text_muted()),
            Cell::from(p.result.label.clone()).style(ObescanTheme::category(p.category())),
            Cell::from(p.recommendation.clone()).style(ObescanTheme::text_secondary()),
        ])
    });

    let table = Table::new(
        rows,
        [Constraint::Length(10), Constraint::Length(22), Constraint::Min(0)],
    )
    .block(block);

    f.render_widget(table, area);
}

fn render_history_footer(f: &mut Frame, area: Rect, state: &HistoryState) {
    let mut spans = Vec::new();
    if let Some(page) = state.page.as_ref().filter(|p| p.has_more || p.offset > 0) {
        spans.extend([
            Span::styled(
                format!(
                    "{}-{} of {} ",
                    page.offset + 1,
                    page.offset + page.items.len(),
                    page.total_count
                ),
                ObescanTheme::text_muted(),
            ),
            Span::styled("[←→] ", ObescanTheme::key_hint()),
            Span::styled("Page ", ObescanTheme::key_desc()),
        ]);
    }
    spans.extend([
        Span::styled("[R] ", ObescanTheme::key_hint()),
        Span::styled("Reset History ", ObescanTheme::key_desc()),
        Span::styled("[Esc] ", ObescanTheme::key_hint()),
        Span::styled("Back", ObescanTheme::key_desc()),
    ]);

    let footer = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(ObescanTheme::border(false)),
    );

    f.render_widget(footer, area);
}
