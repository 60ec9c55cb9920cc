//! Lifestyle form: one row per column the loaded model expects.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use zeroize::Zeroize;

use crate::domain::{Feature, FeatureSchema, FieldSet, LifestyleForm, NormalizeError, Transport, YesNo};
use crate::tui::styles::ObescanTheme;

const GENDER_OPTIONS: [&str; 2] = ["Male", "Female"];
const YES_NO_OPTIONS: [&str; 2] = ["yes", "no"];
const FREQUENCY_OPTIONS: [&str; 4] = ["no", "Sometimes", "Frequently", "Always"];
const TRANSPORT_OPTIONS: [&str; 5] = [
    "Public_Transportation",
    "Walking",
    "Automobile",
    "Motorbike",
    "Bike",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeightUnit {
    Centimeters,
    Meters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowKind {
    Whole,
    Number,
    Height,
    Choice(&'static [&'static str]),
}

/// One input row.
#[derive(Debug, Clone)]
pub struct FormRow {
    pub feature: Feature,
    pub label: &'static str,
    hint: &'static str,
    kind: RowKind,
    pub value: String,
    pub choice: usize,
}

impl FormRow {
    fn new(feature: Feature) -> Self {
        let (label, hint, kind) = match feature {
            Feature::Age => ("Age", "years (10-100)", RowKind::Whole),
            Feature::Gender => ("Gender", "", RowKind::Choice(&GENDER_OPTIONS)),
            Feature::Height => ("Height", "", RowKind::Height),
            Feature::Weight => ("Weight", "kg (20-200)", RowKind::Number),
            Feature::Calc => ("Alcohol (CALC)", "", RowKind::Choice(&FREQUENCY_OPTIONS)),
            Feature::Favc => ("High-calorie food (FAVC)", "", RowKind::Choice(&YES_NO_OPTIONS)),
            Feature::Fcvc => ("Vegetables (FCVC)", "1-3", RowKind::Number),
            Feature::Scc => ("Counts calories (SCC)", "", RowKind::Choice(&YES_NO_OPTIONS)),
            Feature::Ch2o => ("Water (CH2O)", "liters/day (0-3)", RowKind::Number),
            Feature::FamilyHistory => (
                "Family history of overweight",
                "",
                RowKind::Choice(&YES_NO_OPTIONS),
            ),
            Feature::Faf => ("Physical activity (FAF)", "0-3", RowKind::Number),
            Feature::Caec => ("Snacking (CAEC)", "", RowKind::Choice(&FREQUENCY_OPTIONS)),
            Feature::Ncp => ("Main meals (NCP)", "1-4", RowKind::Number),
            Feature::Smoke => ("Smoker (SMOKE)", "", RowKind::Choice(&YES_NO_OPTIONS)),
            Feature::Tue => ("Screen time (TUE)", "0-2", RowKind::Number),
            Feature::Mtrans => ("Transport (MTRANS)", "", RowKind::Choice(&TRANSPORT_OPTIONS)),
        };
        Self {
            feature,
            label,
            hint,
            kind,
            value: String::new(),
            choice: 0,
        }
    }

    fn is_choice(&self) -> bool {
        matches!(self.kind, RowKind::Choice(_))
    }

    fn select(&mut self, option: &str) {
        if let RowKind::Choice(options) = self.kind {
            if let Some(i) = options.iter().position(|o| *o == option) {
                self.choice = i;
            }
        }
    }

    /// Raw string handed to the form parser.
    fn raw(&self) -> &str {
        match self.kind {
            RowKind::Choice(options) => options[self.choice],
            _ => self.value.trim(),
        }
    }
}

/// Form state
pub struct FormState {
    pub rows: Vec<FormRow>,
    pub selected_row: usize,
    pub height_unit: HeightUnit,
    pub error_message: Option<String>,
}

impl Default for FormState {
    fn default() -> Self {
        Self::for_schema(&FeatureSchema::from_field_set(FieldSet::Compact))
    }
}

impl FormState {
    /// Rows for every schema column, followed by any required field the
    /// schema does not use.
    #[must_use]
    pub fn for_schema(schema: &FeatureSchema) -> Self {
        let mut rows: Vec<FormRow> = schema.columns().iter().map(|&f| FormRow::new(f)).collect();
        for &core in FieldSet::Compact.columns() {
            if !schema.contains(core) {
                rows.push(FormRow::new(core));
            }
        }
        Self {
            rows,
            selected_row: 0,
            height_unit: HeightUnit::Centimeters,
            error_message: None,
        }
    }

    pub fn next_row(&mut self) {
        self.selected_row = (self.selected_row + 1) % self.rows.len();
    }

    pub fn prev_row(&mut self) {
        if self.selected_row == 0 {
            self.selected_row = self.rows.len() - 1;
        } else {
            self.selected_row -= 1;
        }
    }

    /// Cycle the focused choice row. `forward` is →.
    pub fn cycle_choice(&mut self, forward: bool) {
        let row = &mut self.rows[self.selected_row];
        if let RowKind::Choice(options) = row.kind {
            row.choice = if forward {
                (row.choice + 1) % options.len()
            } else {
                (row.choice + options.len() - 1) % options.len()
            };
            self.error_message = None;
        }
    }

    pub fn input_char(&mut self, c: char) {
        let row = &mut self.rows[self.selected_row];
        if row.is_choice() {
            return;
        }
        let accepts = c.is_ascii_digit() || (c == '.' && row.kind != RowKind::Whole);
        if accepts && row.value.len() < 8 {
            row.value.push(c);
            self.error_message = None;
        }
    }

    pub fn delete_char(&mut self) {
        self.rows[self.selected_row].value.pop();
    }

    pub fn clear_row(&mut self) {
        self.rows[self.selected_row].value.zeroize();
    }

    /// Switch the height unit, converting an entered value.
    pub fn toggle_height_unit(&mut self) {
        let (next, factor) = match self.height_unit {
            HeightUnit::Centimeters => (HeightUnit::Meters, 0.01),
            HeightUnit::Meters => (HeightUnit::Centimeters, 100.0),
        };
        self.height_unit = next;

        if let Some(row) = self.rows.iter_mut().find(|r| r.kind == RowKind::Height) {
            if let Ok(v) = row.value.trim().parse::<f64>() {
                row.value = match next {
                    HeightUnit::Meters => format!("{:.2}", v * factor),
                    HeightUnit::Centimeters => format!("{:.0}", v * factor),
                };
            }
        }
    }

    /// Fill every row from a typed form.
    pub fn fill_from(&mut self, form: &LifestyleForm) {
        for row in &mut self.rows {
            match row.feature {
                Feature::Age => row.value = form.age.to_string(),
                Feature::Gender => row.select(&form.gender.to_string()),
                Feature::Height => {
                    row.value = match (form.height, self.height_unit) {
                        (Some(h), HeightUnit::Centimeters) => format!("{:.0}", h.meters() * 100.0),
                        (Some(h), HeightUnit::Meters) => format!("{:.2}", h.meters()),
                        (None, _) => String::new(),
                    }
                }
                Feature::Weight => row.value = form.weight.to_string(),
                Feature::Calc => row.select(form.calc.label()),
                Feature::Favc => row.select(&form.favc.to_string()),
                Feature::Fcvc => row.value = form.fcvc.to_string(),
                Feature::Scc => row.select(&form.scc.to_string()),
                Feature::Ch2o => row.value = form.ch2o.to_string(),
                Feature::FamilyHistory => row.select(&form.family_history.to_string()),
                Feature::Faf => row.value = form.faf.to_string(),
                Feature::Caec => row.select(form.caec.label()),
                Feature::Ncp => row.value = form.ncp.map(|v| v.to_string()).unwrap_or_default(),
                Feature::Smoke => row.select(&form.smoke.unwrap_or(YesNo::No).to_string()),
                Feature::Tue => row.value = form.tue.map(|v| v.to_string()).unwrap_or_default(),
                Feature::Mtrans => {
                    row.select(form.mtrans.unwrap_or(Transport::PublicTransportation).label());
                }
            }
        }
        self.error_message = None;
    }

    pub fn load_sample_data(&mut self) {
        self.fill_from(&LifestyleForm::sample());
    }

    /// Wipe every typed buffer and reset choices.
    pub fn clear_sensitive(&mut self) {
        for row in &mut self.rows {
            row.value.zeroize();
            row.choice = 0;
        }
        self.error_message = None;
        self.selected_row = 0;
    }

    /// Parse the rows into a typed form. Empty rows are left out.
    ///
    /// # Errors
    /// Returns `InvalidInput` naming the first bad row.
    pub fn to_form(&self) -> Result<LifestyleForm, NormalizeError> {
        let height_key = match self.height_unit {
            HeightUnit::Centimeters => "height_cm",
            HeightUnit::Meters => "height_m",
        };
        LifestyleForm::from_fields(self.rows.iter().filter(|row| !row.raw().is_empty()).map(|row| {
            let key = if row.feature == Feature::Height {
                height_key
            } else {
                row.feature.column_name()
            };
            (key, row.raw())
        }))
    }
}

/// Render the lifestyle form
pub fn render_form(f: &mut Frame, area: Rect, state: &FormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Rows
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_form_header(f, chunks[0], state);
    render_rows(f, chunks[1], state);
    render_form_footer(f, chunks[2], state);
}

fn render_form_header(f: &mut Frame, area: Rect, state: &FormState) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", ObescanTheme::text()),
        Span::styled("New Prediction", ObescanTheme::title()),
        Span::styled(
            format!(" │ {} fields", state.rows.len()),
            ObescanTheme::text_secondary(),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(ObescanTheme::border(false)),
    );

    f.render_widget(header, area);
}

fn render_rows(f: &mut Frame, area: Rect, state: &FormState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let mid = (state.rows.len() + 1) / 2;
    render_row_column(f, columns[0], &state.rows[..mid], 0, state);
    render_row_column(f, columns[1], &state.rows[mid..], mid, state);
}

fn render_row_column(f: &mut Frame, area: Rect, rows: &[FormRow], offset: usize, state: &FormState) {
    let constraints: Vec<Constraint> = rows
        .iter()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, row) in rows.iter().enumerate() {
        let is_selected = offset + i == state.selected_row;
        let block = Block::default()
            .title(Span::styled(
                format!(" {} ", row.label),
                ObescanTheme::field_label(is_selected),
            ))
            .borders(Borders::ALL)
            .border_style(ObescanTheme::border(is_selected));

        let mut spans = vec![Span::raw(" ")];
        match row.kind {
            RowKind::Choice(options) => {
                spans.push(Span::styled("‹ ", ObescanTheme::text_muted()));
                spans.push(Span::styled(
                    options[row.choice].replace('_', " "),
                    ObescanTheme::choice(is_selected),
                ));
                spans.push(Span::styled(" ›", ObescanTheme::text_muted()));
            }
            _ => {
                let hint = match (row.kind, state.height_unit) {
                    (RowKind::Height, HeightUnit::Centimeters) => "cm (100-250), [U] for m",
                    (RowKind::Height, HeightUnit::Meters) => "m (1.00-2.50), [U] for cm",
                    _ => row.hint,
                };
                if row.value.is_empty() {
                    spans.push(Span::styled(hint, ObescanTheme::text_muted()));
                } else {
                    spans.push(Span::styled(row.value.as_str(), ObescanTheme::text()));
                }
                if is_selected {
                    spans.push(Span::styled("▌", ObescanTheme::cursor()));
                }
            }
        }

        f.render_widget(Paragraph::new(Line::from(spans)).block(block), chunks[i]);
    }
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &FormState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", ObescanTheme::error()),
            Span::styled(err.clone(), ObescanTheme::error()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", ObescanTheme::key_hint()),
            Span::styled("Navigate ", ObescanTheme::key_desc()),
            Span::styled("[←→] ", ObescanTheme::key_hint()),
            Span::styled("Choose ", ObescanTheme::key_desc()),
            Span::styled("[Enter] ", ObescanTheme::key_hint()),
            Span::styled("Submit ", ObescanTheme::key_desc()),
            Span::styled("[S] ", ObescanTheme::key_hint()),
            Span::styled("Sample ", ObescanTheme::key_desc()),
            Span::styled("[U] ", ObescanTheme::key_hint()),
            Span::styled("Height unit ", ObescanTheme::key_desc()),
            Span::styled("[Esc] ", ObescanTheme::key_hint()),
            Span::styled("Cancel", ObescanTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(ObescanTheme::border(false)),
    );

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Frequency, Gender, HeightInput};

    fn anthropometric() -> FormState {
        FormState::for_schema(&FeatureSchema::from_field_set(FieldSet::Anthropometric))
    }

    #[test]
    fn test_rows_follow_schema() {
        let state = anthropometric();
        let features: Vec<Feature> = state.rows.iter().map(|r| r.feature).collect();
        assert_eq!(features, FieldSet::Anthropometric.columns());
    }

    #[test]
    fn test_sample_round_trips_through_parser() {
        let mut state = anthropometric();
        state.load_sample_data();
        let form = state.to_form().unwrap();
        assert_eq!(form.age, 25);
        assert_eq!(form.gender, Gender::Male);
        assert_eq!(form.calc, Frequency::Never);
        assert!((form.height.unwrap().meters() - 1.75).abs() < 1e-9);
    }

    #[test]
    fn test_height_unit_toggle_converts() {
        let mut state = anthropometric();
        state.load_sample_data();
        state.toggle_height_unit();
        assert_eq!(state.height_unit, HeightUnit::Meters);
        let form = state.to_form().unwrap();
        assert!(matches!(form.height, Some(HeightInput::Meters(m)) if (m - 1.75).abs() < 1e-9));
    }

    #[test]
    fn test_choice_cycling_wraps() {
        let mut state = anthropometric();
        state.selected_row = 1; // Gender
        state.cycle_choice(false);
        assert_eq!(state.rows[1].raw(), "Female");
        state.cycle_choice(true);
        assert_eq!(state.rows[1].raw(), "Male");
    }

    #[test]
    fn test_whole_number_row_rejects_dot() {
        let mut state = anthropometric();
        state.input_char('2');
        state.input_char('.');
        state.input_char('5');
        assert_eq!(state.rows[0].value, "25");
    }

    #[test]
    fn test_clear_sensitive_empties_rows() {
        let mut state = anthropometric();
        state.load_sample_data();
        state.clear_sensitive();
        assert!(state.rows.iter().all(|r| r.value.is_empty() && r.choice == 0));
        assert!(state.to_form().is_err());
    }
}
