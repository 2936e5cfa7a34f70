use anyhow::Result;
use bmi_tracker::{BmiError, BmiRecord, Category, Classification, RecordStore, Tracker, Trend};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Cell, Chart, Clear, Dataset, GraphType, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Weight,
    Height,
}

impl Field {
    pub fn next(&self) -> Self {
        match self {
            Field::Name => Field::Weight,
            Field::Weight => Field::Height,
            Field::Height => Field::Name,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Field::Name => Field::Height,
            Field::Weight => Field::Name,
            Field::Height => Field::Weight,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Field::Name => "Name:",
            Field::Weight => "Weight (kg):",
            Field::Height => "Height (m):",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Form,
    History,
    Trend,
    ConfirmClear { name: String, count: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Error(String),
}

pub struct App<S: RecordStore> {
    tracker: Tracker<S>,
    pub name: String,
    pub weight: String,
    pub height: String,
    pub focus: Field,
    pub view: View,
    pub result: Option<Classification>,
    pub status: Option<Status>,
    pub history: Vec<BmiRecord>,
    pub history_state: TableState,
    pub trend: Trend,
    pub user_count: usize,
    pub should_quit: bool,
}

impl<S: RecordStore> App<S> {
    pub fn new(tracker: Tracker<S>) -> Self {
        let mut app = Self {
            tracker,
            name: String::new(),
            weight: String::new(),
            height: String::new(),
            focus: Field::Name,
            view: View::Form,
            result: None,
            status: None,
            history: Vec::new(),
            history_state: TableState::default(),
            trend: Trend::default(),
            user_count: 0,
            should_quit: false,
        };
        app.refresh_user_count();
        app
    }

    pub fn tracker(&self) -> &Tracker<S> {
        &self.tracker
    }

    fn field_mut(&mut self) -> &mut String {
        match self.focus {
            Field::Name => &mut self.name,
            Field::Weight => &mut self.weight,
            Field::Height => &mut self.height,
        }
    }

    pub fn field_value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Weight => &self.weight,
            Field::Height => &self.height,
        }
    }

    /// Header count, re-read only after the table changes
    fn refresh_user_count(&mut self) {
        match self.tracker.known_names() {
            Ok(names) => self.user_count = names.len(),
            Err(e) => {
                log::warn!("Could not count users: {}", e);
                self.error(format!("Could not count users: {}", e));
            }
        }
    }

    fn info(&mut self, msg: impl Into<String>) {
        self.status = Some(Status::Info(msg.into()));
    }

    fn error(&mut self, msg: impl Into<String>) {
        self.status = Some(Status::Error(msg.into()));
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.view.clone() {
            View::Form => self.handle_form_key(key),
            View::History => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => self.view = View::Form,
                KeyCode::Down | KeyCode::Char('j') => self.next_row(),
                KeyCode::Up | KeyCode::Char('k') => self.previous_row(),
                KeyCode::Home => self.history_state.select(Some(0)),
                KeyCode::End => {
                    if !self.history.is_empty() {
                        self.history_state.select(Some(self.history.len() - 1));
                    }
                }
                _ => {}
            },
            View::Trend => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
                    self.view = View::Form;
                }
            }
            View::ConfirmClear { name, .. } => {
                let confirmed = matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y'));
                self.view = View::Form;
                if confirmed {
                    self.clear_history(&name);
                } else {
                    self.info("Delete cancelled.");
                }
            }
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.previous(),
            KeyCode::Enter | KeyCode::F(1) => self.calculate(),
            KeyCode::F(2) => self.show_history(),
            KeyCode::F(3) => self.show_trend(),
            KeyCode::F(4) => self.request_clear(),
            KeyCode::Backspace => {
                self.field_mut().pop();
            }
            KeyCode::Char(c) => self.field_mut().push(c),
            _ => {}
        }
    }

    /// Validate, classify and append. On error the previous result stays on screen.
    pub fn calculate(&mut self) {
        let name = self.name.clone();
        let weight = self.weight.clone();
        let height = self.height.clone();

        match self.tracker.submit(&name, &weight, &height) {
            Ok(record) => {
                self.result = Some(record.classification());
                self.info(format!("Saved {} for {}.", record.classification(), record.name()));
                self.refresh_user_count();
            }
            Err(BmiError::InvalidName) => self.error("Please enter your name."),
            Err(e @ BmiError::InvalidMeasurement { .. }) => {
                self.error(format!("Please enter valid numbers for weight and height ({}).", e))
            }
            Err(e) => self.error(format!("Could not save record: {}", e)),
        }
    }

    pub fn show_history(&mut self) {
        if self.name.trim().is_empty() {
            self.error("Enter your name to view history.");
            return;
        }

        let name = self.name.clone();
        match self.tracker.history(&name) {
            Ok(records) if records.is_empty() => self.info("No history found for this user."),
            Ok(records) => {
                self.history = records;
                self.history_state.select(Some(0));
                self.status = None;
                self.view = View::History;
            }
            Err(e) => self.error(format!("Could not read history: {}", e)),
        }
    }

    pub fn show_trend(&mut self) {
        if self.name.trim().is_empty() {
            self.error("Enter your name to plot trend.");
            return;
        }

        let name = self.name.clone();
        match self.tracker.trend(&name) {
            Ok(trend) if trend.is_empty() => self.info("No data to plot."),
            Ok(trend) => {
                self.trend = trend;
                self.status = None;
                self.view = View::Trend;
            }
            Err(e) => self.error(format!("Could not read history: {}", e)),
        }
    }

    /// Deletion is gated behind ConfirmClear
    pub fn request_clear(&mut self) {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            self.error("Enter the name to clear history.");
            return;
        }

        match self.tracker.pending_deletion(&name) {
            Ok(0) => self.info(format!("No history found for {}.", name)),
            Ok(count) => self.view = View::ConfirmClear { name, count },
            Err(e) => self.error(format!("Could not read history: {}", e)),
        }
    }

    fn clear_history(&mut self, name: &str) {
        match self.tracker.clear(name) {
            Ok(removed) => {
                self.result = None;
                self.history.clear();
                self.trend = Trend::default();
                self.info(format!("History for '{}' has been cleared ({} records).", name, removed));
                self.refresh_user_count();
            }
            Err(e) => self.error(format!("Could not clear history: {}", e)),
        }
    }

    pub fn next_row(&mut self) {
        let len = self.history.len();
        if len == 0 {
            return;
        }
        let i = match self.history_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.history_state.select(Some(i));
    }

    pub fn previous_row(&mut self) {
        let len = self.history.len();
        if len == 0 {
            return;
        }
        let i = match self.history_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.history_state.select(Some(i));
    }
}

pub fn category_color(category: Category) -> Color {
    match category.color_hint() {
        "blue" => Color::Blue,
        "green" => Color::Green,
        "orange" => Color::Rgb(255, 165, 0),
        "red" => Color::Red,
        _ => Color::White,
    }
}

pub fn run_ui<S: RecordStore>(app: &mut App<S>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.map_err(Into::into)
}

fn run_app<B: ratatui::backend::Backend, S: RecordStore>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
) -> io::Result<()> {
    while !app.should_quit {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            app.handle_key(key);
        }
    }
    Ok(())
}

fn ui<S: RecordStore>(f: &mut Frame, app: &mut App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.view.clone() {
        View::Form => render_form(f, chunks[1], app),
        View::History => render_history(f, chunks[1], app),
        View::Trend => render_trend(f, chunks[1], app),
        View::ConfirmClear { name, count } => {
            render_form(f, chunks[1], app);
            render_confirm(f, chunks[1], &name, count);
        }
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header<S: RecordStore>(f: &mut Frame, area: Rect, app: &App<S>) {
    let title = match &app.view {
        View::Form | View::ConfirmClear { .. } => "BMI Calculator".to_string(),
        View::History => format!("{}'s BMI History", truncate(app.name.trim(), 30)),
        View::Trend => format!("BMI Trend for {}", truncate(app.name.trim(), 30)),
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            title,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(format!("Users: {}", app.user_count), Style::default().fg(Color::White)),
    ]))
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_form<S: RecordStore>(f: &mut Frame, area: Rect, app: &App<S>) {
    let mut content = vec![Line::from("")];

    for field in [Field::Name, Field::Weight, Field::Height] {
        let focused = field == app.focus && app.view == View::Form;
        let value_style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        content.push(Line::from(vec![
            Span::styled(
                format!("  {:<14}", field.label()),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("[ {} ]", app.field_value(field)), value_style),
            if focused {
                Span::styled(" ◀", Style::default().fg(Color::Yellow))
            } else {
                Span::raw("")
            },
        ]));
        content.push(Line::from(""));
    }

    content.push(Line::from("  ─────────────────────────────────────"));
    content.push(Line::from(""));

    if let Some(result) = app.result {
        content.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(
                result.to_string(),
                Style::default()
                    .fg(category_color(result.category))
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
    }

    let form = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Enter Details "),
    );

    f.render_widget(form, area);
}

fn render_history<S: RecordStore>(f: &mut Frame, area: Rect, app: &mut App<S>) {
    let header_cells = ["Date", "Weight", "Height", "BMI", "Category"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.history.iter().map(|rec| {
        let color = category_color(rec.category());

        Row::new(vec![
            Cell::from(rec.date_string()),
            Cell::from(format!("{}", rec.weight_kg())),
            Cell::from(format!("{}", rec.height_m())),
            Cell::from(format!("{:.2}", rec.bmi())).style(Style::default().fg(color)),
            Cell::from(rec.category().as_str()).style(Style::default().fg(color)),
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(21),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(8),
            Constraint::Length(13),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(format!(" {} records ", app.history.len())),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.history_state);
}

fn render_trend<S: RecordStore>(f: &mut Frame, area: Rect, app: &App<S>) {
    let Some((x_bounds, y_bounds)) = app.trend.bounds() else {
        f.render_widget(Paragraph::new("No data to plot."), area);
        return;
    };

    let data = app.trend.series();
    let dataset = Dataset::default()
        .name("BMI")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Magenta))
        .data(&data);

    let date_label = |p: Option<&bmi_tracker::TrendPoint>| {
        p.map(|p| p.timestamp.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    };

    let x_axis = Axis::default()
        .title("Date")
        .style(Style::default().fg(Color::Gray))
        .bounds(x_bounds)
        .labels(vec![
            Span::raw(date_label(app.trend.first())),
            Span::raw(date_label(app.trend.latest())),
        ]);

    let y_axis = Axis::default()
        .title("BMI")
        .style(Style::default().fg(Color::Gray))
        .bounds(y_bounds)
        .labels(vec![
            Span::raw(format!("{:.1}", y_bounds[0])),
            Span::raw(format!("{:.1}", (y_bounds[0] + y_bounds[1]) / 2.0)),
            Span::raw(format!("{:.1}", y_bounds[1])),
        ]);

    let title = match app.trend.change() {
        Some(change) => format!(" {} points | change {:+.2} ", app.trend.len(), change),
        None => format!(" {} points ", app.trend.len()),
    };

    let chart = Chart::new(vec![dataset])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(title),
        )
        .x_axis(x_axis)
        .y_axis(y_axis);

    f.render_widget(chart, area);
}

fn render_confirm(f: &mut Frame, area: Rect, name: &str, count: usize) {
    let popup = centered_rect(60, 7, area);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  Delete all history for '{}'? ({} records)", truncate(name, 30), count),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("y", Style::default().fg(Color::Red)),
            Span::raw(" delete   "),
            Span::styled("any other key", Style::default().fg(Color::Yellow)),
            Span::raw(" cancel"),
        ]),
    ];

    let dialog = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(" Confirm Delete "),
    );

    f.render_widget(Clear, popup);
    f.render_widget(dialog, popup);
}

fn render_status_bar<S: RecordStore>(f: &mut Frame, area: Rect, app: &App<S>) {
    let mut status_spans = vec![];

    match &app.status {
        Some(Status::Info(msg)) => {
            status_spans.push(Span::styled(format!(" {} ", msg), Style::default().fg(Color::Green)));
            status_spans.push(Span::raw("|"));
        }
        Some(Status::Error(msg)) => {
            status_spans.push(Span::styled(format!(" {} ", msg), Style::default().fg(Color::Red)));
            status_spans.push(Span::raw("|"));
        }
        None => {}
    }

    let keys: &[(&str, &str)] = match app.view {
        View::Form => &[
            ("Enter", "Calculate"),
            ("F2", "History"),
            ("F3", "Trend"),
            ("F4", "Clear"),
            ("Tab", "Field"),
            ("Esc", "Quit"),
        ],
        View::History => &[("↑/↓", "Nav"), ("Esc", "Back")],
        View::Trend => &[("Esc", "Back")],
        View::ConfirmClear { .. } => &[("y", "Delete"), ("n", "Cancel")],
    };

    for (key, action) in keys {
        status_spans.push(Span::raw(" "));
        status_spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(format!(" {} ", action)));
    }

    let status_bar = Paragraph::new(Line::from(status_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bmi_tracker::MemoryStore;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text<S: RecordStore>(app: &mut App<S>, text: &str) {
        for c in text.chars() {
            app.handle_key(press(KeyCode::Char(c)));
        }
    }

    fn fill_form<S: RecordStore>(app: &mut App<S>, name: &str, weight: &str, height: &str) {
        app.name = name.to_string();
        app.weight = weight.to_string();
        app.height = height.to_string();
    }

    fn new_app() -> App<MemoryStore> {
        App::new(Tracker::new(MemoryStore::new()).unwrap())
    }

    #[test]
    fn test_typing_and_field_focus() {
        let mut app = new_app();
        type_text(&mut app, "Ada");
        app.handle_key(press(KeyCode::Tab));
        type_text(&mut app, "70x");
        app.handle_key(press(KeyCode::Backspace));
        app.handle_key(press(KeyCode::Tab));
        type_text(&mut app, "1.75");

        assert_eq!(app.name, "Ada");
        assert_eq!(app.weight, "70");
        assert_eq!(app.height, "1.75");

        app.handle_key(press(KeyCode::BackTab));
        assert_eq!(app.focus, Field::Weight);
    }

    #[test]
    fn test_q_is_text_on_the_form() {
        let mut app = new_app();
        type_text(&mut app, "q");
        assert_eq!(app.name, "q");
        assert!(!app.should_quit);

        app.handle_key(press(KeyCode::Esc));
        assert!(app.should_quit);
    }

    #[test]
    fn test_calculate_shows_result_and_saves() {
        let mut app = new_app();
        fill_form(&mut app, "Ada", "70", "1.75");
        app.handle_key(press(KeyCode::Enter));

        let result = app.result.unwrap();
        assert_eq!(result.bmi, 22.86);
        assert_eq!(result.category, Category::Normal);
        assert_eq!(category_color(result.category), Color::Green);
        assert_eq!(app.tracker().history("ada").unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_input_keeps_previous_result() {
        let mut app = new_app();
        fill_form(&mut app, "Ada", "70", "1.75");
        app.calculate();
        let before = app.result;

        app.weight = "heavy".to_string();
        app.calculate();
        assert_eq!(app.result, before);
        assert!(matches!(app.status, Some(Status::Error(_))));

        app.name = "  ".to_string();
        app.weight = "70".to_string();
        app.calculate();
        assert_eq!(app.status, Some(Status::Error("Please enter your name.".to_string())));
        assert_eq!(app.tracker().history("Ada").unwrap().len(), 1);
    }

    #[test]
    fn test_history_view() {
        let mut app = new_app();
        fill_form(&mut app, "Ada", "70", "1.75");
        app.show_history();
        assert_eq!(app.view, View::Form);
        assert_eq!(app.status, Some(Status::Info("No history found for this user.".to_string())));

        app.calculate();
        app.weight = "72".to_string();
        app.calculate();
        app.name = "ADA".to_string();
        app.handle_key(press(KeyCode::F(2)));

        assert_eq!(app.view, View::History);
        assert_eq!(app.history.len(), 2);
        assert_eq!(app.history_state.selected(), Some(0));

        app.handle_key(press(KeyCode::Down));
        assert_eq!(app.history_state.selected(), Some(1));
        app.handle_key(press(KeyCode::Down));
        assert_eq!(app.history_state.selected(), Some(0));
        app.handle_key(press(KeyCode::Up));
        assert_eq!(app.history_state.selected(), Some(1));

        app.handle_key(press(KeyCode::Esc));
        assert_eq!(app.view, View::Form);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_trend_view_requires_data() {
        let mut app = new_app();
        app.show_trend();
        assert_eq!(app.status, Some(Status::Error("Enter your name to plot trend.".to_string())));

        fill_form(&mut app, "Ada", "70", "1.75");
        app.show_trend();
        assert_eq!(app.status, Some(Status::Info("No data to plot.".to_string())));

        app.calculate();
        app.handle_key(press(KeyCode::F(3)));
        assert_eq!(app.view, View::Trend);
        assert_eq!(app.trend.len(), 1);
    }

    #[test]
    fn test_clear_requires_confirmation() {
        let mut app = new_app();
        fill_form(&mut app, "Ada", "70", "1.75");
        app.calculate();
        app.calculate();

        app.handle_key(press(KeyCode::F(4)));
        assert_eq!(
            app.view,
            View::ConfirmClear {
                name: "Ada".to_string(),
                count: 2
            }
        );

        // anything but y cancels
        app.handle_key(press(KeyCode::Char('n')));
        assert_eq!(app.view, View::Form);
        assert_eq!(app.tracker().history("Ada").unwrap().len(), 2);

        app.handle_key(press(KeyCode::F(4)));
        app.handle_key(press(KeyCode::Char('y')));
        assert_eq!(app.view, View::Form);
        assert!(app.result.is_none());
        assert!(app.tracker().history("Ada").unwrap().is_empty());
    }

    #[test]
    fn test_user_count_follows_submits_and_clears() {
        let mut app = new_app();
        assert_eq!(app.user_count, 0);

        fill_form(&mut app, "Ada", "70", "1.75");
        app.calculate();
        app.calculate();
        assert_eq!(app.user_count, 1);

        app.name = "Bob".to_string();
        app.calculate();
        app.name = "ADA".to_string();
        app.calculate();
        assert_eq!(app.user_count, 2);

        app.name = "Bob".to_string();
        app.request_clear();
        app.handle_key(press(KeyCode::Char('y')));
        assert_eq!(app.user_count, 1);
    }

    #[test]
    fn test_user_count_starts_from_existing_rows() {
        let mut tracker = Tracker::new(MemoryStore::new()).unwrap();
        tracker.submit("Ada", "70", "1.75").unwrap();
        tracker.submit("Bob", "80", "1.80").unwrap();
        assert_eq!(App::new(tracker).user_count, 2);
    }

    #[test]
    fn test_category_colors_follow_hint() {
        assert_eq!(category_color(Category::Underweight), Color::Blue);
        assert_eq!(category_color(Category::Normal), Color::Green);
        assert_eq!(category_color(Category::Overweight), Color::Rgb(255, 165, 0));
        assert_eq!(category_color(Category::Obese), Color::Red);
    }

    #[test]
    fn test_clear_unknown_name() {
        let mut app = new_app();
        app.name = "Zed".to_string();
        app.request_clear();
        assert_eq!(app.view, View::Form);
        assert_eq!(app.status, Some(Status::Info("No history found for Zed.".to_string())));
    }

    #[test]
    fn test_ctrl_c_quits_from_any_view() {
        let mut app = new_app();
        app.view = View::Trend;
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ÅÅÅÅÅÅÅÅÅÅÅÅ", 6), "ÅÅÅ...");
    }
}
