// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use loandesk_app::{
    AppCommand, AppEvent, AppMode, AppState, Application, ApplicationStatus, DEFAULT_TICK_INTERVAL,
    Employee, Locale, Roster, RosterStats, StatusFilter, TabKind, Ticker, format_amount,
    is_urgent, timer_label,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs, Wrap};
use std::io;
use std::ops::ControlFlow;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use time::OffsetDateTime;

const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(4);
const POLL_INTERVAL: Duration = Duration::from_millis(120);
/// Rows taken by the table border and header.
const TABLE_CHROME_ROWS: u16 = 3;

const APPLICATION_COLUMNS: [&str; 9] = [
    "id", "client", "phone", "type", "amount", "status", "priority", "manager", "timer",
];
const TEAM_COLUMNS: [&str; 4] = ["name", "role", "online", "workload"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSettings {
    pub tick_interval: Duration,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalEvent {
    Tick,
    ClearStatus { token: u64 },
}

#[derive(Debug, Default)]
struct ViewData {
    help_visible: bool,
    status_token: u64,
}

pub fn run_app(state: &mut AppState, roster: &mut Roster, settings: ViewSettings) -> Result<()> {
    let (internal_tx, internal_rx) = mpsc::channel();

    // Started before raw mode so a spawn failure leaves the terminal alone.
    let tick_tx = internal_tx.clone();
    let ticker = Ticker::start(settings.tick_interval, move || {
        if tick_tx.send(InternalEvent::Tick).is_err() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })?;

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    let mut view_data = ViewData::default();

    tracing::info!(
        applications = roster.applications().len(),
        employees = roster.employees().len(),
        "roster view opened"
    );

    let result = event_loop(
        &mut terminal,
        state,
        roster,
        &mut view_data,
        &internal_tx,
        &internal_rx,
    );

    // No tick may touch the roster once the view is gone.
    ticker.stop();
    tracing::info!("roster view closed");

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    roster: &mut Roster,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    internal_rx: &Receiver<InternalEvent>,
) -> Result<()> {
    loop {
        process_internal_events(state, roster, view_data, internal_rx);

        terminal
            .draw(|frame| render(frame, state, roster, view_data))
            .context("draw frame")?;

        if event::poll(POLL_INTERVAL).context("poll event")? {
            if let Event::Key(key) = event::read().context("read event")?
                && handle_key_event(state, roster, view_data, internal_tx, key)
            {
                return Ok(());
            }
        }
    }
}

fn process_internal_events(
    state: &mut AppState,
    roster: &mut Roster,
    view_data: &mut ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::Tick => {
                state.dispatch(roster, AppCommand::Tick);
            }
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(roster, AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_AFTER);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn apply(
    state: &mut AppState,
    roster: &mut Roster,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: AppCommand,
) -> Vec<AppEvent> {
    let events = state.dispatch(roster, command);
    if events
        .iter()
        .any(|event| matches!(event, AppEvent::StatusUpdated(_)))
    {
        view_data.status_token = view_data.status_token.saturating_add(1);
        schedule_status_clear(internal_tx, view_data.status_token);
    }
    events
}

fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// Returns true when the app should exit.
fn handle_key_event(
    state: &mut AppState,
    roster: &mut Roster,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c'))
    {
        return true;
    }

    if view_data.help_visible {
        view_data.help_visible = false;
        return false;
    }

    let command = match state.mode {
        AppMode::Nav => match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('?') => {
                view_data.help_visible = true;
                return false;
            }
            KeyCode::Tab => Some(AppCommand::NextTab),
            KeyCode::BackTab => Some(AppCommand::PrevTab),
            _ if state.active_tab != TabKind::Applications => None,
            KeyCode::Char('j') | KeyCode::Down => Some(AppCommand::MoveSelection(1)),
            KeyCode::Char('k') | KeyCode::Up => Some(AppCommand::MoveSelection(-1)),
            KeyCode::Char('g') | KeyCode::Home => Some(AppCommand::MoveSelection(isize::MIN / 2)),
            KeyCode::Char('G') | KeyCode::End => Some(AppCommand::MoveSelection(isize::MAX / 2)),
            KeyCode::Char('/') => Some(AppCommand::BeginSearch),
            KeyCode::Char('f') => Some(AppCommand::CycleStatusFilter),
            KeyCode::Char('F') => Some(AppCommand::SetStatusFilter(StatusFilter::All)),
            KeyCode::Char('x') => Some(AppCommand::ClearSearch),
            KeyCode::Enter => Some(AppCommand::OpenDetail),
            _ => None,
        },
        AppMode::Search => match key.code {
            KeyCode::Enter => Some(AppCommand::EndSearch),
            KeyCode::Esc => {
                apply(state, roster, view_data, internal_tx, AppCommand::ClearSearch);
                Some(AppCommand::EndSearch)
            }
            KeyCode::Backspace => Some(AppCommand::SearchBackspace),
            KeyCode::Char(ch) => Some(AppCommand::SearchInput(ch)),
            _ => None,
        },
        AppMode::Detail => match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Some(AppCommand::CloseDetail),
            KeyCode::Char('c') => Some(AppCommand::BeginComment),
            KeyCode::Char(ch) => status_for_digit(ch).map(AppCommand::SetApplicationStatus),
            _ => None,
        },
        AppMode::Comment => match key.code {
            KeyCode::Enter => Some(AppCommand::SubmitComment { at: now() }),
            KeyCode::Esc => Some(AppCommand::CancelComment),
            KeyCode::Backspace => Some(AppCommand::CommentBackspace),
            KeyCode::Char(ch) => Some(AppCommand::CommentInput(ch)),
            _ => None,
        },
    };

    if let Some(command) = command {
        apply(state, roster, view_data, internal_tx, command);
    }
    false
}

/// `1`..`5` pick a status in workflow order.
fn status_for_digit(ch: char) -> Option<ApplicationStatus> {
    let index = ch.to_digit(10)?.checked_sub(1)? as usize;
    ApplicationStatus::ALL.get(index).copied()
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, roster: &Roster, view_data: &ViewData) {
    let locale = state.locale;
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.area());

    let selected_tab = TabKind::ALL
        .iter()
        .position(|tab| *tab == state.active_tab)
        .unwrap_or(0);
    let tabs = Tabs::new(TabKind::ALL.map(|tab| tab.label(locale)).to_vec())
        .block(Block::default().title("loandesk").borders(Borders::ALL))
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(selected_tab);
    frame.render_widget(tabs, layout[0]);

    match state.active_tab {
        TabKind::Applications => {
            let summary = Paragraph::new(format!(
                "{}\n{}",
                render_stats_text(&roster.stats(), locale),
                render_filter_text(state)
            ))
            .block(Block::default().borders(Borders::LEFT | Borders::RIGHT));
            frame.render_widget(summary, layout[1]);
            render_applications(frame, layout[2], state, roster);
        }
        TabKind::Team => {
            let online = roster
                .employees()
                .iter()
                .filter(|employee| employee.is_online)
                .count();
            let summary = Paragraph::new(format!(
                "online {online} of {}",
                roster.employees().len()
            ))
            .block(Block::default().borders(Borders::LEFT | Borders::RIGHT));
            frame.render_widget(summary, layout[1]);
            render_team(frame, layout[2], roster.employees());
        }
    }

    let status_widget = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(status_widget, layout[3]);

    if matches!(state.mode, AppMode::Detail | AppMode::Comment)
        && let Some(app) = state.detail_application(roster)
    {
        let area = centered_rect(80, 80, frame.area());
        frame.render_widget(Clear, area);
        let detail = Paragraph::new(render_detail_text(app, state))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title(format!("application {}", app.id))
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::Cyan)),
            );
        frame.render_widget(detail, area);
    }

    if view_data.help_visible {
        let area = centered_rect(70, 50, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_applications(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &AppState,
    roster: &Roster,
) {
    let locale = state.locale;
    let visible = state.visible(roster);
    let page_rows = usize::from(area.height.saturating_sub(TABLE_CHROME_ROWS)).max(1);
    let offset = scroll_offset(state.selected, page_rows);

    let header = Row::new(APPLICATION_COLUMNS.map(|label| {
        Cell::from(label).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    }));

    let rows = visible
        .iter()
        .enumerate()
        .skip(offset)
        .take(page_rows)
        .map(|(index, app)| {
            let mut style = Style::default();
            if app.is_overdue() {
                style = style.fg(Color::Red);
            } else if is_urgent(app.timer) {
                style = style.fg(Color::LightRed).add_modifier(Modifier::BOLD);
            }
            if index == state.selected {
                style = style.bg(Color::DarkGray);
            }
            Row::new(application_cells(app, locale)).style(style)
        });

    let widths = [
        Constraint::Length(8),
        Constraint::Min(20),
        Constraint::Length(19),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(8),
        Constraint::Min(20),
        Constraint::Length(12),
    ];
    let title = format!("applications {}/{}", visible.len(), roster.applications().len());
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn render_team(frame: &mut ratatui::Frame<'_>, area: Rect, employees: &[Employee]) {
    let header = Row::new(TEAM_COLUMNS.map(|label| {
        Cell::from(label).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    }));
    let rows = employees.iter().map(|employee| {
        let style = if employee.is_online {
            Style::default()
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Row::new(team_cells(employee)).style(style)
    });
    let widths = [
        Constraint::Min(24),
        Constraint::Length(10),
        Constraint::Length(8),
        Constraint::Length(10),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::default().title("team").borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn scroll_offset(selected: usize, page_rows: usize) -> usize {
    selected.saturating_sub(page_rows.saturating_sub(1))
}

fn application_cells(app: &Application, locale: Locale) -> Vec<String> {
    vec![
        app.id.to_string(),
        app.client_name.clone(),
        app.phone.clone(),
        app.loan_type.label(locale).to_owned(),
        format_amount(app.amount),
        app.status.label(locale).to_owned(),
        app.priority.label(locale).to_owned(),
        app.assigned_to.clone(),
        timer_label(app, locale),
    ]
}

fn team_cells(employee: &Employee) -> Vec<String> {
    vec![
        employee.name.clone(),
        employee.role.as_str().to_owned(),
        if employee.is_online { "yes" } else { "no" }.to_owned(),
        employee.workload.to_string(),
    ]
}

fn render_stats_text(stats: &RosterStats, locale: Locale) -> String {
    let labels = match locale {
        Locale::En => ["total", "new", "in progress", "approved", "overdue"],
        Locale::Ru => ["Всего", "Новые", "В работе", "Одобрено", "Просрочено"],
    };
    let values = [
        stats.total,
        stats.new,
        stats.processing,
        stats.approved,
        stats.overdue,
    ];
    labels
        .iter()
        .zip(values)
        .map(|(label, value)| format!("{label} {value}"))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn render_filter_text(state: &AppState) -> String {
    let cursor = if state.mode == AppMode::Search { "_" } else { "" };
    let filters = StatusFilter::CYCLE
        .iter()
        .map(|filter| {
            let label = filter.label(state.locale);
            if *filter == state.status_filter {
                format!("[{label}]")
            } else {
                label.to_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    let mut text = format!("search: {}{cursor} | filter: {filters}", state.search);
    if !StatusFilter::CYCLE.contains(&state.status_filter) {
        text.push_str(&format!(" [{}]", state.status_filter.label(state.locale)));
    }
    text
}

fn render_detail_text(app: &Application, state: &AppState) -> String {
    let locale = state.locale;
    let statuses = ApplicationStatus::ALL
        .iter()
        .enumerate()
        .map(|(index, status)| {
            let label = status.label(locale);
            if *status == app.status {
                format!("{}:[{label}]", index + 1)
            } else {
                format!("{}:{label}", index + 1)
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    let mut lines = vec![
        format!("client: {} ({})", app.client_name, app.client_id),
        format!("phone: {}", app.phone),
        format!(
            "type: {} | amount: {}",
            app.loan_type.label(locale),
            format_amount(app.amount)
        ),
        format!(
            "created: {} | manager: {}",
            app.created_at.date(),
            app.assigned_to
        ),
        format!(
            "priority: {} | timer: {}",
            app.priority.label(locale),
            match timer_label(app, locale) {
                label if label.is_empty() => "-".to_owned(),
                label => label,
            }
        ),
        format!("status: {statuses}"),
        format!("documents: {}", app.documents.join(", ")),
        String::new(),
        "comments:".to_owned(),
    ];
    if app.comments.is_empty() {
        lines.push("  (none)".to_owned());
    } else {
        lines.extend(app.comments.iter().map(|comment| format!("  {comment}")));
    }
    lines.push(String::new());
    if state.mode == AppMode::Comment {
        lines.push(format!("new comment: {}_", state.comment_draft));
    } else if !state.comment_draft.is_empty() {
        lines.push(format!("draft: {}", state.comment_draft));
    }
    lines.join("\n")
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    if view_data.help_visible {
        return String::new();
    }
    if let Some(message) = &state.status_line {
        return message.clone();
    }

    match state.mode {
        AppMode::Nav if state.active_tab == TabKind::Team => {
            "NAV | tab switch | ? help | q quit".to_owned()
        }
        AppMode::Nav => {
            "NAV | j/k move | enter open | / search | f filter | x clear | tab switch | ? help | q quit"
                .to_owned()
        }
        AppMode::Search => "SEARCH | type to filter | enter keep | esc clear".to_owned(),
        AppMode::Detail => "DETAIL | 1-5 set status | c comment | esc close".to_owned(),
        AppMode::Comment => "COMMENT | enter add | esc cancel".to_owned(),
    }
}

fn help_overlay_text() -> &'static str {
    "global: ctrl+q quit | ? help\n\
nav: j/k or arrows move | g/G first/last | tab/shift+tab switch tab\n\
nav: enter open application | / search name, phone or id | x clear search\n\
nav: f cycle filter (all, new, in progress, approved) | F show all\n\
search: type to filter | backspace delete | enter keep | esc clear\n\
detail: 1 new 2 in progress 3 approved 4 rejected 5 issued | c comment | esc close\n\
comment: type | enter add | esc back to detail"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
