use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use pocket_atelier::model::{Project, ProjectPatch, WidgetData};
use pocket_atelier::storage::save_store;
use pocket_atelier::store::ProjectStore;
use pocket_atelier::timecalc::{
    adjust_clock, compute_life_stats, compute_range_progress, current_minutes, format_gauge,
    minutes_to_angle, parse_clock_minutes,
};
use pocket_atelier::widgets::{
    clamp_lifespan, ClockMode, DisplayFormat, DisplayUnit, MixElement, TextAlign,
    TimetableViewType, Weekday,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::{Alignment, Color, Modifier, Rect, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Tabs, Wrap,
};
use ratatui::Terminal;
use std::io::{stdout, Stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Live previews recompute progress on this cadence.
const PREVIEW_REFRESH: Duration = Duration::from_secs(60);

pub fn run(store: ProjectStore, path: PathBuf) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let mut app = App::new(store, path);
    let result = app.event_loop(&mut terminal);
    teardown_terminal(&mut terminal)?;
    result
}

struct App {
    store: ProjectStore,
    path: PathBuf,
    selected: usize,
    status: String,
    mode: Mode,
    now_minutes: i32,
    last_refresh: Instant,
}

enum Mode {
    Normal,
    ConfirmQuit,
}

impl App {
    fn new(store: ProjectStore, path: PathBuf) -> Self {
        App {
            store,
            path,
            selected: 0,
            status: "u undo  r redo  s save  q quit".into(),
            mode: Mode::Normal,
            now_minutes: current_minutes(),
            last_refresh: Instant::now(),
        }
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            if self.last_refresh.elapsed() >= PREVIEW_REFRESH {
                self.now_minutes = current_minutes();
                self.last_refresh = Instant::now();
            }
            terminal.draw(|f| self.draw(f))?;
            if event::poll(Duration::from_millis(200))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key)? {
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    fn project(&self) -> Option<&Project> {
        self.store.current_project()
    }

    fn is_dirty(&self) -> bool {
        match self.project() {
            Some(current) => self.store.find_project(&current.id) != Some(current),
            None => false,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        match self.mode {
            Mode::Normal => self.handle_normal_key(key),
            Mode::ConfirmQuit => self.handle_confirm_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Result<bool> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                if self.is_dirty() {
                    self.mode = Mode::ConfirmQuit;
                    return Ok(false);
                }
                return Ok(true);
            }
            KeyCode::Char('z') if ctrl => self.undo(),
            KeyCode::Char('y') if ctrl => self.redo(),
            KeyCode::Char('u') => self.undo(),
            KeyCode::Char('r') => self.redo(),
            KeyCode::Char('s') => self.persist()?,
            _ => self.handle_widget_key(key),
        }
        Ok(false)
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> Result<bool> {
        match key.code {
            KeyCode::Char('y') => {
                self.persist()?;
                Ok(true)
            }
            KeyCode::Char('n') => Ok(true),
            _ => {
                self.mode = Mode::Normal;
                self.status = "Quit cancelled".into();
                Ok(false)
            }
        }
    }

    fn handle_widget_key(&mut self, key: KeyEvent) {
        let Some(widget) = self.project().map(|p| p.widget.clone()) else {
            return;
        };
        match widget {
            WidgetData::Timetable { data } => match key.code {
                KeyCode::Left | KeyCode::Char('h') => {
                    self.store.set_selected_day(data.selected_day.prev());
                    self.selected = 0;
                }
                KeyCode::Right | KeyCode::Char('l') => {
                    self.store.set_selected_day(data.selected_day.next());
                    self.selected = 0;
                }
                KeyCode::Char('v') => {
                    let next = match data.view_type {
                        TimetableViewType::Block => TimetableViewType::Circle,
                        TimetableViewType::Circle => TimetableViewType::Block,
                    };
                    self.store.set_timetable_view_type(next);
                }
                KeyCode::Char('c') => self.edit_widget("Clock mode toggled", |w| {
                    if let WidgetData::Timetable { data } = w {
                        data.clock_mode = data.clock_mode.toggled();
                    }
                }),
                KeyCode::Char('w') => self.edit_widget("Weekend toggled", |w| {
                    if let WidgetData::Timetable { data } = w {
                        data.show_weekend = !data.show_weekend;
                    }
                }),
                KeyCode::Down | KeyCode::Char('j') => {
                    self.select_next(data.days.get(data.selected_day).len())
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.selected = self.selected.saturating_sub(1)
                }
                KeyCode::Char('x') => {
                    if let Some(item) = data.days.get(data.selected_day).get(self.selected) {
                        let title = item.title.clone();
                        self.store.remove_schedule_item(data.selected_day, &item.id);
                        self.selected = self.selected.saturating_sub(1);
                        self.status = format!("Removed \"{}\"", title);
                    }
                }
                _ => {}
            },
            WidgetData::TimeGauge { .. } => match key.code {
                KeyCode::Char('+') | KeyCode::Char('=') => self.edit_gauge_end(30),
                KeyCode::Char('-') => self.edit_gauge_end(-30),
                KeyCode::Char(']') => self.edit_gauge_start(30),
                KeyCode::Char('[') => self.edit_gauge_start(-30),
                KeyCode::Char('f') => self.edit_widget("Display format changed", |w| {
                    if let WidgetData::TimeGauge { data } = w {
                        data.display_format = match data.display_format {
                            DisplayFormat::Percent => DisplayFormat::Elapsed,
                            DisplayFormat::Elapsed => DisplayFormat::Remaining,
                            DisplayFormat::Remaining => DisplayFormat::Percent,
                        };
                    }
                }),
                _ => {}
            },
            WidgetData::LifeProgress { .. } => match key.code {
                KeyCode::Char('+') | KeyCode::Char('=') => self.edit_lifespan(1),
                KeyCode::Char('-') => self.edit_lifespan(-1),
                KeyCode::Char('f') => self.edit_widget("Unit changed", |w| {
                    if let WidgetData::LifeProgress { data } = w {
                        data.display_unit = match data.display_unit {
                            DisplayUnit::Year => DisplayUnit::Month,
                            DisplayUnit::Month => DisplayUnit::Week,
                            DisplayUnit::Week => DisplayUnit::Day,
                            DisplayUnit::Day => DisplayUnit::Year,
                        };
                    }
                }),
                KeyCode::Char('d') => self.edit_widget("Details toggled", |w| {
                    if let WidgetData::LifeProgress { data } = w {
                        data.show_details = !data.show_details;
                    }
                }),
                _ => {}
            },
            WidgetData::Motto { .. } => match key.code {
                KeyCode::Char('+') | KeyCode::Char('=') => self.edit_motto(2.0, 0.0),
                KeyCode::Char('-') => self.edit_motto(-2.0, 0.0),
                KeyCode::Char(']') => self.edit_motto(0.0, 5.0),
                KeyCode::Char('[') => self.edit_motto(0.0, -5.0),
                _ => {}
            },
            WidgetData::MixMatch { elements } => {
                let ordered = z_ordered(&elements);
                let target = ordered.get(self.selected).map(|e| (e.id.clone(), e.locked));
                match key.code {
                    KeyCode::Down | KeyCode::Char('j') => self.select_next(ordered.len()),
                    KeyCode::Up | KeyCode::Char('k') => {
                        self.selected = self.selected.saturating_sub(1)
                    }
                    KeyCode::Char('x') => {
                        if let Some((id, _)) = target {
                            self.store.remove_mix_element(&id);
                            self.selected = self.selected.saturating_sub(1);
                            self.status = format!("Removed element {}", id);
                        }
                    }
                    KeyCode::Char('f') => match target {
                        Some((_, true)) => self.status = "Element is locked".into(),
                        Some((id, false)) => {
                            self.store.bring_mix_element_to_front(&id);
                            self.status = "Brought to front".into();
                        }
                        None => {}
                    },
                    KeyCode::Char('b') => match target {
                        Some((_, true)) => self.status = "Element is locked".into(),
                        Some((id, false)) => {
                            self.store.send_mix_element_to_back(&id);
                            self.status = "Sent to back".into();
                        }
                        None => {}
                    },
                    _ => {}
                }
            }
        }
    }

    fn select_next(&mut self, len: usize) {
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    fn undo(&mut self) {
        if self.store.can_undo() {
            self.store.undo();
            self.status = "Undone".into();
        } else {
            self.status = "Nothing to undo".into();
        }
    }

    fn redo(&mut self) {
        if self.store.can_redo() {
            self.store.redo();
            self.status = "Redone".into();
        } else {
            self.status = "Nothing to redo".into();
        }
    }

    /// Applies `f` to a copy of the widget payload and commits it as one
    /// undoable edit.
    fn edit_widget<F>(&mut self, message: &str, f: F)
    where
        F: FnOnce(&mut WidgetData),
    {
        let Some(mut widget) = self.project().map(|p| p.widget.clone()) else {
            return;
        };
        f(&mut widget);
        self.store.update_current_project(ProjectPatch::widget(widget));
        self.status = message.to_string();
    }

    fn edit_gauge_end(&mut self, delta: i32) {
        self.edit_widget("End time changed", |w| {
            if let WidgetData::TimeGauge { data } = w {
                data.end_time = adjust_clock(&data.end_time, delta);
            }
        });
    }

    fn edit_gauge_start(&mut self, delta: i32) {
        self.edit_widget("Start time changed", |w| {
            if let WidgetData::TimeGauge { data } = w {
                data.start_time = adjust_clock(&data.start_time, delta);
            }
        });
    }

    fn edit_lifespan(&mut self, delta: i64) {
        self.edit_widget("Lifespan changed", |w| {
            if let WidgetData::LifeProgress { data } = w {
                let years = (i64::from(data.expected_lifespan) + delta).max(0) as u32;
                data.expected_lifespan = clamp_lifespan(years);
            }
        });
    }

    fn edit_motto(&mut self, size_delta: f32, rotation_delta: f32) {
        self.edit_widget("Motto changed", |w| {
            if let WidgetData::Motto { data } = w {
                if let Some(text) = data.texts.first_mut() {
                    text.font_size += size_delta;
                    text.rotation += rotation_delta;
                    *text = text.clone().clamped();
                }
            }
        });
    }

    fn persist(&mut self) -> Result<()> {
        self.store.save_project();
        save_store(&self.path, &self.store)?;
        self.status = format!("Saved to {}", self.path.display());
        Ok(())
    }

    fn draw(&mut self, f: &mut ratatui::Frame<'_>) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(4),
            ])
            .split(f.size());

        self.draw_header(f, layout[0]);
        self.draw_body(f, layout[1]);
        self.draw_footer(f, layout[2]);

        if let Mode::ConfirmQuit = self.mode {
            self.draw_confirm(f);
        }
    }

    fn draw_header(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let (title, kind) = match self.project() {
            Some(p) => (p.title.clone(), p.widget_type().to_string()),
            None => ("(no project)".to_string(), String::new()),
        };
        let flag = |on: bool, label: &'static str| {
            Span::styled(
                label,
                Style::default().fg(if on { Color::Green } else { Color::DarkGray }),
            )
        };
        let line = Line::from(vec![
            Span::styled(
                "atelier ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(title, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  •  "),
            Span::styled(kind, Style::default().fg(Color::Magenta)),
            Span::raw("  •  "),
            flag(self.store.can_undo(), "undo"),
            Span::raw(format!(" {}  ", self.store.history_len())),
            flag(self.store.can_redo(), "redo"),
            Span::raw(format!(" {}", self.store.future_len())),
            Span::raw("  •  "),
            if self.is_dirty() {
                Span::styled("unsaved", Style::default().fg(Color::Yellow))
            } else {
                Span::styled("saved", Style::default().fg(Color::Gray))
            },
        ]);
        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray));
        f.render_widget(
            Paragraph::new(line).alignment(Alignment::Center).block(block),
            area,
        );
    }

    fn draw_body(&mut self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let Some(widget) = self.project().map(|p| p.widget.clone()) else {
            let msg = Paragraph::new("No project open")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(msg, area);
            return;
        };
        match widget {
            WidgetData::Timetable { data } => {
                let rows = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(3), Constraint::Min(3)])
                    .split(area);
                let days = Weekday::visible(data.show_weekend);
                let clock = match data.clock_mode {
                    ClockMode::TwelveHour => "12h",
                    ClockMode::TwentyFourHour => "24h",
                };
                let labels = days.iter().map(|d| d.key().to_string()).collect::<Vec<_>>();
                let tabs = Tabs::new(labels)
                    .select(days.iter().position(|d| *d == data.selected_day).unwrap_or(0))
                    .highlight_style(
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    )
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .title(format!("{:?} view • {}", data.view_type, clock)),
                    );
                f.render_widget(tabs, rows[0]);

                let schedule = data.days.get(data.selected_day);
                let items = schedule
                    .iter()
                    .map(|item| {
                        let mut text = format!(
                            "{}-{}  {}{}",
                            item.start_time,
                            item.end_time,
                            item.emoji
                                .as_deref()
                                .map(|e| format!("{} ", e))
                                .unwrap_or_default(),
                            item.title
                        );
                        if data.view_type == TimetableViewType::Circle {
                            if let (Some(s), Some(e)) = (
                                parse_clock_minutes(&item.start_time),
                                parse_clock_minutes(&item.end_time),
                            ) {
                                text.push_str(&format!(
                                    "  ({:.0}° → {:.0}°)",
                                    minutes_to_angle(f64::from(s), data.clock_mode),
                                    minutes_to_angle(f64::from(e), data.clock_mode)
                                ));
                            }
                        }
                        ListItem::new(text)
                    })
                    .collect::<Vec<_>>();
                self.draw_list(f, rows[1], items, data.selected_day.key());
            }
            WidgetData::TimeGauge { data } => {
                let progress =
                    compute_range_progress(&data.start_time, &data.end_time, self.now_minutes);
                let label =
                    format_gauge(progress, data.display_format, &data.start_time, &data.end_time);
                let gauge = Gauge::default()
                    .block(Block::default().borders(Borders::ALL).title(format!(
                        "{}  {}-{}  {:?}",
                        data.label, data.start_time, data.end_time, data.gauge_style
                    )))
                    .gauge_style(Style::default().fg(Color::Yellow).bg(Color::DarkGray))
                    .ratio(progress)
                    .label(label);
                f.render_widget(gauge, centered_band(area, 3));
            }
            WidgetData::LifeProgress { data } => {
                let stats =
                    compute_life_stats(&data.birth_date, data.expected_lifespan, data.display_unit);
                let rows = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(3), Constraint::Min(2)])
                    .split(area);
                let gauge = Gauge::default()
                    .block(Block::default().borders(Borders::ALL).title(format!(
                        "born {} • {} years • {:?}",
                        data.birth_date, data.expected_lifespan, data.design_type
                    )))
                    .gauge_style(Style::default().fg(Color::Green).bg(Color::DarkGray))
                    .ratio(stats.progress)
                    .label(stats.percent_text());
                f.render_widget(gauge, rows[0]);
                let mut lines = Vec::new();
                if data.show_details {
                    lines.push(Line::from(format!(
                        "{} {} lived • {} left • {} total",
                        stats.elapsed, stats.unit_label, stats.remaining, stats.total
                    )));
                }
                if let Some(motto) = &data.motto {
                    lines.push(Line::from(Span::styled(
                        format!("\"{}\"", motto),
                        Style::default().add_modifier(Modifier::ITALIC),
                    )));
                }
                f.render_widget(
                    Paragraph::new(lines)
                        .alignment(Alignment::Center)
                        .wrap(Wrap { trim: true }),
                    rows[1],
                );
            }
            WidgetData::Motto { data } => {
                let Some(text) = data.primary() else {
                    return;
                };
                let alignment = match text.align {
                    TextAlign::Left => Alignment::Left,
                    TextAlign::Center => Alignment::Center,
                    TextAlign::Right => Alignment::Right,
                };
                let body = vec![
                    Line::from(Span::styled(
                        text.content.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        format!("size {} • rotation {}°", text.font_size, text.rotation),
                        Style::default().fg(Color::DarkGray),
                    )),
                ];
                f.render_widget(
                    Paragraph::new(body)
                        .alignment(alignment)
                        .wrap(Wrap { trim: true })
                        .block(
                            Block::default()
                                .borders(Borders::ALL)
                                .title(format!("{:?}", data.template)),
                        ),
                    centered_band(area, 4),
                );
            }
            WidgetData::MixMatch { elements } => {
                let items = z_ordered(&elements)
                    .into_iter()
                    .map(|e| {
                        ListItem::new(format!(
                            "z{:<3} {:?} \"{}\" ({:.0}, {:.0}) {:.0}x{:.0}{}",
                            e.z_index,
                            e.kind,
                            e.content,
                            e.x,
                            e.y,
                            e.width,
                            e.height,
                            if e.locked { " 🔒" } else { "" }
                        ))
                    })
                    .collect::<Vec<_>>();
                self.draw_list(f, area, items, "elements");
            }
        }
    }

    fn draw_list(
        &mut self,
        f: &mut ratatui::Frame<'_>,
        area: Rect,
        items: Vec<ListItem<'_>>,
        title: &str,
    ) {
        if items.is_empty() {
            self.selected = 0;
            let msg = Paragraph::new("(empty)")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title(title.to_string()));
            f.render_widget(msg, area);
            return;
        }
        self.selected = self.selected.min(items.len() - 1);
        let mut state = ListState::default();
        state.select(Some(self.selected));
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title.to_string()))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        f.render_stateful_widget(list, area, &mut state);
    }

    fn draw_footer(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Length(2)])
            .split(area);
        let help = Paragraph::new(self.footer_help_line())
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        f.render_widget(help, rows[0]);
        let status = Paragraph::new(self.status.clone())
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        f.render_widget(status, rows[1]);
    }

    fn footer_help_line(&self) -> Line<'static> {
        let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::LightCyan));
        let mut spans = vec![
            key("u"),
            Span::raw(" undo  "),
            key("r"),
            Span::raw(" redo  "),
            key("s"),
            Span::raw(" save  "),
            key("q"),
            Span::raw(" quit  "),
        ];
        let extra: &[(&'static str, &'static str)] = match self.project().map(|p| &p.widget) {
            Some(WidgetData::Timetable { .. }) => &[
                ("←→", " day  "),
                ("j/k", " select  "),
                ("x", " remove  "),
                ("v", " view  "),
                ("c", " clock  "),
                ("w", " weekend"),
            ],
            Some(WidgetData::TimeGauge { .. }) => &[
                ("+/-", " end  "),
                ("[/]", " start  "),
                ("f", " format"),
            ],
            Some(WidgetData::LifeProgress { .. }) => &[
                ("+/-", " lifespan  "),
                ("f", " unit  "),
                ("d", " details"),
            ],
            Some(WidgetData::Motto { .. }) => &[("+/-", " size  "), ("[/]", " rotate")],
            Some(WidgetData::MixMatch { .. }) => &[
                ("j/k", " select  "),
                ("f", " front  "),
                ("b", " back  "),
                ("x", " remove"),
            ],
            None => &[],
        };
        for (k, label) in extra {
            spans.push(key(k));
            spans.push(Span::raw(*label));
        }
        Line::from(spans)
    }

    fn draw_confirm(&self, f: &mut ratatui::Frame<'_>) {
        let area = centered_rect(50, 20, f.size());
        let text = vec![
            Line::from("Unsaved changes."),
            Line::from(vec![
                Span::styled("y", Style::default().fg(Color::LightCyan)),
                Span::raw(" save and quit  "),
                Span::styled("n", Style::default().fg(Color::LightCyan)),
                Span::raw(" discard  "),
                Span::styled("any", Style::default().fg(Color::LightCyan)),
                Span::raw(" cancel"),
            ]),
        ];
        let popup = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Quit"));
        f.render_widget(Clear, area);
        f.render_widget(popup, area);
    }
}

fn z_ordered(elements: &[MixElement]) -> Vec<&MixElement> {
    let mut ordered: Vec<&MixElement> = elements.iter().collect();
    ordered.sort_by_key(|e| std::cmp::Reverse(e.z_index));
    ordered
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn teardown_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Full-width strip of `height` rows, vertically centered in `r`.
fn centered_band(r: Rect, height: u16) -> Rect {
    let pad = r.height.saturating_sub(height) / 2;
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(pad),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(r)[1]
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ]
            .as_ref(),
        )
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ]
            .as_ref(),
        )
        .split(popup_layout[1])[1]
}
