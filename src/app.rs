//! Main application state, event handling, and rendering.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use color_eyre::eyre::eyre;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Alignment, Constraint, Layout, Margin, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Cell, Clear, Paragraph, Row, Scrollbar, ScrollbarOrientation, ScrollbarState, Table,
    TableState,
};
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::{debug, info};

use hangry_dashboard::listing;
use hangry_dashboard::model::ResponseOrdering;
use hangry_dashboard::page::{Activation, Fragment, Page, UPDATE_TRIGGER_ID};
use hangry_dashboard::panel::{Applied, DetailLoaded, DetailPanel, FormToggle};
use hangry_dashboard::source::DetailSource;

use crate::event::Event;
use crate::theme::Theme;

/// Return value from event handling.
#[derive(Debug, PartialEq)]
pub enum Action {
    Continue,
    Quit,
    ForceRefresh,
}

/// Input mode for modal states.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    Help,
}

/// Core application state.
pub struct App {
    // Core data
    pub page: Page,
    pub panel: DetailPanel,
    pub form_toggle: FormToggle,
    pub listing_path: PathBuf,
    detail_rx: Option<mpsc::UnboundedReceiver<DetailLoaded>>,

    // UI state
    pub table_state: TableState,
    pub mode: InputMode,
    pub detail_scroll: u16,
    pub detail_total_lines: u16,
    pub split_percent: u16,

    // Theme
    pub theme: Theme,

    // Status
    pub watcher_active: bool,
    pub no_watch: bool,
    pub error_message: Option<(String, Instant)>,
    pub clock: String,

    // Layout areas for mouse hit-testing
    pub list_area: Rect,
    pub detail_area: Rect,
    pub trigger_area: Rect,
}

impl App {
    pub fn new(
        listing_path: PathBuf,
        no_watch: bool,
        source: Arc<dyn DetailSource>,
        ordering: ResponseOrdering,
    ) -> Self {
        let page = Page::new();
        let (loaded_tx, detail_rx) = mpsc::unbounded_channel();
        let panel = DetailPanel::for_page(&page, source, loaded_tx).with_ordering(ordering);
        let form_toggle = FormToggle::from_page(&page);

        Self {
            page,
            panel,
            form_toggle,
            listing_path,
            detail_rx: Some(detail_rx),
            table_state: TableState::default(),
            mode: InputMode::Normal,
            detail_scroll: 0,
            detail_total_lines: 0,
            split_percent: 40,
            theme: Theme::hangry(),
            watcher_active: !no_watch,
            no_watch,
            error_message: None,
            clock: chrono::Local::now().format("%H:%M:%S").to_string(),
            list_area: Rect::default(),
            detail_area: Rect::default(),
            trigger_area: Rect::default(),
        }
    }

    /// Load the listing from disk into the page's entries.
    pub fn load_listing(&mut self) {
        match listing::load_listing(&self.listing_path) {
            Ok(entries) => {
                self.page.set_entries(&entries);
                self.clamp_selection();
            }
            Err(e) => {
                self.error_message = Some((e.to_string(), Instant::now()));
            }
        }
    }

    /// Main event loop.
    pub async fn run(&mut self, terminal: &mut ratatui::DefaultTerminal) -> color_eyre::Result<()> {
        // Initial load
        self.load_listing();

        let detail_rx = self
            .detail_rx
            .take()
            .ok_or_else(|| eyre!("event loop already started"))?;
        let mut events =
            crate::event::EventHandler::new(self.listing_path.clone(), !self.no_watch, detail_rx);

        loop {
            // RENDER
            terminal.draw(|frame| self.render(frame))?;

            // WAIT FOR EVENT
            let Some(event) = events.next().await else {
                break;
            };

            // UPDATE
            match self.handle_event(event) {
                Action::Quit => break,
                Action::ForceRefresh => self.load_listing(),
                Action::Continue => {}
            }
        }

        Ok(())
    }

    /// Handle a single event.
    pub fn handle_event(&mut self, event: Event) -> Action {
        match event {
            Event::Key(key) => self.handle_key_event(key),
            Event::Mouse(mouse) => self.handle_mouse_event(mouse),
            Event::Tick => {
                self.clock = chrono::Local::now().format("%H:%M:%S").to_string();
                // Auto-dismiss errors after 10 seconds
                if let Some((_, when)) = &self.error_message {
                    if when.elapsed().as_secs() >= 10 {
                        self.error_message = None;
                    }
                }
                Action::Continue
            }
            Event::ListingChanged(paths) => {
                debug!(?paths, "listing changed on disk");
                self.watcher_active = true;
                self.load_listing();
                Action::Continue
            }
            Event::DetailLoaded(loaded) => {
                match self.panel.apply(loaded) {
                    Ok(Applied::Rendered { .. }) => self.detail_scroll = 0,
                    Ok(Applied::Stale { .. }) => {}
                    Err(e) => {
                        self.error_message =
                            Some((format!("Could not load details: {e}"), Instant::now()));
                    }
                }
                Action::Continue
            }
            Event::Resize(_, _) => Action::Continue,
        }
    }

    /// Handle key events.
    fn handle_key_event(&mut self, key: KeyEvent) -> Action {
        // Global keys
        match key.code {
            KeyCode::Char('q') if self.mode == InputMode::Normal => return Action::Quit,
            KeyCode::Char('?') => {
                self.mode = if self.mode == InputMode::Help {
                    InputMode::Normal
                } else {
                    InputMode::Help
                };
                return Action::Continue;
            }
            KeyCode::Esc => {
                self.mode = InputMode::Normal;
                return Action::Continue;
            }
            _ => {}
        }

        // Help mode: any key dismisses
        if self.mode == InputMode::Help {
            self.mode = InputMode::Normal;
            return Action::Continue;
        }

        // Normal mode keys
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            KeyCode::Home => self.select_first(),
            KeyCode::End => self.select_last(),
            KeyCode::Enter => self.activate_selected(),
            KeyCode::Char('e') => self.activate_update(),
            KeyCode::Char('o') => {
                let ordering = self.panel.ordering().next();
                self.panel.set_ordering(ordering);
                info!(%ordering, "response ordering changed");
            }
            KeyCode::Char('r') => {
                return Action::ForceRefresh;
            }
            KeyCode::Char('t') => {
                self.theme = self.theme.next();
            }
            KeyCode::Char('[') => {
                self.split_percent = self.split_percent.saturating_sub(5).max(20);
            }
            KeyCode::Char(']') => {
                self.split_percent = (self.split_percent + 5).min(80);
            }
            KeyCode::Char('d') => {
                self.detail_scroll = self
                    .detail_scroll
                    .saturating_add(5)
                    .min(self.detail_total_lines.saturating_sub(5));
            }
            KeyCode::Char('u') => {
                self.detail_scroll = self.detail_scroll.saturating_sub(5);
            }
            _ => {}
        }

        Action::Continue
    }

    /// Handle mouse events.
    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Action {
        let position = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.trigger_area.contains(position) {
                    self.activate_update();
                } else if self.list_area.contains(position) {
                    // Border (1) + header row (1) + header bottom margin (1) = 3 rows offset
                    let row_offset = mouse.row.saturating_sub(self.list_area.y + 3);
                    let index = row_offset as usize + self.table_state.offset();
                    if mouse.row >= self.list_area.y + 3 && index < self.page.entries().len() {
                        self.table_state.select(Some(index));
                        self.activate_selected();
                    }
                }
            }
            MouseEventKind::ScrollDown => {
                if self.detail_area.contains(position) {
                    self.detail_scroll = self
                        .detail_scroll
                        .saturating_add(3)
                        .min(self.detail_total_lines.saturating_sub(5));
                } else if self.list_area.contains(position) {
                    self.select_next();
                }
            }
            MouseEventKind::ScrollUp => {
                if self.detail_area.contains(position) {
                    self.detail_scroll = self.detail_scroll.saturating_sub(3);
                } else if self.list_area.contains(position) {
                    self.select_previous();
                }
            }
            _ => {}
        }
        Action::Continue
    }

    // ─────────────────────────────────────────────────────────
    // Activation
    // ─────────────────────────────────────────────────────────

    fn activate_selected(&mut self) {
        let Some(entry) = self
            .table_state
            .selected()
            .and_then(|i| self.page.entries().get(i).cloned())
        else {
            return;
        };

        let mut activation = Activation::new(entry.borrow().id());
        self.panel.activate(&entry.borrow(), &mut activation);
        if self.page.finish_activation(&activation) {
            info!(location = self.page.location(), "navigated");
        }
    }

    fn activate_update(&mut self) {
        let activation = Activation::new(UPDATE_TRIGGER_ID);
        self.form_toggle.show_update_form();
        self.page.finish_activation(&activation);
    }

    // ─────────────────────────────────────────────────────────
    // Selection helpers
    // ─────────────────────────────────────────────────────────

    fn select_next(&mut self) {
        let len = self.page.entries().len();
        if len == 0 {
            return;
        }
        let i = self
            .table_state
            .selected()
            .map(|s| (s + 1).min(len - 1))
            .unwrap_or(0);
        self.table_state.select(Some(i));
    }

    fn select_previous(&mut self) {
        if self.page.entries().is_empty() {
            return;
        }
        let i = self
            .table_state
            .selected()
            .map(|s| s.saturating_sub(1))
            .unwrap_or(0);
        self.table_state.select(Some(i));
    }

    fn select_first(&mut self) {
        if self.page.entries().is_empty() {
            return;
        }
        self.table_state.select(Some(0));
    }

    fn select_last(&mut self) {
        let len = self.page.entries().len();
        if len == 0 {
            return;
        }
        self.table_state.select(Some(len - 1));
    }

    fn clamp_selection(&mut self) {
        let len = self.page.entries().len();
        let selected = match self.table_state.selected() {
            _ if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => Some(0),
        };
        self.table_state.select(selected);
    }

    // ─────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────

    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        // Graceful degradation for tiny terminals
        if area.width < 40 || area.height < 10 {
            let msg = Paragraph::new("Terminal too small. Resize to at least 80x24.")
                .alignment(Alignment::Center)
                .style(Style::default().fg(self.theme.error));
            frame.render_widget(msg, area);
            return;
        }

        let has_error = self.error_message.is_some();
        let constraints = if has_error {
            vec![
                Constraint::Length(1), // title bar
                Constraint::Length(1), // error bar
                Constraint::Fill(1),   // main content
                Constraint::Length(1), // status bar
            ]
        } else {
            vec![
                Constraint::Length(1), // title bar
                Constraint::Fill(1),   // main content
                Constraint::Length(1), // status bar
            ]
        };

        let areas: Vec<Rect> = Layout::vertical(constraints).split(area).to_vec();

        let (title_area, main_area, status_area) = if has_error {
            (areas[0], areas[2], areas[3])
        } else {
            (areas[0], areas[1], areas[2])
        };

        self.render_title_bar(frame, title_area);
        if has_error {
            self.render_error_bar(frame, areas[1]);
        }
        self.render_status_bar(frame, status_area);

        let [list_area, detail_area] = Layout::horizontal([
            Constraint::Percentage(self.split_percent),
            Constraint::Percentage(100 - self.split_percent),
        ])
        .areas(main_area);

        self.list_area = list_area;
        self.detail_area = detail_area;

        self.render_restaurant_list(frame, list_area);
        self.render_detail_panel(frame, detail_area);

        if self.mode == InputMode::Help {
            self.render_help_overlay(frame, area);
        }
    }

    fn render_title_bar(&self, frame: &mut Frame, area: Rect) {
        let watcher_indicator = if self.no_watch {
            Span::styled("○ STATIC", Style::default().fg(self.theme.text_secondary))
        } else if self.watcher_active {
            Span::styled("● WATCHING", Style::default().fg(self.theme.success))
        } else {
            Span::styled("● WATCHER ERROR", Style::default().fg(self.theme.error))
        };

        let location = self.page.location();
        let padding = area
            .width
            .saturating_sub(10 + location.len() as u16 + 3 + self.clock.len() as u16 + 14)
            as usize;

        let title = Line::from(vec![
            Span::styled(" ◇ Hangry", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(location, Style::default().add_modifier(Modifier::DIM)),
            Span::raw(" ".repeat(padding)),
            Span::raw(&self.clock),
            Span::raw("  "),
            watcher_indicator,
            Span::raw(" "),
        ]);

        frame.render_widget(
            Paragraph::new(title).style(
                Style::default()
                    .bg(self.theme.bar_bg)
                    .fg(self.theme.text_on_bar),
            ),
            area,
        );
    }

    fn render_error_bar(&self, frame: &mut Frame, area: Rect) {
        if let Some((ref msg, _)) = self.error_message {
            let line = Line::from(Span::styled(
                format!(" ⚠ {msg}"),
                Style::default().fg(self.theme.bar_bg).bg(self.theme.warning),
            ));
            frame.render_widget(
                Paragraph::new(line).style(Style::default().bg(self.theme.warning)),
                area,
            );
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let theme_name = self.theme.name;
        let ordering = self.panel.ordering();

        let shortcuts = Line::from(vec![
            Span::styled(" ↑↓", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" Navigate  "),
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" Details  "),
            Span::styled("e", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" Update  "),
            Span::styled("o", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!(" Order: {ordering}  ")),
            Span::styled("?", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" Help  "),
            Span::styled("q", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!(" Quit  │ {theme_name}")),
        ]);

        frame.render_widget(
            Paragraph::new(shortcuts).style(
                Style::default()
                    .bg(self.theme.bar_bg)
                    .fg(self.theme.text_on_bar),
            ),
            area,
        );
    }

    fn render_restaurant_list(&mut self, frame: &mut Frame, area: Rect) {
        let theme = self.theme;
        let shown_id = self.panel.shown().map(|(id, _)| id.as_str().to_string());

        let header = Row::new(vec!["Restaurant", "Id", ""])
            .style(
                Style::default()
                    .fg(theme.text_secondary)
                    .add_modifier(Modifier::BOLD),
            )
            .bottom_margin(1);

        let rows: Vec<Row> = self
            .page
            .entries()
            .iter()
            .map(|entry| {
                let entry = entry.borrow();
                let marker = if shown_id.as_deref() == Some(entry.id()) {
                    Span::styled("●", Style::default().fg(theme.success))
                } else {
                    Span::raw("")
                };
                Row::new(vec![
                    Cell::from(Span::styled(
                        entry.label().to_string(),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Cell::from(Span::styled(
                        entry.id().to_string(),
                        Style::default().fg(theme.text_secondary),
                    )),
                    Cell::from(marker),
                ])
            })
            .collect();

        let widths = [
            Constraint::Fill(1),
            Constraint::Length(10),
            Constraint::Length(1),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::bordered()
                    .border_style(Style::default().fg(theme.border))
                    .title(" Restaurants "),
            )
            .row_highlight_style(
                Style::default()
                    .bg(theme.accent)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▸ ");

        frame.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn render_detail_panel(&mut self, frame: &mut Frame, area: Rect) {
        let theme = self.theme;

        let title = match self.panel.shown() {
            Some((_, name)) => format!(" {name} "),
            None => " Details ".to_string(),
        };
        let block = Block::bordered()
            .border_style(Style::default().fg(theme.border))
            .title(title);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines: Vec<Line<'static>> = Vec::new();

        // Update trigger / update form
        self.trigger_area = Rect::default();
        if let Some(trigger) = self.page.element(UPDATE_TRIGGER_ID) {
            if !trigger.borrow().is_hidden() {
                let label = format!("[ {} ]", trigger.borrow().label());
                if self.detail_scroll == 0 {
                    self.trigger_area = Rect {
                        x: inner.x,
                        y: inner.y,
                        width: (label.chars().count() as u16).min(inner.width),
                        height: 1,
                    };
                }
                lines.push(Line::styled(
                    label,
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD),
                ));
            }
        }
        if self.form_toggle.form_visible() {
            lines.push(section_heading("UPDATE FORM", &theme));
            lines.push(Line::styled(
                "  Edit this restaurant's entry, then submit it from the page.",
                Style::default().fg(theme.text_secondary),
            ));
        }
        lines.push(Line::raw(""));

        if self.panel.in_flight() > 0 {
            lines.push(Line::styled(
                "Loading…",
                Style::default()
                    .fg(theme.warning)
                    .add_modifier(Modifier::ITALIC),
            ));
            lines.push(Line::raw(""));
        }

        // Reviews region
        lines.push(section_heading("REVIEWS", &theme));
        lines.push(Line::raw(""));
        region_lines(self.page.reviews().borrow().fragments(), &theme, &mut lines);
        lines.push(Line::raw(""));

        // Photos region
        lines.push(section_heading("PHOTOS", &theme));
        lines.push(Line::raw(""));
        region_lines(self.page.photos().borrow().fragments(), &theme, &mut lines);

        let total_lines = lines.len() as u16;
        self.detail_total_lines = total_lines;

        let paragraph = Paragraph::new(lines).scroll((self.detail_scroll, 0));
        frame.render_widget(paragraph, inner);

        // Scrollbar
        if total_lines > inner.height {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
            let mut scrollbar_state =
                ScrollbarState::new(total_lines as usize).position(self.detail_scroll as usize);
            frame.render_stateful_widget(
                scrollbar,
                inner.inner(Margin {
                    vertical: 0,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }
    }

    fn render_help_overlay(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(60, 19, area);
        frame.render_widget(Clear, popup_area);

        let help_text = vec![
            Line::styled(
                "Keyboard Shortcuts",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Line::raw(""),
            Line::raw("  ↑/k       Move selection up"),
            Line::raw("  ↓/j       Move selection down"),
            Line::raw("  Home/End  First/last restaurant"),
            Line::raw("  Enter     Load reviews and photos"),
            Line::raw("  e         Open the update form"),
            Line::raw("  o         Cycle response ordering (Latest ↔ Arrival)"),
            Line::raw("  r         Reload listing"),
            Line::raw("  t         Cycle theme"),
            Line::raw("  d/u       Scroll detail down/up"),
            Line::raw("  [/]       Resize split (left/right)"),
            Line::raw("  ?         Toggle this help"),
            Line::raw("  q         Quit"),
            Line::raw(""),
            Line::styled(
                "Press any key to close",
                Style::default().fg(self.theme.text_secondary),
            ),
        ];

        let help = Paragraph::new(help_text).block(
            Block::bordered()
                .title(" Help ")
                .border_style(Style::default().fg(self.theme.accent))
                .style(Style::default().bg(self.theme.surface)),
        );

        frame.render_widget(help, popup_area);
    }
}

// ─────────────────────────────────────────────────────────
// Standalone helper functions
// ─────────────────────────────────────────────────────────

fn section_heading(label: &'static str, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled("━━ ", Style::default().fg(theme.accent)),
        Span::styled(
            label,
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ━━", Style::default().fg(theme.accent)),
    ])
}

fn region_lines(fragments: &[Fragment], theme: &Theme, lines: &mut Vec<Line<'static>>) {
    if fragments.is_empty() {
        lines.push(Line::styled(
            "  —",
            Style::default().fg(theme.text_secondary),
        ));
        return;
    }
    for fragment in fragments {
        match fragment {
            Fragment::ReviewLine { rating, text } => {
                lines.push(Line::from(vec![
                    Span::raw("  Rating: "),
                    Span::styled(
                        rating.clone(),
                        Style::default()
                            .fg(theme.warning)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(format!(": {text}")),
                ]));
            }
            Fragment::Image { src, height } => {
                lines.push(Line::from(vec![
                    Span::styled("  ▣ ", Style::default().fg(theme.success)),
                    Span::raw(src.clone()),
                    Span::styled(
                        format!("  ({height}px)"),
                        Style::default().fg(theme.text_secondary),
                    ),
                ]));
            }
        }
    }
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .split(r);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}
