use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use hqdeals_core::card::OfferCard;
use hqdeals_core::page::{self, PageView};
use hqdeals_core::{
    DealsLoader, DealsState, LoadEvent, LoadOutcome, OfferTicket, create_load_channel,
};
use ratatui::{
    Frame, Terminal,
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};
use std::io;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

const MAX_LOG_LINES: usize = 500;

/// Terminal rows taken by one offer in the offers panel
const OFFER_ROWS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// Panel that receives the arrow keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Categories,
    Offers,
}

/// Interactive deals page. Owns the view state and applies load
/// completions as they arrive from the spawned fetches.
pub struct DealsBrowser {
    loader: DealsLoader,
    site_url: String,
    state: DealsState,
    tx: mpsc::UnboundedSender<LoadEvent>,
    rx: mpsc::UnboundedReceiver<LoadEvent>,
    logs: Vec<(LogLevel, String)>,
    focus: Focus,
    selected_offer: Option<usize>,
    should_quit: bool,
}

impl DealsBrowser {
    pub fn new(loader: DealsLoader) -> Self {
        let (tx, rx) = create_load_channel();
        let site_url = loader.site_url();
        Self {
            loader,
            site_url,
            state: DealsState::new(),
            tx,
            rx,
            logs: Vec::new(),
            focus: Focus::Categories,
            selected_offer: None,
            should_quit: false,
        }
    }

    pub fn state(&self) -> &DealsState {
        &self.state
    }

    pub fn logs(&self) -> &[(LogLevel, String)] {
        &self.logs
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn selected_offer(&self) -> Option<usize> {
        self.selected_offer
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Start loading the category manifest. Must be called within a tokio
    /// runtime.
    pub fn start(&mut self) {
        self.log(
            LogLevel::Info,
            format!("Loading categories from {}", self.site_url),
        );
        self.state.begin_manifest_load();
        self.loader.spawn_manifest(self.tx.clone());
    }

    /// Apply every completion that has arrived, without blocking
    pub fn process_messages(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            self.handle_event(event);
        }
    }

    fn handle_event(&mut self, event: LoadEvent) {
        let failure = event.error().map(|e| e.to_string());

        match event.apply(&mut self.state) {
            LoadOutcome::Manifest(ticket) => {
                if let Some(message) = failure {
                    self.log(
                        LogLevel::Error,
                        format!("Failed to load categories: {}", message),
                    );
                    return;
                }

                let manifest = self.state.manifest();
                let count = manifest.categories.len();
                let message = format!("Loaded {} categories ({})", count, manifest.directory);
                self.log(LogLevel::Info, message);
                match ticket {
                    Some(ticket) => self.request_offers(ticket),
                    None if count == 0 => self.log(LogLevel::Warn, "No categories available"),
                    None => {}
                }
            }
            LoadOutcome::Offers { ticket, applied } => {
                if !applied {
                    self.log(
                        LogLevel::Info,
                        format!("Discarded stale offers for {}", ticket.category),
                    );
                    return;
                }

                self.selected_offer = None;
                match failure {
                    None => self.log(
                        LogLevel::Info,
                        format!("{} offers in {}", self.state.offers().len(), ticket.category),
                    ),
                    Some(message) => self.log(
                        LogLevel::Error,
                        format!("Failed to load offers for {}: {}", ticket.category, message),
                    ),
                }
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab | KeyCode::BackTab => match self.focus {
                Focus::Categories => self.focus_offers(),
                Focus::Offers => self.focus = Focus::Categories,
            },
            KeyCode::Up | KeyCode::Char('k') => match self.focus {
                Focus::Categories => self.select_relative(-1),
                Focus::Offers => self.move_offer(-1),
            },
            KeyCode::Down | KeyCode::Char('j') => match self.focus {
                Focus::Categories => self.select_relative(1),
                Focus::Offers => self.move_offer(1),
            },
            KeyCode::Enter => match self.focus {
                Focus::Categories => self.focus_offers(),
                Focus::Offers => self.show_offer_details(),
            },
            KeyCode::Char('r') => self.reload(),
            _ => {}
        }
    }

    fn focus_offers(&mut self) {
        self.focus = Focus::Offers;
        if self.selected_offer.is_none() && !self.state.offers().is_empty() {
            self.selected_offer = Some(0);
        }
    }

    fn select_relative(&mut self, delta: isize) {
        let categories = &self.state.manifest().categories;
        if categories.is_empty() {
            return;
        }

        let current = self
            .state
            .selected()
            .and_then(|value| categories.iter().position(|c| c.value == value))
            .unwrap_or(0);
        let last = categories.len() as isize - 1;
        let next = (current as isize + delta).clamp(0, last) as usize;
        let value = categories[next].value.clone();

        match self.state.select_category(&value) {
            Ok(Some(ticket)) => {
                self.selected_offer = None;
                self.request_offers(ticket);
            }
            Ok(None) => {}
            Err(e) => self.log(LogLevel::Error, e.to_string()),
        }
    }

    fn move_offer(&mut self, delta: isize) {
        let count = self.state.offers().len();
        if count == 0 {
            return;
        }

        let next = match self.selected_offer {
            Some(current) => (current as isize + delta).clamp(0, count as isize - 1) as usize,
            None => 0,
        };
        self.selected_offer = Some(next);
    }

    fn reload(&mut self) {
        match self.state.reload() {
            Some(ticket) => self.request_offers(ticket),
            None => self.start(),
        }
    }

    fn request_offers(&mut self, ticket: OfferTicket) {
        self.log(
            LogLevel::Info,
            format!("Loading offers for {}", ticket.category),
        );
        self.loader.spawn_offers(ticket, self.tx.clone());
    }

    fn show_offer_details(&mut self) {
        let Some(offer) = self
            .selected_offer
            .and_then(|idx| self.state.offers().get(idx))
        else {
            return;
        };
        let card = OfferCard::from(offer);

        let details = [
            String::new(),
            "╔══════════════════════════════════════════════════════════╗".to_string(),
            "║                     OFFER DETAILS                        ║".to_string(),
            "╚══════════════════════════════════════════════════════════╝".to_string(),
            format!("Title: {}", card.title),
            format!("ASIN: {}", card.asin),
            format!(
                "Price: {} (was {}, {})",
                card.price, card.original_price, card.discount
            ),
            format!(
                "Rating: {} {} {}",
                card.stars, card.rating, card.review_count
            ),
            format!("{}: {}", card.link_label, card.link),
        ];
        for line in details {
            self.log(LogLevel::Info, line);
        }
    }

    fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.logs.push((level, message.into()));
        if self.logs.len() > MAX_LOG_LINES {
            self.logs.drain(0..self.logs.len() - MAX_LOG_LINES);
        }
    }

    pub fn draw(&self, f: &mut Frame) {
        let view = PageView::from_state(&self.state, &self.site_url);

        let vertical_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // Header
                Constraint::Min(8),    // Categories + offers
                Constraint::Length(8), // Logs
                Constraint::Length(1), // Hints bar
            ])
            .split(f.area());

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
            .split(vertical_chunks[1]);

        self.render_header(f, vertical_chunks[0], &view);
        self.render_categories(f, main_chunks[0], &view);
        self.render_offers(f, main_chunks[1], &view);
        self.render_logs(f, vertical_chunks[2]);
        self.render_hints(f, vertical_chunks[3]);
    }

    fn render_header(&self, f: &mut Frame, area: Rect, view: &PageView) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", page::TITLE))
            .border_style(Style::default().fg(Color::Yellow));

        let inner = block.inner(area);
        f.render_widget(block, area);

        let text = vec![
            Line::from(Span::styled(
                page::UNDER_CONSTRUCTION,
                Style::default().fg(Color::Yellow),
            )),
            Line::from(page::DESCRIPTION),
            Line::from(vec![
                Span::styled(page::LAST_UPDATED, Style::default().fg(Color::DarkGray)),
                Span::raw(" "),
                Span::raw(view.last_updated.clone()),
            ]),
        ];

        let paragraph = Paragraph::new(text).wrap(Wrap { trim: true });
        f.render_widget(paragraph, inner);
    }

    fn render_categories(&self, f: &mut Frame, area: Rect, view: &PageView) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", page::CATEGORY.trim_end_matches(':')))
            .border_style(self.border_style(Focus::Categories));

        let inner = block.inner(area);
        f.render_widget(block, area);

        let items: Vec<ListItem> = view
            .categories
            .iter()
            .map(|category| {
                if category.selected {
                    ListItem::new(format!("▸ {}", category.label)).style(
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    ListItem::new(format!("  {}", category.label))
                }
            })
            .collect();

        f.render_widget(List::new(items), inner);
    }

    fn render_offers(&self, f: &mut Frame, area: Rect, view: &PageView) {
        let title = match view.selected_label() {
            Some(label) if !view.loading => format!(" {} ({}) ", label, view.offers.len()),
            Some(label) => format!(" {} ", label),
            None => " Angebote ".to_string(),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(self.border_style(Focus::Offers));

        let inner = block.inner(area);
        f.render_widget(block, area);

        if view.loading {
            let loading = Paragraph::new(page::LOADING).style(Style::default().fg(Color::Yellow));
            f.render_widget(loading, inner);
            return;
        }

        if view.offers.is_empty() {
            let empty_msg = Paragraph::new("No offers - press r to reload")
                .style(Style::default().fg(Color::DarkGray))
                .wrap(Wrap { trim: true });
            f.render_widget(empty_msg, inner);
            return;
        }

        // Keep the selected offer in view
        let visible = (inner.height as usize / OFFER_ROWS).max(1);
        let scroll_offset = match self.selected_offer {
            Some(selected) if selected >= visible => selected + 1 - visible,
            _ => 0,
        };

        let items: Vec<ListItem> = view
            .offers
            .iter()
            .enumerate()
            .skip(scroll_offset)
            .take(visible)
            .map(|(idx, offer)| {
                let lines = vec![
                    Line::from(Span::styled(
                        offer.title.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(vec![
                        Span::styled(
                            offer.price.clone(),
                            Style::default()
                                .fg(Color::Green)
                                .add_modifier(Modifier::BOLD),
                        ),
                        Span::raw(" "),
                        Span::styled(
                            offer.original_price.clone(),
                            Style::default()
                                .fg(Color::DarkGray)
                                .add_modifier(Modifier::CROSSED_OUT),
                        ),
                        Span::raw(" "),
                        Span::styled(
                            offer.discount.clone(),
                            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                        ),
                    ]),
                    Line::from(vec![
                        Span::styled(offer.stars.clone(), Style::default().fg(Color::Yellow)),
                        Span::raw(format!(" {} ", offer.rating)),
                        Span::styled(
                            offer.review_count.clone(),
                            Style::default().fg(Color::DarkGray),
                        ),
                        Span::raw("  "),
                        Span::styled(offer.link_label.clone(), Style::default().fg(Color::Blue)),
                    ]),
                ];

                let mut item = ListItem::new(lines);
                if self.focus == Focus::Offers && Some(idx) == self.selected_offer {
                    item = item.style(Style::default().bg(Color::DarkGray));
                }
                item
            })
            .collect();

        f.render_widget(List::new(items), inner);
    }

    fn render_logs(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Logs ")
            .border_style(Style::default().fg(Color::Magenta));

        let inner = block.inner(area);
        f.render_widget(block, area);

        // Always show the newest entries
        let height = inner.height as usize;
        let scroll_offset = self.logs.len().saturating_sub(height);

        let items: Vec<ListItem> = self
            .logs
            .iter()
            .skip(scroll_offset)
            .map(|(level, message)| {
                let (prefix, style) = match level {
                    LogLevel::Info => ("INFO ", Style::default().fg(Color::Blue)),
                    LogLevel::Warn => ("WARN ", Style::default().fg(Color::Yellow)),
                    LogLevel::Error => ("ERROR", Style::default().fg(Color::Red)),
                };
                ListItem::new(format!("[{}] {}", prefix, message)).style(style)
            })
            .collect();

        f.render_widget(List::new(items), inner);
    }

    fn render_hints(&self, f: &mut Frame, area: Rect) {
        let key = Style::default().fg(Color::Black).bg(Color::Gray);
        let hints = Line::from(vec![
            Span::styled(" q/ESC ", key),
            Span::raw(" Exit  "),
            Span::styled(" ↑/↓ j/k ", key),
            Span::raw(" Select  "),
            Span::styled(" Tab ", key),
            Span::raw(" Switch panel  "),
            Span::styled(" Enter ", key),
            Span::raw(" Details  "),
            Span::styled(" r ", key),
            Span::raw(" Reload"),
        ]);

        let paragraph = Paragraph::new(hints).style(Style::default().bg(Color::Black).fg(Color::Gray));
        f.render_widget(paragraph, area);
    }

    fn border_style(&self, panel: Focus) -> Style {
        if self.focus == panel {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    }
}

/// Run the deals browser (blocking function, should be run in separate thread).
/// Fetches are spawned on the runtime behind `handle`.
pub fn run_browser(loader: DealsLoader, handle: Handle) -> Result<()> {
    let _runtime = handle.enter();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut browser = DealsBrowser::new(loader);
    browser.start();
    let result = browse(&mut terminal, &mut browser);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn browse<B: Backend>(terminal: &mut Terminal<B>, browser: &mut DealsBrowser) -> Result<()> {
    loop {
        browser.process_messages();
        terminal.draw(|f| browser.draw(f))?;

        if browser.should_quit() {
            break;
        }

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
        {
            browser.handle_key(key);
        }
    }

    Ok(())
}
