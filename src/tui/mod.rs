use std::io;

use ratatui::backend::CrosstermBackend;
use ratatui::crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseEventKind,
};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::{Frame, Terminal};

use crate::feed::card::CardKind;
use crate::feed::{Feed, GateOutcome};

struct Notice {
    text: String,
    error: bool,
}

pub struct Viewer {
    feed: Feed,
    scroll_step: usize,
    endpoint: String,
    notice: Option<Notice>,
}

impl Viewer {
    pub fn new(
        feed: Feed,
        scroll_step: usize,
        endpoint: String,
        fetch_error: Option<String>,
    ) -> Self {
        let notice = fetch_error.map(|text| Notice { text, error: true });
        Self {
            feed,
            scroll_step: scroll_step.max(1),
            endpoint,
            notice,
        }
    }

    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    fn handle_key(&mut self, key: KeyEvent, viewport: usize) -> bool {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll(self.scroll_step as i64, viewport)
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll(-(self.scroll_step as i64), viewport)
            }
            KeyCode::PageDown => self.scroll(viewport as i64, viewport),
            KeyCode::PageUp => self.scroll(-(viewport as i64), viewport),
            KeyCode::Home | KeyCode::Char('g') => {
                self.feed.scroll_to(0, viewport);
                self.gate(viewport);
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.feed.scroll_to_bottom(viewport);
                self.gate(viewport);
            }
            KeyCode::Char('a') => {
                let added = self.feed.add_batch();
                self.notice = Some(Notice {
                    text: format!("added {added} cards"),
                    error: false,
                });
            }
            _ => {}
        }
        false
    }

    fn handle_mouse(&mut self, kind: MouseEventKind, viewport: usize) {
        match kind {
            MouseEventKind::ScrollDown => self.scroll(self.scroll_step as i64, viewport),
            MouseEventKind::ScrollUp => self.scroll(-(self.scroll_step as i64), viewport),
            _ => {}
        }
    }

    fn scroll(&mut self, delta: i64, viewport: usize) {
        self.feed.scroll_by(delta, viewport);
        self.gate(viewport);
    }

    // Every scroll movement re-evaluates the gate, like a DOM scroll handler.
    fn gate(&mut self, viewport: usize) {
        match self.feed.on_scroll(viewport) {
            GateOutcome::Appended(count) => {
                self.notice = Some(Notice {
                    text: format!("loaded {count} more cards"),
                    error: false,
                });
            }
            GateOutcome::CapReached => {
                self.notice = Some(Notice {
                    text: "no more cards".to_string(),
                    error: true,
                });
            }
            GateOutcome::NotAtBottom => {}
        }
    }

    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(frame.area());

        frame.render_widget(self.render_feed(), chunks[0]);
        frame.render_widget(self.render_status_line(chunks[0].height as usize), chunks[1]);
    }

    fn render_feed(&self) -> Paragraph<'static> {
        let mut lines: Vec<Line<'static>> = Vec::new();
        for card in self.feed.cards() {
            let title_style = match card.kind {
                CardKind::Note => Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
                CardKind::Placeholder => Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            };
            lines.push(Line::from(Span::styled(card.title.clone(), title_style)));
            for body_line in card.body.iter() {
                lines.push(Line::from(format!("  {body_line}")));
            }
            lines.push(Line::from(""));
        }

        let offset = u16::try_from(self.feed.offset()).unwrap_or(u16::MAX);
        Paragraph::new(lines).scroll((offset, 0))
    }

    fn render_status_line(&self, viewport: usize) -> Paragraph<'static> {
        let cap = self.feed.options().cap;
        let counter = if cap == 0 {
            format!("counter {}", self.feed.counter())
        } else {
            format!("counter {}/{}", self.feed.counter(), cap)
        };
        let left = format!(
            " q quit :: a add batch :: {} :: cards {} :: {} :: row {}/{}",
            self.endpoint,
            self.feed.len(),
            counter,
            self.feed.offset(),
            self.feed.max_offset(viewport),
        );

        let mut spans = vec![Span::raw(left)];
        if let Some(notice) = self.notice.as_ref() {
            let style = if notice.error {
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Green)
            };
            spans.push(Span::raw(" :: "));
            spans.push(Span::styled(notice.text.clone(), style));
        }

        Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray))
    }
}

pub fn run(viewer: &mut Viewer) -> io::Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = (|| {
        loop {
            let viewport = terminal.size()?.height.saturating_sub(1) as usize;
            terminal.draw(|frame| viewer.render(frame))?;

            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events, not release or repeat
                    if key.kind == KeyEventKind::Press && viewer.handle_key(key, viewport) {
                        break;
                    }
                }
                Event::Mouse(mouse) => viewer.handle_mouse(mouse.kind, viewport),
                _ => {}
            }
        }
        Ok(())
    })();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}
