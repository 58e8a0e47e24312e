//! Terminal demo for lineview
//!
//! Opens a file in an `EditorViewport` and draws it with crossterm and ratatui. Every terminal
//! cell is one "pixel" of the viewport, so the engine runs with `MonospaceFont::cells()`.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p lineview-tui -- <file_path> [settings.json]
//! ```
//!
//! Logs go to `lineview-tui.log` in the system temp directory (override with `LINEVIEW_LOG`);
//! the level is taken from `RUST_LOG` and defaults to `info`.
//!
//! # Keys
//!
//! - Arrows / Home / End / PageUp / PageDown: move the caret
//! - Enter / Backspace / Delete / Tab: edit
//! - Mouse click: place the caret; wheel: scroll
//! - Ctrl+S: save
//! - Ctrl+Q: quit (press twice to discard unsaved changes)

mod render;

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use lineview_core::{InputEvent, MonospaceFont, MouseClick, ScrollEvent};
use lineview_ui::{EditorSession, EditorSettings};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
};
use render::{TerminalRenderer, color};
use std::{
    env, fs,
    io::{self, stdout},
    path::{Path, PathBuf},
    process,
    sync::Mutex,
    time::Duration,
};

struct App {
    session: EditorSession,
    file_path: PathBuf,
    saved_revision: u64,
    should_quit: bool,
    confirm_quit: bool,
    status_message: String,
    /// Text area of the last frame, for mouse hit testing.
    text_area: Rect,
}

impl App {
    fn new(file_path: PathBuf, settings: EditorSettings) -> io::Result<Self> {
        let content = if file_path.exists() {
            fs::read_to_string(&file_path)?
        } else {
            String::new()
        };

        let mut session = EditorSession::new(settings, MonospaceFont::cells(), &content)
            .map_err(io::Error::other)?;
        session.viewport_mut().subscribe_caret(|change| {
            tracing::trace!(?change, "caret changed");
        });
        let saved_revision = session.viewport().revision();

        Ok(Self {
            session,
            file_path,
            saved_revision,
            should_quit: false,
            confirm_quit: false,
            status_message: String::new(),
            text_area: Rect::default(),
        })
    }

    fn is_dirty(&self) -> bool {
        self.session.viewport().revision() != self.saved_revision
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('s')) => {
                self.confirm_quit = false;
                match self.save_file() {
                    Ok(()) => self.status_message = format!("Saved {}", self.file_path.display()),
                    Err(e) => self.status_message = format!("Save failed: {e}"),
                }
                return;
            }
            (KeyModifiers::CONTROL, KeyCode::Char('q')) => {
                if self.is_dirty() && !self.confirm_quit {
                    self.confirm_quit = true;
                    self.status_message =
                        "Unsaved changes. Ctrl+Q again to discard, Ctrl+S to save.".to_string();
                } else {
                    self.should_quit = true;
                }
                return;
            }
            _ => {}
        }

        let Some(event) = input_for_key(key) else {
            return;
        };
        if self.session.handle_input(event).is_consumed() {
            self.confirm_quit = false;
            self.status_message.clear();
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        let area = self.text_area;
        let event = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if mouse.column < area.x
                    || mouse.row < area.y
                    || mouse.column >= area.right()
                    || mouse.row >= area.bottom()
                {
                    return;
                }
                InputEvent::MouseClicked(MouseClick {
                    x: f64::from(mouse.column - area.x) + 0.5,
                    y: f64::from(mouse.row - area.y) + 0.5,
                    click_count: 1,
                })
            }
            MouseEventKind::ScrollDown => InputEvent::Scrolled(ScrollEvent { ticks: 1 }),
            MouseEventKind::ScrollUp => InputEvent::Scrolled(ScrollEvent { ticks: -1 }),
            _ => return,
        };
        self.session.handle_input(event);
    }

    fn save_file(&mut self) -> io::Result<()> {
        fs::write(&self.file_path, self.session.viewport().text())?;
        self.saved_revision = self.session.viewport().revision();
        tracing::info!(path = %self.file_path.display(), "file saved");
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(frame.area());

        self.render_editor(frame, chunks[0]);
        self.render_status_line(frame, chunks[1]);
        self.render_shortcuts(frame, chunks[2]);
    }

    fn render_editor(&mut self, frame: &mut Frame, area: Rect) {
        let theme = self.session.theme().clone();
        let title = if self.is_dirty() {
            format!(" {} [+] ", self.file_path.display())
        } else {
            format!(" {} ", self.file_path.display())
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .style(Style::default().bg(color(theme.background)).fg(color(theme.foreground)));
        let inner = block.inner(area);
        self.text_area = inner;

        self.session
            .viewport_mut()
            .resize(f64::from(inner.width), f64::from(inner.height));

        let mut renderer = TerminalRenderer::new(&theme, inner.width, inner.height);
        let Ok(()) = self.session.viewport().render(&mut renderer);

        frame.render_widget(Paragraph::new(renderer.rows).block(block), area);
        if let Some((x, y)) = renderer.caret {
            frame.set_cursor_position((inner.x + x, inner.y + y));
        }
    }

    fn render_status_line(&self, frame: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            let viewport = self.session.viewport();
            let caret = viewport.caret_position();
            let highlight = match viewport.spans_revision() {
                Some(r) if r == viewport.revision() => "current".to_string(),
                Some(r) => format!("stale (rev {r})"),
                None => "none".to_string(),
            };
            format!(
                "Ln {}, Col {} | Lines: {} | Rev: {} | Highlighter: {} ({highlight})",
                caret.line + 1,
                caret.column + 1,
                viewport.buffer().line_count(),
                viewport.revision(),
                self.session.settings().highlighter,
            )
        };

        let status_line = Paragraph::new(status_text).style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_widget(status_line, area);
    }

    fn render_shortcuts(&self, frame: &mut Frame, area: Rect) {
        let shortcuts = "Ctrl-S: Save  Ctrl-Q: Quit  Click: Move caret  Wheel: Scroll";
        let shortcuts_line =
            Paragraph::new(shortcuts).style(Style::default().bg(Color::Blue).fg(Color::White));
        frame.render_widget(shortcuts_line, area);
    }
}

fn input_for_key(key: KeyEvent) -> Option<InputEvent> {
    use lineview_core::KeyCode as Key;

    let pressed = match key.code {
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Enter => Key::Enter,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Tab => Key::Tab,
        KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            return Some(InputEvent::KeyTyped(c));
        }
        _ => return None,
    };
    Some(InputEvent::KeyPressed(pressed))
}

fn init_logging() -> io::Result<PathBuf> {
    let path = env::var_os("LINEVIEW_LOG")
        .map(PathBuf::from)
        .unwrap_or_else(|| env::temp_dir().join("lineview-tui.log"));
    let file = fs::File::create(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(path)
}

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <file_path> [settings.json]", args[0]);
        eprintln!("\nExample:");
        eprintln!("  {} Sample.java", args[0]);
        process::exit(1);
    }

    let log_path = init_logging()?;
    tracing::info!(log = %log_path.display(), "starting lineview-tui");

    let file_path = PathBuf::from(&args[1]);
    let settings = EditorSettings::load_or_default(args.get(2).map(Path::new));

    let mut app = App::new(file_path, settings)?;

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(error = %err, "terminal loop failed");
        eprintln!("Error: {err}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        app.session.refresh();
        terminal.draw(|f| app.render(f))?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => app.handle_key_event(key),
                Event::Mouse(mouse) => app.handle_mouse_event(mouse),
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    Ok(())
}
