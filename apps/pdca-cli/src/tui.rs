//! Terminal selector for picking tools per PDCA phase.
//!
//! One column per phase lists the catalog tools of that phase. Selections
//! are written straight into the caller's session, so the plan and export
//! always reflect what is shown on screen.

use anyhow::{Context, Result};
use pdca_core::{Phase, Session, Toolbox};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    crossterm::{
        event::{self, Event, KeyCode, KeyEventKind},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io;

const DEFAULT_STATUS: &str = "←/→ phase  ↑/↓ tool  space toggle  e export  h help  q quit";

/// Application state for the selector
struct SelectorApp<'a> {
    toolbox: &'a Toolbox,

    session: Session,

    /// Tool names per phase, in catalog order
    tools: [Vec<String>; 4],

    /// Focused phase column
    phase: usize,

    /// Highlighted row per phase
    cursors: [usize; 4],

    view_mode: ViewMode,

    status: String,

    should_quit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ViewMode {
    Select,
    Help,
}

impl<'a> SelectorApp<'a> {
    fn new(toolbox: &'a Toolbox, session: Session) -> Self {
        let tools = Phase::ALL.map(|phase| {
            toolbox
                .catalog()
                .tools_for_phase(phase)
                .map(|r| r.name.clone())
                .collect()
        });
        Self {
            toolbox,
            session,
            tools,
            phase: 0,
            cursors: [0; 4],
            view_mode: ViewMode::Select,
            status: DEFAULT_STATUS.to_string(),
            should_quit: false,
        }
    }

    fn current_phase(&self) -> Phase {
        Phase::ALL[self.phase]
    }

    /// Handle keyboard input
    fn handle_input(&mut self, key: KeyCode) {
        if self.view_mode == ViewMode::Help {
            if matches!(key, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h')) {
                self.view_mode = ViewMode::Select;
                self.status = DEFAULT_STATUS.to_string();
            }
            return;
        }

        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('h') => {
                self.view_mode = ViewMode::Help;
                self.status = "Viewing help - press 'q' to go back".to_string();
            }
            KeyCode::Left => self.phase = (self.phase + 3) % 4,
            KeyCode::Right | KeyCode::Tab => self.phase = (self.phase + 1) % 4,
            KeyCode::Up => {
                let cursor = &mut self.cursors[self.phase];
                *cursor = cursor.saturating_sub(1);
            }
            KeyCode::Down => {
                let len = self.tools[self.phase].len();
                let cursor = &mut self.cursors[self.phase];
                if *cursor + 1 < len {
                    *cursor += 1;
                }
            }
            KeyCode::Char(' ') => self.toggle_current(),
            KeyCode::Char('e') => self.export(),
            _ => {}
        }
    }

    fn toggle_current(&mut self) {
        let phase = self.current_phase();
        let Some(name) = self.tools[self.phase].get(self.cursors[self.phase]) else {
            return;
        };
        let selected = self.session.selection.toggle(phase, name);
        self.status = format!(
            "{} {name} ({phase}), {} selected",
            if selected { "Added" } else { "Removed" },
            self.session.selection.total()
        );
    }

    fn export(&mut self) {
        let results = self.toolbox.export_all(&self.session);
        let dir = self.toolbox.config.output_dir();
        let failed: Vec<_> = results
            .iter()
            .filter_map(|(format, result)| result.as_ref().err().map(|e| (format, e)))
            .collect();

        self.status = match failed.first() {
            None => format!("Exported {} file(s) to {}", results.len(), dir.display()),
            Some((_, e)) => format!(
                "{} of {} export(s) failed: {}",
                failed.len(),
                results.len(),
                e.user_notice()
            ),
        };
    }
}

/// Runs the selector until the user quits and returns the edited session.
pub fn run_selector(toolbox: &Toolbox, session: Session) -> Result<Session> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let mut app = SelectorApp::new(toolbox, session);

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result.map(|()| app.session)
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut SelectorApp<'_>,
) -> Result<()> {
    loop {
        terminal
            .draw(|f| ui(f, app))
            .map_err(|e| anyhow::anyhow!("Failed to draw UI: {}", e))?;

        if event::poll(std::time::Duration::from_millis(100)).context("Failed to poll events")?
            && let Event::Key(key) = event::read().context("Failed to read event")?
            && key.kind == KeyEventKind::Press
        {
            app.handle_input(key.code);
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn phase_color(phase: Phase) -> Color {
    let (r, g, b) = phase.color();
    Color::Rgb(r, g, b)
}

fn ui(frame: &mut Frame, app: &SelectorApp<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(10),   // Phase columns
            Constraint::Length(3), // Status bar
        ])
        .split(frame.area());

    let project = app
        .session
        .metadata
        .get(pdca_core::MetadataField::ProjectName);
    let title = Paragraph::new(vec![Line::from(vec![
        Span::styled(
            "PDCA Toolbox - ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            if project.is_empty() { "untitled project" } else { project },
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
    ])])
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    match app.view_mode {
        ViewMode::Select => render_columns(frame, app, chunks[1]),
        ViewMode::Help => render_help_view(frame, chunks[1]),
    }

    let status = Paragraph::new(app.status.as_str())
        .style(Style::default().fg(Color::Green))
        .block(Block::default().borders(Borders::ALL).title("Status"));
    frame.render_widget(status, chunks[2]);
}

fn render_columns(frame: &mut Frame, app: &SelectorApp<'_>, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for (index, phase) in Phase::ALL.into_iter().enumerate() {
        let items: Vec<ListItem> = app.tools[index]
            .iter()
            .map(|name| {
                let mark = if app.session.selection.contains(phase, name) {
                    "[x] "
                } else {
                    "[ ] "
                };
                ListItem::new(format!("{mark}{name}"))
            })
            .collect();

        let focused = index == app.phase;
        let mut block = Block::default()
            .borders(Borders::ALL)
            .title(format!(
                "{phase} ({})",
                app.session.selection.get(phase).len()
            ))
            .border_style(Style::default().fg(phase_color(phase)));
        if focused {
            block = block.title_style(Style::default().add_modifier(Modifier::BOLD));
        }

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        let mut state = ListState::default();
        if focused && !app.tools[index].is_empty() {
            state.select(Some(app.cursors[index]));
        }
        frame.render_stateful_widget(list, columns[index], &mut state);
    }
}

fn render_help_view(frame: &mut Frame, area: Rect) {
    let help_text = Text::from(vec![
        Line::from(""),
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts:",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from("  ←/→ Tab    - Switch phase"),
        Line::from("  ↑/↓        - Move between tools"),
        Line::from("  Space      - Select or deselect the tool"),
        Line::from("  e          - Export every available format"),
        Line::from("  h          - Show this help screen"),
        Line::from("  q / Esc    - Quit"),
        Line::from(""),
        Line::from("Exports are written to the configured export directory."),
    ]);

    let help = Paragraph::new(help_text)
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .wrap(Wrap { trim: false });
    frame.render_widget(help, area);
}
