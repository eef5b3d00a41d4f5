//! Terminal front-end of the form.
//!
//! Draws the questions in a two-column grid, the comment box and the submit button, and
//! translates key presses into form events.

use std::io::{self, Stdout};
use std::sync::Once;

use crossterm::{
    cursor::Show,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use likert_form::layout::{grid_layout, Column};
use log::error;
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    prelude::CrosstermBackend,
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};

use crate::survey::app::{App, Exit, FormEvent, Mode, TextEdit};
use crate::survey::*;
use snafu::prelude::*;

/// Height of one row of the grid: borders, with the label as title, and the value.
const ROW_HEIGHT: u16 = 3;

const HELP: &str = "Tab/Shift-Tab: move  ←/→: change answer  Ctrl-S: submit  Esc: quit";

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Focus {
    Question(usize),
    Text,
    Submit,
}

/// Presentation state: what is displayed around the form and which control has the focus.
pub struct FormView {
    title: String,
    prompt: String,
    focus: Focus,
}

impl FormView {
    pub fn new(title: &str, prompt: &str) -> FormView {
        FormView {
            title: title.to_string(),
            prompt: prompt.to_string(),
            focus: Focus::Question(0),
        }
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    fn focus_next(&mut self, num_questions: usize) {
        self.focus = match self.focus {
            Focus::Question(i) if i + 1 < num_questions => Focus::Question(i + 1),
            Focus::Question(_) => Focus::Text,
            Focus::Text => Focus::Submit,
            Focus::Submit if num_questions > 0 => Focus::Question(0),
            Focus::Submit => Focus::Text,
        }
    }

    fn focus_previous(&mut self, num_questions: usize) {
        self.focus = match self.focus {
            Focus::Question(0) => Focus::Submit,
            Focus::Question(i) => Focus::Question(i - 1),
            Focus::Text if num_questions > 0 => Focus::Question(num_questions - 1),
            Focus::Text => Focus::Submit,
            Focus::Submit => Focus::Text,
        }
    }

    /// Translates a key press into a form event. Focus changes are handled here and
    /// do not produce events.
    pub fn map_key(&mut self, app: &App, key: KeyEvent) -> Option<FormEvent> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        match app.mode() {
            Mode::Editing => {}
            Mode::Finished(_) => return None,
            _ => {
                return match key.code {
                    KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                        Some(FormEvent::DialogAccepted)
                    }
                    KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                        Some(FormEvent::DialogDismissed)
                    }
                    _ => None,
                };
            }
        }

        let num_questions = app.form().registry().len();
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') | KeyCode::Char('q') => Some(FormEvent::CloseRequested),
                KeyCode::Char('s') => Some(FormEvent::SubmitClicked),
                _ => None,
            };
        }
        match (self.focus, key.code) {
            (_, KeyCode::Esc) => Some(FormEvent::CloseRequested),
            (_, KeyCode::Tab) => {
                self.focus_next(num_questions);
                None
            }
            (_, KeyCode::BackTab) => {
                self.focus_previous(num_questions);
                None
            }
            (Focus::Question(question), KeyCode::Right | KeyCode::Down | KeyCode::Char(' ')) => {
                app.form()
                    .next_answer(question)
                    .map(|answer| FormEvent::SelectionChanged { question, answer })
            }
            (Focus::Question(question), KeyCode::Left | KeyCode::Up) => app
                .form()
                .previous_answer(question)
                .map(|answer| FormEvent::SelectionChanged { question, answer }),
            (Focus::Question(_), KeyCode::Enter) => {
                self.focus_next(num_questions);
                None
            }
            (Focus::Text, KeyCode::Char(c)) => Some(FormEvent::TextEdited(TextEdit::Insert(c))),
            (Focus::Text, KeyCode::Enter) => Some(FormEvent::TextEdited(TextEdit::Insert('\n'))),
            (Focus::Text, KeyCode::Backspace) => Some(FormEvent::TextEdited(TextEdit::Backspace)),
            (Focus::Submit, KeyCode::Enter | KeyCode::Char(' ')) => Some(FormEvent::SubmitClicked),
            _ => None,
        }
    }
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Owns the terminal while the form is shown and gives it back when dropped, also when
/// unwinding from a panic.
struct TerminalGuard<B: Backend> {
    terminal: Terminal<B>,
    restore: fn(&mut Terminal<B>) -> io::Result<()>,
}

impl<B: Backend> Drop for TerminalGuard<B> {
    fn drop(&mut self) {
        if let Err(e) = (self.restore)(&mut self.terminal) {
            error!("could not restore the terminal: {}", e);
        }
    }
}

/// Leaves the alternate screen before the panic message is printed, otherwise the
/// message is lost with the screen.
fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
            previous(info);
        }));
    });
}

/// Runs the form in the terminal until it is finished.
pub fn run_form(app: &mut App, title: &str, prompt: &str) -> SurveyResult<Exit> {
    install_panic_hook();
    let terminal = setup_terminal().context(TerminalSnafu {})?;
    let mut guard = TerminalGuard {
        terminal,
        restore: restore_terminal,
    };
    let mut view = FormView::new(title, prompt);
    event_loop(&mut guard.terminal, app, &mut view)
}

fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    view: &mut FormView,
) -> SurveyResult<Exit> {
    loop {
        if let Some(exit) = app.exit() {
            return Ok(exit);
        }
        terminal
            .draw(|frame| draw_form(frame, app, view))
            .context(TerminalSnafu {})?;
        if let Event::Key(key) = event::read().context(TerminalSnafu {})? {
            if let Some(ev) = view.map_key(app, key) {
                app.handle(ev);
            }
        }
    }
}

pub fn draw_form(frame: &mut Frame, app: &App, view: &FormView) {
    let form = app.form();
    let grid = grid_layout(form.registry().len());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2),                                 // Title
            Constraint::Length(grid.rows.saturating_mul(ROW_HEIGHT)), // Questions
            Constraint::Length(4),                                 // Prompt
            Constraint::Min(3),                                    // Comment
            Constraint::Length(3),                                 // Submit
            Constraint::Length(1),                                 // Help
        ])
        .split(frame.area());

    let header = Paragraph::new(view.title.clone())
        .style(Style::default().fg(Color::Cyan).bold())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::Gray)),
        );
    frame.render_widget(header, chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    for p in grid.placements.iter() {
        let col = match p.column {
            Column::Left => columns[0],
            Column::Right => columns[1],
        };
        let y = col.y.saturating_add(p.row.saturating_mul(ROW_HEIGHT));
        let cell = Rect::new(col.x, y, col.width, ROW_HEIGHT).intersection(chunks[1]);
        if cell.is_empty() {
            continue;
        }
        let focused = view.focus == Focus::Question(p.question);
        let value_style = if form.selection(p.question).is_some() {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let selector = Paragraph::new(Line::from(vec![
            Span::raw("◀ "),
            Span::styled(form.display_value(p.question), value_style),
            Span::raw(" ▶"),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(focused))
                .title(format!(" {} ", form.registry().questions()[p.question].label)),
        );
        frame.render_widget(selector, cell);
    }

    let prompt = Paragraph::new(view.prompt.clone())
        .style(Style::default().fg(Color::Gray))
        .wrap(Wrap { trim: true });
    frame.render_widget(prompt, chunks[2]);

    let text_focused = view.focus == Focus::Text;
    let mut text = form.text().to_string();
    if text_focused {
        text.push('_');
    }
    let comment = Paragraph::new(text).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(text_focused))
            .title(" Comment "),
    );
    frame.render_widget(comment, chunks[3]);

    let submit_style = if view.focus == Focus::Submit {
        Style::default().fg(Color::Black).bg(Color::Yellow).bold()
    } else {
        Style::default().fg(Color::White)
    };
    let submit = Paragraph::new("[ Submit ]")
        .style(submit_style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::NONE));
    frame.render_widget(submit, centered_rect(20, 1, chunks[4]));

    let help = Paragraph::new(HELP)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[5]);

    match app.mode() {
        Mode::Warning => draw_dialog(
            frame,
            " WARNING ",
            "Submission incomplete",
            "[Enter] OK",
            Color::Yellow,
        ),
        Mode::ConfirmQuit => draw_dialog(
            frame,
            " Quit ",
            "Do you want to quit?\nResponse will be discarded",
            "[Enter/y] OK   [Esc/n] Cancel",
            Color::Cyan,
        ),
        Mode::StorageFailed(msg) => draw_dialog(
            frame,
            " ERROR ",
            &format!("Could not save the response\n{}", msg),
            "[Enter] Back to the form",
            Color::Red,
        ),
        Mode::Saved => draw_dialog(
            frame,
            " Info ",
            "Submission Recorded\nAutomatically Closing Window",
            "[Enter] Close",
            Color::Green,
        ),
        Mode::Editing | Mode::Finished(_) => {}
    }
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    }
}

fn draw_dialog(frame: &mut Frame, title: &str, message: &str, hint: &str, color: Color) {
    let mut lines: Vec<Line> = message.lines().map(|l| Line::from(l.to_string())).collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        hint.to_string(),
        Style::default().fg(Color::DarkGray),
    )));
    let dialog = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(title.to_string()),
        );
    // The count includes the top and bottom borders, the wrap width excludes the side ones.
    let width = centered_rect(60, 1, frame.area()).width;
    let height = dialog
        .line_count(width.saturating_sub(2))
        .min(frame.area().height as usize) as u16;
    let area = centered_rect(60, height, frame.area());
    frame.render_widget(Clear, area);
    frame.render_widget(dialog, area);
}

/// A rectangle of the given height, horizontally centered and taking `percent_x` of the
/// width of `r`.
fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
