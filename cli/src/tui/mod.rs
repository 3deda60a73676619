pub mod app;
pub mod ui;

use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use ratatui::{backend::CrosstermBackend, Terminal};
use tasklist_core::{SortKey, StatusFilter, TaskRepository, TaskStore};

use crate::tui::app::{App, InputMode};

type Term = Terminal<CrosstermBackend<Stdout>>;

pub fn run<R: TaskRepository>(store: TaskStore<R>, filter: StatusFilter, sort: SortKey) -> Result<()> {
    let mut app = App::new(store, filter, sort);
    info!("event=session_start tasks={}", app.tasks.len());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore the terminal before reporting anything from the loop.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("event=session_end tasks={}", app.tasks.len());
    res
}

fn run_app<R: TaskRepository>(terminal: &mut Term, app: &mut App<R>) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.input_mode {
            InputMode::Normal => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::Char(' ') | KeyCode::Enter => app.toggle_status()?,
                KeyCode::Char('d') | KeyCode::Delete => app.delete_task()?,
                KeyCode::Char('a') => app.enter_add_mode(),
                KeyCode::Char('e') => app.enter_edit_mode(),
                KeyCode::Char('f') => app.cycle_filter(),
                KeyCode::Char('s') => app.cycle_sort(),
                _ => {}
            },
            InputMode::Adding | InputMode::Editing => match key.code {
                KeyCode::Enter => app.submit_command()?,
                KeyCode::Esc => app.exit_input_mode(),
                KeyCode::Char(c) => app.input_char(c),
                KeyCode::Backspace => app.delete_char(),
                KeyCode::Left => app.move_cursor_left(),
                KeyCode::Right => app.move_cursor_right(),
                _ => {}
            },
        }
    }
}
