pub mod app;
pub mod ui;

use std::io;
use std::sync::Arc;

use anyhow::Result;
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use taskdeck_core::{RemoteTaskStore, TaskService};

use crate::tui::app::{App, InputMode};

pub async fn run<S: RemoteTaskStore + 'static>(service: Arc<TaskService<S>>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(service);
    app.refresh();
    let res = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err);
    }

    Ok(())
}

/// Redraws whenever a key arrives or the service publishes a new task list
/// or draft.
async fn run_app<B: Backend, S: RemoteTaskStore + 'static>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
) -> io::Result<()> {
    let mut events = EventStream::new();
    let mut task_changes = app.service.subscribe();
    let mut draft_changes = app.service.subscribe_draft();

    loop {
        app.clamp_selection();
        terminal
            .draw(|f| ui::draw(f, app))
            .map_err(|e| io::Error::other(e.to_string()))?;

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => handle_key(app, key),
                Some(Ok(_)) => {}
                Some(Err(err)) => return Err(err),
                None => return Ok(()),
            },
            Ok(()) = task_changes.changed() => {}
            Ok(()) = draft_changes.changed() => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key<S: RemoteTaskStore + 'static>(app: &mut App<S>, key: KeyEvent) {
    match app.input_mode {
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Down | KeyCode::Char('j') => app.next(),
            KeyCode::Up | KeyCode::Char('k') => app.previous(),
            KeyCode::Char(' ') | KeyCode::Enter => app.toggle_selected(),
            KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
            KeyCode::Char('a') => app.enter_draft_mode(),
            KeyCode::Char('r') => app.refresh(),
            _ => {}
        },
        InputMode::EditingTitle | InputMode::EditingDescription => match key.code {
            KeyCode::Enter => app.submit_draft(),
            KeyCode::Esc => app.exit_input_mode(),
            KeyCode::Tab => app.switch_field(),
            KeyCode::Char(c) => app.input_char(c),
            KeyCode::Backspace => app.delete_char(),
            KeyCode::Left => app.move_cursor_left(),
            KeyCode::Right => app.move_cursor_right(),
            _ => {}
        },
    }
}
