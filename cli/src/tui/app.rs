use std::sync::Arc;

use ratatui::widgets::TableState;
use taskdeck_core::{RemoteTaskStore, Task, TaskDraft, TaskService};
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    EditingTitle,
    EditingDescription,
}

pub struct App<S: RemoteTaskStore + 'static> {
    pub service: Arc<TaskService<S>>,
    pub tasks: watch::Receiver<Vec<Task>>,
    pub state: TableState,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub should_quit: bool,
}

fn active_field(mode: InputMode, draft: &mut TaskDraft) -> Option<&mut String> {
    match mode {
        InputMode::EditingTitle => Some(&mut draft.title),
        InputMode::EditingDescription => Some(&mut draft.description),
        InputMode::Normal => None,
    }
}

fn byte_index(s: &str, char_pos: usize) -> usize {
    s.chars().take(char_pos).map(|c| c.len_utf8()).sum()
}

impl<S: RemoteTaskStore + 'static> App<S> {
    pub fn new(service: Arc<TaskService<S>>) -> App<S> {
        let tasks = service.subscribe();
        App {
            service,
            tasks,
            state: TableState::default(),
            input_mode: InputMode::Normal,
            cursor_position: 0,
            should_quit: false,
        }
    }

    pub fn task_count(&self) -> usize {
        self.tasks.borrow().len()
    }

    pub fn draft(&self) -> TaskDraft {
        self.service.draft()
    }

    fn selected_task(&self) -> Option<Task> {
        let i = self.state.selected()?;
        self.tasks.borrow().get(i).cloned()
    }

    /// Keeps the selection on a row while the list grows and shrinks under it.
    pub fn clamp_selection(&mut self) {
        let len = self.task_count();
        match self.state.selected() {
            _ if len == 0 => self.state.select(None),
            None => self.state.select(Some(0)),
            Some(i) if i >= len => self.state.select(Some(len - 1)),
            Some(_) => {}
        }
    }

    pub fn next(&mut self) {
        let len = self.task_count();
        if len == 0 { return; }

        let i = match self.state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.task_count();
        if len == 0 { return; }

        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    // Commands run as their own tasks so the UI keeps reading input while
    // a request is in flight.

    pub fn refresh(&self) {
        let service = Arc::clone(&self.service);
        tokio::spawn(async move {
            service.refresh().await;
        });
    }

    pub fn toggle_selected(&self) {
        if let Some(task) = self.selected_task() {
            let service = Arc::clone(&self.service);
            tokio::spawn(async move {
                service.toggle_complete(task.id).await;
            });
        }
    }

    pub fn delete_selected(&self) {
        if let Some(task) = self.selected_task() {
            let service = Arc::clone(&self.service);
            tokio::spawn(async move {
                service.delete(task.id).await;
            });
        }
    }

    pub fn enter_draft_mode(&mut self) {
        self.input_mode = InputMode::EditingTitle;
        self.cursor_position = self.draft().title.chars().count();
    }

    pub fn switch_field(&mut self) {
        let draft = self.draft();
        let (mode, field) = match self.input_mode {
            InputMode::EditingTitle => (InputMode::EditingDescription, draft.description),
            InputMode::EditingDescription => (InputMode::EditingTitle, draft.title),
            InputMode::Normal => return,
        };
        self.input_mode = mode;
        self.cursor_position = field.chars().count();
    }

    pub fn exit_input_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn input_char(&mut self, c: char) {
        let mode = self.input_mode;
        let pos = self.cursor_position;
        let mut inserted = false;
        self.service.edit_draft(|draft| {
            if let Some(field) = active_field(mode, draft) {
                let index = byte_index(field, pos);
                field.insert(index, c);
                inserted = true;
            }
        });
        if inserted {
            self.cursor_position += 1;
        }
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position == 0 {
            return;
        }
        let mode = self.input_mode;
        let pos = self.cursor_position;
        let mut removed = false;
        self.service.edit_draft(|draft| {
            if let Some(field) = active_field(mode, draft) {
                if pos <= field.chars().count() {
                    let index = byte_index(field, pos - 1);
                    field.remove(index);
                    removed = true;
                }
            }
        });
        if removed {
            self.cursor_position -= 1;
        }
    }

    fn active_len(&self) -> usize {
        let draft = self.draft();
        match self.input_mode {
            InputMode::EditingTitle => draft.title.chars().count(),
            InputMode::EditingDescription => draft.description.chars().count(),
            InputMode::Normal => 0,
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.active_len() {
            self.cursor_position += 1;
        }
    }

    /// Sends the draft unless its title is blank. The draft is cleared by the
    /// service once the server has stored the task.
    pub fn submit_draft(&mut self) {
        if !self.draft().title.trim().is_empty() {
            let service = Arc::clone(&self.service);
            tokio::spawn(async move {
                service.submit_draft().await;
            });
        }
        self.cursor_position = 0;
        self.exit_input_mode();
    }
}
