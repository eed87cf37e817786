use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use taskdeck_core::RemoteTaskStore;
use unicode_width::UnicodeWidthStr;

use crate::table::{status_label, EMPTY_MESSAGE};
use crate::tui::app::{App, InputMode};

const TITLE_LABEL: &str = "Title: ";
const DESCRIPTION_LABEL: &str = "Description: ";

pub fn draw<S: RemoteTaskStore + 'static>(f: &mut Frame, app: &mut App<S>) {
    let size = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Tasks
            Constraint::Length(4), // Draft
            Constraint::Length(1), // Footer/Help
        ])
        .split(size);

    let header = Paragraph::new("TASK MANAGER")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(header, main_chunks[0]);

    draw_task_table(f, app, main_chunks[1]);
    draw_draft(f, app, main_chunks[2]);

    let help = match app.input_mode {
        InputMode::Normal => "j/k: Navigate | space: Complete/Undo | d: Delete | a: Add | r: Refresh | q: Quit",
        _ => "Tab: Switch field | Enter: Add task | Esc: Back",
    };
    let footer = Paragraph::new(help)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(footer, main_chunks[3]);
}

fn draw_task_table<S: RemoteTaskStore + 'static>(f: &mut Frame, app: &mut App<S>, area: Rect) {
    let rows: Vec<Row> = {
        let tasks = app.tasks.borrow();
        if tasks.is_empty() {
            vec![Row::new(vec![
                Cell::from(""),
                Cell::from(EMPTY_MESSAGE).style(Style::default().fg(Color::DarkGray)),
            ])]
        } else {
            tasks
                .iter()
                .map(|task| {
                    let status_style = if task.completed {
                        Style::default().fg(Color::Green)
                    } else {
                        Style::default().fg(Color::Yellow)
                    };
                    Row::new(vec![
                        Cell::from(task.id.to_string()),
                        Cell::from(task.title.clone()).style(Style::default().add_modifier(Modifier::BOLD)),
                        Cell::from(task.description.clone()),
                        Cell::from(status_label(task)).style(status_style),
                    ])
                })
                .collect()
        }
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(5),      // Id
            Constraint::Percentage(35), // Title
            Constraint::Min(10),        // Description
            Constraint::Length(8),      // Status
        ],
    )
    .header(Row::new(vec!["#", "Title", "Description", "Status"]).style(Style::default().fg(Color::Yellow)))
    .block(Block::default().title(" Tasks ").borders(Borders::ALL).border_type(BorderType::Rounded))
    .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn draw_draft<S: RemoteTaskStore + 'static>(f: &mut Frame, app: &App<S>, area: Rect) {
    let draft = app.draft();
    let label_style = |mode: InputMode| {
        if app.input_mode == mode {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Blue)
        }
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(TITLE_LABEL, label_style(InputMode::EditingTitle)),
            Span::raw(draft.title.as_str()),
        ]),
        Line::from(vec![
            Span::styled(DESCRIPTION_LABEL, label_style(InputMode::EditingDescription)),
            Span::raw(draft.description.as_str()),
        ]),
    ];
    let block = Paragraph::new(lines)
        .block(Block::default().title(" New Task ").borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(block, area);

    let (row, label, text) = match app.input_mode {
        InputMode::EditingTitle => (0, TITLE_LABEL, draft.title.as_str()),
        InputMode::EditingDescription => (1, DESCRIPTION_LABEL, draft.description.as_str()),
        InputMode::Normal => return,
    };
    let before_cursor: String = text.chars().take(app.cursor_position).collect();
    let x = area.x + 1 + (label.width() + before_cursor.width()) as u16;
    f.set_cursor_position((x, area.y + 1 + row));
}
