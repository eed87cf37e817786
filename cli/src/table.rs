use tabled::settings::Style;
use tabled::{Table, Tabled};
use taskdeck_core::Task;

pub const EMPTY_MESSAGE: &str = "No tasks available.";

pub fn status_label(task: &Task) -> &'static str {
    if task.completed {
        "Done"
    } else {
        "Pending"
    }
}

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "#")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Status")]
    status: &'static str,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.to_string(),
            title: task.title.clone(),
            description: task.description.clone(),
            status: status_label(task),
        }
    }
}

pub fn render(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return EMPTY_MESSAGE.to_string();
    }
    Table::new(tasks.iter().map(TaskRow::from))
        .with(Style::rounded())
        .to_string()
}
