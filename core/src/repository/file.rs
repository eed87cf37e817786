use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde_json;

use crate::config::default_data_dir;
use crate::model::task::{NewTask, Task, TaskId};
use crate::repository::traits::TaskRepository;

const DEFAULT_FILE_NAME: &str = "tasks.json";

/// Server-side task storage: one pretty-printed JSON array on disk.
#[derive(Clone)]
pub struct FileTaskRepository {
    file_path: PathBuf,
}

impl FileTaskRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let mut path = match base_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        fs::create_dir_all(&path)?;
        path.push(DEFAULT_FILE_NAME);

        if !path.exists() {
            let mut writer = BufWriter::new(File::create(&path)?);
            serde_json::to_writer_pretty(&mut writer, &Vec::<Task>::new())?;
            writer.flush()?;
        }

        Ok(FileTaskRepository { file_path: path })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn read_tasks(&self) -> Result<Vec<Task>> {
        let file = File::open(&self.file_path)?;
        let reader = BufReader::new(file);
        let tasks = serde_json::from_reader(reader)?;
        Ok(tasks)
    }

    fn write_tasks(&self, tasks: &[Task]) -> Result<()> {
        let file = File::create(&self.file_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, tasks)?;
        writer.flush()?;
        Ok(())
    }
}

fn next_id(tasks: &[Task]) -> TaskId {
    TaskId(tasks.iter().map(|t| t.id.0).max().unwrap_or(0) + 1)
}

impl TaskRepository for FileTaskRepository {
    fn create(&self, task: NewTask) -> Result<Task> {
        let mut tasks = self.read_tasks()?;
        let created = task.into_task(next_id(&tasks));
        tasks.push(created.clone());
        self.write_tasks(&tasks)?;
        Ok(created)
    }

    fn list(&self) -> Result<Vec<Task>> {
        self.read_tasks()
    }

    fn update(&self, id: TaskId, task: NewTask) -> Result<Option<Task>> {
        let mut tasks = self.read_tasks()?;
        let Some(pos) = tasks.iter().position(|t| t.id == id) else {
            return Ok(None);
        };
        let updated = task.into_task(id);
        tasks[pos] = updated.clone();
        self.write_tasks(&tasks)?;
        Ok(Some(updated))
    }

    fn delete(&self, id: TaskId) -> Result<bool> {
        let mut tasks = self.read_tasks()?;
        let initial_len = tasks.len();
        tasks.retain(|t| t.id != id);

        if tasks.len() == initial_len {
            return Ok(false);
        }

        self.write_tasks(&tasks)?;
        Ok(true)
    }
}
