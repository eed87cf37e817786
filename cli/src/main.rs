mod logging;
mod table;
mod tui;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Parser;
use taskdeck_core::server;
use taskdeck_core::{Config, FileTaskRepository, HttpTaskStore, TaskDraft, TaskId, TaskService};
use tracing::info;

use crate::logging::LogTarget;

#[derive(Parser)]
#[command(name = "taskdeck")]
#[command(about = "A task list client for a REST task server", long_about = None)]
struct Cli {
    /// Config file (default: ~/.taskdeck/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the task server
    #[arg(long, global = true, env = "TASKDECK_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Open the Terminal User Interface (default)
    Tui,
    /// List all tasks
    List,
    /// Add a new task (usage: add Buy milk -d "2 liters")
    Add {
        /// Task title
        #[arg(required = true)]
        title: Vec<String>,
        /// Task description
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Mark a task done, or pending again if it is already done
    Toggle { id: TaskId },
    /// Delete a task
    Delete { id: TaskId },
    /// Run the task server
    Serve {
        /// Address to listen on, e.g. 127.0.0.1:8000
        #[arg(long)]
        bind: Option<String>,
        /// Directory holding tasks.json
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

fn connect(config: &Config) -> Result<TaskService<HttpTaskStore>> {
    let store = HttpTaskStore::new(&config.client)?;
    info!(api_url = store.base_url(), "using task server");
    Ok(TaskService::new(store))
}

fn print_tasks(service: &TaskService<HttpTaskStore>) {
    println!("{}", table::render(&service.tasks()));
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(url) = cli.api_url {
        config.client.api_url = url;
    }

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            logging::init(LogTarget::File(config.data_dir()?))?;
            let service = Arc::new(connect(&config)?);
            tui::run(service).await?;
        }
        Commands::List => {
            logging::init(LogTarget::Stderr)?;
            let service = connect(&config)?;
            service.refresh().await;
            print_tasks(&service);
        }
        Commands::Add { title, description } => {
            let title = title.join(" ");
            if title.trim().is_empty() {
                bail!("Task title is required.");
            }
            logging::init(LogTarget::Stderr)?;
            let service = connect(&config)?;
            service.refresh().await;
            service.create(TaskDraft::new(title, description)).await;
            print_tasks(&service);
        }
        Commands::Toggle { id } => {
            logging::init(LogTarget::Stderr)?;
            let service = connect(&config)?;
            service.refresh().await;
            service.toggle_complete(id).await;
            print_tasks(&service);
        }
        Commands::Delete { id } => {
            logging::init(LogTarget::Stderr)?;
            let service = connect(&config)?;
            service.refresh().await;
            service.delete(id).await;
            print_tasks(&service);
        }
        Commands::Serve { bind, data_dir } => {
            logging::init(LogTarget::Stderr)?;
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            if let Some(dir) = data_dir {
                config.server.data_dir = Some(dir);
            }
            let repo = FileTaskRepository::new(Some(config.data_dir()?))?;
            info!(file = %repo.file_path().display(), "task file");
            server::serve(&config.server, repo).await?;
        }
    }
    Ok(())
}
