use clap::{Parser, Subcommand};
use colored::Colorize;
use eyre::Result;
use std::path::PathBuf;
use todostore::{storage, Filter, TaskListStore};

#[derive(Parser)]
#[command(name = "todostore")]
#[command(about = "todostore CLI - todo list with local JSON persistence")]
#[command(version)]
struct Cli {
    /// Path to the task file (default: <data dir>/todostore/todos.json)
    #[arg(short, long)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task title (leading/trailing whitespace is trimmed)
        title: String,
    },

    /// List tasks
    List {
        /// Restrict the view to all, active or completed tasks
        #[arg(long, default_value = "all")]
        filter: Filter,
    },

    /// Toggle a task between active and completed
    Toggle {
        /// Task id
        id: u64,
    },

    /// Mark all tasks completed, or all active if every task is completed
    ToggleAll,

    /// Replace a task's title (an empty title deletes the task)
    Edit {
        /// Task id
        id: u64,
        /// New title
        title: String,
    },

    /// Delete a task
    Rm {
        /// Task id
        id: u64,
    },

    /// Delete every completed task
    ClearCompleted,
}

fn main() -> Result<()> {
    // Setup tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let path = match cli.file {
        Some(path) => path,
        None => default_task_file()?,
    };

    let mut store = TaskListStore::from_tasks(storage::load_tasks(&path));

    // Write-back after every task-list change; failure is logged, never fatal
    let hook_path = path.clone();
    store.set_on_change(Box::new(move |tasks| {
        if let Err(e) = storage::save_tasks(&hook_path, tasks) {
            tracing::warn!(file = ?hook_path, error = ?e, "Failed to persist tasks");
        }
    }));

    match cli.command {
        Commands::Add { title } => {
            store.set_pending_title(title);
            store.submit_new_task();
        }
        Commands::List { filter } => {
            store.set_filter(filter);
            print_list(&store);
        }
        Commands::Toggle { id } => store.toggle_task(id),
        Commands::ToggleAll => store.toggle_all(),
        Commands::Edit { id, title } => store.update_task_title(id, &title),
        Commands::Rm { id } => store.delete_task(id),
        Commands::ClearCompleted => store.clear_completed(),
    }

    Ok(())
}

fn default_task_file() -> Result<PathBuf> {
    let base = dirs::data_local_dir().ok_or_else(|| eyre::eyre!("No data directory available"))?;
    Ok(base.join("todostore").join("todos.json"))
}

fn print_list(store: &TaskListStore) {
    for task in store.visible_tasks() {
        if task.completed {
            println!("{:>4} {} {}", task.id, "[x]".green(), task.title.dimmed().strikethrough());
        } else {
            println!("{:>4} {} {}", task.id, "[ ]", task.title);
        }
    }

    let active = store.active_count();
    let noun = if active == 1 { "item" } else { "items" };
    println!("{}", format!("{} {} left", active, noun).bold());

    if store.completed_count() > 0 {
        println!(
            "{}",
            format!("{} completed (run clear-completed to remove)", store.completed_count()).dimmed()
        );
    }
}
