use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod clip;
mod commands;

#[derive(Parser, Debug)]
#[command(name = "quickprompts")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Manage a library of reusable AI prompts")]
struct Args {
    /// Use an alternate data directory instead of ~/.quickprompts
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all prompts in display order
    List,
    /// Show a single prompt in full
    Show { id: String },
    /// Add a new prompt
    Add {
        /// The prompt text
        text: String,
        /// Display name; derived from the text when omitted
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        icon: Option<String>,
    },
    /// Edit fields of an existing prompt
    Edit {
        id: String,
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        icon: Option<String>,
    },
    /// Delete a prompt
    Rm { id: String },
    /// Move a prompt one position up or down
    Move {
        id: String,
        direction: MoveDirection,
    },
    /// Copy a prompt's text to the clipboard
    Copy { id: String },
    /// Export the collection to a JSON file
    Export {
        /// Target file; a timestamped name in the current directory when omitted
        path: Option<PathBuf>,
    },
    /// Import prompts from a JSON export file
    Import {
        path: PathBuf,
        /// merge keeps local prompts and adds new ones; replace discards them
        #[arg(long, value_enum, default_value = "merge")]
        mode: ImportMode,
    },
    /// List chat models available to the configured API key
    Models,
    /// Ask the completion API to suggest a category for each prompt
    Categorize {
        /// Apply the suggestions instead of just printing them
        #[arg(long)]
        apply: bool,
    },
    /// Ask the completion API to improve a prompt's text
    Enhance {
        id: String,
        /// Feedback steering this enhancement round
        #[arg(long)]
        feedback: Option<String>,
        /// Save the enhanced text back to the prompt
        #[arg(long)]
        save: bool,
    },
    /// Show or set the model used for API calls
    Model { id: Option<String> },
    /// Manage the API key in the OS keychain
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum MoveDirection {
    Up,
    Down,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ImportMode {
    Merge,
    Replace,
}

#[derive(Subcommand, Debug)]
enum KeyAction {
    /// Store an API key in the OS keychain
    Set { value: String },
    /// Remove the stored API key
    Clear,
    /// Report whether an API key is stored
    Status,
}

fn main() -> Result<()> {
    setup_tracing()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    let args = Args::parse();

    let data_dir = match args.data_dir {
        Some(dir) => dir,
        None => quickprompts_core::storage::prompts::default_data_dir()?,
    };
    info!(?data_dir, "CLI startup");

    match args.command {
        Command::List => commands::list(&data_dir),
        Command::Show { id } => commands::show(&data_dir, &id),
        Command::Add {
            text,
            name,
            category,
            color,
            icon,
        } => commands::add(&data_dir, text, name, category, color, icon),
        Command::Edit {
            id,
            text,
            name,
            category,
            color,
            icon,
        } => commands::edit(&data_dir, &id, text, name, category, color, icon),
        Command::Rm { id } => commands::remove(&data_dir, &id),
        Command::Move { id, direction } => {
            let direction = match direction {
                MoveDirection::Up => quickprompts_core::Direction::Up,
                MoveDirection::Down => quickprompts_core::Direction::Down,
            };
            commands::move_prompt(&data_dir, &id, direction)
        }
        Command::Copy { id } => commands::copy(&data_dir, &id),
        Command::Export { path } => commands::export(&data_dir, path),
        Command::Import { path, mode } => {
            commands::import(&data_dir, &path, matches!(mode, ImportMode::Replace))
        }
        Command::Models => commands::models(&data_dir).await,
        Command::Categorize { apply } => commands::categorize(&data_dir, apply).await,
        Command::Enhance { id, feedback, save } => {
            commands::enhance(&data_dir, &id, feedback.as_deref(), save).await
        }
        Command::Model { id } => commands::model(&data_dir, id),
        Command::Key { action } => match action {
            KeyAction::Set { value } => commands::key_set(&value),
            KeyAction::Clear => commands::key_clear(),
            KeyAction::Status => commands::key_status(),
        },
    }
}

fn setup_tracing() -> Result<()> {
    use std::fs;
    use tracing_subscriber::fmt;

    // Log to a file so command output stays clean.
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    let trace_dir = PathBuf::from(home).join(".quickprompts").join("trace");
    fs::create_dir_all(&trace_dir)?;

    let log_file = trace_dir.join("quickprompts.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(file).with_ansi(false).with_target(true))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    Ok(())
}
