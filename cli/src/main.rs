#![forbid(unsafe_code)]

//! Command-line front-end for a remote todo API.

mod render;
mod transport;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use todo_core::{EnvelopePolicy, FileStore, TodoApp, TodoId};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::render::render;
use crate::transport::UreqTransport;

/// Manage todos held by a remote REST API
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File the API configuration is persisted in
    #[arg(long, env = "TODO_STATE_FILE")]
    state_file: Option<PathBuf>,

    /// Treat `success: false` responses as failures instead of ignoring them
    #[arg(long)]
    strict: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Test an API base URL and save it if it responds correctly
    Configure { url: String },
    /// Show the saved configuration
    Config,
    /// List todos
    List,
    /// Add a todo
    Add { title: String },
    /// Flip a todo between open and done
    Toggle { id: TodoId },
    /// Change a todo's title
    Rename { id: TodoId, title: String },
    /// Delete a todo
    Delete { id: TodoId },
}

fn default_state_file() -> Result<PathBuf> {
    let dir = dirs::config_dir().context("cannot determine a config directory; pass --state-file")?;
    Ok(dir.join("todo-cli").join("state.json"))
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let state_file = match args.state_file {
        Some(path) => path,
        None => default_state_file()?,
    };
    let policy = if args.strict {
        EnvelopePolicy::Strict
    } else {
        EnvelopePolicy::Lenient
    };

    let storage = FileStore::new(&state_file);
    let mut app = TodoApp::open(storage, UreqTransport::new(), policy)
        .with_context(|| format!("failed to read {}", state_file.display()))?;
    app.store_mut().subscribe(|state| {
        debug!(
            todos = state.todos.len(),
            loading = state.loading,
            error = ?state.error,
            "state changed"
        );
    });

    // The startup fetch's banner belongs to no command the user ran.
    if !matches!(args.command, Command::List) {
        app.store_mut().dismiss_error();
    }

    let issued = match args.command {
        Command::Configure { url } => {
            if let Err(e) = app.configure(&url) {
                eprintln!("Connection Error: {e}");
                return Ok(ExitCode::FAILURE);
            }
            true
        }
        Command::Config => {
            let config = app.config();
            println!("base URL:   {}", config.base_url);
            println!("state:      {:?}", config.state());
            println!("stored in:  {}", state_file.display());
            return Ok(ExitCode::SUCCESS);
        }
        Command::List => true,
        Command::Add { title } => app.add(&title),
        Command::Toggle { id } => app.toggle(id),
        Command::Rename { id, title } => app.rename(id, &title),
        Command::Delete { id } => app.delete(id),
    };

    let configured = app.store().is_configured();
    print!("{}", render(&app.snapshot(), configured));

    if configured && !issued {
        eprintln!("Title must not be empty");
        return Ok(ExitCode::FAILURE);
    }
    if !configured || app.snapshot().error.is_some() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
