//! Terminal host for `sidenotes_core`.
//!
//! # Responsibility
//! - Stand in for the editor host: command surface, name prompt, context
//!   flag and a plain-text rendering of the notes tree.
//! - Keep all printing on this side of the boundary.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use sidenotes_core::{
    init_logging, AddNoteOutcome, FsStorageGateway, HostBindings, LogLevel, NamePrompt,
    NotesConfig, SharedContext, SyncController, UserNotifier, WatchBackend,
};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "sidenotes",
    version = sidenotes_core::core_version(),
    about = "Project side notes kept in .notes/"
)]
struct Cli {
    /// Project root containing the notes directory.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Directory for rolling log files. Logging is off when omitted.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the current notes.
    List,
    /// Create a note. Prompts on stdin when NAME is omitted.
    Add { name: Option<String> },
    /// Re-read the notes directory and print the published count.
    Refresh,
    /// Keep the listing live until `q` or end of input.
    Watch {
        #[arg(long, default_value_t = 100)]
        debounce_ms: u64,
        /// Use polling with this interval instead of native notifications.
        #[arg(long)]
        poll_ms: Option<u64>,
    },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Add { .. } => "add",
            Self::Refresh => "refresh",
            Self::Watch { .. } => "watch",
        }
    }
}

struct StdinPrompt;

impl NamePrompt for StdinPrompt {
    fn prompt_note_name(&self, prompt: &str) -> Option<String> {
        print!("{prompt} ");
        let _ = std::io::stdout().flush();
        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

struct ConsoleNotifier;

impl UserNotifier for ConsoleNotifier {
    fn info(&self, message: &str) {
        println!("{message}");
    }

    fn warn(&self, message: &str) {
        eprintln!("warning: {message}");
    }

    fn error(&self, message: &str) {
        eprintln!("error: {message}");
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir().context("failed to read current directory")?;

    if let Some(log_dir) = &cli.log_dir {
        let level: LogLevel = cli
            .log_level
            .parse()
            .map_err(|err| anyhow!("{err}"))?;
        init_logging(level, &absolute(&cwd, log_dir)).map_err(|err| anyhow!("{err}"))?;
    }

    let mut config = NotesConfig::new(absolute(&cwd, &cli.root));
    if let Command::Watch {
        debounce_ms,
        poll_ms,
    } = &cli.command
    {
        config.debounce_ms = *debounce_ms;
        if let Some(poll_ms) = poll_ms {
            config.watch_backend = WatchBackend::Poll;
            config.poll_interval_ms = *poll_ms;
        }
    }

    let context = SharedContext::new();
    let host = HostBindings {
        prompt: Arc::new(StdinPrompt),
        notifier: Arc::new(ConsoleNotifier),
        context: Arc::new(context.clone()),
    };
    let controller = Arc::new(
        SyncController::from_config(&config, host).context("invalid notes configuration")?,
    );

    info!(
        "event=cli_command module=cli status=start command={} root={}",
        cli.command.name(),
        config.project_root.display()
    );
    match cli.command {
        Command::List => {
            controller.refresh();
            print_items(&controller);
        }
        Command::Add { name } => {
            let outcome = match name {
                Some(name) => controller.add_note_named(&name),
                None => controller.add_note(),
            };
            if !matches!(outcome, AddNoteOutcome::Created { .. }) {
                std::process::exit(1);
            }
        }
        Command::Refresh => {
            let outcome = controller.refresh();
            let published = context.get(&config.context_key).unwrap_or(outcome.count());
            println!("{}={}", config.context_key, published);
        }
        Command::Watch { .. } => watch(&controller, &config)?,
    }
    Ok(())
}

fn watch(controller: &Arc<SyncController<FsStorageGateway>>, config: &NotesConfig) -> Result<()> {
    controller.refresh();
    print_items(controller);

    let notes_dir = config.notes_dir();
    controller.subscribe(move |model| {
        println!("-- {} note(s)", model.len());
        for item in sidenotes_core::view::items(model, &notes_dir) {
            println!("  {}", item.label);
        }
    });
    let mut coordinator = controller
        .start_watching(config)
        .context("failed to start watching the notes directory")?;
    eprintln!("watching {} (q to quit)", config.notes_dir().display());

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        match line {
            Ok(line) if line.trim() == "q" => break,
            Ok(_) => {}
            Err(_) => break,
        }
    }
    coordinator.stop();
    Ok(())
}

fn print_items(controller: &SyncController<FsStorageGateway>) {
    let items = controller.view_items();
    println!("-- {} note(s)", controller.notes_count());
    for item in items {
        println!("  {}\t{}", item.label, item.path.display());
    }
}

fn absolute(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
