//! Debattons CLI: start topics, reply, and browse reply trees.
//!
//! Usage:
//!   debattons create <title> [--content text] [--replies-to id] [--db path]
//!   debattons roots [--db path]
//!   debattons show <id> [--depth n] [--db path]

use clap::{Parser, Subcommand};
use debattons::telemetry::{try_init_tracing_with_config, TracingConfig};
use debattons::{ErrorKind, OpenStore, Reaction, ReactionError, ReactionId, ReactionService, SqliteStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;

#[derive(Parser)]
#[command(name = "debattons", version, about = "Threaded discussions on a graph store")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Path to SQLite database file
    #[arg(long, global = true, env = "DEBATTONS_DB")]
    db: Option<PathBuf>,
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
    /// Log level used when RUST_LOG is unset
    #[arg(long, global = true, env = "DEBATTONS_LOG", default_value = "warn")]
    log_level: Level,
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
    /// Debug logging with source locations (overrides --log-level)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a topic, or reply to an existing reaction
    Create {
        /// Title of the reaction
        title: String,
        /// Body text
        #[arg(long, default_value = "")]
        content: String,
        /// Id of the reaction being answered
        #[arg(long)]
        replies_to: Option<String>,
    },
    /// List topic starters, newest first
    Roots,
    /// Show a reaction and its replies
    Show {
        /// Id of the reaction
        id: String,
        /// Levels of replies to include
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        depth: i64,
    },
}

/// Get the default database path (~/.local/share/debattons/debattons.db)
fn default_db_path() -> PathBuf {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"));
    data_dir.join("debattons").join("debattons.db")
}

fn open_service(db: Option<PathBuf>) -> Result<ReactionService, String> {
    let db_path = db.unwrap_or_else(default_db_path);
    let store = SqliteStore::open(&db_path)
        .map_err(|e| format!("Failed to open database {}: {}", db_path.display(), e))?;
    Ok(ReactionService::new(Arc::new(store)))
}

fn exit_code(err: &ReactionError) -> i32 {
    match err.kind() {
        ErrorKind::NotFound => 2,
        ErrorKind::InvalidArgument => 3,
        ErrorKind::InvalidState => 4,
        ErrorKind::Storage => 1,
    }
}

fn report(result: Result<(), ReactionError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            exit_code(&e)
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Error: cannot encode output: {}", e),
    }
}

fn print_tree(reaction: &Reaction, indent: usize) {
    println!(
        "{}{}  [{}]  {}",
        "  ".repeat(indent),
        reaction.title,
        reaction.id,
        reaction.created_at.format("%Y-%m-%d %H:%M:%S")
    );
    if !reaction.content.is_empty() {
        println!("{}  {}", "  ".repeat(indent), reaction.content);
    }
    for reply in &reaction.child_replies {
        print_tree(reply, indent + 1);
    }
}

fn cmd_create(
    service: &ReactionService,
    title: &str,
    content: &str,
    replies_to: Option<String>,
    json: bool,
) -> Result<(), ReactionError> {
    let parent = replies_to.map(ReactionId::from);
    let reaction = service.create(title, content, parent.as_ref())?;
    if json {
        print_json(&reaction);
        return Ok(());
    }
    println!("Created reaction '{}' ({})", reaction.title, reaction.id);
    Ok(())
}

fn cmd_roots(service: &ReactionService, json: bool) -> Result<(), ReactionError> {
    let roots = service.find_roots()?;
    if json {
        print_json(&roots);
        return Ok(());
    }
    if roots.is_empty() {
        println!("No topics yet.");
        return Ok(());
    }
    println!("{:<36}  {:<19}  {}", "ID", "CREATED", "TITLE");
    println!("{}", "-".repeat(80));
    for root in roots {
        println!(
            "{:<36}  {:<19}  {}",
            root.id,
            root.created_at.format("%Y-%m-%d %H:%M:%S"),
            root.title
        );
    }
    Ok(())
}

fn cmd_show(service: &ReactionService, id: String, depth: i64, json: bool) -> Result<(), ReactionError> {
    let reaction = service.find_by_id_with_depth(&ReactionId::from(id), depth)?;
    if json {
        print_json(&reaction);
        return Ok(());
    }
    if let Some(parent) = &reaction.replies_to_parent_id {
        println!("(reply to {})", parent);
    }
    print_tree(&reaction, 0);
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let tracing_config = if cli.verbose {
        TracingConfig {
            json: cli.log_json,
            ..TracingConfig::development()
        }
    } else {
        TracingConfig {
            level: cli.log_level,
            json: cli.log_json,
            ..TracingConfig::default()
        }
    };
    if let Err(e) = try_init_tracing_with_config(tracing_config) {
        eprintln!("Warning: {}", e);
    }

    let service = match open_service(cli.db) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let code = match cli.command {
        Commands::Create {
            title,
            content,
            replies_to,
        } => report(cmd_create(&service, &title, &content, replies_to, cli.json)),
        Commands::Roots => report(cmd_roots(&service, cli.json)),
        Commands::Show { id, depth } => report(cmd_show(&service, id, depth, cli.json)),
    };
    std::process::exit(code);
}
