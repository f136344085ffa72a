//! Preview — interactive shell for the writing studio.
//!
//! Usage: preview [--config <file.ron>] [--genre <id>] [--prompt <text>] [--seed <n>]
//!                [--out-dir <dir>] [--memory-clipboard] [--once] [-v]
//!
//! Commands:
//!   genres            — list genres
//!   genre <id|none>   — select a genre
//!   prompt <text>     — set the prompt
//!   inspire [n]       — use inspiration prompt n, or a random one
//!   generate          — reveal a piece word by word
//!   show              — print the revealed text
//!   copy              — copy the revealed text to the clipboard
//!   save              — save the revealed text into --out-dir
//!   help              — list commands
//!   quit              — exit

use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use creative_writer::core::clipboard::MemoryClipboard;
use creative_writer::core::notify::{Notification, Notifier, Severity};
use creative_writer::core::studio::{PLACEHOLDER, PLACEHOLDER_HINT};
use creative_writer::schema::prompt::INSPIRATION_PROMPTS;
use creative_writer::{GenreTag, StudioError, WritingStudio};

#[derive(Debug, Parser)]
#[command(name = "preview", about = "Interactive shell for the creative writing studio")]
struct Args {
    /// Studio config (RON)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Initial genre id
    #[arg(long)]
    genre: Option<String>,
    /// Initial prompt
    #[arg(long)]
    prompt: Option<String>,
    /// Seed for random inspiration
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Directory `save` writes into
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
    /// Keep copies in memory instead of using the system clipboard
    #[arg(long)]
    memory_clipboard: bool,
    /// Generate once with the initial genre and prompt, then exit
    #[arg(long)]
    once: bool,
    /// Log studio internals to stderr
    #[arg(short, long)]
    verbose: bool,
}

/// Holds notifications until the current command's output is done, then
/// prints them the way a toast would show them.
#[derive(Default)]
struct ConsoleNotifier {
    pending: Mutex<Vec<Notification>>,
}

impl ConsoleNotifier {
    fn flush(&self) {
        let pending = std::mem::take(&mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner));
        for notification in pending {
            match notification.severity() {
                Severity::Success => println!("[ok] {}", notification),
                Severity::Error => println!("[!!] {}", notification),
            }
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let notifier = Arc::new(ConsoleNotifier::default());
    let mut builder = WritingStudio::builder().with_notifier(notifier.clone());
    if let Some(ref path) = args.config {
        builder = builder.config_path(path);
    }
    if let Some(ref id) = args.genre {
        let genre = GenreTag::from_id(id)
            .with_context(|| format!("unknown genre '{}' (try: {})", id, genre_ids()))?;
        builder = builder.genre(genre);
    }
    if let Some(ref prompt) = args.prompt {
        builder = builder.prompt(prompt.clone());
    }
    if args.memory_clipboard {
        builder = builder.with_clipboard(MemoryClipboard::default());
    }
    let mut studio = builder.build().context("building studio")?;

    if args.once {
        generate(&mut studio).await?;
        notifier.flush();
        return Ok(());
    }

    let mut rng = StdRng::seed_from_u64(args.seed);
    println!("Creative Writing Studio. Type 'help' for commands.\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{}> ", studio.genre().map(|g| g.id()).unwrap_or("any"));
        std::io::stdout().flush().ok();

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (cmd, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match cmd.to_lowercase().as_str() {
            "quit" | "exit" | "q" => break,
            "help" | "h" | "?" => print_help(),
            "genres" => {
                for genre in GenreTag::ALL {
                    let marker = if studio.genre() == Some(genre) { "*" } else { " " };
                    println!(" {} {:<10} {}", marker, genre.id(), genre.display_name());
                }
            }
            "genre" => match rest {
                "" => println!("Usage: genre <{}|none>", genre_ids()),
                "none" => {
                    studio.select_genre(None);
                    println!("Genre cleared.");
                }
                id => match GenreTag::from_id(id) {
                    Some(genre) => {
                        studio.select_genre(Some(genre));
                        println!("Genre set to {}.", genre);
                    }
                    None => println!("Unknown genre '{}'. Try: {}", id, genre_ids()),
                },
            },
            "prompt" => {
                if rest.is_empty() {
                    println!("Current prompt: {:?}", studio.prompt());
                } else {
                    studio.set_prompt(rest);
                }
            }
            "inspire" => {
                if rest.is_empty() {
                    println!("Prompt: {}", studio.inspire(&mut rng));
                } else {
                    match rest.parse::<usize>() {
                        Ok(n) => match studio.use_inspiration(n) {
                            Ok(prompt) => println!("Prompt: {}", prompt),
                            Err(e) => println!("{}", e),
                        },
                        Err(_) => {
                            for (i, prompt) in INSPIRATION_PROMPTS.iter().enumerate() {
                                println!("  {}: {}", i, prompt);
                            }
                        }
                    }
                }
            }
            "generate" | "g" => generate(&mut studio).await?,
            "show" => show(&studio),
            "copy" => report(studio.copy_to_clipboard()),
            "save" => report(studio.save_to_dir(&args.out_dir).map(|path| {
                println!("Wrote {}", path.display());
            })),
            other => println!("Unknown command: '{}'. Type 'help' for available commands.", other),
        }
        notifier.flush();
    }

    Ok(())
}

/// Submit and print each word as it is revealed.
async fn generate(studio: &mut WritingStudio) -> Result<()> {
    let mut rx = studio.subscribe();
    let handle = match studio.submit() {
        Ok(handle) => handle,
        Err(StudioError::PromptRequired) => return Ok(()),
        Err(e) => return Err(e.into()),
    };
    println!("{}", studio.action_label());
    rx.borrow_and_update();

    let mut printed = 0;
    let done = studio.await_reveal(handle);
    tokio::pin!(done);

    let outcome = loop {
        tokio::select! {
            outcome = &mut done => break outcome,
            changed = rx.changed() => {
                if changed.is_err() {
                    break (&mut done).await;
                }
                let text = rx.borrow_and_update().revealed_text.clone();
                print_from(&text, &mut printed);
            }
        }
    };
    print_from(&rx.borrow().revealed_text, &mut printed);
    println!();

    match outcome {
        Ok(_) => Ok(()),
        // Already reported through the notifier.
        Err(StudioError::Generation(_)) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn print_from(text: &str, printed: &mut usize) {
    if let Some(fresh) = text.get(*printed..) {
        print!("{}", fresh);
        std::io::stdout().flush().ok();
        *printed = text.len();
    }
}

fn show(studio: &WritingStudio) {
    let text = studio.revealed_text();
    if text.is_empty() {
        println!("{}", PLACEHOLDER);
        println!("{}", PLACEHOLDER_HINT);
    } else {
        println!("{}{}", text, if studio.is_generating() { "|" } else { "" });
    }
}

fn report<T>(result: Result<T, StudioError>) {
    match result {
        Ok(_) => {}
        Err(StudioError::NothingRevealed) => println!("Nothing to work with yet; try 'generate'."),
        // Failures were already shown by the notifier.
        Err(e) => tracing::debug!(error = %e, "action failed"),
    }
}

fn genre_ids() -> String {
    GenreTag::ALL
        .iter()
        .map(|g| g.id())
        .collect::<Vec<_>>()
        .join(", ")
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "creative_writer=debug"
    } else {
        "creative_writer=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_help() {
    println!("Commands:");
    println!("  genres             List genres");
    println!("  genre <id|none>    Select a genre (none = use the prompt)");
    println!("  prompt <text>      Set the prompt");
    println!("  inspire [n]        Use inspiration prompt n, or a random one");
    println!("  generate           Reveal a piece word by word");
    println!("  show               Print the revealed text");
    println!("  copy               Copy the revealed text to the clipboard");
    println!("  save               Save the revealed text");
    println!("  help               Show this help");
    println!("  quit               Exit");
}
