//! ShelfDB CLI
//!
//! Runs one library command per invocation, or an interactive menu shell.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use shelfdb::config::WalSyncStrategy;
use shelfdb::protocol::{parse_command, Command, CommandType};
use shelfdb::{BookId, BorrowerId, Config, Library, RemovalPolicy};
use tracing_subscriber::{fmt, EnvFilter};

/// ShelfDB CLI
#[derive(Parser, Debug)]
#[command(name = "shelf")]
#[command(about = "Lending catalog with a durable loan ledger")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./shelf_data")]
    data_dir: String,

    /// Delete loans together with removed books/borrowers instead of refusing
    #[arg(long)]
    cascade: bool,

    /// WAL records between automatic checkpoints
    #[arg(long, default_value = "1000")]
    checkpoint_every: usize,

    /// fsync the WAL once every N records (1 syncs every write)
    #[arg(long, default_value = "1")]
    sync_every: usize,

    /// Default directory for CSV exports
    #[arg(short, long, default_value = ".")]
    export_dir: String,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Command to run; starts the interactive shell when omitted
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show all books
    Books,

    /// Search books by title or author
    Search {
        /// Text to look for (case-insensitive)
        query: String,
    },

    /// Borrow a book
    Borrow {
        book_id: BookId,
        /// Borrower name
        name: String,
    },

    /// Return a book
    Return {
        book_id: BookId,
        /// Borrower name
        name: String,
    },

    /// Add a book
    AddBook {
        title: String,
        author: String,
        year: String,
    },

    /// Remove a book
    RemoveBook { book_id: BookId },

    /// Add a borrower
    AddBorrower {
        #[arg(allow_negative_numbers = true)]
        id: BorrowerId,
        name: String,
    },

    /// Remove a borrower
    RemoveBorrower {
        #[arg(allow_negative_numbers = true)]
        id: BorrowerId,
    },

    /// List the books a borrower holds
    Loans {
        /// Borrower name
        name: String,
    },

    /// Export books, borrowers and loans to CSV
    Export {
        /// Target directory (defaults to --export-dir)
        dir: Option<String>,
    },

    /// Interactive menu
    Shell,
}

impl Commands {
    /// Map to a library command; `None` for the shell
    fn into_command(self) -> Option<Command> {
        let command = match self {
            Commands::Books => Command::ShowBooks,
            Commands::Search { query } => Command::Search { query },
            Commands::Borrow { book_id, name } => Command::Borrow { book_id, borrower: name },
            Commands::Return { book_id, name } => Command::Return { book_id, borrower: name },
            Commands::AddBook { title, author, year } => Command::AddBook { title, author, year },
            Commands::RemoveBook { book_id } => Command::RemoveBook { book_id },
            Commands::AddBorrower { id, name } => Command::AddBorrower { id, name },
            Commands::RemoveBorrower { id } => Command::RemoveBorrower { id },
            Commands::Loans { name } => Command::Loans { borrower: name },
            Commands::Export { dir } => Command::Export {
                dir: dir.map(PathBuf::from),
            },
            Commands::Shell => return None,
        };
        Some(command)
    }
}

fn main() {
    let args = Args::parse();

    // Logs go to stderr so command output stays clean
    let default_filter = if args.verbose {
        "info,shelfdb=debug"
    } else {
        "warn,shelfdb=info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    tracing::debug!("ShelfDB v{}", shelfdb::VERSION);
    tracing::debug!("Data directory: {}", args.data_dir);

    let config = Config::builder()
        .data_dir(&args.data_dir)
        .wal_sync_strategy(WalSyncStrategy::every(args.sync_every))
        .export_dir(&args.export_dir)
        .checkpoint_threshold(args.checkpoint_every)
        .removal_policy(if args.cascade {
            RemovalPolicy::Cascade
        } else {
            RemovalPolicy::Reject
        })
        .build();

    let library = match Library::open(config) {
        Ok(library) => library,
        Err(e) => {
            tracing::error!("Failed to open library: {}", e);
            std::process::exit(1);
        }
    };

    let succeeded = match args.command.and_then(Commands::into_command) {
        Some(command) => run_once(&library, command),
        None => run_shell(&library),
    };

    if let Err(e) = library.close() {
        tracing::error!("Failed to close library: {}", e);
        std::process::exit(1);
    }

    if !succeeded {
        std::process::exit(1);
    }
}

fn run_once(library: &Library, command: Command) -> bool {
    match library.execute(command) {
        Ok(response) => {
            println!("{}", response);
            true
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            false
        }
    }
}

/// Menu loop: one command per line until `quit` or end of input
fn run_shell(library: &Library) -> bool {
    println!("Welcome to our library");
    print_menu();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            return false;
        }

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                tracing::error!("Failed to read input: {}", e);
                return false;
            }
            None => return true,
        };

        if line.trim().is_empty() {
            continue;
        }

        match parse_command(&line).and_then(|command| library.execute(command)) {
            Ok(response) => {
                println!("{}", response);
                if response.is_quit() {
                    return true;
                }
            }
            Err(e) => println!("Error: {}", e),
        }
    }
}

fn print_menu() {
    println!("\nWhat do you want to do?");
    for command_type in CommandType::ALL {
        println!(
            "{:>2}: {:<22} {}",
            command_type as u8,
            command_type.description(),
            command_type.usage()
        );
    }
}
