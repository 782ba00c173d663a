//! Command definitions
//!
//! One command per user action of the menu.

use std::path::PathBuf;

use crate::model::{BookId, BorrowerId};

/// Command types, numbered as in the interactive menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandType {
    ShowBooks = 1,
    Search = 2,
    Borrow = 3,
    Return = 4,
    AddBook = 5,
    RemoveBook = 6,
    AddBorrower = 7,
    RemoveBorrower = 8,
    Loans = 9,
    Export = 10,
    Quit = 11,
}

impl CommandType {
    pub const ALL: [CommandType; 11] = [
        CommandType::ShowBooks,
        CommandType::Search,
        CommandType::Borrow,
        CommandType::Return,
        CommandType::AddBook,
        CommandType::RemoveBook,
        CommandType::AddBorrower,
        CommandType::RemoveBorrower,
        CommandType::Loans,
        CommandType::Export,
        CommandType::Quit,
    ];

    /// Look up a menu number
    pub fn from_menu(number: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| *t as u8 == number)
    }

    /// Look up a shell verb
    pub fn from_verb(verb: &str) -> Option<Self> {
        match verb {
            "books" | "show" => Some(CommandType::ShowBooks),
            "exit" => Some(CommandType::Quit),
            _ => Self::ALL.iter().copied().find(|t| t.verb() == verb),
        }
    }

    /// Shell verb for this command
    pub fn verb(&self) -> &'static str {
        match self {
            CommandType::ShowBooks => "books",
            CommandType::Search => "search",
            CommandType::Borrow => "borrow",
            CommandType::Return => "return",
            CommandType::AddBook => "add-book",
            CommandType::RemoveBook => "remove-book",
            CommandType::AddBorrower => "add-borrower",
            CommandType::RemoveBorrower => "remove-borrower",
            CommandType::Loans => "loans",
            CommandType::Export => "export",
            CommandType::Quit => "quit",
        }
    }

    /// Argument synopsis shown in the menu
    pub fn usage(&self) -> &'static str {
        match self {
            CommandType::ShowBooks => "books",
            CommandType::Search => "search <title or author>",
            CommandType::Borrow => "borrow <book-id> <name>",
            CommandType::Return => "return <book-id> <name>",
            CommandType::AddBook => "add-book <title> <author> <year>",
            CommandType::RemoveBook => "remove-book <book-id>",
            CommandType::AddBorrower => "add-borrower <id> <name>",
            CommandType::RemoveBorrower => "remove-borrower <id>",
            CommandType::Loans => "loans <name>",
            CommandType::Export => "export [dir]",
            CommandType::Quit => "quit",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CommandType::ShowBooks => "Show all books",
            CommandType::Search => "Search books",
            CommandType::Borrow => "Borrow a book",
            CommandType::Return => "Return a book",
            CommandType::AddBook => "Add a book",
            CommandType::RemoveBook => "Remove a book",
            CommandType::AddBorrower => "Add a borrower",
            CommandType::RemoveBorrower => "Remove a borrower",
            CommandType::Loans => "Search borrowed books",
            CommandType::Export => "Export data to CSV",
            CommandType::Quit => "Quit",
        }
    }
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the whole catalog
    ShowBooks,

    /// Case-insensitive title/author search
    Search { query: String },

    Borrow { book_id: BookId, borrower: String },

    Return { book_id: BookId, borrower: String },

    AddBook { title: String, author: String, year: String },

    RemoveBook { book_id: BookId },

    AddBorrower { id: BorrowerId, name: String },

    RemoveBorrower { id: BorrowerId },

    /// Books held by a borrower
    Loans { borrower: String },

    /// Write CSV files; `None` uses the configured export directory
    Export { dir: Option<PathBuf> },

    Quit,
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::ShowBooks => CommandType::ShowBooks,
            Command::Search { .. } => CommandType::Search,
            Command::Borrow { .. } => CommandType::Borrow,
            Command::Return { .. } => CommandType::Return,
            Command::AddBook { .. } => CommandType::AddBook,
            Command::RemoveBook { .. } => CommandType::RemoveBook,
            Command::AddBorrower { .. } => CommandType::AddBorrower,
            Command::RemoveBorrower { .. } => CommandType::RemoveBorrower,
            Command::Loans { .. } => CommandType::Loans,
            Command::Export { .. } => CommandType::Export,
            Command::Quit => CommandType::Quit,
        }
    }
}
