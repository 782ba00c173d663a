//! Protocol Module
//!
//! The command surface the dispatcher drives the library through.
//!
//! ### Commands (menu number, shell verb)
//! - 1: `books`           - show all books
//! - 2: `search`          - search books by title or author
//! - 3: `borrow`          - borrow a book
//! - 4: `return`          - return a book
//! - 5: `add-book`        - add a book
//! - 6: `remove-book`     - remove a book
//! - 7: `add-borrower`    - add a borrower
//! - 8: `remove-borrower` - remove a borrower
//! - 9: `loans`           - list a borrower's loans
//! - 10: `export`         - export a CSV snapshot
//! - 11: `quit`
//!
//! `Library::execute` maps each `Command` to one library operation and
//! returns a `Response` whose `Display` is the text shown to the user.

mod command;
mod response;
mod parser;

pub use command::{Command, CommandType};
pub use response::Response;
pub use parser::{parse_command, parse_id, tokenize};
