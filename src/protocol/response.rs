//! Response definitions
//!
//! Results handed back to the dispatcher, rendered as human-readable text.

use std::fmt;

use crate::export::ExportReport;
use crate::model::{Book, BorrowedBook, Borrower, Loan};

/// A successful command result
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Catalog listing or search results
    Books(Vec<Book>),

    BookAdded(Book),

    BookRemoved(Book),

    BorrowerAdded(Borrower),

    BorrowerRemoved(Borrower),

    Borrowed { loan: Loan, borrower: String },

    Returned { loan: Loan, borrower: String },

    Loans { borrower: String, books: Vec<BorrowedBook> },

    Exported(ExportReport),

    Quit,
}

impl Response {
    /// True if the dispatcher should stop after printing this response
    pub fn is_quit(&self) -> bool {
        matches!(self, Response::Quit)
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Books(books) if books.is_empty() => write!(f, "No books found."),
            Response::Books(books) => {
                for (i, book) in books.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(
                        f,
                        "ID: {}, Title: {}, Author: {}, Year: {}, Available: {}",
                        book.id,
                        book.title,
                        book.author,
                        book.year,
                        if book.available { "Yes" } else { "No" }
                    )?;
                }
                Ok(())
            }
            Response::BookAdded(book) => write!(
                f,
                "'{}' by {} added to the library with ID {}.",
                book.title, book.author, book.id
            ),
            Response::BookRemoved(book) => {
                write!(f, "Book with ID {} removed from the library.", book.id)
            }
            Response::BorrowerAdded(borrower) => write!(
                f,
                "Borrower {} registered with ID {}.",
                borrower.name, borrower.id
            ),
            Response::BorrowerRemoved(borrower) => write!(
                f,
                "Borrower {} (ID {}) removed.",
                borrower.name, borrower.id
            ),
            Response::Borrowed { loan, borrower } => write!(
                f,
                "Book with ID {} borrowed by {}.",
                loan.book_id, borrower
            ),
            Response::Returned { loan, borrower } => write!(
                f,
                "Book with ID {} returned by {}.",
                loan.book_id, borrower
            ),
            Response::Loans { borrower, books } if books.is_empty() => {
                write!(f, "No books borrowed by {}.", borrower)
            }
            Response::Loans { borrower, books } => {
                write!(f, "Books borrowed by {}:", borrower)?;
                for book in books {
                    write!(f, "\nTitle: {}, Author: {}", book.title, book.author)?;
                }
                Ok(())
            }
            Response::Exported(report) => {
                write!(
                    f,
                    "Exported {} books, {} borrowers and {} loans:",
                    report.books, report.borrowers, report.loans
                )?;
                for path in &report.files {
                    write!(f, "\n  {}", path.display())?;
                }
                Ok(())
            }
            Response::Quit => write!(f, "Thank you for using our library!"),
        }
    }
}
