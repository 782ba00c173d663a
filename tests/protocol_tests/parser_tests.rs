//! Parser Tests
//!
//! Tests for turning shell lines into commands.

use std::path::PathBuf;

use shelfdb::protocol::{parse_command, parse_id, tokenize, Command, CommandType};
use shelfdb::ShelfError;

fn invalid_input(line: &str) -> String {
    match parse_command(line) {
        Err(ShelfError::InvalidInput(msg)) => msg,
        other => panic!("Expected InvalidInput for {:?}, got {:?}", line, other),
    }
}

// =============================================================================
// Tokenizer Tests
// =============================================================================

#[test]
fn test_tokenize_whitespace() {
    assert_eq!(
        tokenize("  borrow   3\tAlice ").unwrap(),
        vec!["borrow", "3", "Alice"]
    );
}

#[test]
fn test_tokenize_quotes_group_words() {
    assert_eq!(
        tokenize(r#"add-book "The Hobbit" "J. R. R. Tolkien" 1937"#).unwrap(),
        vec!["add-book", "The Hobbit", "J. R. R. Tolkien", "1937"]
    );
}

#[test]
fn test_tokenize_empty_quotes_is_a_token() {
    assert_eq!(tokenize(r#"search """#).unwrap(), vec!["search", ""]);
}

#[test]
fn test_tokenize_unterminated_quote() {
    assert!(matches!(
        tokenize(r#"search "open"#),
        Err(ShelfError::InvalidInput(_))
    ));
}

#[test]
fn test_parse_id() {
    assert_eq!(parse_id::<u64>("42", "book id").unwrap(), 42);
    assert_eq!(parse_id::<i64>("-7", "borrower id").unwrap(), -7);

    let err = parse_id::<u64>("abc", "book id").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid input: book id must be a number, got 'abc'"
    );
}

// =============================================================================
// Verb Resolution Tests
// =============================================================================

#[test]
fn test_menu_numbers() {
    assert_eq!(parse_command("1").unwrap(), Command::ShowBooks);
    assert_eq!(parse_command("11").unwrap(), Command::Quit);
    assert_eq!(
        parse_command("9 Alice").unwrap(),
        Command::Loans {
            borrower: "Alice".to_string()
        }
    );
}

#[test]
fn test_menu_number_out_of_range() {
    assert!(invalid_input("0").contains("invalid choice"));
    assert!(invalid_input("12").contains("invalid choice"));
}

#[test]
fn test_verbs_are_case_insensitive() {
    assert_eq!(parse_command("BOOKS").unwrap(), Command::ShowBooks);
    assert_eq!(parse_command("Exit").unwrap(), Command::Quit);
}

#[test]
fn test_unknown_verb() {
    assert!(invalid_input("lend 1 Alice").contains("unknown command"));
}

#[test]
fn test_empty_line() {
    assert_eq!(invalid_input("   "), "empty command");
}

#[test]
fn test_every_type_has_a_menu_number() {
    for (i, command_type) in CommandType::ALL.iter().enumerate() {
        assert_eq!(*command_type as u8 as usize, i + 1);
        assert_eq!(CommandType::from_verb(command_type.verb()), Some(*command_type));
    }
}

// =============================================================================
// Argument Tests
// =============================================================================

#[test]
fn test_parse_borrow_with_multi_word_name() {
    let command = parse_command("borrow 3 Mary Ann").unwrap();

    assert_eq!(
        command,
        Command::Borrow {
            book_id: 3,
            borrower: "Mary Ann".to_string()
        }
    );
    assert_eq!(command.command_type(), CommandType::Borrow);
}

#[test]
fn test_parse_return() {
    assert_eq!(
        parse_command(r#"return 1 "Bob""#).unwrap(),
        Command::Return {
            book_id: 1,
            borrower: "Bob".to_string()
        }
    );
}

#[test]
fn test_parse_borrow_bad_id() {
    assert!(invalid_input("borrow one Alice").contains("book id must be a number"));
}

#[test]
fn test_parse_borrow_missing_name() {
    assert_eq!(invalid_input("borrow 3"), "usage: borrow <book-id> <name>");
}

#[test]
fn test_parse_add_book() {
    assert_eq!(
        parse_command(r#"add-book Dune "Frank Herbert" 1965"#).unwrap(),
        Command::AddBook {
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            year: "1965".to_string(),
        }
    );
}

#[test]
fn test_parse_add_book_wrong_arity() {
    assert!(invalid_input("add-book Dune Herbert").starts_with("usage:"));
    assert!(invalid_input("add-book The Hobbit Tolkien 1937").starts_with("usage:"));
}

#[test]
fn test_parse_borrower_commands() {
    assert_eq!(
        parse_command("add-borrower -4 Zoe").unwrap(),
        Command::AddBorrower {
            id: -4,
            name: "Zoe".to_string()
        }
    );
    assert_eq!(
        parse_command("remove-borrower 4").unwrap(),
        Command::RemoveBorrower { id: 4 }
    );
    assert!(invalid_input("remove-borrower").starts_with("usage:"));
}

#[test]
fn test_parse_remove_book() {
    assert_eq!(
        parse_command("remove-book 12").unwrap(),
        Command::RemoveBook { book_id: 12 }
    );
    assert!(invalid_input("remove-book -1").contains("book id must be a number"));
}

#[test]
fn test_parse_search_joins_words() {
    assert_eq!(
        parse_command("search lord of the").unwrap(),
        Command::Search {
            query: "lord of the".to_string()
        }
    );
    assert_eq!(
        parse_command("search").unwrap(),
        Command::Search {
            query: String::new()
        }
    );
}

#[test]
fn test_parse_loans_requires_name() {
    assert!(invalid_input("loans").starts_with("usage:"));
}

#[test]
fn test_parse_export() {
    assert_eq!(
        parse_command("export").unwrap(),
        Command::Export { dir: None }
    );
    assert_eq!(
        parse_command("export /tmp/out").unwrap(),
        Command::Export {
            dir: Some(PathBuf::from("/tmp/out"))
        }
    );
    assert!(invalid_input("export a b").starts_with("usage:"));
}

#[test]
fn test_books_takes_no_arguments() {
    assert!(invalid_input("books all").starts_with("usage:"));
}
