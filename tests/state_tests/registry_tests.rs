//! Tests for the BorrowerRegistry

use shelfdb::state::BorrowerRegistry;
use shelfdb::ShelfError;

#[test]
fn test_add_and_get() {
    let mut registry = BorrowerRegistry::new();
    registry.add(7, "Alice").unwrap();

    let borrower = registry.get(7).unwrap();
    assert_eq!(borrower.id, 7);
    assert_eq!(borrower.name, "Alice");
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_duplicate_id_rejected() {
    let mut registry = BorrowerRegistry::new();
    registry.add(1, "Alice").unwrap();

    let err = registry.add(1, "Bob").unwrap_err();

    assert!(matches!(err, ShelfError::DuplicateKey(1)));
    // Original record is untouched
    assert_eq!(registry.get(1).unwrap().name, "Alice");
}

#[test]
fn test_negative_and_zero_ids_allowed() {
    let mut registry = BorrowerRegistry::new();
    registry.add(-3, "Neg").unwrap();
    registry.add(0, "Zero").unwrap();

    let ids: Vec<_> = registry.list().map(|b| b.id).collect();
    assert_eq!(ids, vec![-3, 0]);
}

#[test]
fn test_lookup_ignores_case() {
    let mut registry = BorrowerRegistry::new();
    registry.add(1, "Alice").unwrap();

    assert_eq!(registry.lookup_by_name("alice").unwrap(), 1);
    assert_eq!(registry.lookup_by_name("ALICE").unwrap(), 1);
}

#[test]
fn test_lookup_duplicate_names_lowest_id_wins() {
    let mut registry = BorrowerRegistry::new();
    registry.add(20, "Sam").unwrap();
    registry.add(5, "sam").unwrap();

    assert_eq!(registry.lookup_by_name("Sam").unwrap(), 5);
}

#[test]
fn test_lookup_unknown_name() {
    let mut registry = BorrowerRegistry::new();
    registry.add(1, "Alice").unwrap();

    let err = registry.lookup_by_name("Zed").unwrap_err();

    assert!(matches!(err, ShelfError::BorrowerNotFound(ref name) if name == "Zed"));
    assert!(err.is_not_found());
}

#[test]
fn test_lookup_is_exact_not_substring() {
    let mut registry = BorrowerRegistry::new();
    registry.add(1, "Alice").unwrap();

    assert!(registry.lookup_by_name("Ali").is_err());
}

#[test]
fn test_remove() {
    let mut registry = BorrowerRegistry::new();
    registry.add(1, "Alice").unwrap();

    let removed = registry.remove(1).unwrap();

    assert_eq!(removed.name, "Alice");
    assert!(registry.is_empty());
    assert!(registry.remove(1).unwrap_err().is_not_found());
}
