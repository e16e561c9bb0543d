//! In-process exercise of the storage stack, behind the shell's `test`
//! command.

use crate::storage::env::DbEnv;
use crate::storage::heap_table::HeapTable;
use crate::storage::page::SlottedPage;
use crate::types::error::DatabaseError;
use crate::types::value::{ColumnAttribute, DataType, Value};
use crate::types::{ColumnNames, ValueDict, BLOCK_SIZE};

/// Print the failure reason and report it to the caller.
fn assertion_failure(message: &str) -> bool {
    println!("FAILED TEST: {}", message);
    false
}

/// SlottedPage scenarios: add/get, expanding and contracting put, delete,
/// and the no-room path.
fn test_slotted_page() -> bool {
    let mut page = match SlottedPage::new(vec![0u8; BLOCK_SIZE], 1, true) {
        Ok(page) => page,
        Err(_) => return assertion_failure("construct empty page"),
    };

    let rec1: &[u8] = b"hello\0";
    match page.add(rec1) {
        Ok(1) => {}
        _ => return assertion_failure("add id 1"),
    }
    if page.get(1) != Some(rec1) {
        return assertion_failure("get 1 back");
    }

    let rec2: &[u8] = b"goodbye\0";
    match page.add(rec2) {
        Ok(2) => {}
        _ => return assertion_failure("add id 2"),
    }
    if page.get(2) != Some(rec2) {
        return assertion_failure("get 2 back");
    }

    // put with expansion (and slide and ids)
    let rec1_rev: &[u8] = b"something much bigger\0";
    if page.put(1, rec1_rev).is_err() {
        return assertion_failure("expanding put of 1");
    }
    if page.get(2) != Some(rec2) {
        return assertion_failure("get 2 back after expanding put of 1");
    }
    if page.get(1) != Some(rec1_rev) {
        return assertion_failure("get 1 back after expanding put of 1");
    }

    // put with contraction (and slide and ids)
    if page.put(1, rec1).is_err() {
        return assertion_failure("contracting put of 1");
    }
    if page.get(2) != Some(rec2) {
        return assertion_failure("get 2 back after contracting put of 1");
    }
    if page.get(1) != Some(rec1) {
        return assertion_failure("get 1 back after contracting put of 1");
    }

    // del (and ids)
    if page.ids() != vec![1, 2] {
        return assertion_failure("ids() with 2 records");
    }
    page.del(1);
    if page.ids() != vec![2] {
        return assertion_failure("ids() with 1 record remaining");
    }
    if page.get(1).is_some() {
        return assertion_failure("get of deleted record was not none");
    }

    // try adding something too big
    let too_big = vec![0u8; BLOCK_SIZE - 10];
    match page.add(&too_big) {
        Err(DatabaseError::NoRoom { .. }) => {}
        Ok(_) => return assertion_failure("failed to report no room when add too big"),
        Err(_) => return assertion_failure("wrong error when add too big"),
    }
    true
}

/// Table round-trip: create/drop, create-if-not-exists, insert, select,
/// project, drop.
pub fn test_heap_storage(env: &DbEnv) -> bool {
    let column_names: ColumnNames = vec!["a".to_string(), "b".to_string()];
    let column_attributes = vec![
        ColumnAttribute::new(DataType::Integer),
        ColumnAttribute::new(DataType::Text),
    ];

    let mut table1 = HeapTable::new(
        env,
        "_test_create_drop",
        column_names.clone(),
        column_attributes.clone(),
    );
    if table1.create().is_err() {
        return assertion_failure("create table");
    }
    if table1.destroy().is_err() {
        return assertion_failure("drop table");
    }

    let mut table = HeapTable::new(env, "_test_data", column_names, column_attributes);
    if table.create_if_not_exists().is_err() {
        return assertion_failure("create_if_not_exists");
    }

    let mut row = ValueDict::new();
    row.insert("a".to_string(), Value::Integer(12));
    row.insert("b".to_string(), Value::Text("Hello!".to_string()));
    if table.insert(&row).is_err() {
        return assertion_failure("insert");
    }

    let handles = match table.select() {
        Ok(handles) => handles,
        Err(_) => return assertion_failure("select"),
    };
    if handles.len() != 1 {
        return assertion_failure("select returned one handle");
    }
    let result = match table.project(handles[0]) {
        Ok(result) => result,
        Err(_) => return assertion_failure("project"),
    };
    if result.get("a") != Some(&Value::Integer(12)) {
        return assertion_failure("projected value of a");
    }
    if result.get("b") != Some(&Value::Text("Hello!".to_string())) {
        return assertion_failure("projected value of b");
    }
    if table.destroy().is_err() {
        return assertion_failure("drop table after round-trip");
    }

    test_slotted_page()
}
