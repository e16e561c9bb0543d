pub mod error;
pub mod value;

use std::collections::HashMap;

use crate::types::value::{ColumnAttribute, Value};

// Common type aliases
pub type BlockId = u32;
pub type RecordId = u16;
pub type Identifier = String;
pub type ColumnNames = Vec<Identifier>;
pub type ColumnAttributes = Vec<ColumnAttribute>;

/// Row identifier handed out by the storage engine: (block id, record id).
pub type Handle = (BlockId, RecordId);

/// A row keyed by column name.
pub type ValueDict = HashMap<Identifier, Value>;

// Block geometry
pub const BLOCK_SIZE: usize = 4096;
pub const PAGE_HEADER_SIZE: usize = 4; // num_records (2 bytes) + end_free (2 bytes)
pub const SLOT_ENTRY_SIZE: usize = 4; // size (2 bytes) + location (2 bytes)
