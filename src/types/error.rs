use thiserror::Error;

use crate::types::{BlockId, RecordId};

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no room in block {block_id} for {size} more bytes")]
    NoRoom { block_id: BlockId, size: usize },

    #[error("relation error: {reason}")]
    Relation { reason: String },

    #[error("record {record_id} in block {block_id} not found or deleted")]
    RecordNotFound {
        block_id: BlockId,
        record_id: RecordId,
    },

    #[error("invalid block id: {0}")]
    InvalidBlockId(BlockId),

    #[error("invalid block size: expected {expected} bytes, got {actual} bytes")]
    InvalidBlockSize { expected: usize, actual: usize },

    #[error("heap file '{name}' is not open")]
    FileNotOpen { name: String },
}

impl DatabaseError {
    pub fn relation(reason: impl Into<String>) -> Self {
        DatabaseError::Relation {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DatabaseError>;
