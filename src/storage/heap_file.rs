use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::storage::env::DbEnv;
use crate::storage::page::SlottedPage;
use crate::storage::record_file::RecordFile;
use crate::types::error::{DatabaseError, Result};
use crate::types::{BlockId, BLOCK_SIZE};

/// Durable, append-allocated sequence of blocks backing one table.
///
/// Blocks live in `<env>/<name>.db` as fixed-length records keyed by block
/// id. Allocation is monotonic and blocks are never freed.
#[derive(Debug)]
pub struct HeapFile {
    name: String,
    path: PathBuf,
    last: BlockId,
    closed: bool,
    db: Option<RecordFile>,
}

impl HeapFile {
    pub fn new(env: &DbEnv, name: &str) -> Self {
        Self {
            name: name.to_string(),
            path: env.table_path(name),
            last: 0,
            closed: true,
            db: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the physical file. Fails if it already exists. Block 1 is
    /// allocated as an empty page and the file is left open.
    pub fn create(&mut self) -> Result<()> {
        self.db_open(true)?;
        let page = self.get_new()?;
        self.put(&page)?;
        debug!(table = %self.name, "heap file created");
        Ok(())
    }

    /// Close the file and remove it from disk. The object must not be used
    /// afterwards.
    pub fn destroy(&mut self) -> Result<()> {
        self.close()?;
        fs::remove_file(&self.path)?;
        debug!(table = %self.name, "heap file destroyed");
        Ok(())
    }

    /// Open the existing physical file; a no-op when already open. `last`
    /// is learned from the store's record count.
    pub fn open(&mut self) -> Result<()> {
        self.db_open(false)
    }

    /// Release the underlying file handle; a no-op when already closed.
    pub fn close(&mut self) -> Result<()> {
        if let Some(db) = self.db.take() {
            db.sync()?;
            debug!(table = %self.name, "heap file closed");
        }
        self.closed = true;
        Ok(())
    }

    /// Allocate the next block id, persist a freshly initialised page
    /// there, and return a view over the stored image.
    pub fn get_new(&mut self) -> Result<SlottedPage> {
        self.last += 1;
        let block_id = self.last;
        let fresh = SlottedPage::new(vec![0u8; BLOCK_SIZE], block_id, true)?;
        // write the initialised block out and read it back so the store
        // holds the authoritative copy
        let db = self.db_handle()?;
        db.write(block_id, fresh.as_bytes())?;
        let data = db.read(block_id)?;
        debug!(table = %self.name, block_id, "allocated block");
        SlottedPage::new(data, block_id, false)
    }

    /// Read the block with the given id into a page view.
    pub fn get(&mut self, block_id: BlockId) -> Result<SlottedPage> {
        let data = self.db_handle()?.read(block_id)?;
        SlottedPage::new(data, block_id, false)
    }

    /// Write a page back to its block.
    pub fn put(&mut self, page: &SlottedPage) -> Result<()> {
        let block_id = page.block_id();
        self.db_handle()?.write(block_id, page.as_bytes())
    }

    /// All allocated block ids, ascending.
    pub fn block_ids(&self) -> Vec<BlockId> {
        (1..=self.last).collect()
    }

    pub fn get_last_block_id(&self) -> BlockId {
        self.last
    }

    fn db_open(&mut self, create: bool) -> Result<()> {
        if !self.closed {
            return Ok(());
        }
        let db = if create {
            RecordFile::create(&self.path, BLOCK_SIZE)?
        } else {
            RecordFile::open(&self.path, BLOCK_SIZE)?
        };
        self.last = if create { 0 } else { db.record_count()? };
        self.db = Some(db);
        self.closed = false;
        Ok(())
    }

    fn db_handle(&mut self) -> Result<&mut RecordFile> {
        let name = &self.name;
        self.db.as_mut().ok_or_else(|| DatabaseError::FileNotOpen {
            name: name.clone(),
        })
    }
}
