use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::types::error::{DatabaseError, Result};

/// Fixed-length record file keyed by 1-based record numbers.
///
/// Record `i` occupies bytes `(i - 1) * record_len .. i * record_len`.
/// Record number 0 is reserved and never stored.
#[derive(Debug)]
pub struct RecordFile {
    path: PathBuf,
    file: File,
    record_len: usize,
}

impl RecordFile {
    /// Create a new record file. Fails if the path already exists.
    pub fn create<P: AsRef<Path>>(path: P, record_len: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(&path)?;
        Ok(Self {
            path,
            file,
            record_len,
        })
    }

    /// Open an existing record file.
    pub fn open<P: AsRef<Path>>(path: P, record_len: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().read(true).write(true).open(&path)?;
        Ok(Self {
            path,
            file,
            record_len,
        })
    }

    /// Read the record at `recno` into a fresh buffer.
    pub fn read(&mut self, recno: u32) -> Result<Vec<u8>> {
        let offset = self.offset_of(recno)?;
        let mut buffer = vec![0u8; self.record_len];
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    /// Write `data` (exactly one record long) at `recno`.
    pub fn write(&mut self, recno: u32, data: &[u8]) -> Result<()> {
        if data.len() != self.record_len {
            return Err(DatabaseError::InvalidBlockSize {
                expected: self.record_len,
                actual: data.len(),
            });
        }
        let offset = self.offset_of(recno)?;
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(data)?;
        self.file.flush()?;
        Ok(())
    }

    /// Number of whole records currently in the file.
    pub fn record_count(&self) -> Result<u32> {
        let len = self.file.metadata()?.len();
        Ok((len / self.record_len as u64) as u32)
    }

    pub fn sync(&self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn offset_of(&self, recno: u32) -> Result<u64> {
        if recno == 0 {
            return Err(DatabaseError::InvalidBlockId(recno));
        }
        Ok((recno as u64 - 1) * self.record_len as u64)
    }
}
