use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::types::error::Result;

/// Database environment: the directory every heap file lives in.
///
/// One environment is opened by the host process at startup and shared by
/// reference with every table it creates.
#[derive(Debug, Clone)]
pub struct DbEnv {
    dir: PathBuf,
}

impl DbEnv {
    /// Open the environment directory, creating it if necessary.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        info!(dir = %dir.display(), "database environment opened");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve the on-disk file backing the named table.
    pub fn table_path(&self, table_name: &str) -> PathBuf {
        self.dir.join(format!("{}.db", table_name))
    }
}
