use tracing::debug;

use crate::storage::env::DbEnv;
use crate::storage::heap_file::HeapFile;
use crate::types::error::{DatabaseError, Result};
use crate::types::value::{DataType, Value};
use crate::types::{ColumnAttributes, ColumnNames, Handle, Identifier, ValueDict};

/// Heap storage engine for one relation: a declared column schema over an
/// append-only heap file.
pub struct HeapTable {
    name: Identifier,
    column_names: ColumnNames,
    column_attributes: ColumnAttributes,
    file: HeapFile,
    dropped: bool,
}

impl HeapTable {
    pub fn new(
        env: &DbEnv,
        name: &str,
        column_names: ColumnNames,
        column_attributes: ColumnAttributes,
    ) -> Self {
        Self {
            name: name.to_string(),
            column_names,
            column_attributes,
            file: HeapFile::new(env, name),
            dropped: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_names(&self) -> &[Identifier] {
        &self.column_names
    }

    /// Execute: CREATE TABLE <name>
    pub fn create(&mut self) -> Result<()> {
        self.ensure_not_dropped()?;
        self.file.create()
    }

    /// Execute: CREATE TABLE IF NOT EXISTS <name>
    pub fn create_if_not_exists(&mut self) -> Result<()> {
        self.ensure_not_dropped()?;
        match self.file.open() {
            Ok(()) => Ok(()),
            Err(_) => self.file.create(),
        }
    }

    /// Execute: DROP TABLE <name>. The table object is unusable afterwards.
    pub fn destroy(&mut self) -> Result<()> {
        self.ensure_not_dropped()?;
        self.file.destroy()?;
        self.dropped = true;
        Ok(())
    }

    pub fn open(&mut self) -> Result<()> {
        self.ensure_not_dropped()?;
        self.file.open()
    }

    pub fn close(&mut self) -> Result<()> {
        self.ensure_not_dropped()?;
        self.file.close()
    }

    /// Execute: INSERT INTO <name> (<columns>) VALUES (<values>)
    ///
    /// Returns a handle to the stored row.
    pub fn insert(&mut self, row: &ValueDict) -> Result<Handle> {
        self.ensure_not_dropped()?;
        self.open()?;
        let full_row = self.validate(row)?;
        self.append(&full_row)
    }

    /// Execute: UPDATE <name> SET ... WHERE <handle>. Not implemented yet.
    pub fn update(&mut self, _handle: Handle, _new_values: &ValueDict) -> Result<()> {
        Err(DatabaseError::relation("UPDATE is not implemented yet"))
    }

    /// Execute: DELETE FROM <name> WHERE <handle>. Not implemented yet.
    pub fn delete(&mut self, _handle: Handle) -> Result<()> {
        Err(DatabaseError::relation("DELETE is not implemented yet"))
    }

    /// Conceptually: SELECT <handle> FROM <name> WHERE 1.
    ///
    /// Handles come out in (block id, record id) order.
    pub fn select(&mut self) -> Result<Vec<Handle>> {
        self.ensure_not_dropped()?;
        let mut handles = Vec::new();
        for block_id in self.file.block_ids() {
            let block = self.file.get(block_id)?;
            for record_id in block.ids() {
                handles.push((block_id, record_id));
            }
        }
        Ok(handles)
    }

    /// Same as `select`: predicate evaluation happens in the caller for
    /// now.
    pub fn select_where(&mut self, _where_clause: &ValueDict) -> Result<Vec<Handle>> {
        self.select()
    }

    /// Return every declared column of the row behind `handle`.
    pub fn project(&mut self, handle: Handle) -> Result<ValueDict> {
        self.ensure_not_dropped()?;
        let (block_id, record_id) = handle;
        let block = self.file.get(block_id)?;
        let data = block.get(record_id).ok_or(DatabaseError::RecordNotFound {
            block_id,
            record_id,
        })?;
        self.unmarshal(data)
    }

    /// Projection onto a column subset. Not implemented yet.
    pub fn project_columns(
        &mut self,
        _handle: Handle,
        _column_names: &ColumnNames,
    ) -> Result<ValueDict> {
        Err(DatabaseError::relation(
            "column projection is not implemented yet",
        ))
    }

    /// Check that every declared column is present and build the row that
    /// will be stored. Unknown keys in the input are ignored.
    fn validate(&self, row: &ValueDict) -> Result<ValueDict> {
        let mut full_row = ValueDict::new();
        for column_name in &self.column_names {
            let value = row.get(column_name).ok_or_else(|| {
                DatabaseError::relation("don't know how to handle NULLs, defaults, etc. yet")
            })?;
            full_row.insert(column_name.clone(), value.clone());
        }
        Ok(full_row)
    }

    /// Marshal and add the row to the last block, rolling over to a fresh
    /// block when it no longer fits. A row too large for an empty page
    /// surfaces the second `NoRoom`.
    fn append(&mut self, row: &ValueDict) -> Result<Handle> {
        let data = self.marshal(row)?;
        let mut block = self.file.get(self.file.get_last_block_id())?;
        let record_id = match block.add(&data) {
            Ok(record_id) => record_id,
            Err(DatabaseError::NoRoom { .. }) => {
                debug!(table = %self.name, "block full, rolling over to a new block");
                block = self.file.get_new()?;
                block.add(&data)?
            }
            Err(err) => return Err(err),
        };
        self.file.put(&block)?;
        Ok((self.file.get_last_block_id(), record_id))
    }

    /// Pack the row into its on-disk form, declared columns in order:
    /// INT as 4 little-endian bytes, TEXT as a 2-byte length prefix
    /// followed by the raw bytes (ASCII assumed, not validated).
    fn marshal(&self, row: &ValueDict) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        for (column_name, attribute) in self.column_names.iter().zip(&self.column_attributes) {
            let value = row.get(column_name).ok_or_else(|| {
                DatabaseError::relation(format!("missing value for column '{}'", column_name))
            })?;
            match (attribute.data_type, value) {
                (DataType::Integer, Value::Integer(n)) => {
                    bytes.extend_from_slice(&n.to_le_bytes());
                }
                (DataType::Text, Value::Text(s)) => {
                    if s.len() > u16::MAX as usize {
                        return Err(DatabaseError::relation(format!(
                            "TEXT value for column '{}' exceeds {} bytes",
                            column_name,
                            u16::MAX
                        )));
                    }
                    bytes.extend_from_slice(&(s.len() as u16).to_le_bytes());
                    bytes.extend_from_slice(s.as_bytes());
                }
                (declared, value) => {
                    return Err(DatabaseError::relation(format!(
                        "can't marshal a {:?} value into {:?} column '{}'",
                        value.data_type(),
                        declared,
                        column_name
                    )));
                }
            }
        }
        Ok(bytes)
    }

    /// Mirror of `marshal`: walk the declared columns, advancing a cursor
    /// through the record bytes.
    fn unmarshal(&self, data: &[u8]) -> Result<ValueDict> {
        let mut row = ValueDict::new();
        let mut cursor = 0usize;
        for (column_name, attribute) in self.column_names.iter().zip(&self.column_attributes) {
            match attribute.data_type {
                DataType::Integer => {
                    if cursor + 4 > data.len() {
                        return Err(truncated_record(&self.name, column_name));
                    }
                    let n = i32::from_le_bytes([
                        data[cursor],
                        data[cursor + 1],
                        data[cursor + 2],
                        data[cursor + 3],
                    ]);
                    cursor += 4;
                    row.insert(column_name.clone(), Value::Integer(n));
                }
                DataType::Text => {
                    if cursor + 2 > data.len() {
                        return Err(truncated_record(&self.name, column_name));
                    }
                    let size = u16::from_le_bytes([data[cursor], data[cursor + 1]]) as usize;
                    cursor += 2;
                    if cursor + size > data.len() {
                        return Err(truncated_record(&self.name, column_name));
                    }
                    let text = String::from_utf8_lossy(&data[cursor..cursor + size]).into_owned();
                    cursor += size;
                    row.insert(column_name.clone(), Value::Text(text));
                }
            }
        }
        Ok(row)
    }

    fn ensure_not_dropped(&self) -> Result<()> {
        if self.dropped {
            return Err(DatabaseError::relation(format!(
                "table '{}' has been dropped",
                self.name
            )));
        }
        Ok(())
    }
}

fn truncated_record(table: &str, column: &str) -> DatabaseError {
    DatabaseError::relation(format!(
        "truncated record in table '{}' while reading column '{}'",
        table, column
    ))
}
