//! Shared plumbing for the string-keyed byte tables.

use anyhow::Result;
use redb::{Database, ReadOnlyTable, ReadableDatabase, ReadableTable, Table, TableDefinition};
use std::sync::Arc;

/// Definition of a table mapping string keys to opaque bytes.
pub type RawTable = TableDefinition<'static, &'static str, &'static [u8]>;

type Entry = (String, Vec<u8>);

/// A redb table of opaque values under string keys.
///
/// Implementors name the table and share the database handle. Every call runs
/// in its own transaction; writes commit before returning.
pub trait KeyedTable: Send + Sync {
    const TABLE: RawTable;

    fn db(&self) -> &Arc<Database>;

    /// Run `f` against the table inside a read transaction.
    fn read<T>(
        &self,
        f: impl FnOnce(&ReadOnlyTable<&'static str, &'static [u8]>) -> Result<T>,
    ) -> Result<T> {
        let txn = self.db().begin_read()?;
        let table = txn.open_table(Self::TABLE)?;
        f(&table)
    }

    /// Run `f` against the table inside a write transaction and commit.
    ///
    /// Write transactions are exclusive, so `f` sees no concurrent writer.
    fn write<T>(
        &self,
        f: impl FnOnce(&mut Table<'_, &'static str, &'static [u8]>) -> Result<T>,
    ) -> Result<T> {
        let txn = self.db().begin_write()?;
        let out = {
            let mut table = txn.open_table(Self::TABLE)?;
            f(&mut table)?
        };
        txn.commit()?;
        Ok(out)
    }

    fn put_raw(&self, key: &str, data: &[u8]) -> Result<()> {
        self.write(|table| {
            table.insert(key, data)?;
            Ok(())
        })
    }

    /// Insert only when `key` is vacant. Returns false if it was taken.
    fn insert_new_raw(&self, key: &str, data: &[u8]) -> Result<bool> {
        self.write(|table| {
            if table.get(key)?.is_some() {
                return Ok(false);
            }
            table.insert(key, data)?;
            Ok(true)
        })
    }

    fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.read(|table| Ok(table.get(key)?.map(|value| value.value().to_vec())))
    }

    /// Every entry, in key order.
    fn list_raw(&self) -> Result<Vec<Entry>> {
        self.read(|table| {
            table
                .iter()?
                .map(|item| -> Result<Entry> {
                    let (key, value) = item?;
                    Ok((key.value().to_string(), value.value().to_vec()))
                })
                .collect()
        })
    }

    /// Entries whose key starts with `prefix`, read as a range from `prefix`
    /// up to the first key outside it.
    fn scan_prefix_raw(&self, prefix: &str) -> Result<Vec<Entry>> {
        self.read(|table| {
            let mut out = Vec::new();
            for item in table.range(prefix..)? {
                let (key, value) = item?;
                let key = key.value();
                if !key.starts_with(prefix) {
                    break;
                }
                out.push((key.to_string(), value.value().to_vec()));
            }
            Ok(out)
        })
    }

    /// Remove `key`, reporting whether it was present.
    fn delete(&self, key: &str) -> Result<bool> {
        self.write(|table| Ok(table.remove(key)?.is_some()))
    }
}

/// Declare a struct backed by one [`KeyedTable`].
///
/// The table is created on construction so later read transactions can open
/// it on a fresh database.
#[macro_export]
macro_rules! define_keyed_table {
    ( $(#[$meta:meta])* $vis:vis struct $name:ident { table: $table_name:literal } ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name {
            db: std::sync::Arc<redb::Database>,
        }

        impl $name {
            pub fn new(db: std::sync::Arc<redb::Database>) -> anyhow::Result<Self> {
                let storage = Self { db };
                <Self as $crate::KeyedTable>::write(&storage, |_| Ok(()))?;
                Ok(storage)
            }
        }

        impl $crate::KeyedTable for $name {
            const TABLE: $crate::RawTable = redb::TableDefinition::new($table_name);

            fn db(&self) -> &std::sync::Arc<redb::Database> {
                &self.db
            }
        }
    };
}
