//! In-memory catalog for storing databases, table metadata and data.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;
use sqlgate_common::{Error, Result, Value};
use sqlgate_parser::TEMPORARY_DATABASE;
use sqlgate_parser::ast::ColumnDeclaration;

pub const DEFAULT_DATABASE: &str = "default";

#[derive(Debug, Clone, PartialEq)]
pub struct TableData {
    pub columns: Vec<ColumnDeclaration>,
    pub rows: Vec<Vec<Value>>,
    pub engine: String,
}

impl TableData {
    pub fn new(columns: Vec<ColumnDeclaration>, engine: impl Into<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            engine: engine.into(),
        }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Columns a `SELECT *` returns: materialized and alias columns are hidden.
    pub fn ordinary_columns(&self) -> impl Iterator<Item = (usize, &ColumnDeclaration)> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_materialized() && !c.is_alias())
    }
}

type Databases = IndexMap<String, IndexMap<String, TableData>>;

#[derive(Debug)]
pub struct Catalog {
    databases: RwLock<Databases>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    /// Starts with the `default` database and the hidden temporary-table database.
    pub fn new() -> Self {
        let mut databases = IndexMap::new();
        databases.insert(DEFAULT_DATABASE.to_string(), IndexMap::new());
        databases.insert(TEMPORARY_DATABASE.to_string(), IndexMap::new());
        Self {
            databases: RwLock::new(databases),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Databases> {
        self.databases.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Databases> {
        self.databases.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn create_database(&self, name: &str, if_not_exists: bool) -> Result<()> {
        let mut databases = self.write();
        if databases.contains_key(name) {
            if if_not_exists {
                return Ok(());
            }
            return Err(Error::DatabaseAlreadyExists(name.to_string()));
        }
        databases.insert(name.to_string(), IndexMap::new());
        Ok(())
    }

    /// Returns `false` when the database was absent and `if_exists` was set.
    pub fn drop_database(&self, name: &str, if_exists: bool) -> Result<bool> {
        if name == TEMPORARY_DATABASE {
            return Err(Error::invalid_query(format!(
                "Database {} cannot be dropped",
                name
            )));
        }
        let mut databases = self.write();
        if databases.shift_remove(name).is_some() {
            return Ok(true);
        }
        if if_exists {
            return Ok(false);
        }
        Err(Error::UnknownDatabase(name.to_string()))
    }

    pub fn database_exists(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// User-visible databases, in creation order.
    pub fn database_names(&self) -> Vec<String> {
        self.read()
            .keys()
            .filter(|name| name.as_str() != TEMPORARY_DATABASE)
            .cloned()
            .collect()
    }

    pub fn create_table(
        &self,
        database: &str,
        name: &str,
        table: TableData,
        if_not_exists: bool,
    ) -> Result<()> {
        let mut databases = self.write();
        let tables = databases
            .get_mut(database)
            .ok_or_else(|| Error::UnknownDatabase(database.to_string()))?;
        if tables.contains_key(name) {
            if if_not_exists {
                return Ok(());
            }
            return Err(Error::TableAlreadyExists(format!("{}.{}", database, name)));
        }
        tables.insert(name.to_string(), table);
        Ok(())
    }

    /// Returns `false` when the table was absent and `if_exists` was set.
    pub fn drop_table(&self, database: &str, name: &str, if_exists: bool) -> Result<bool> {
        let mut databases = self.write();
        let tables = match databases.get_mut(database) {
            Some(tables) => tables,
            None if if_exists => return Ok(false),
            None => return Err(Error::UnknownDatabase(database.to_string())),
        };
        if tables.shift_remove(name).is_some() {
            return Ok(true);
        }
        if if_exists {
            return Ok(false);
        }
        Err(Error::UnknownTable(format!("{}.{}", database, name)))
    }

    pub fn table_exists(&self, database: &str, name: &str) -> bool {
        self.read()
            .get(database)
            .is_some_and(|tables| tables.contains_key(name))
    }

    /// A copy of the table's metadata and rows.
    pub fn table(&self, database: &str, name: &str) -> Result<TableData> {
        self.with_table(database, name, |table| Ok(table.clone()))
    }

    pub fn with_table<R>(
        &self,
        database: &str,
        name: &str,
        f: impl FnOnce(&TableData) -> Result<R>,
    ) -> Result<R> {
        let databases = self.read();
        let tables = databases
            .get(database)
            .ok_or_else(|| Error::UnknownDatabase(database.to_string()))?;
        let table = tables
            .get(name)
            .ok_or_else(|| Error::UnknownTable(format!("{}.{}", database, name)))?;
        f(table)
    }

    pub fn with_table_mut<R>(
        &self,
        database: &str,
        name: &str,
        f: impl FnOnce(&mut TableData) -> Result<R>,
    ) -> Result<R> {
        let mut databases = self.write();
        let tables = databases
            .get_mut(database)
            .ok_or_else(|| Error::UnknownDatabase(database.to_string()))?;
        let table = tables
            .get_mut(name)
            .ok_or_else(|| Error::UnknownTable(format!("{}.{}", database, name)))?;
        f(table)
    }

    pub fn table_names(&self, database: &str) -> Result<Vec<String>> {
        let databases = self.read();
        let tables = databases
            .get(database)
            .ok_or_else(|| Error::UnknownDatabase(database.to_string()))?;
        Ok(tables.keys().cloned().collect())
    }

    /// Moves a table, possibly across databases. The target must not exist.
    pub fn rename_table(
        &self,
        from_database: &str,
        from: &str,
        to_database: &str,
        to: &str,
    ) -> Result<()> {
        let mut databases = self.write();

        if !databases.contains_key(to_database) {
            return Err(Error::UnknownDatabase(to_database.to_string()));
        }
        if databases
            .get(to_database)
            .is_some_and(|tables| tables.contains_key(to))
        {
            return Err(Error::TableAlreadyExists(format!("{}.{}", to_database, to)));
        }

        let table = databases
            .get_mut(from_database)
            .ok_or_else(|| Error::UnknownDatabase(from_database.to_string()))?
            .shift_remove(from)
            .ok_or_else(|| Error::UnknownTable(format!("{}.{}", from_database, from)))?;

        if let Some(tables) = databases.get_mut(to_database) {
            tables.insert(to.to_string(), table);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str]) -> TableData {
        TableData::new(
            columns
                .iter()
                .map(|c| ColumnDeclaration::new(*c, "String"))
                .collect(),
            "Memory",
        )
    }

    #[test]
    fn test_new_catalog_hides_temporary_database() {
        let catalog = Catalog::new();
        assert_eq!(catalog.database_names(), vec![DEFAULT_DATABASE.to_string()]);
        assert!(catalog.database_exists(TEMPORARY_DATABASE));
    }

    #[test]
    fn test_create_table_twice() {
        let catalog = Catalog::new();
        catalog
            .create_table("default", "t", table(&["a"]), false)
            .unwrap();
        assert!(catalog
            .create_table("default", "t", table(&["a"]), true)
            .is_ok());
        match catalog.create_table("default", "t", table(&["a"]), false) {
            Err(Error::TableAlreadyExists(name)) => assert_eq!(name, "default.t"),
            other => panic!("Expected TableAlreadyExists, got {:?}", other),
        }
    }

    #[test]
    fn test_drop_missing_table() {
        let catalog = Catalog::new();
        assert!(!catalog.drop_table("default", "missing", true).unwrap());
        assert!(matches!(
            catalog.drop_table("default", "missing", false),
            Err(Error::UnknownTable(_))
        ));
        assert!(!catalog.drop_table("nowhere", "missing", true).unwrap());
    }

    #[test]
    fn test_rename_across_databases() {
        let catalog = Catalog::new();
        catalog.create_database("archive", false).unwrap();
        catalog
            .create_table("default", "events", table(&["a"]), false)
            .unwrap();
        catalog
            .rename_table("default", "events", "archive", "events_2024")
            .unwrap();
        assert!(!catalog.table_exists("default", "events"));
        assert!(catalog.table_exists("archive", "events_2024"));
    }

    #[test]
    fn test_rename_onto_existing_table_fails() {
        let catalog = Catalog::new();
        catalog.create_table("default", "a", table(&["x"]), false).unwrap();
        catalog.create_table("default", "b", table(&["x"]), false).unwrap();
        assert!(matches!(
            catalog.rename_table("default", "a", "default", "b"),
            Err(Error::TableAlreadyExists(_))
        ));
        assert!(catalog.table_exists("default", "a"));
    }

    #[test]
    fn test_temporary_database_cannot_be_dropped() {
        let catalog = Catalog::new();
        assert!(catalog.drop_database(TEMPORARY_DATABASE, false).is_err());
    }
}
