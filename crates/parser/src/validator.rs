use std::collections::HashSet;

use sqlgate_common::{Error, Result};

use crate::ast::{
    AlterCommand, CreateQuery, DropTarget, SelectWithUnionQuery, Statement, TableName,
};

/// Structural checks that need no catalog access.
pub struct StatementValidator;

impl StatementValidator {
    pub fn validate(stmt: &Statement) -> Result<()> {
        match stmt {
            Statement::Select(select) => {
                if select.projection.is_empty() {
                    return Err(Error::invalid_query("SELECT requires a projection"));
                }
                if let Some(table) = &select.from {
                    Self::validate_table_name(table)?;
                }
                Ok(())
            }
            Statement::SelectWithUnion(union) => Self::validate_union(union),
            Statement::Insert(insert) => {
                Self::validate_table_name(&insert.table)?;
                Self::validate_unique(insert.columns.iter().map(String::as_str), "INSERT")?;
                if insert.rows.is_empty() {
                    return Err(Error::invalid_query("INSERT requires at least one row"));
                }
                for row in &insert.rows {
                    if !insert.columns.is_empty() && row.len() != insert.columns.len() {
                        return Err(Error::invalid_query(format!(
                            "INSERT lists {} column(s) but a row has {} value(s)",
                            insert.columns.len(),
                            row.len()
                        )));
                    }
                }
                Ok(())
            }
            Statement::Create(CreateQuery::Database { name, .. }) => {
                Self::validate_name(name, "database")
            }
            Statement::Create(CreateQuery::Table(create)) => {
                Self::validate_table_name(&create.table)?;
                if create.is_temporary && create.table.database.is_some() {
                    return Err(Error::invalid_query(
                        "Temporary tables cannot be inside a database",
                    ));
                }
                Self::validate_unique(create.columns.iter().map(|c| c.name.as_str()), "CREATE")
            }
            Statement::Drop(drop) => match &drop.target {
                DropTarget::Database(name) => Self::validate_name(name, "database"),
                DropTarget::Table(table) => Self::validate_table_name(table),
            },
            Statement::Rename(rename) => {
                if rename.elements.is_empty() {
                    return Err(Error::invalid_query("RENAME requires at least one table"));
                }
                for element in &rename.elements {
                    Self::validate_table_name(&element.from)?;
                    Self::validate_table_name(&element.to)?;
                }
                Ok(())
            }
            Statement::Set(set) => {
                if set.changes.is_empty() {
                    return Err(Error::invalid_query("SET requires at least one change"));
                }
                Ok(())
            }
            Statement::Alter(alter) => {
                Self::validate_table_name(&alter.table)?;
                if alter.commands.is_empty() {
                    return Err(Error::invalid_query("ALTER requires at least one command"));
                }
                let added = alter.commands.iter().filter_map(|c| match c {
                    AlterCommand::AddColumn { column, .. } => Some(column.name.as_str()),
                    AlterCommand::DropColumn { .. } => None,
                });
                Self::validate_unique(added, "ALTER")
            }
            Statement::Use(use_query) => Self::validate_name(&use_query.database, "database"),
            Statement::ShowCreateDatabase(q) => Self::validate_name(&q.database, "database"),
            Statement::Optimize(q) => Self::validate_table_name(&q.table),
            Statement::Exists(q) => Self::validate_table_name(&q.table),
            Statement::ShowCreateTable(q) => Self::validate_table_name(&q.table),
            Statement::Describe(q) => Self::validate_table_name(&q.table),
            Statement::Check(q) => Self::validate_table_name(&q.table),
            Statement::ShowTables(_)
            | Statement::ShowProcessList(_)
            | Statement::KillQuery(_)
            | Statement::System(_)
            | Statement::Extension(_) => Ok(()),
        }
    }

    fn validate_union(union: &SelectWithUnionQuery) -> Result<()> {
        if union.selects.is_empty() {
            return Err(Error::invalid_query("SELECT requires at least one branch"));
        }
        for select in &union.selects {
            Self::validate(&Statement::Select(select.clone()))?;
        }
        Ok(())
    }

    fn validate_table_name(table: &TableName) -> Result<()> {
        if let Some(database) = &table.database {
            Self::validate_name(database, "database")?;
        }
        Self::validate_name(&table.table, "table")
    }

    fn validate_name(name: &str, object_type: &str) -> Result<()> {
        if name.is_empty() {
            return Err(Error::invalid_query(format!(
                "The {} name cannot be empty",
                object_type
            )));
        }
        Ok(())
    }

    fn validate_unique<'a>(names: impl Iterator<Item = &'a str>, statement: &str) -> Result<()> {
        let mut seen = HashSet::new();
        for name in names {
            if !seen.insert(name) {
                return Err(Error::invalid_query(format!(
                    "Column {} is specified more than once in {}",
                    name, statement
                )));
            }
        }
        Ok(())
    }
}
