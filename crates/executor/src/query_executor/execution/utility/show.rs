use std::any::Any;
use std::sync::Arc;

use regex::Regex;
use sqlgate_common::{ColumnInfo, Error, QueryResult, Result, Value};
use sqlgate_parser::TEMPORARY_DATABASE;
use sqlgate_parser::ast::{
    ShowCreateDatabaseQuery, ShowCreateTableQuery, ShowProcessListQuery, ShowTablesQuery,
};

use super::super::interpreter::Interpreter;
use crate::context::Context;

/// Translates a SQL LIKE pattern (`%`, `_`, `\` escapes) into an anchored regex.
fn like_to_regex(pattern: &str) -> Result<Regex> {
    let mut regex = String::with_capacity(pattern.len() + 8);
    regex.push('^');
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '%' => regex.push_str(".*"),
            '_' => regex.push('.'),
            '\\' => match chars.next() {
                Some(escaped) => regex.push_str(&regex::escape(&escaped.to_string())),
                None => regex.push_str(r"\\"),
            },
            other => regex.push_str(&regex::escape(&other.to_string())),
        }
    }
    regex.push('$');
    Regex::new(&regex).map_err(|e| Error::invalid_query(format!("Invalid LIKE pattern: {}", e)))
}

/// `SHOW TABLES`, `SHOW TEMPORARY TABLES` and `SHOW DATABASES`.
pub struct ShowTablesInterpreter {
    query: ShowTablesQuery,
    context: Arc<Context>,
}

impl ShowTablesInterpreter {
    pub fn new(query: ShowTablesQuery, context: Arc<Context>) -> Self {
        Self { query, context }
    }

    pub fn query(&self) -> &ShowTablesQuery {
        &self.query
    }

    fn names(&self) -> Result<Vec<String>> {
        let catalog = self.context.catalog();
        if self.query.databases {
            return Ok(catalog.database_names());
        }
        if self.query.temporary {
            return catalog.table_names(TEMPORARY_DATABASE);
        }
        let database = self
            .query
            .from
            .clone()
            .unwrap_or_else(|| self.context.current_database());
        catalog.table_names(&database)
    }
}

impl Interpreter for ShowTablesInterpreter {
    fn name(&self) -> &'static str {
        "ShowTablesInterpreter"
    }

    fn execute(&mut self) -> Result<QueryResult> {
        let mut names = self.names()?;
        if let Some(pattern) = &self.query.like {
            let regex = like_to_regex(pattern)?;
            names.retain(|name| regex.is_match(name));
        }
        names.sort();

        Ok(QueryResult::new(
            vec![ColumnInfo::new("name", "String")],
            names.into_iter().map(|n| vec![Value::String(n)]).collect(),
        ))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct ShowCreateTableInterpreter {
    query: ShowCreateTableQuery,
    context: Arc<Context>,
}

impl ShowCreateTableInterpreter {
    pub fn new(query: ShowCreateTableQuery, context: Arc<Context>) -> Self {
        Self { query, context }
    }

    pub fn query(&self) -> &ShowCreateTableQuery {
        &self.query
    }
}

impl Interpreter for ShowCreateTableInterpreter {
    fn name(&self) -> &'static str {
        "ShowCreateTableInterpreter"
    }

    fn execute(&mut self) -> Result<QueryResult> {
        let (database, name) = self
            .context
            .resolve_table(&self.query.table, self.query.temporary);
        let statement = self
            .context
            .catalog()
            .with_table(&database, &name, |table| {
                let columns = table
                    .columns
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                let create = if database == TEMPORARY_DATABASE {
                    format!("CREATE TEMPORARY TABLE {}", name)
                } else {
                    format!("CREATE TABLE {}.{}", database, name)
                };
                Ok(format!("{} ({}) ENGINE = {}", create, columns, table.engine))
            })?;

        Ok(QueryResult::single(
            "statement",
            "String",
            Value::String(statement),
        ))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct ShowCreateDatabaseInterpreter {
    query: ShowCreateDatabaseQuery,
    context: Arc<Context>,
}

impl ShowCreateDatabaseInterpreter {
    pub fn new(query: ShowCreateDatabaseQuery, context: Arc<Context>) -> Self {
        Self { query, context }
    }

    pub fn query(&self) -> &ShowCreateDatabaseQuery {
        &self.query
    }
}

impl Interpreter for ShowCreateDatabaseInterpreter {
    fn name(&self) -> &'static str {
        "ShowCreateDatabaseInterpreter"
    }

    fn execute(&mut self) -> Result<QueryResult> {
        let database = &self.query.database;
        if !self.context.catalog().database_exists(database) {
            return Err(Error::UnknownDatabase(database.clone()));
        }
        Ok(QueryResult::single(
            "statement",
            "String",
            Value::String(format!("CREATE DATABASE {} ENGINE = Memory", database)),
        ))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct ShowProcessListInterpreter {
    context: Arc<Context>,
}

impl ShowProcessListInterpreter {
    pub fn new(_query: ShowProcessListQuery, context: Arc<Context>) -> Self {
        Self { context }
    }
}

impl Interpreter for ShowProcessListInterpreter {
    fn name(&self) -> &'static str {
        "ShowProcessListInterpreter"
    }

    fn execute(&mut self) -> Result<QueryResult> {
        let schema = vec![
            ColumnInfo::new("query_id", "String"),
            ColumnInfo::new("user", "String"),
            ColumnInfo::new("query", "String"),
            ColumnInfo::new("elapsed_ms", "UInt64"),
            ColumnInfo::new("is_cancelled", "UInt8"),
        ];
        let rows = self
            .context
            .process_list()
            .snapshot()
            .into_iter()
            .map(|p| {
                vec![
                    Value::String(p.query_id),
                    Value::String(p.user),
                    Value::String(p.query),
                    Value::Int64(i64::try_from(p.elapsed_ms).unwrap_or(i64::MAX)),
                    Value::Int64(i64::from(p.is_cancelled)),
                ]
            })
            .collect();
        Ok(QueryResult::new(schema, rows))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
