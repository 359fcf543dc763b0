use std::any::Any;
use std::sync::Arc;

use debug_print::debug_eprintln;
use sqlgate_common::{AccessError, Error, QueryResult, ReadonlyLevel, Result, Value};
use sqlgate_parser::TEMPORARY_DATABASE;
use sqlgate_parser::ast::InsertQuery;

use super::super::interpreter::Interpreter;
use crate::catalog::TableData;
use crate::context::Context;

pub struct InsertInterpreter {
    query: InsertQuery,
    context: Arc<Context>,
    allow_materialized: bool,
}

impl InsertInterpreter {
    pub fn new(query: InsertQuery, context: Arc<Context>, allow_materialized: bool) -> Self {
        Self {
            query,
            context,
            allow_materialized,
        }
    }

    pub fn query(&self) -> &InsertQuery {
        &self.query
    }

    /// The `insert_allow_materialized_columns` value captured at dispatch.
    pub fn allow_materialized(&self) -> bool {
        self.allow_materialized
    }

    /// Under `readonly = 2` temporary tables stay writable.
    fn check_access(&self, database: &str) -> Result<()> {
        match self.context.readonly_level() {
            ReadonlyLevel::Disabled => Ok(()),
            ReadonlyLevel::AllowSettings if database == TEMPORARY_DATABASE => Ok(()),
            ReadonlyLevel::AllowSettings | ReadonlyLevel::Absolute => Err(
                AccessError::readonly_statement("Cannot insert into table in readonly mode").into(),
            ),
        }
    }

    /// Positions in the table row that the VALUES tuples fill, in order.
    fn target_columns(&self, table: &TableData) -> Result<Vec<usize>> {
        if self.query.columns.is_empty() {
            return Ok(table
                .columns
                .iter()
                .enumerate()
                .filter(|(_, c)| !c.is_alias() && (self.allow_materialized || !c.is_materialized()))
                .map(|(idx, _)| idx)
                .collect());
        }

        self.query
            .columns
            .iter()
            .map(|name| {
                let idx = table
                    .column_index(name)
                    .ok_or_else(|| Error::UnknownColumn(name.clone()))?;
                let column = &table.columns[idx];
                if column.is_alias() {
                    return Err(Error::invalid_query(format!(
                        "Cannot insert column {}, because it is ALIAS column",
                        name
                    )));
                }
                if column.is_materialized() && !self.allow_materialized {
                    return Err(Error::invalid_query(format!(
                        "Cannot insert column {}, because it is MATERIALIZED column",
                        name
                    )));
                }
                Ok(idx)
            })
            .collect()
    }
}

impl Interpreter for InsertInterpreter {
    fn name(&self) -> &'static str {
        "InsertInterpreter"
    }

    fn execute(&mut self) -> Result<QueryResult> {
        let (database, name) = self.context.resolve_table(&self.query.table, false);
        self.check_access(&database)?;

        let inserted = self
            .context
            .catalog()
            .with_table_mut(&database, &name, |table| {
                let targets = self.target_columns(table)?;
                let defaults: Vec<Value> = table
                    .columns
                    .iter()
                    .map(|c| {
                        c.default
                            .as_ref()
                            .map(|d| d.expression.clone())
                            .unwrap_or(Value::Null)
                    })
                    .collect();

                let mut rows = Vec::with_capacity(self.query.rows.len());
                for values in &self.query.rows {
                    if values.len() != targets.len() {
                        return Err(Error::invalid_query(format!(
                            "Number of columns doesn't match: expected {}, got {}",
                            targets.len(),
                            values.len()
                        )));
                    }
                    let mut row = defaults.clone();
                    for (idx, value) in targets.iter().zip(values) {
                        row[*idx] = value.clone();
                    }
                    rows.push(row);
                }

                let count = rows.len();
                table.rows.extend(rows);
                Ok(count)
            })?;

        debug_eprintln!("[executor::insert] {} row(s) into {}.{}", inserted, database, name);
        Ok(QueryResult::empty())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
