use std::any::Any;
use std::sync::Arc;

use sqlgate_common::{Error, QueryResult, Result, Value};
use sqlgate_parser::ast::{AlterCommand, AlterQuery, ColumnDeclaration};

use super::super::interpreter::Interpreter;
use crate::catalog::TableData;
use crate::context::Context;

pub struct AlterInterpreter {
    query: AlterQuery,
    context: Arc<Context>,
}

impl AlterInterpreter {
    pub fn new(query: AlterQuery, context: Arc<Context>) -> Self {
        Self { query, context }
    }

    pub fn query(&self) -> &AlterQuery {
        &self.query
    }

    fn add_column(
        table: &mut TableData,
        column: &ColumnDeclaration,
        if_not_exists: bool,
        after: Option<&str>,
    ) -> Result<()> {
        if table.column_index(&column.name).is_some() {
            if if_not_exists {
                return Ok(());
            }
            return Err(Error::invalid_query(format!(
                "Cannot add column {}: column with this name already exists",
                column.name
            )));
        }

        let position = match after {
            Some(after) => {
                table
                    .column_index(after)
                    .ok_or_else(|| Error::UnknownColumn(after.to_string()))?
                    + 1
            }
            None => table.columns.len(),
        };

        let fill = column
            .default
            .as_ref()
            .map(|d| d.expression.clone())
            .unwrap_or(Value::Null);
        table.columns.insert(position, column.clone());
        for row in &mut table.rows {
            row.insert(position, fill.clone());
        }
        Ok(())
    }

    fn drop_column(table: &mut TableData, name: &str, if_exists: bool) -> Result<()> {
        let Some(position) = table.column_index(name) else {
            if if_exists {
                return Ok(());
            }
            return Err(Error::UnknownColumn(name.to_string()));
        };
        if table.columns.len() == 1 {
            return Err(Error::invalid_query(format!(
                "Cannot drop column {}: a table must keep at least one column",
                name
            )));
        }

        table.columns.remove(position);
        for row in &mut table.rows {
            row.remove(position);
        }
        Ok(())
    }
}

impl Interpreter for AlterInterpreter {
    fn name(&self) -> &'static str {
        "AlterInterpreter"
    }

    fn execute(&mut self) -> Result<QueryResult> {
        let (database, name) = self.context.resolve_table(&self.query.table, false);
        let commands = &self.query.commands;

        // Commands apply to a copy so a failing command leaves the table untouched.
        self.context
            .catalog()
            .with_table_mut(&database, &name, |table| {
                let mut staged = table.clone();
                for command in commands {
                    match command {
                        AlterCommand::AddColumn {
                            column,
                            if_not_exists,
                            after,
                        } => Self::add_column(&mut staged, column, *if_not_exists, after.as_deref())?,
                        AlterCommand::DropColumn { name, if_exists } => {
                            Self::drop_column(&mut staged, name, *if_exists)?
                        }
                    }
                }
                *table = staged;
                Ok(())
            })?;

        Ok(QueryResult::empty())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
