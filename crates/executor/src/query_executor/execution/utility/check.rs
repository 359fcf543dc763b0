use std::any::Any;
use std::sync::Arc;

use sqlgate_common::{QueryResult, Result, Value};
use sqlgate_parser::ast::CheckQuery;

use super::super::interpreter::Interpreter;
use crate::context::Context;

/// Verifies that every stored row has one value per declared column.
pub struct CheckInterpreter {
    query: CheckQuery,
    context: Arc<Context>,
}

impl CheckInterpreter {
    pub fn new(query: CheckQuery, context: Arc<Context>) -> Self {
        Self { query, context }
    }

    pub fn query(&self) -> &CheckQuery {
        &self.query
    }
}

impl Interpreter for CheckInterpreter {
    fn name(&self) -> &'static str {
        "CheckInterpreter"
    }

    fn execute(&mut self) -> Result<QueryResult> {
        let (database, name) = self.context.resolve_table(&self.query.table, false);
        let intact = self
            .context
            .catalog()
            .with_table(&database, &name, |table| {
                Ok(table.rows.iter().all(|row| row.len() == table.columns.len()))
            })?;
        if !intact {
            log::warn!("CHECK TABLE {}.{} found malformed rows", database, name);
        }
        Ok(QueryResult::single(
            "result",
            "UInt8",
            Value::Int64(i64::from(intact)),
        ))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
