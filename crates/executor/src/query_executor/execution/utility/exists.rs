use std::any::Any;
use std::sync::Arc;

use sqlgate_common::{QueryResult, Result, Value};
use sqlgate_parser::ast::ExistsQuery;

use super::super::interpreter::Interpreter;
use crate::context::Context;

pub struct ExistsInterpreter {
    query: ExistsQuery,
    context: Arc<Context>,
}

impl ExistsInterpreter {
    pub fn new(query: ExistsQuery, context: Arc<Context>) -> Self {
        Self { query, context }
    }

    pub fn query(&self) -> &ExistsQuery {
        &self.query
    }
}

impl Interpreter for ExistsInterpreter {
    fn name(&self) -> &'static str {
        "ExistsInterpreter"
    }

    fn execute(&mut self) -> Result<QueryResult> {
        let (database, name) = self
            .context
            .resolve_table(&self.query.table, self.query.temporary);
        let exists = self.context.catalog().table_exists(&database, &name);
        Ok(QueryResult::single(
            "result",
            "UInt8",
            Value::Int64(i64::from(exists)),
        ))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
