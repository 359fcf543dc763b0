use std::any::Any;
use std::sync::Arc;

use sqlgate_common::{QueryResult, Result, Value};
use sqlgate_parser::ast::OptimizeQuery;

use super::super::interpreter::Interpreter;
use crate::context::Context;

/// In-memory tables have no parts to merge; DEDUPLICATE drops repeated rows.
pub struct OptimizeInterpreter {
    query: OptimizeQuery,
    context: Arc<Context>,
}

impl OptimizeInterpreter {
    pub fn new(query: OptimizeQuery, context: Arc<Context>) -> Self {
        Self { query, context }
    }

    pub fn query(&self) -> &OptimizeQuery {
        &self.query
    }
}

impl Interpreter for OptimizeInterpreter {
    fn name(&self) -> &'static str {
        "OptimizeInterpreter"
    }

    fn execute(&mut self) -> Result<QueryResult> {
        let (database, name) = self.context.resolve_table(&self.query.table, false);
        let deduplicate = self.query.deduplicate;

        let removed = self
            .context
            .catalog()
            .with_table_mut(&database, &name, |table| {
                if !deduplicate {
                    return Ok(0);
                }
                let before = table.rows.len();
                let mut kept: Vec<Vec<Value>> = Vec::with_capacity(before);
                for row in table.rows.drain(..) {
                    if !kept.contains(&row) {
                        kept.push(row);
                    }
                }
                table.rows = kept;
                Ok(before - table.rows.len())
            })?;

        log::debug!(
            "optimized {}.{} (partition={:?}, final={}, removed {} duplicate row(s))",
            database,
            name,
            self.query.partition,
            self.query.is_final,
            removed
        );
        Ok(QueryResult::empty())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
