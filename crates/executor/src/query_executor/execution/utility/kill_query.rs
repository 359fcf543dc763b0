use std::any::Any;
use std::sync::Arc;

use sqlgate_common::{ColumnInfo, QueryResult, Result, Value};
use sqlgate_parser::ast::{KillFilterColumn, KillQueryQuery};

use super::super::interpreter::Interpreter;
use crate::context::Context;

pub struct KillQueryInterpreter {
    query: KillQueryQuery,
    context: Arc<Context>,
}

impl KillQueryInterpreter {
    pub fn new(query: KillQueryQuery, context: Arc<Context>) -> Self {
        Self { query, context }
    }

    pub fn query(&self) -> &KillQueryQuery {
        &self.query
    }

    /// Execution is synchronous, so a SYNC kill is already complete once marked.
    fn status(&self) -> &'static str {
        if self.query.test {
            "pending"
        } else if self.query.sync {
            "finished"
        } else {
            "waiting"
        }
    }
}

impl Interpreter for KillQueryInterpreter {
    fn name(&self) -> &'static str {
        "KillQueryInterpreter"
    }

    fn execute(&mut self) -> Result<QueryResult> {
        let matched = self.context.process_list().cancel_where(
            self.query.column,
            &self.query.value,
            self.query.test,
        );

        let column = match self.query.column {
            KillFilterColumn::QueryId => "query_id",
            KillFilterColumn::User => "user",
        };
        log::info!(
            "KILL QUERY WHERE {} = '{}' matched {} query(ies){}",
            column,
            self.query.value,
            matched.len(),
            if self.query.test { " (test)" } else { "" }
        );

        let status = self.status();
        let schema = vec![
            ColumnInfo::new("kill_status", "String"),
            ColumnInfo::new("query_id", "String"),
            ColumnInfo::new("user", "String"),
            ColumnInfo::new("query", "String"),
        ];
        let rows = matched
            .into_iter()
            .map(|p| {
                vec![
                    Value::string(status),
                    Value::String(p.query_id),
                    Value::String(p.user),
                    Value::String(p.query),
                ]
            })
            .collect();
        Ok(QueryResult::new(schema, rows))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
