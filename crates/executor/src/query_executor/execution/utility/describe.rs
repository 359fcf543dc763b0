use std::any::Any;
use std::sync::Arc;

use sqlgate_common::{ColumnInfo, QueryResult, Result, Value};
use sqlgate_parser::ast::DescribeQuery;

use super::super::interpreter::Interpreter;
use crate::context::Context;

pub struct DescribeInterpreter {
    query: DescribeQuery,
    context: Arc<Context>,
}

impl DescribeInterpreter {
    pub fn new(query: DescribeQuery, context: Arc<Context>) -> Self {
        Self { query, context }
    }

    pub fn query(&self) -> &DescribeQuery {
        &self.query
    }
}

impl Interpreter for DescribeInterpreter {
    fn name(&self) -> &'static str {
        "DescribeInterpreter"
    }

    fn execute(&mut self) -> Result<QueryResult> {
        let (database, name) = self.context.resolve_table(&self.query.table, false);
        let schema = vec![
            ColumnInfo::new("name", "String"),
            ColumnInfo::new("type", "String"),
            ColumnInfo::new("default_type", "String"),
            ColumnInfo::new("default_expression", "String"),
        ];

        self.context
            .catalog()
            .with_table(&database, &name, |table| {
                let rows = table
                    .columns
                    .iter()
                    .map(|column| {
                        let (default_type, default_expression) = match &column.default {
                            Some(default) => (
                                default.kind.as_str().to_string(),
                                default.expression.to_sql_literal(),
                            ),
                            None => (String::new(), String::new()),
                        };
                        vec![
                            Value::String(column.name.clone()),
                            Value::String(column.data_type.clone()),
                            Value::String(default_type),
                            Value::String(default_expression),
                        ]
                    })
                    .collect();
                Ok(QueryResult::new(schema, rows))
            })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
