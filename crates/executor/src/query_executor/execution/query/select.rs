use std::any::Any;
use std::sync::Arc;

use sqlgate_common::{ColumnInfo, Error, QueryResult, Result, Value};
use sqlgate_parser::ast::{ColumnDeclaration, SelectItem, SelectQuery};

use super::super::interpreter::{Interpreter, QueryProcessingStage};
use crate::catalog::TableData;
use crate::context::Context;

/// Single SELECT over one table, or over the one-row `dummy` source when
/// there is no FROM clause.
pub struct SelectInterpreter {
    query: SelectQuery,
    context: Arc<Context>,
    required_columns: Vec<String>,
    stage: QueryProcessingStage,
}

impl SelectInterpreter {
    pub fn new(
        query: SelectQuery,
        context: Arc<Context>,
        required_columns: Vec<String>,
        stage: QueryProcessingStage,
    ) -> Self {
        Self {
            query,
            context,
            required_columns,
            stage,
        }
    }

    pub fn query(&self) -> &SelectQuery {
        &self.query
    }

    pub fn required_columns(&self) -> &[String] {
        &self.required_columns
    }

    pub fn processing_stage(&self) -> QueryProcessingStage {
        self.stage
    }

    fn dummy_source() -> TableData {
        let mut table = TableData::new(vec![ColumnDeclaration::new("dummy", "UInt8")], "One");
        table.rows.push(vec![Value::Int64(0)]);
        table
    }

    fn project(&self, source: &TableData) -> Result<QueryResult> {
        enum Projected {
            Column(usize),
            Literal(Value),
        }

        let mut schema = Vec::new();
        let mut projection = Vec::new();
        for item in &self.query.projection {
            match item {
                SelectItem::Wildcard => {
                    for (idx, column) in source.ordinary_columns() {
                        schema.push(ColumnInfo::new(&column.name, &column.data_type));
                        projection.push(Projected::Column(idx));
                    }
                }
                SelectItem::Column { name, alias } => {
                    let idx = source
                        .column_index(name)
                        .ok_or_else(|| Error::UnknownColumn(name.clone()))?;
                    let output = alias.as_ref().unwrap_or(name);
                    schema.push(ColumnInfo::new(output, &source.columns[idx].data_type));
                    projection.push(Projected::Column(idx));
                }
                SelectItem::Literal { value, alias } => {
                    let output = alias.clone().unwrap_or_else(|| value.to_sql_literal());
                    schema.push(ColumnInfo::new(output, literal_type(value)));
                    projection.push(Projected::Literal(value.clone()));
                }
            }
        }

        let limit = self
            .query
            .limit
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(usize::MAX);
        let rows = source
            .rows
            .iter()
            .take(limit)
            .map(|row| {
                projection
                    .iter()
                    .map(|p| match p {
                        Projected::Column(idx) => row.get(*idx).cloned().unwrap_or(Value::Null),
                        Projected::Literal(value) => value.clone(),
                    })
                    .collect()
            })
            .collect();

        Ok(QueryResult::new(schema, rows))
    }
}

fn literal_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "Nullable(Nothing)",
        Value::Bool(_) => "Bool",
        Value::Int64(_) => "Int64",
        Value::Float64(_) => "Float64",
        Value::String(_) => "String",
    }
}

impl Interpreter for SelectInterpreter {
    fn name(&self) -> &'static str {
        "SelectInterpreter"
    }

    fn execute(&mut self) -> Result<QueryResult> {
        match &self.query.from {
            Some(table) => {
                let (database, name) = self.context.resolve_table(table, false);
                self.context
                    .catalog()
                    .with_table(&database, &name, |source| self.project(source))
            }
            None => self.project(&Self::dummy_source()),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use sqlgate_common::Settings;
    use sqlgate_parser::ast::TableName;

    use super::super::super::test_support::{context, run};
    use super::*;

    #[test]
    fn test_select_without_from_returns_one_row() {
        let ctx = context(Settings::default());
        let result = run(&ctx, "SELECT 1 AS one, 'x'").unwrap();
        assert_eq!(result.column_names(), vec!["one", "'x'"]);
        assert_eq!(result.rows, vec![vec![Value::Int64(1), Value::string("x")]]);
        assert_eq!(result.schema[0].data_type, "Int64");
    }

    #[test]
    fn test_wildcard_hides_materialized_columns() {
        let ctx = context(Settings::default());
        run(&ctx, "CREATE TABLE t (a UInt8, m String MATERIALIZED 'z')").unwrap();
        run(&ctx, "INSERT INTO t VALUES (1), (2), (3)").unwrap();

        let result = run(&ctx, "SELECT * FROM t LIMIT 2").unwrap();
        assert_eq!(result.column_names(), vec!["a"]);
        assert_eq!(result.row_count(), 2);

        let result = run(&ctx, "SELECT m FROM t LIMIT 1").unwrap();
        assert_eq!(result.first_value(), Some(&Value::string("z")));
    }

    #[test]
    fn test_unknown_column() {
        let ctx = context(Settings::default());
        run(&ctx, "CREATE TABLE t (a UInt8)").unwrap();
        assert!(matches!(
            run(&ctx, "SELECT b FROM t"),
            Err(Error::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_stage_and_required_columns_are_kept() {
        let ctx = context(Settings::default());
        let query = SelectQuery {
            projection: vec![SelectItem::Wildcard],
            from: Some(TableName::new("t")),
            limit: None,
        };
        let interpreter = SelectInterpreter::new(
            query,
            ctx,
            vec!["a".to_string()],
            QueryProcessingStage::WithMergeableState,
        );
        assert_eq!(
            interpreter.processing_stage(),
            QueryProcessingStage::WithMergeableState
        );
        assert_eq!(interpreter.required_columns(), ["a".to_string()]);
    }
}
