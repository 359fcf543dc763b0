use std::any::Any;
use std::sync::Arc;

use sqlgate_common::{Error, QueryResult, Result};
use sqlgate_parser::ast::SelectWithUnionQuery;

use super::super::interpreter::{Interpreter, QueryProcessingStage};
use super::select::SelectInterpreter;
use crate::context::Context;

pub struct SelectWithUnionInterpreter {
    query: SelectWithUnionQuery,
    context: Arc<Context>,
    required_columns: Vec<String>,
    stage: QueryProcessingStage,
}

impl SelectWithUnionInterpreter {
    pub fn new(
        query: SelectWithUnionQuery,
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

    pub fn query(&self) -> &SelectWithUnionQuery {
        &self.query
    }

    pub fn required_columns(&self) -> &[String] {
        &self.required_columns
    }

    pub fn processing_stage(&self) -> QueryProcessingStage {
        self.stage
    }
}

impl Interpreter for SelectWithUnionInterpreter {
    fn name(&self) -> &'static str {
        "SelectWithUnionInterpreter"
    }

    /// UNION ALL: the first branch names the columns, later branches must
    /// match its width and are appended in order.
    fn execute(&mut self) -> Result<QueryResult> {
        let mut combined: Option<QueryResult> = None;

        for select in &self.query.selects {
            let mut branch = SelectInterpreter::new(
                select.clone(),
                Arc::clone(&self.context),
                self.required_columns.clone(),
                self.stage,
            );
            let result = branch.execute()?;

            match combined.as_mut() {
                None => combined = Some(result),
                Some(acc) => {
                    if acc.column_count() != result.column_count() {
                        return Err(Error::invalid_query(format!(
                            "Different number of columns in UNION ALL elements: {} and {}",
                            acc.column_count(),
                            result.column_count()
                        )));
                    }
                    acc.rows.extend(result.rows);
                }
            }
        }

        Ok(combined.unwrap_or_default())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
