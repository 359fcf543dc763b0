use std::any::Any;
use std::sync::Arc;

use sqlgate_common::{Error, QueryResult, Result};
use sqlgate_parser::TEMPORARY_DATABASE;
use sqlgate_parser::ast::RenameQuery;

use super::super::interpreter::Interpreter;
use crate::context::Context;

pub struct RenameInterpreter {
    query: RenameQuery,
    context: Arc<Context>,
}

impl RenameInterpreter {
    pub fn new(query: RenameQuery, context: Arc<Context>) -> Self {
        Self { query, context }
    }

    pub fn query(&self) -> &RenameQuery {
        &self.query
    }
}

impl Interpreter for RenameInterpreter {
    fn name(&self) -> &'static str {
        "RenameInterpreter"
    }

    /// Pairs are applied in order; a failing pair leaves earlier ones applied.
    fn execute(&mut self) -> Result<QueryResult> {
        let catalog = self.context.catalog();
        for element in &self.query.elements {
            let (from_database, from) = self.context.resolve_table(&element.from, false);
            if from_database == TEMPORARY_DATABASE {
                return Err(Error::unsupported_feature(format!(
                    "Temporary table {} cannot be renamed",
                    from
                )));
            }
            let to_database = element
                .to
                .database
                .clone()
                .unwrap_or_else(|| self.context.current_database());

            catalog.rename_table(&from_database, &from, &to_database, &element.to.table)?;
            log::debug!(
                "renamed {}.{} to {}.{}",
                from_database,
                from,
                to_database,
                element.to.table
            );
        }
        Ok(QueryResult::empty())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
