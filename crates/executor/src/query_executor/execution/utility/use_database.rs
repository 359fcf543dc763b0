use std::any::Any;
use std::sync::Arc;

use sqlgate_common::{Error, QueryResult, Result};
use sqlgate_parser::ast::UseQuery;

use super::super::interpreter::Interpreter;
use crate::context::Context;

pub struct UseInterpreter {
    query: UseQuery,
    context: Arc<Context>,
}

impl UseInterpreter {
    pub fn new(query: UseQuery, context: Arc<Context>) -> Self {
        Self { query, context }
    }

    pub fn query(&self) -> &UseQuery {
        &self.query
    }
}

impl Interpreter for UseInterpreter {
    fn name(&self) -> &'static str {
        "UseInterpreter"
    }

    fn execute(&mut self) -> Result<QueryResult> {
        let database = &self.query.database;
        if !self.context.catalog().database_exists(database) {
            return Err(Error::UnknownDatabase(database.clone()));
        }
        self.context.set_current_database(database);
        Ok(QueryResult::empty())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
