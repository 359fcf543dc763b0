use std::any::Any;
use std::sync::Arc;

use sqlgate_common::{AccessError, QueryResult, ReadonlyLevel, Result};
use sqlgate_parser::ast::SetQuery;

use super::super::interpreter::Interpreter;
use crate::context::Context;

pub struct SetInterpreter {
    query: SetQuery,
    context: Arc<Context>,
}

impl SetInterpreter {
    pub fn new(query: SetQuery, context: Arc<Context>) -> Self {
        Self { query, context }
    }

    pub fn query(&self) -> &SetQuery {
        &self.query
    }

    /// Only changes that alter a value are checked. `readonly = 1` forbids
    /// them all; `readonly = 2` forbids touching `readonly` itself.
    fn check_access(&self) -> Result<()> {
        let settings = self.context.settings();
        for (name, value) in &self.query.changes {
            if settings.get(name).as_deref() == Some(value.to_setting_string().as_str()) {
                continue;
            }
            let rejected = match settings.readonly {
                ReadonlyLevel::Disabled => false,
                ReadonlyLevel::Absolute => true,
                ReadonlyLevel::AllowSettings => name == "readonly",
            };
            if rejected {
                return Err(AccessError::readonly_statement(format!(
                    "Cannot modify '{}' setting in readonly mode",
                    name
                ))
                .into());
            }
        }
        Ok(())
    }
}

impl Interpreter for SetInterpreter {
    fn name(&self) -> &'static str {
        "SetInterpreter"
    }

    fn execute(&mut self) -> Result<QueryResult> {
        self.check_access()?;

        let changes = &self.query.changes;
        self.context.update_settings(|settings| {
            for (name, value) in changes {
                settings.set(name, value)?;
            }
            Ok(())
        })?;
        log::debug!("applied {} setting change(s)", changes.len());
        Ok(QueryResult::empty())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
