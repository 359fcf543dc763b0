use std::any::Any;
use std::sync::Arc;

use sqlgate_common::{AccessError, Error, QueryResult, ReadonlyLevel, Result};
use sqlgate_parser::ast::{DropKind, DropQuery, DropTarget, TableName};

use super::super::interpreter::Interpreter;
use crate::context::Context;

/// DROP, DETACH and TRUNCATE of databases and tables.
pub struct DropInterpreter {
    query: DropQuery,
    context: Arc<Context>,
}

impl DropInterpreter {
    pub fn new(query: DropQuery, context: Arc<Context>) -> Self {
        Self { query, context }
    }

    pub fn query(&self) -> &DropQuery {
        &self.query
    }

    fn verb(&self) -> &'static str {
        match self.query.kind {
            DropKind::Drop => "drop",
            DropKind::Detach => "detach",
            DropKind::Truncate => "truncate",
        }
    }

    fn check_access(&self) -> Result<()> {
        let settings = self.context.settings();
        let readonly = settings.readonly.is_readonly();
        if !readonly && settings.allow_ddl {
            return Ok(());
        }

        let object = match &self.query.target {
            DropTarget::Database(_) => "database",
            DropTarget::Table(_) => "table",
        };
        let temporary_allowed = matches!(self.query.target, DropTarget::Table(_))
            && self.query.is_temporary
            && self.query.kind != DropKind::Detach
            && settings.readonly == ReadonlyLevel::AllowSettings;
        if temporary_allowed {
            return Ok(());
        }

        if readonly {
            return Err(AccessError::readonly_statement(format!(
                "Cannot {} {} in readonly mode",
                self.verb(),
                object
            ))
            .into());
        }
        Err(AccessError::DdlProhibited.into())
    }

    fn drop_database(&self, name: &str) -> Result<()> {
        if self.context.catalog().drop_database(name, self.query.if_exists)? {
            log::debug!("{} database {}", self.verb(), name);
        }
        Ok(())
    }

    fn drop_table(&self, table: &TableName) -> Result<()> {
        let (database, name) = self.context.resolve_table(table, self.query.is_temporary);
        let catalog = self.context.catalog();

        match self.query.kind {
            DropKind::Drop | DropKind::Detach => {
                catalog.drop_table(&database, &name, self.query.if_exists)?;
            }
            DropKind::Truncate => {
                let result = catalog.with_table_mut(&database, &name, |data| {
                    data.rows.clear();
                    Ok(())
                });
                match result {
                    Err(Error::UnknownTable(_) | Error::UnknownDatabase(_))
                        if self.query.if_exists => {}
                    other => other?,
                }
            }
        }
        Ok(())
    }
}

impl Interpreter for DropInterpreter {
    fn name(&self) -> &'static str {
        "DropInterpreter"
    }

    fn execute(&mut self) -> Result<QueryResult> {
        self.check_access()?;

        match &self.query.target {
            DropTarget::Database(name) => self.drop_database(name)?,
            DropTarget::Table(table) => self.drop_table(table)?,
        }
        Ok(QueryResult::empty())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
