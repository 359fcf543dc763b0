use std::any::Any;
use std::sync::Arc;

use debug_print::debug_eprintln;
use sqlgate_common::{AccessError, QueryResult, ReadonlyLevel, Result};
use sqlgate_parser::ast::{CreateQuery, CreateTableQuery};

use super::super::interpreter::Interpreter;
use crate::catalog::TableData;
use crate::context::Context;

const DEFAULT_ENGINE: &str = "Memory";

pub struct CreateInterpreter {
    query: CreateQuery,
    context: Arc<Context>,
}

impl CreateInterpreter {
    pub fn new(query: CreateQuery, context: Arc<Context>) -> Self {
        Self { query, context }
    }

    pub fn query(&self) -> &CreateQuery {
        &self.query
    }

    /// Temporary tables may be created under `readonly = 2`; everything else
    /// needs a writable session with DDL allowed.
    fn check_access(&self) -> Result<()> {
        let settings = self.context.settings();
        let readonly = settings.readonly.is_readonly();
        if !readonly && settings.allow_ddl {
            return Ok(());
        }

        match &self.query {
            CreateQuery::Database { .. } => {
                if readonly {
                    return Err(AccessError::readonly_statement(
                        "Cannot create database in readonly mode",
                    )
                    .into());
                }
                Err(AccessError::DdlProhibited.into())
            }
            CreateQuery::Table(create) => {
                if create.is_temporary && settings.readonly == ReadonlyLevel::AllowSettings {
                    return Ok(());
                }
                if readonly {
                    return Err(AccessError::readonly_statement(
                        "Cannot create table in readonly mode",
                    )
                    .into());
                }
                Err(AccessError::DdlProhibited.into())
            }
        }
    }

    fn create_table(&self, create: &CreateTableQuery) -> Result<()> {
        let (database, table) = self.context.resolve_table(&create.table, create.is_temporary);
        let engine = match (&create.engine, create.is_temporary) {
            (_, true) | (None, false) => DEFAULT_ENGINE.to_string(),
            (Some(engine), false) => engine.clone(),
        };
        debug_eprintln!("[executor::create] {}.{} engine={}", database, table, engine);

        self.context.catalog().create_table(
            &database,
            &table,
            TableData::new(create.columns.clone(), engine),
            create.if_not_exists,
        )
    }
}

impl Interpreter for CreateInterpreter {
    fn name(&self) -> &'static str {
        "CreateInterpreter"
    }

    fn execute(&mut self) -> Result<QueryResult> {
        self.check_access()?;

        match &self.query {
            CreateQuery::Database {
                name,
                if_not_exists,
            } => self.context.catalog().create_database(name, *if_not_exists)?,
            CreateQuery::Table(create) => self.create_table(create)?,
        }
        Ok(QueryResult::empty())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
