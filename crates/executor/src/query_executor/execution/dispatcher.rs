use std::sync::Arc;

use debug_print::debug_eprintln;
use sqlgate_common::{Error, Result};
use sqlgate_parser::{Parser, Statement, StatementKind};

use super::access::check_access;
use super::ddl::{AlterInterpreter, CreateInterpreter, DropInterpreter, RenameInterpreter};
use super::dml::InsertInterpreter;
use super::interpreter::{Interpreter, QueryProcessingStage};
use super::query::{SelectInterpreter, SelectWithUnionInterpreter};
use super::utility::{
    CheckInterpreter, DescribeInterpreter, ExistsInterpreter, KillQueryInterpreter,
    OptimizeInterpreter, SetInterpreter, ShowCreateDatabaseInterpreter,
    ShowCreateTableInterpreter, ShowProcessListInterpreter, ShowTablesInterpreter,
    SystemInterpreter, UseInterpreter,
};
use crate::context::Context;
use crate::profile_events::ProfileEvent;

/// Who enforces read-only / DDL restrictions for a statement kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    /// Dispatch runs [`check_access`] before constructing the handler.
    Gated,
    /// The handler runs its own statement-aware check when executed.
    SelfGated,
    Ungated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchEntry {
    pub policy: AccessPolicy,
    /// Counted on successful construction, in addition to `Query`.
    pub event: Option<ProfileEvent>,
}

impl DispatchEntry {
    const fn new(policy: AccessPolicy, event: Option<ProfileEvent>) -> Self {
        Self { policy, event }
    }
}

pub fn dispatch_entry(kind: StatementKind) -> DispatchEntry {
    use AccessPolicy::{Gated, SelfGated, Ungated};

    match kind {
        StatementKind::Rename
        | StatementKind::Optimize
        | StatementKind::Alter
        | StatementKind::System => DispatchEntry::new(Gated, None),

        StatementKind::Insert => DispatchEntry::new(SelfGated, Some(ProfileEvent::InsertQuery)),
        StatementKind::Create | StatementKind::Drop | StatementKind::Set => {
            DispatchEntry::new(SelfGated, None)
        }

        StatementKind::SelectWithUnion => {
            DispatchEntry::new(Ungated, Some(ProfileEvent::SelectQuery))
        }
        StatementKind::Select
        | StatementKind::ShowTables
        | StatementKind::Use
        | StatementKind::Exists
        | StatementKind::ShowCreateTable
        | StatementKind::ShowCreateDatabase
        | StatementKind::Describe
        | StatementKind::ShowProcessList
        | StatementKind::Check
        | StatementKind::KillQuery => DispatchEntry::new(Ungated, None),
    }
}

/// Builds the handler for one parsed statement.
pub struct InterpreterFactory;

impl InterpreterFactory {
    pub fn get(
        statement: &Statement,
        context: &Arc<Context>,
        stage: QueryProcessingStage,
    ) -> Result<Box<dyn Interpreter>> {
        context.profile_events().increment(ProfileEvent::Query);

        let Some(kind) = statement.kind() else {
            let label = statement.id();
            log::error!("Unknown type of query: {}", label);
            return Err(Error::unrecognized_statement(label));
        };

        let entry = dispatch_entry(kind);
        debug_eprintln!("[dispatcher] {} -> {:?}", kind, entry);

        if entry.policy == AccessPolicy::Gated {
            if let Err(denied) = check_access(context) {
                log::warn!("{} rejected: {}", kind, denied);
                return Err(denied.into());
            }
        }

        let interpreter = Self::build(statement, context, stage)?;
        if let Some(event) = entry.event {
            context.profile_events().increment(event);
        }
        log::debug!("dispatched {} to {}", kind, interpreter.name());
        Ok(interpreter)
    }

    fn build(
        statement: &Statement,
        context: &Arc<Context>,
        stage: QueryProcessingStage,
    ) -> Result<Box<dyn Interpreter>> {
        let ctx = Arc::clone(context);
        let interpreter: Box<dyn Interpreter> = match statement {
            Statement::Select(q) => {
                Box::new(SelectInterpreter::new(q.clone(), ctx, Vec::new(), stage))
            }
            Statement::SelectWithUnion(q) => Box::new(SelectWithUnionInterpreter::new(
                q.clone(),
                ctx,
                Vec::new(),
                stage,
            )),
            Statement::Insert(q) => {
                let allow_materialized = context.insert_allow_materialized_columns();
                Box::new(InsertInterpreter::new(q.clone(), ctx, allow_materialized))
            }
            Statement::Create(q) => Box::new(CreateInterpreter::new(q.clone(), ctx)),
            Statement::Drop(q) => Box::new(DropInterpreter::new(q.clone(), ctx)),
            Statement::Rename(q) => Box::new(RenameInterpreter::new(q.clone(), ctx)),
            Statement::ShowTables(q) => Box::new(ShowTablesInterpreter::new(q.clone(), ctx)),
            Statement::Use(q) => Box::new(UseInterpreter::new(q.clone(), ctx)),
            Statement::Set(q) => Box::new(SetInterpreter::new(q.clone(), ctx)),
            Statement::Optimize(q) => Box::new(OptimizeInterpreter::new(q.clone(), ctx)),
            Statement::Exists(q) => Box::new(ExistsInterpreter::new(q.clone(), ctx)),
            Statement::ShowCreateTable(q) => {
                Box::new(ShowCreateTableInterpreter::new(q.clone(), ctx))
            }
            Statement::ShowCreateDatabase(q) => {
                Box::new(ShowCreateDatabaseInterpreter::new(q.clone(), ctx))
            }
            Statement::Describe(q) => Box::new(DescribeInterpreter::new(q.clone(), ctx)),
            Statement::ShowProcessList(q) => Box::new(ShowProcessListInterpreter::new(*q, ctx)),
            Statement::Alter(q) => Box::new(AlterInterpreter::new(q.clone(), ctx)),
            Statement::Check(q) => Box::new(CheckInterpreter::new(q.clone(), ctx)),
            Statement::KillQuery(q) => Box::new(KillQueryInterpreter::new(q.clone(), ctx)),
            Statement::System(q) => Box::new(SystemInterpreter::new(q.clone(), ctx)),
            Statement::Extension(ext) => {
                return Err(Error::InternalError(format!(
                    "extension statement {} reached handler construction",
                    ext.id
                )));
            }
        };
        Ok(interpreter)
    }
}

/// Parses SQL text and dispatches it against one session context.
pub struct Dispatcher {
    parser: Parser,
    context: Arc<Context>,
    stage: QueryProcessingStage,
}

impl Dispatcher {
    pub fn new(context: Arc<Context>) -> Self {
        Self::with_parser(Parser::new(), context)
    }

    pub fn with_parser(parser: Parser, context: Arc<Context>) -> Self {
        Self {
            parser,
            context,
            stage: QueryProcessingStage::Complete,
        }
    }

    pub fn with_stage(mut self, stage: QueryProcessingStage) -> Self {
        self.stage = stage;
        self
    }

    pub fn context(&self) -> &Arc<Context> {
        &self.context
    }

    pub fn parse(&self, sql: &str) -> Result<Vec<Statement>> {
        self.parser.parse_sql(sql)
    }

    /// Dispatches exactly one statement of SQL text.
    pub fn dispatch(&self, sql: &str) -> Result<Box<dyn Interpreter>> {
        let statements = self.parse(sql)?;

        if statements.is_empty() {
            return Err(Error::parse_error("No SQL statement provided"));
        }

        if statements.len() > 1 {
            return Err(Error::parse_error(format!(
                "Multiple statements not supported in single call (found {}). Execute statements separately.",
                statements.len()
            )));
        }

        self.dispatch_statement(&statements[0])
    }

    pub fn dispatch_statement(&self, statement: &Statement) -> Result<Box<dyn Interpreter>> {
        InterpreterFactory::get(statement, &self.context, self.stage)
    }
}
