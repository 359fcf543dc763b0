use std::sync::Arc;

use sqlgate_common::{ClientInfo, Config, QueryResult, Result, Settings};
use sqlgate_executor::{Context, Dispatcher};
use sqlgate_parser::Statement;

/// One client connection: a context plus the dispatcher that runs SQL
/// text against it.
pub struct Session {
    dispatcher: Dispatcher,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self::with_context(Arc::new(Context::new(settings)))
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::with_context(Arc::new(Context::from_config(config)?)))
    }

    pub fn with_client(settings: Settings, client_info: ClientInfo) -> Self {
        Self::with_context(Arc::new(
            Context::new(settings).with_client_info(client_info),
        ))
    }

    pub fn with_context(context: Arc<Context>) -> Self {
        Self {
            dispatcher: Dispatcher::new(context),
        }
    }

    pub fn context(&self) -> &Arc<Context> {
        self.dispatcher.context()
    }

    /// Runs every statement in `sql` in order and returns the result of the
    /// last one. Execution stops at the first error.
    pub fn execute_sql(&self, sql: &str) -> Result<QueryResult> {
        let statements = self.dispatcher.parse(sql)?;
        log::debug!("executing {} statement(s)", statements.len());
        let mut last = QueryResult::empty();
        for statement in &statements {
            last = self.execute_statement(statement, sql.trim())?;
        }
        Ok(last)
    }

    pub fn execute_statement(&self, statement: &Statement, query_text: &str) -> Result<QueryResult> {
        let context = self.context();
        let _process = context
            .process_list()
            .register(&context.client_info().user, query_text);
        let mut interpreter = self.dispatcher.dispatch_statement(statement)?;
        interpreter.execute()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
