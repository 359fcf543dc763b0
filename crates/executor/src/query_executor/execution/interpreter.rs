use std::any::Any;

use sqlgate_common::{QueryResult, Result};

/// How far a SELECT is to be carried before its result is handed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryProcessingStage {
    /// Only read the required columns.
    FetchColumns,
    /// Produce partial state that a coordinator can merge.
    WithMergeableState,
    /// Fully evaluated result.
    #[default]
    Complete,
}

/// A constructed, ready-to-run statement handler.
///
/// Handlers own their statement and share the session context; statement-aware
/// permission checks run at the start of `execute`.
pub trait Interpreter: Send {
    fn name(&self) -> &'static str;

    fn execute(&mut self) -> Result<QueryResult>;

    fn as_any(&self) -> &dyn Any;
}
