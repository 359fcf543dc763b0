//! sqlgate - statement dispatch and access-control gate for a ClickHouse-style SQL front end.

mod session;

pub use session::Session;
pub use sqlgate_common::{
    AccessError, ClientInfo, ColumnInfo, Config, Error, HttpMethod, Interface, QueryResult,
    ReadOnlyReason, ReadonlyLevel, Result, Settings, Value,
};
pub use sqlgate_executor::{
    AccessPolicy, Catalog, Context, DispatchEntry, Dispatcher, Interpreter, InterpreterFactory,
    ProcessList, ProfileCounters, ProfileEvent, ProfileEventSink, QueryProcessingStage,
    check_access, dispatch_entry,
};
pub use sqlgate_parser::{Parser, Statement, StatementKind, TableName};
