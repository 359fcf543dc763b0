//! Statement dispatch, access gate and interpreters for sqlgate.

pub mod catalog;
pub mod context;
pub mod process_list;
pub mod profile_events;
pub mod query_executor;

pub use catalog::{Catalog, DEFAULT_DATABASE, TableData};
pub use context::Context;
pub use process_list::{ProcessGuard, ProcessInfo, ProcessList};
pub use profile_events::{ProfileCounters, ProfileEvent, ProfileEventSink};
pub use query_executor::execution::ddl::{
    AlterInterpreter, CreateInterpreter, DropInterpreter, RenameInterpreter,
};
pub use query_executor::execution::dml::InsertInterpreter;
pub use query_executor::execution::query::{SelectInterpreter, SelectWithUnionInterpreter};
pub use query_executor::execution::utility::{
    CheckInterpreter, DescribeInterpreter, ExistsInterpreter, KillQueryInterpreter,
    OptimizeInterpreter, SetInterpreter, ShowCreateDatabaseInterpreter,
    ShowCreateTableInterpreter, ShowProcessListInterpreter, ShowTablesInterpreter,
    SystemInterpreter, UseInterpreter,
};
pub use query_executor::{
    AccessPolicy, DispatchEntry, Dispatcher, Interpreter, InterpreterFactory,
    QueryProcessingStage, check_access, dispatch_entry,
};
