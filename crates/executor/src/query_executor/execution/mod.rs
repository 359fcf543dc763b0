mod access;
pub mod ddl;
mod dispatcher;
pub mod dml;
mod interpreter;
pub mod query;
pub mod utility;

pub use access::check_access;
pub use dispatcher::{AccessPolicy, DispatchEntry, Dispatcher, InterpreterFactory, dispatch_entry};
pub use interpreter::{Interpreter, QueryProcessingStage};
