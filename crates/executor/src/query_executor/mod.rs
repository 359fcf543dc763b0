pub mod execution;

pub use execution::{
    AccessPolicy, DispatchEntry, Dispatcher, Interpreter, InterpreterFactory,
    QueryProcessingStage, check_access, dispatch_entry,
};
