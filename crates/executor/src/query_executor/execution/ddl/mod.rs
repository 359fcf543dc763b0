mod alter;
mod create;
mod drop;
mod rename;

pub use alter::AlterInterpreter;
pub use create::CreateInterpreter;
pub use drop::DropInterpreter;
pub use rename::RenameInterpreter;
