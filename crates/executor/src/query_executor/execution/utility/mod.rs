mod check;
mod describe;
mod exists;
mod kill_query;
mod optimize;
mod set;
mod show;
mod system;
mod use_database;

pub use check::CheckInterpreter;
pub use describe::DescribeInterpreter;
pub use exists::ExistsInterpreter;
pub use kill_query::KillQueryInterpreter;
pub use optimize::OptimizeInterpreter;
pub use set::SetInterpreter;
pub use show::{
    ShowCreateDatabaseInterpreter, ShowCreateTableInterpreter, ShowProcessListInterpreter,
    ShowTablesInterpreter,
};
pub use system::SystemInterpreter;
pub use use_database::UseInterpreter;
