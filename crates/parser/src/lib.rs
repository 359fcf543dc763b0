//! Statement AST and a ClickHouse-flavoured parser producing it.

pub mod ast;
pub mod parser;
pub mod validator;

pub use ast::{Statement, StatementKind, TEMPORARY_DATABASE, TableName};
pub use parser::Parser;
pub use validator::StatementValidator;
