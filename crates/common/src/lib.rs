//! Common types, settings and errors shared by the sqlgate crates.

pub mod client_info;
pub mod config;
pub mod error;
pub mod result;
pub mod settings;
pub mod types;

pub use client_info::{ClientInfo, HttpMethod, Interface};
pub use config::Config;
pub use error::{AccessError, Error, ReadOnlyReason, Result};
pub use result::{ColumnInfo, QueryResult};
pub use settings::{ReadonlyLevel, Settings};
pub use types::Value;
