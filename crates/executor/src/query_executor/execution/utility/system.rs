use std::any::Any;
use std::sync::Arc;

use sqlgate_common::{Error, QueryResult, Result};
use sqlgate_parser::ast::{SystemCommand, SystemQuery};

use super::super::interpreter::Interpreter;
use crate::context::Context;

pub struct SystemInterpreter {
    query: SystemQuery,
    context: Arc<Context>,
}

impl SystemInterpreter {
    pub fn new(query: SystemQuery, context: Arc<Context>) -> Self {
        Self { query, context }
    }

    pub fn query(&self) -> &SystemQuery {
        &self.query
    }
}

impl Interpreter for SystemInterpreter {
    fn name(&self) -> &'static str {
        "SystemInterpreter"
    }

    fn execute(&mut self) -> Result<QueryResult> {
        let command = self.query.command;
        match command {
            SystemCommand::Shutdown | SystemCommand::Kill => {
                return Err(Error::unsupported_feature(format!(
                    "SYSTEM {} is not supported by an embedded server",
                    command.as_str()
                )));
            }
            SystemCommand::DropDnsCache
            | SystemCommand::DropMarkCache
            | SystemCommand::DropUncompressedCache
            | SystemCommand::ReloadDictionaries
            | SystemCommand::ReloadConfig
            | SystemCommand::StopMerges
            | SystemCommand::StartMerges => {}
        }

        log::info!(
            "SYSTEM {} requested by {}",
            command.as_str(),
            self.context.client_info().user
        );
        Ok(QueryResult::empty())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
