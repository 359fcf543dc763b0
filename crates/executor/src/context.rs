//! Session state consulted by dispatch and the interpreters.

use std::sync::{Arc, PoisonError, RwLock};

use sqlgate_common::{
    ClientInfo, Config, HttpMethod, Interface, ReadonlyLevel, Result, Settings, Value,
};
use sqlgate_parser::{TEMPORARY_DATABASE, TableName};

use crate::catalog::{Catalog, DEFAULT_DATABASE};
use crate::process_list::ProcessList;
use crate::profile_events::{ProfileCounters, ProfileEventSink};

pub struct Context {
    settings: RwLock<Settings>,
    client_info: ClientInfo,
    current_database: RwLock<String>,
    catalog: Arc<Catalog>,
    process_list: Arc<ProcessList>,
    profile_events: Arc<dyn ProfileEventSink>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("settings", &self.settings())
            .field("client_info", &self.client_info)
            .field("current_database", &self.current_database())
            .finish_non_exhaustive()
    }
}

impl Context {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: RwLock::new(settings),
            client_info: ClientInfo::default(),
            current_database: RwLock::new(DEFAULT_DATABASE.to_string()),
            catalog: Arc::new(Catalog::new()),
            process_list: Arc::new(ProcessList::new()),
            profile_events: Arc::new(ProfileCounters::new()),
        }
    }

    /// Builds a context from a loaded config. The default database is created if missing.
    pub fn from_config(config: &Config) -> Result<Self> {
        let context = Self::new(config.settings.clone());
        context
            .catalog
            .create_database(&config.default_database, true)?;
        context.set_current_database(&config.default_database);
        Ok(context)
    }

    pub fn with_client_info(mut self, client_info: ClientInfo) -> Self {
        self.client_info = client_info;
        self
    }

    pub fn with_profile_events(mut self, sink: Arc<dyn ProfileEventSink>) -> Self {
        self.profile_events = sink;
        self
    }

    pub fn with_catalog(mut self, catalog: Arc<Catalog>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_process_list(mut self, process_list: Arc<ProcessList>) -> Self {
        self.process_list = process_list;
        self
    }

    /// A consistent copy of every setting.
    pub fn settings(&self) -> Settings {
        self.settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn readonly_level(&self) -> ReadonlyLevel {
        self.settings().readonly
    }

    pub fn allow_ddl(&self) -> bool {
        self.settings().allow_ddl
    }

    pub fn insert_allow_materialized_columns(&self) -> bool {
        self.settings().insert_allow_materialized_columns
    }

    pub fn set_setting(&self, name: &str, value: &Value) -> Result<()> {
        self.update_settings(|settings| settings.set(name, value))
    }

    /// Applies `f` to a staged copy; the session sees all changes or none.
    pub fn update_settings(&self, f: impl FnOnce(&mut Settings) -> Result<()>) -> Result<()> {
        let mut guard = self.settings.write().unwrap_or_else(PoisonError::into_inner);
        let mut staged = guard.clone();
        f(&mut staged)?;
        *guard = staged;
        Ok(())
    }

    pub fn client_info(&self) -> &ClientInfo {
        &self.client_info
    }

    pub fn client_interface(&self) -> Interface {
        self.client_info.interface
    }

    pub fn client_http_method(&self) -> HttpMethod {
        self.client_info.http_method
    }

    pub fn current_database(&self) -> String {
        self.current_database
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_current_database(&self, database: &str) {
        *self
            .current_database
            .write()
            .unwrap_or_else(PoisonError::into_inner) = database.to_string();
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn process_list(&self) -> &ProcessList {
        &self.process_list
    }

    pub fn profile_events(&self) -> &dyn ProfileEventSink {
        self.profile_events.as_ref()
    }

    /// Resolves a table reference to `(database, table)`.
    ///
    /// Unqualified names prefer an existing temporary table over the current
    /// database, so `INSERT INTO tmp` reaches a temporary `tmp`.
    pub fn resolve_table(&self, table: &TableName, temporary: bool) -> (String, String) {
        if temporary {
            return (TEMPORARY_DATABASE.to_string(), table.table.clone());
        }
        match &table.database {
            Some(database) => (database.clone(), table.table.clone()),
            None if self.catalog.table_exists(TEMPORARY_DATABASE, &table.table) => {
                (TEMPORARY_DATABASE.to_string(), table.table.clone())
            }
            None => (self.current_database(), table.table.clone()),
        }
    }
}
