//! Statement AST handed from the parser to the dispatcher.
//!
//! Every statement is exactly one [`Statement`] variant. Variants other than
//! [`Statement::Extension`] form the closed set the dispatcher knows about.

use std::fmt;

use indexmap::IndexMap;
use sqlgate_common::Value;

/// Database holding the session's temporary tables.
pub const TEMPORARY_DATABASE: &str = "_temporary_and_external_tables";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName {
    pub database: Option<String>,
    pub table: String,
}

impl TableName {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            database: None,
            table: table.into(),
        }
    }

    pub fn qualified(database: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            database: Some(database.into()),
            table: table.into(),
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.database {
            Some(database) => write!(f, "{}.{}", database, self.table),
            None => write!(f, "{}", self.table),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectItem {
    Wildcard,
    Column { name: String, alias: Option<String> },
    Literal { value: Value, alias: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectQuery {
    pub projection: Vec<SelectItem>,
    pub from: Option<TableName>,
    pub limit: Option<u64>,
}

/// `SELECT ... UNION ALL SELECT ...`. A lone SELECT is a union of one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectWithUnionQuery {
    pub selects: Vec<SelectQuery>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertQuery {
    pub table: TableName,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnDefaultKind {
    Default,
    Materialized,
    Alias,
}

impl ColumnDefaultKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnDefaultKind::Default => "DEFAULT",
            ColumnDefaultKind::Materialized => "MATERIALIZED",
            ColumnDefaultKind::Alias => "ALIAS",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefault {
    pub kind: ColumnDefaultKind,
    pub expression: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDeclaration {
    pub name: String,
    pub data_type: String,
    pub default: Option<ColumnDefault>,
}

impl ColumnDeclaration {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            default: None,
        }
    }

    pub fn is_materialized(&self) -> bool {
        matches!(
            self.default,
            Some(ColumnDefault {
                kind: ColumnDefaultKind::Materialized,
                ..
            })
        )
    }

    pub fn is_alias(&self) -> bool {
        matches!(
            self.default,
            Some(ColumnDefault {
                kind: ColumnDefaultKind::Alias,
                ..
            })
        )
    }
}

impl fmt::Display for ColumnDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.data_type)?;
        if let Some(default) = &self.default {
            write!(
                f,
                " {} {}",
                default.kind.as_str(),
                default.expression.to_sql_literal()
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTableQuery {
    pub table: TableName,
    pub if_not_exists: bool,
    pub is_temporary: bool,
    pub columns: Vec<ColumnDeclaration>,
    pub engine: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CreateQuery {
    Database { name: String, if_not_exists: bool },
    Table(CreateTableQuery),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropKind {
    Drop,
    Detach,
    Truncate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    Database(String),
    Table(TableName),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropQuery {
    pub kind: DropKind,
    pub target: DropTarget,
    pub if_exists: bool,
    pub is_temporary: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameElement {
    pub from: TableName,
    pub to: TableName,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenameQuery {
    pub elements: Vec<RenameElement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShowTablesQuery {
    pub databases: bool,
    pub temporary: bool,
    pub from: Option<String>,
    pub like: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UseQuery {
    pub database: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SetQuery {
    pub changes: IndexMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizeQuery {
    pub table: TableName,
    pub partition: Option<String>,
    pub is_final: bool,
    pub deduplicate: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistsQuery {
    pub table: TableName,
    pub temporary: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowCreateTableQuery {
    pub table: TableName,
    pub temporary: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowCreateDatabaseQuery {
    pub database: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeQuery {
    pub table: TableName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShowProcessListQuery;

#[derive(Debug, Clone, PartialEq)]
pub enum AlterCommand {
    AddColumn {
        column: ColumnDeclaration,
        if_not_exists: bool,
        after: Option<String>,
    },
    DropColumn {
        name: String,
        if_exists: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlterQuery {
    pub table: TableName,
    pub commands: Vec<AlterCommand>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckQuery {
    pub table: TableName,
}

/// Which column of the process list a KILL QUERY predicate compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillFilterColumn {
    QueryId,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KillQueryQuery {
    pub column: KillFilterColumn,
    pub value: String,
    pub sync: bool,
    pub test: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemCommand {
    Shutdown,
    Kill,
    DropDnsCache,
    DropMarkCache,
    DropUncompressedCache,
    ReloadDictionaries,
    ReloadConfig,
    StopMerges,
    StartMerges,
}

impl SystemCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemCommand::Shutdown => "SHUTDOWN",
            SystemCommand::Kill => "KILL",
            SystemCommand::DropDnsCache => "DROP DNS CACHE",
            SystemCommand::DropMarkCache => "DROP MARK CACHE",
            SystemCommand::DropUncompressedCache => "DROP UNCOMPRESSED CACHE",
            SystemCommand::ReloadDictionaries => "RELOAD DICTIONARIES",
            SystemCommand::ReloadConfig => "RELOAD CONFIG",
            SystemCommand::StopMerges => "STOP MERGES",
            SystemCommand::StartMerges => "START MERGES",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemQuery {
    pub command: SystemCommand,
}

/// A statement recognized by a parser extension but not by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionStatement {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select(SelectQuery),
    SelectWithUnion(SelectWithUnionQuery),
    Insert(InsertQuery),
    Create(CreateQuery),
    Drop(DropQuery),
    Rename(RenameQuery),
    ShowTables(ShowTablesQuery),
    Use(UseQuery),
    Set(SetQuery),
    Optimize(OptimizeQuery),
    Exists(ExistsQuery),
    ShowCreateTable(ShowCreateTableQuery),
    ShowCreateDatabase(ShowCreateDatabaseQuery),
    Describe(DescribeQuery),
    ShowProcessList(ShowProcessListQuery),
    Alter(AlterQuery),
    Check(CheckQuery),
    KillQuery(KillQueryQuery),
    System(SystemQuery),
    Extension(ExtensionStatement),
}

/// Discriminant of the closed statement set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Select,
    SelectWithUnion,
    Insert,
    Create,
    Drop,
    Rename,
    ShowTables,
    Use,
    Set,
    Optimize,
    Exists,
    ShowCreateTable,
    ShowCreateDatabase,
    Describe,
    ShowProcessList,
    Alter,
    Check,
    KillQuery,
    System,
}

impl StatementKind {
    pub const ALL: [StatementKind; 19] = [
        StatementKind::Select,
        StatementKind::SelectWithUnion,
        StatementKind::Insert,
        StatementKind::Create,
        StatementKind::Drop,
        StatementKind::Rename,
        StatementKind::ShowTables,
        StatementKind::Use,
        StatementKind::Set,
        StatementKind::Optimize,
        StatementKind::Exists,
        StatementKind::ShowCreateTable,
        StatementKind::ShowCreateDatabase,
        StatementKind::Describe,
        StatementKind::ShowProcessList,
        StatementKind::Alter,
        StatementKind::Check,
        StatementKind::KillQuery,
        StatementKind::System,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatementKind::Select => "SelectQuery",
            StatementKind::SelectWithUnion => "SelectWithUnionQuery",
            StatementKind::Insert => "InsertQuery",
            StatementKind::Create => "CreateQuery",
            StatementKind::Drop => "DropQuery",
            StatementKind::Rename => "RenameQuery",
            StatementKind::ShowTables => "ShowTables",
            StatementKind::Use => "UseQuery",
            StatementKind::Set => "Set",
            StatementKind::Optimize => "OptimizeQuery",
            StatementKind::Exists => "ExistsQuery",
            StatementKind::ShowCreateTable => "ShowCreateTableQuery",
            StatementKind::ShowCreateDatabase => "ShowCreateDatabaseQuery",
            StatementKind::Describe => "DescribeQuery",
            StatementKind::ShowProcessList => "ShowProcesslistQuery",
            StatementKind::Alter => "AlterQuery",
            StatementKind::Check => "CheckQuery",
            StatementKind::KillQuery => "KillQueryQuery",
            StatementKind::System => "SystemQuery",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Statement {
    /// `None` for extension statements outside the closed set.
    pub fn kind(&self) -> Option<StatementKind> {
        let kind = match self {
            Statement::Select(_) => StatementKind::Select,
            Statement::SelectWithUnion(_) => StatementKind::SelectWithUnion,
            Statement::Insert(_) => StatementKind::Insert,
            Statement::Create(_) => StatementKind::Create,
            Statement::Drop(_) => StatementKind::Drop,
            Statement::Rename(_) => StatementKind::Rename,
            Statement::ShowTables(_) => StatementKind::ShowTables,
            Statement::Use(_) => StatementKind::Use,
            Statement::Set(_) => StatementKind::Set,
            Statement::Optimize(_) => StatementKind::Optimize,
            Statement::Exists(_) => StatementKind::Exists,
            Statement::ShowCreateTable(_) => StatementKind::ShowCreateTable,
            Statement::ShowCreateDatabase(_) => StatementKind::ShowCreateDatabase,
            Statement::Describe(_) => StatementKind::Describe,
            Statement::ShowProcessList(_) => StatementKind::ShowProcessList,
            Statement::Alter(_) => StatementKind::Alter,
            Statement::Check(_) => StatementKind::Check,
            Statement::KillQuery(_) => StatementKind::KillQuery,
            Statement::System(_) => StatementKind::System,
            Statement::Extension(_) => return None,
        };
        Some(kind)
    }

    /// Identifier of the statement, e.g. `InsertQuery_db_events`.
    pub fn id(&self) -> String {
        let with_table = |kind: StatementKind, table: &TableName| match &table.database {
            Some(database) => format!("{}_{}_{}", kind.as_str(), database, table.table),
            None => format!("{}_{}", kind.as_str(), table.table),
        };

        match self {
            Statement::Insert(q) => with_table(StatementKind::Insert, &q.table),
            Statement::Create(CreateQuery::Table(q)) => {
                with_table(StatementKind::Create, &q.table)
            }
            Statement::Create(CreateQuery::Database { name, .. }) => {
                format!("{}_{}", StatementKind::Create.as_str(), name)
            }
            Statement::Drop(q) => match &q.target {
                DropTarget::Table(table) => with_table(StatementKind::Drop, table),
                DropTarget::Database(name) => format!("{}_{}", StatementKind::Drop.as_str(), name),
            },
            Statement::Alter(q) => with_table(StatementKind::Alter, &q.table),
            Statement::Optimize(q) => with_table(StatementKind::Optimize, &q.table),
            Statement::Extension(ext) => ext.id.clone(),
            other => match other.kind() {
                Some(kind) => kind.as_str().to_string(),
                None => "UnknownQuery".to_string(),
            },
        }
    }
}
