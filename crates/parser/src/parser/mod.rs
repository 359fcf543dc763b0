mod helpers;
mod statements;

use debug_print::debug_eprintln;
use sqlgate_common::{Error, Result};
use sqlparser::dialect::ClickHouseDialect;
use sqlparser::tokenizer::{Token, Tokenizer};

pub use helpers::ParserHelpers;
pub use statements::StatementParser;

use crate::ast::Statement;
use crate::validator::StatementValidator;

#[derive(Debug, Clone, Copy, Default)]
pub struct Parser;

impl Parser {
    pub fn new() -> Self {
        Self
    }

    /// Parses a `;`-separated script. Empty statements between separators are skipped.
    pub fn parse_sql(&self, sql: &str) -> Result<Vec<Statement>> {
        let dialect = ClickHouseDialect {};
        let tokens = Tokenizer::new(&dialect, sql)
            .tokenize()
            .map_err(|e| Error::parse_error(format!("Tokenizer error: {}", e)))?;

        let meaningful: Vec<&Token> = tokens
            .iter()
            .filter(|t| !matches!(t, Token::Whitespace(_) | Token::EOF))
            .collect();

        let mut statements = Vec::new();
        for chunk in meaningful.split(|t| matches!(t, Token::SemiColon)) {
            if chunk.is_empty() {
                continue;
            }
            let statement = StatementParser::parse(chunk)?;
            StatementValidator::validate(&statement)?;
            debug_eprintln!("[parser] parsed {}", statement.id());
            statements.push(statement);
        }

        log::debug!("parsed {} statement(s)", statements.len());
        Ok(statements)
    }

    /// Parses exactly one statement.
    pub fn parse_statement(&self, sql: &str) -> Result<Statement> {
        let mut statements = self.parse_sql(sql)?;
        match statements.len() {
            1 => Ok(statements.remove(0)),
            0 => Err(Error::parse_error("Empty query")),
            n => Err(Error::parse_error(format!(
                "Expected a single statement, found {}",
                n
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use sqlgate_common::Value;

    use super::*;
    use crate::ast::{
        AlterCommand, ColumnDefaultKind, CreateQuery, DropKind, DropTarget, KillFilterColumn,
        SelectItem, StatementKind, SystemCommand, TableName,
    };

    fn parse(sql: &str) -> Statement {
        match Parser::new().parse_statement(sql) {
            Ok(stmt) => stmt,
            Err(e) => panic!("failed to parse {:?}: {}", sql, e),
        }
    }

    #[test]
    fn test_select_is_always_a_union() {
        match parse("SELECT a, 1 AS one FROM db.t LIMIT 5") {
            Statement::SelectWithUnion(q) => {
                assert_eq!(q.selects.len(), 1);
                let select = &q.selects[0];
                assert_eq!(select.from, Some(TableName::qualified("db", "t")));
                assert_eq!(select.limit, Some(5));
                assert_eq!(
                    select.projection,
                    vec![
                        SelectItem::Column {
                            name: "a".to_string(),
                            alias: None
                        },
                        SelectItem::Literal {
                            value: Value::Int64(1),
                            alias: Some("one".to_string())
                        },
                    ]
                );
            }
            other => panic!("Expected SelectWithUnion, got {:?}", other),
        }
    }

    #[test]
    fn test_union_all_collects_every_branch() {
        match parse("SELECT 1 UNION ALL SELECT 2 UNION ALL SELECT * FROM t") {
            Statement::SelectWithUnion(q) => {
                assert_eq!(q.selects.len(), 3);
                assert_eq!(q.selects[2].projection, vec![SelectItem::Wildcard]);
            }
            other => panic!("Expected SelectWithUnion, got {:?}", other),
        }
    }

    #[test]
    fn test_union_distinct_is_unsupported() {
        let err = Parser::new().parse_sql("SELECT 1 UNION SELECT 2");
        assert!(matches!(err, Err(Error::UnsupportedFeature(_))));
    }

    #[test]
    fn test_insert_with_columns_and_rows() {
        match parse("INSERT INTO events (id, name) VALUES (1, 'a'), (-2, NULL)") {
            Statement::Insert(q) => {
                assert_eq!(q.table, TableName::new("events"));
                assert_eq!(q.columns, vec!["id", "name"]);
                assert_eq!(
                    q.rows,
                    vec![
                        vec![Value::Int64(1), Value::string("a")],
                        vec![Value::Int64(-2), Value::Null],
                    ]
                );
            }
            other => panic!("Expected Insert, got {:?}", other),
        }
    }

    #[test]
    fn test_create_temporary_table_with_materialized_column() {
        let sql = "CREATE TEMPORARY TABLE IF NOT EXISTS tmp \
                   (id UInt64, price Decimal(10, 2), day String MATERIALIZED 'mon') \
                   ENGINE = Memory";
        match parse(sql) {
            Statement::Create(CreateQuery::Table(q)) => {
                assert!(q.is_temporary);
                assert!(q.if_not_exists);
                assert_eq!(q.columns.len(), 3);
                assert_eq!(q.columns[1].data_type, "Decimal(10, 2)");
                let default = q.columns[2].default.as_ref().map(|d| d.kind);
                assert_eq!(default, Some(ColumnDefaultKind::Materialized));
                assert_eq!(q.engine.as_deref(), Some("Memory"));
            }
            other => panic!("Expected CREATE TABLE, got {:?}", other),
        }
    }

    #[test]
    fn test_create_database() {
        match parse("CREATE DATABASE IF NOT EXISTS analytics") {
            Statement::Create(CreateQuery::Database {
                name,
                if_not_exists,
            }) => {
                assert_eq!(name, "analytics");
                assert!(if_not_exists);
            }
            other => panic!("Expected CREATE DATABASE, got {:?}", other),
        }
    }

    #[test]
    fn test_drop_detach_truncate() {
        match parse("DROP DATABASE IF EXISTS analytics") {
            Statement::Drop(q) => {
                assert_eq!(q.kind, DropKind::Drop);
                assert_eq!(q.target, DropTarget::Database("analytics".to_string()));
                assert!(q.if_exists);
            }
            other => panic!("Expected DROP, got {:?}", other),
        }
        match parse("DETACH TABLE db.t") {
            Statement::Drop(q) => assert_eq!(q.kind, DropKind::Detach),
            other => panic!("Expected DETACH, got {:?}", other),
        }
        match parse("TRUNCATE TEMPORARY TABLE tmp") {
            Statement::Drop(q) => {
                assert_eq!(q.kind, DropKind::Truncate);
                assert!(q.is_temporary);
            }
            other => panic!("Expected TRUNCATE, got {:?}", other),
        }
    }

    #[test]
    fn test_show_variants() {
        assert_eq!(
            parse("SHOW PROCESSLIST").kind(),
            Some(StatementKind::ShowProcessList)
        );
        assert_eq!(
            parse("SHOW CREATE DATABASE db").kind(),
            Some(StatementKind::ShowCreateDatabase)
        );
        assert_eq!(
            parse("SHOW CREATE TABLE db.t").kind(),
            Some(StatementKind::ShowCreateTable)
        );
        match parse("SHOW TABLES FROM db LIKE 'ev%'") {
            Statement::ShowTables(q) => {
                assert_eq!(q.from.as_deref(), Some("db"));
                assert_eq!(q.like.as_deref(), Some("ev%"));
                assert!(!q.databases);
            }
            other => panic!("Expected SHOW TABLES, got {:?}", other),
        }
        match parse("SHOW DATABASES") {
            Statement::ShowTables(q) => assert!(q.databases),
            other => panic!("Expected SHOW DATABASES, got {:?}", other),
        }
    }

    #[test]
    fn test_set_keeps_change_order() {
        match parse("SET max_threads = 4, readonly = 1") {
            Statement::Set(q) => {
                let names: Vec<&str> = q.changes.keys().map(String::as_str).collect();
                assert_eq!(names, vec!["max_threads", "readonly"]);
            }
            other => panic!("Expected SET, got {:?}", other),
        }
    }

    #[test]
    fn test_alter_add_and_drop_column() {
        match parse("ALTER TABLE t ADD COLUMN c String AFTER b, DROP COLUMN IF EXISTS d") {
            Statement::Alter(q) => {
                assert_eq!(q.commands.len(), 2);
                match &q.commands[0] {
                    AlterCommand::AddColumn { column, after, .. } => {
                        assert_eq!(column.name, "c");
                        assert_eq!(after.as_deref(), Some("b"));
                    }
                    other => panic!("Expected ADD COLUMN, got {:?}", other),
                }
                assert_eq!(
                    q.commands[1],
                    AlterCommand::DropColumn {
                        name: "d".to_string(),
                        if_exists: true
                    }
                );
            }
            other => panic!("Expected ALTER, got {:?}", other),
        }
    }

    #[test]
    fn test_kill_query_and_system() {
        match parse("KILL QUERY WHERE user = 'bob' SYNC") {
            Statement::KillQuery(q) => {
                assert_eq!(q.column, KillFilterColumn::User);
                assert_eq!(q.value, "bob");
                assert!(q.sync);
                assert!(!q.test);
            }
            other => panic!("Expected KILL QUERY, got {:?}", other),
        }
        match parse("SYSTEM DROP DNS CACHE") {
            Statement::System(q) => assert_eq!(q.command, SystemCommand::DropDnsCache),
            other => panic!("Expected SYSTEM, got {:?}", other),
        }
    }

    #[test]
    fn test_remaining_kinds() {
        let cases = [
            ("RENAME TABLE a TO b, c TO d", StatementKind::Rename),
            ("USE analytics", StatementKind::Use),
            ("OPTIMIZE TABLE t PARTITION 2024 FINAL", StatementKind::Optimize),
            ("EXISTS TABLE db.t", StatementKind::Exists),
            ("DESCRIBE TABLE t", StatementKind::Describe),
            ("DESC t", StatementKind::Describe),
            ("CHECK TABLE t", StatementKind::Check),
        ];
        for (sql, kind) in cases {
            assert_eq!(parse(sql).kind(), Some(kind), "{}", sql);
        }
    }

    #[test]
    fn test_explain_becomes_extension() {
        match parse("EXPLAIN SELECT 1") {
            Statement::Extension(ext) => {
                assert_eq!(ext.id, "ExplainQuery");
                assert!(ext.text.starts_with("EXPLAIN"));
            }
            other => panic!("Expected Extension, got {:?}", other),
        }
    }

    #[test]
    fn test_script_splits_on_semicolons() {
        let statements = Parser::new()
            .parse_sql("USE db; ; SELECT 1;")
            .unwrap_or_else(|e| panic!("{}", e));
        assert_eq!(statements.len(), 2);
    }

    #[test]
    fn test_trailing_tokens_are_rejected() {
        let result = Parser::new().parse_sql("USE db extra");
        assert!(matches!(result, Err(Error::ParseError(_))));
    }

    #[test]
    fn test_unknown_leading_keyword_is_parse_error() {
        let result = Parser::new().parse_sql("FROBNICATE t");
        assert!(matches!(result, Err(Error::ParseError(_))));
    }
}
