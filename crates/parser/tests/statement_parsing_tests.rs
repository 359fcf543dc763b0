use sqlgate_parser::ast::{CreateQuery, DropTarget};
use sqlgate_parser::{Parser, Statement, StatementKind, TableName};

fn parse_sql(sql: &str) -> Result<Vec<Statement>, String> {
    Parser::new()
        .parse_sql(sql)
        .map_err(|e| format!("Parse error: {:?}", e))
}

fn kind_of(sql: &str) -> Option<StatementKind> {
    let statements = parse_sql(sql).unwrap_or_else(|e| panic!("{}: {}", sql, e));
    assert_eq!(statements.len(), 1, "{}", sql);
    statements[0].kind()
}

#[test]
fn test_every_closed_kind_has_a_surface_form() {
    let cases = [
        ("SELECT 1", StatementKind::SelectWithUnion),
        ("INSERT INTO t VALUES (1)", StatementKind::Insert),
        ("CREATE TABLE t (a UInt8)", StatementKind::Create),
        ("DROP TABLE t", StatementKind::Drop),
        ("RENAME TABLE a TO b", StatementKind::Rename),
        ("SHOW TABLES", StatementKind::ShowTables),
        ("USE db", StatementKind::Use),
        ("SET max_threads = 2", StatementKind::Set),
        ("OPTIMIZE TABLE t", StatementKind::Optimize),
        ("EXISTS t", StatementKind::Exists),
        ("SHOW CREATE TABLE t", StatementKind::ShowCreateTable),
        ("SHOW CREATE DATABASE db", StatementKind::ShowCreateDatabase),
        ("DESCRIBE t", StatementKind::Describe),
        ("SHOW PROCESSLIST", StatementKind::ShowProcessList),
        ("ALTER TABLE t DROP COLUMN a", StatementKind::Alter),
        ("CHECK TABLE t", StatementKind::Check),
        ("KILL QUERY WHERE query_id = 'q1'", StatementKind::KillQuery),
        ("SYSTEM RELOAD CONFIG", StatementKind::System),
    ];
    for (sql, kind) in cases {
        assert_eq!(kind_of(sql), Some(kind), "{}", sql);
    }
}

#[test]
fn test_keywords_are_case_insensitive() {
    assert_eq!(kind_of("select 1 union all select 2"), Some(StatementKind::SelectWithUnion));
    assert_eq!(kind_of("create database db"), Some(StatementKind::Create));
}

#[test]
fn test_quoted_identifiers_keep_their_text() {
    let statements = parse_sql("DROP TABLE \"select\".\"from\"").unwrap_or_else(|e| panic!("{}", e));
    match &statements[0] {
        Statement::Drop(q) => {
            assert_eq!(q.target, DropTarget::Table(TableName::qualified("select", "from")));
        }
        other => panic!("Expected Drop, got {:?}", other),
    }
}

#[test]
fn test_create_without_columns_fails() {
    let result = parse_sql("CREATE TABLE t ENGINE = Memory");
    assert!(result.is_err(), "Expected error, got {:?}", result);
}

#[test]
fn test_watch_is_an_extension() {
    assert_eq!(kind_of("WATCH live_view"), None);
}

#[test]
fn test_multi_statement_script() {
    let statements = parse_sql(
        "CREATE DATABASE db; CREATE TABLE db.t (id UInt64); INSERT INTO db.t VALUES (1), (2);",
    )
    .unwrap_or_else(|e| panic!("{}", e));
    assert_eq!(statements.len(), 3);
    assert!(matches!(
        &statements[0],
        Statement::Create(CreateQuery::Database { .. })
    ));
    match &statements[2] {
        Statement::Insert(q) => assert_eq!(q.rows.len(), 2),
        other => panic!("Expected Insert, got {:?}", other),
    }
}
