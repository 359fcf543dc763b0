use sqlgate::{Error, Value};

use crate::assert_rows;
use crate::common::{column_values, exec_err, exec_ok, unrestricted_session};

#[test]
fn test_table_lifecycle() {
    let session = unrestricted_session();
    exec_ok(&session, "CREATE DATABASE analytics");
    exec_ok(&session, "USE analytics");
    exec_ok(
        &session,
        "CREATE TABLE events (id UInt64, name String DEFAULT 'unknown')",
    );
    exec_ok(&session, "INSERT INTO events (id) VALUES (1), (2)");
    exec_ok(&session, "INSERT INTO events VALUES (3, 'click')");

    let result = exec_ok(&session, "SELECT id, name FROM events");
    assert_rows!(result, [[1, "unknown"], [2, "unknown"], [3, "click"]]);

    exec_ok(&session, "RENAME TABLE events TO clicks");
    let tables = exec_ok(&session, "SHOW TABLES");
    assert_eq!(column_values(&tables, "name"), vec![Value::string("clicks")]);

    exec_ok(&session, "TRUNCATE TABLE clicks");
    let result = exec_ok(&session, "SELECT * FROM clicks");
    assert_rows!(result, []);

    exec_ok(&session, "DROP TABLE clicks");
    let exists = exec_ok(&session, "EXISTS TABLE clicks");
    assert_eq!(exists.first_value(), Some(&Value::Int64(0)));
}

#[test]
fn test_alter_then_describe() {
    let session = unrestricted_session();
    exec_ok(&session, "CREATE TABLE t (a UInt8)");
    exec_ok(&session, "INSERT INTO t VALUES (1)");
    exec_ok(&session, "ALTER TABLE t ADD COLUMN b String DEFAULT 'x'");

    let described = exec_ok(&session, "DESCRIBE t");
    assert_eq!(
        column_values(&described, "name"),
        vec![Value::string("a"), Value::string("b")]
    );

    let result = exec_ok(&session, "SELECT * FROM t");
    assert_rows!(result, [[1, "x"]]);

    exec_ok(&session, "ALTER TABLE t DROP COLUMN b");
    let result = exec_ok(&session, "SELECT * FROM t");
    assert_eq!(result.column_names(), vec!["a"]);
}

#[test]
fn test_temporary_table_shadows_regular_table() {
    let session = unrestricted_session();
    exec_ok(&session, "CREATE TABLE t (a UInt8)");
    exec_ok(&session, "INSERT INTO t VALUES (1)");
    exec_ok(&session, "CREATE TEMPORARY TABLE t (a UInt8)");
    exec_ok(&session, "INSERT INTO t VALUES (2)");

    let result = exec_ok(&session, "SELECT a FROM t");
    assert_rows!(result, [[2]]);

    let result = exec_ok(&session, "SELECT a FROM default.t");
    assert_rows!(result, [[1]]);
}

#[test]
fn test_optimize_deduplicate() {
    let session = unrestricted_session();
    exec_ok(&session, "CREATE TABLE t (a UInt8)");
    exec_ok(&session, "INSERT INTO t VALUES (1), (1), (2)");
    exec_ok(&session, "OPTIMIZE TABLE t FINAL DEDUPLICATE");
    let result = exec_ok(&session, "SELECT a FROM t");
    assert_rows!(result, [[1], [2]]);
}

#[test]
fn test_show_create_round_trip() {
    let session = unrestricted_session();
    exec_ok(&session, "CREATE TABLE t (a UInt8) ENGINE = Log");
    let shown = exec_ok(&session, "SHOW CREATE TABLE t");
    let statement = match shown.first_value() {
        Some(Value::String(s)) => s.clone(),
        other => panic!("Expected statement string, got {:?}", other),
    };
    assert_eq!(statement, "CREATE TABLE default.t (a UInt8) ENGINE = Log");

    exec_ok(&session, "DROP TABLE t");
    exec_ok(&session, &statement);
    assert!(session.context().catalog().table_exists("default", "t"));
}

#[test]
fn test_unknown_objects() {
    let session = unrestricted_session();
    assert!(matches!(
        exec_err(&session, "USE nowhere"),
        Error::UnknownDatabase(_)
    ));
    assert!(matches!(
        exec_err(&session, "SELECT * FROM missing"),
        Error::UnknownTable(_)
    ));
    exec_ok(&session, "DROP TABLE IF EXISTS missing");
}

#[test]
fn test_explain_is_unrecognized() {
    let session = unrestricted_session();
    let err = exec_err(&session, "EXPLAIN SELECT 1");
    assert!(err.is_internal());
    assert_eq!(err.to_string(), "Unknown type of query: ExplainQuery");
}

#[test]
fn test_kill_query_test_mode() {
    let session = unrestricted_session();
    let result = exec_ok(&session, "KILL QUERY WHERE user = 'default' TEST");
    assert_eq!(result.row_count(), 1);
    assert_eq!(
        result.get_by_name(0, "kill_status"),
        Some(&Value::string("pending"))
    );
}

#[test]
fn test_union_all() {
    let session = unrestricted_session();
    let result = exec_ok(&session, "SELECT 1 UNION ALL SELECT 2 UNION ALL SELECT 3");
    assert_rows!(result, [[1], [2], [3]]);
}
