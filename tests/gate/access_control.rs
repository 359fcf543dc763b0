use sqlgate::{ReadOnlyReason, ReadonlyLevel, Settings, StatementKind, Value, dispatch_entry};

use crate::common::{
    assert_ddl_prohibited, assert_readonly, assert_readonly_statement, exec_err, exec_ok,
    http_get_session, no_ddl_session, readonly_session, session_with_setup,
};

const GATED: [&str; 4] = [
    "RENAME TABLE t TO u",
    "OPTIMIZE TABLE t",
    "ALTER TABLE t ADD COLUMN b UInt8",
    "SYSTEM RELOAD CONFIG",
];

#[test]
fn test_gated_statements_fail_in_readonly_session() {
    for level in [ReadonlyLevel::Absolute, ReadonlyLevel::AllowSettings] {
        let session = session_with_setup(
            "CREATE TABLE t (a UInt8)",
            Settings::default().with_readonly(level),
        );
        for sql in GATED {
            assert_readonly(session.execute_sql(sql), ReadOnlyReason::Session);
        }
        assert!(session.context().catalog().table_exists("default", "t"));
    }
}

#[test]
fn test_readonly_reported_before_ddl_prohibited() {
    let session = session_with_setup(
        "CREATE TABLE t (a UInt8)",
        Settings::readonly().with_allow_ddl(false),
    );
    for sql in GATED {
        assert_readonly(session.execute_sql(sql), ReadOnlyReason::Session);
    }
}

#[test]
fn test_gated_statements_fail_without_ddl() {
    let session = session_with_setup(
        "CREATE TABLE t (a UInt8)",
        Settings::default().with_allow_ddl(false),
    );
    for sql in GATED {
        assert_ddl_prohibited(session.execute_sql(sql));
    }
}

#[test]
fn test_http_get_reason() {
    let session = http_get_session();
    let err = exec_err(&session, "OPTIMIZE TABLE t");
    assert_eq!(
        err.to_string(),
        "Cannot execute query in readonly mode. For queries over HTTP, method GET implies readonly. You should use method POST for modifying queries"
    );
}

#[test]
fn test_ungated_statements_run_in_readonly_session() {
    let session = session_with_setup(
        "CREATE TABLE t (a UInt8); INSERT INTO t VALUES (1)",
        Settings::readonly().with_allow_ddl(false),
    );
    exec_ok(&session, "SELECT a FROM t");
    exec_ok(&session, "SELECT 1 UNION ALL SELECT 2");
    exec_ok(&session, "SHOW TABLES");
    exec_ok(&session, "SHOW CREATE TABLE t");
    exec_ok(&session, "DESCRIBE t");
    exec_ok(&session, "EXISTS t");
    exec_ok(&session, "CHECK TABLE t");
    exec_ok(&session, "SHOW PROCESSLIST");
    exec_ok(&session, "USE default");
    exec_ok(&session, "KILL QUERY WHERE query_id = 'none' TEST");
}

#[test]
fn test_self_gated_statements_use_their_own_messages() {
    let session = session_with_setup("CREATE TABLE t (a UInt8)", Settings::readonly());
    for sql in [
        "INSERT INTO t VALUES (1)",
        "CREATE TABLE u (a UInt8)",
        "DROP TABLE t",
        "SET max_threads = 1",
    ] {
        assert_readonly_statement(session.execute_sql(sql));
    }
    let err = exec_err(&session, "DROP TABLE t");
    assert_eq!(err.to_string(), "Cannot drop table in readonly mode");
}

#[test]
fn test_allow_settings_permits_temporary_tables() {
    let session = readonly_session(ReadonlyLevel::AllowSettings);
    exec_ok(&session, "SET max_threads = 4");
    exec_ok(&session, "CREATE TEMPORARY TABLE scratch (a UInt8)");
    exec_ok(&session, "INSERT INTO scratch VALUES (7)");
    let result = exec_ok(&session, "SELECT a FROM scratch");
    crate::assert_rows!(result, [[7]]);
    exec_ok(&session, "DROP TEMPORARY TABLE scratch");

    assert_readonly_statement(session.execute_sql("CREATE TABLE t (a UInt8)"));
    assert_readonly_statement(session.execute_sql("SET readonly = 0"));
}

#[test]
fn test_no_ddl_session_still_inserts_and_sets() {
    let session = session_with_setup(
        "CREATE TABLE t (a UInt8)",
        Settings::default().with_allow_ddl(false),
    );
    exec_ok(&session, "INSERT INTO t VALUES (1)");
    exec_ok(&session, "SET max_threads = 2");
    assert_ddl_prohibited(session.execute_sql("CREATE TABLE u (a UInt8)"));
    assert_ddl_prohibited(session.execute_sql("DROP TABLE t"));
}

#[test]
fn test_readonly_can_be_raised_then_blocks() {
    let session = no_ddl_session();
    exec_ok(&session, "SET allow_ddl = 1");
    exec_ok(&session, "CREATE TABLE t (a UInt8)");
    exec_ok(&session, "SET readonly = 1");
    assert_readonly(session.execute_sql("OPTIMIZE TABLE t"), ReadOnlyReason::Session);
    let exists = exec_ok(&session, "EXISTS t");
    assert_eq!(exists.first_value(), Some(&Value::Int64(1)));
}

#[test]
fn test_gated_set_matches_dispatch_table() {
    let gated: Vec<StatementKind> = StatementKind::ALL
        .into_iter()
        .filter(|k| dispatch_entry(*k).policy == sqlgate::AccessPolicy::Gated)
        .collect();
    assert_eq!(gated.len(), GATED.len());
}

mod properties {
    use proptest::prelude::*;
    use sqlgate::{AccessError, Error, ReadOnlyReason, ReadonlyLevel, Settings};

    use crate::common::session_with_setup;

    fn any_level() -> impl Strategy<Value = ReadonlyLevel> {
        prop_oneof![
            Just(ReadonlyLevel::Disabled),
            Just(ReadonlyLevel::Absolute),
            Just(ReadonlyLevel::AllowSettings),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_optimize_follows_gate_precedence(level in any_level(), allow_ddl in any::<bool>()) {
            let session = session_with_setup(
                "CREATE TABLE t (a UInt8)",
                Settings::default().with_readonly(level).with_allow_ddl(allow_ddl),
            );
            let result = session.execute_sql("OPTIMIZE TABLE t");
            match (level.is_readonly(), allow_ddl) {
                (true, _) => prop_assert_eq!(
                    result.err(),
                    Some(Error::Access(AccessError::readonly(ReadOnlyReason::Session)))
                ),
                (false, false) => prop_assert_eq!(
                    result.err(),
                    Some(Error::Access(AccessError::DdlProhibited))
                ),
                (false, true) => prop_assert!(result.is_ok()),
            }
        }
    }
}
