//! Session constructors and assertions shared by the sqlgate integration tests.

use sqlgate::{
    AccessError, ClientInfo, Error, HttpMethod, QueryResult, ReadOnlyReason, ReadonlyLevel,
    Result, Session, Settings, Value,
};

pub fn unrestricted_session() -> Session {
    Session::default()
}

pub fn readonly_session(level: ReadonlyLevel) -> Session {
    Session::new(Settings::default().with_readonly(level))
}

pub fn no_ddl_session() -> Session {
    Session::new(Settings::default().with_allow_ddl(false))
}

/// HTTP GET connections are forced to `readonly = 2`.
pub fn http_get_session() -> Session {
    Session::with_client(
        Settings::default().with_readonly(ReadonlyLevel::AllowSettings),
        ClientInfo::http(HttpMethod::Get, "web"),
    )
}

/// Runs `setup` on an unrestricted session, then tightens the settings.
pub fn session_with_setup(setup: &str, settings: Settings) -> Session {
    let session = Session::default();
    if let Err(e) = session.execute_sql(setup) {
        panic!("setup failed: {}\nSQL: {}", e, setup);
    }
    let applied = session.context().update_settings(|current| {
        *current = settings;
        Ok(())
    });
    if let Err(e) = applied {
        panic!("failed to apply settings: {}", e);
    }
    session
}

pub fn exec_ok(session: &Session, sql: &str) -> QueryResult {
    match session.execute_sql(sql) {
        Ok(result) => result,
        Err(e) => panic!("Query failed: {}\nSQL: {}", e, sql),
    }
}

pub fn exec_err(session: &Session, sql: &str) -> Error {
    match session.execute_sql(sql) {
        Ok(result) => panic!("Expected error, got {:?}\nSQL: {}", result, sql),
        Err(e) => e,
    }
}

pub fn assert_readonly(result: Result<QueryResult>, expected: ReadOnlyReason) {
    match result {
        Err(Error::Access(AccessError::ReadOnly { reason })) => assert_eq!(reason, expected),
        other => panic!("Expected readonly ({:?}), got {:?}", expected, other),
    }
}

/// Statement-level readonly rejection raised by the handler itself.
pub fn assert_readonly_statement(result: Result<QueryResult>) {
    match result {
        Err(Error::Access(AccessError::ReadOnly {
            reason: ReadOnlyReason::Statement(_),
        })) => {}
        other => panic!("Expected statement readonly error, got {:?}", other),
    }
}

pub fn assert_ddl_prohibited(result: Result<QueryResult>) {
    match result {
        Err(Error::Access(AccessError::DdlProhibited)) => {}
        other => panic!("Expected DdlProhibited, got {:?}", other),
    }
}

pub fn assert_single_value(result: &QueryResult, expected: Value) {
    assert_eq!(result.row_count(), 1, "expected exactly one row");
    assert_eq!(result.first_value(), Some(&expected));
}

pub fn column_values(result: &QueryResult, column: &str) -> Vec<Value> {
    (0..result.row_count())
        .filter_map(|row| result.get_by_name(row, column).cloned())
        .collect()
}
