use std::sync::Arc;

use sqlgate::{Context, ProfileCounters, ProfileEvent, Session, Settings};

use crate::common::{exec_err, exec_ok};

fn counted_session(settings: Settings) -> (Session, Arc<ProfileCounters>) {
    let counters = Arc::new(ProfileCounters::new());
    let context = Context::new(settings).with_profile_events(counters.clone());
    (Session::with_context(Arc::new(context)), counters)
}

#[test]
fn test_statement_counters() {
    let (session, counters) = counted_session(Settings::default());
    exec_ok(
        &session,
        "CREATE TABLE t (a UInt8); INSERT INTO t VALUES (1); INSERT INTO t VALUES (2); SELECT a FROM t; SHOW TABLES",
    );

    assert_eq!(counters.get(ProfileEvent::Query), 5);
    assert_eq!(counters.get(ProfileEvent::InsertQuery), 2);
    assert_eq!(counters.get(ProfileEvent::SelectQuery), 1);
}

#[test]
fn test_rejected_and_unrecognized_statements_still_count() {
    let (session, counters) = counted_session(Settings::readonly());
    exec_err(&session, "OPTIMIZE TABLE t");
    exec_err(&session, "WATCH live_view");
    // self-gated: constructed, then rejected on execute
    exec_err(&session, "INSERT INTO t VALUES (1)");

    assert_eq!(counters.get(ProfileEvent::Query), 3);
    assert_eq!(counters.get(ProfileEvent::InsertQuery), 1);
    assert_eq!(counters.get(ProfileEvent::SelectQuery), 0);

    let snapshot = counters.snapshot();
    assert_eq!(snapshot.get("statements_total"), Some(&3));
}
