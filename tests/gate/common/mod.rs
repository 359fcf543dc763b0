pub use sqlgate_test_utils::*;

/// Compares a result's rows against literal rows of `Value`-convertible cells.
#[macro_export]
macro_rules! assert_rows {
    ($result:expr, []) => {
        assert!($result.rows.is_empty(), "expected no rows, got {:?}", $result.rows);
    };
    ($result:expr, [$([$($cell:expr),* $(,)?]),+ $(,)?]) => {{
        let expected: Vec<Vec<sqlgate::Value>> = vec![$(vec![$(sqlgate::Value::from($cell)),*]),+];
        assert_eq!($result.rows, expected);
    }};
}
