//! Rows returned from executed statements.

use crate::Value;
use std::collections::BTreeMap;

/// Column name to value map. Ordered so diagnostics and test output are stable.
pub type Row = BTreeMap<String, Value>;

/// Create a Row from key-value pairs.
///
/// # Example
/// ```
/// use tether_core::{row, Value};
/// let r = row! {
///     "id" => 1i64,
///     "name" => "alice",
/// };
/// assert_eq!(r.get("id"), Some(&Value::Int(1)));
/// ```
#[macro_export]
macro_rules! row {
    () => {
        $crate::Row::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        {
            let mut row = $crate::Row::new();
            $(
                row.insert($key.to_string(), $crate::Value::from($value));
            )+
            row
        }
    };
}
