pub mod users;
pub mod addresses;
pub mod products;

use crate::error::{DatabaseError, Result};

/// Treats empty strings from forms as absent values
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

pub(crate) fn inserted_id(result: &sqlx::mysql::MySqlQueryResult) -> Result<i32> {
    i32::try_from(result.last_insert_id())
        .map_err(|_| DatabaseError::Other("Inserted id out of range".to_string()))
}
