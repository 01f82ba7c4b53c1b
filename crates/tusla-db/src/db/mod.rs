//! Database repositories for the data access layer
//!
//! Each repository owns the queries for a single table and maps driver
//! failures to `AppError`. Unique violations become `Conflict` so handlers
//! can surface them as HTTP 409 without inspecting sqlx internals.

pub mod category;
pub mod post;
pub mod post_image;
pub mod user;
pub mod volunteer;

pub use category::CategoryRepository;
pub use post::PostRepository;
pub use post_image::PostImageRepository;
pub use user::UserRepository;
pub use volunteer::PostVolunteerRepository;

use tusla_core::AppError;

// Postgres unique_violation
const UNIQUE_VIOLATION_CODE: &str = "23505";

/// Map a sqlx error to `Conflict` when it is a unique-constraint violation,
/// otherwise pass it through as a database error.
pub(crate) fn map_insert_error(err: sqlx::Error, conflict_message: &str) -> AppError {
    if is_unique_violation(&err) {
        AppError::Conflict(conflict_message.to_string())
    } else {
        AppError::Database(err)
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION_CODE)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_pass_through() {
        let err = map_insert_error(sqlx::Error::RowNotFound, "email already registered");
        assert!(matches!(err, AppError::Database(_)));

        let err = map_insert_error(sqlx::Error::PoolTimedOut, "email already registered");
        assert!(matches!(err, AppError::Database(_)));
    }
}
