use leavegate_core::domain::leave::parse_iso_date;
use leavegate_core::errors::StoreError;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use thiserror::Error;

pub mod leave;

pub use leave::SqlLeaveStore;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<RepositoryError> for StoreError {
    fn from(error: RepositoryError) -> Self {
        StoreError::DataAccess(error.to_string())
    }
}

fn column<'r, T>(row: &'r SqliteRow, name: &str) -> Result<T, RepositoryError>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(name).map_err(|e| RepositoryError::Decode(e.to_string()))
}

fn date_column(row: &SqliteRow, name: &'static str) -> Result<chrono::NaiveDate, RepositoryError> {
    let raw: String = column(row, name)?;
    parse_iso_date(name, &raw).map_err(|e| RepositoryError::Decode(e.to_string()))
}

fn count_column(row: &SqliteRow, name: &str) -> Result<u32, RepositoryError> {
    let value: i64 = column(row, name)?;
    u32::try_from(value)
        .map_err(|_| RepositoryError::Decode(format!("{name} out of range: {value}")))
}
