pub mod deployment_log;
pub mod environment;
pub mod release;
pub mod user;

use std::error::Error;

use async_trait::async_trait;
pub use sea_orm::{
    sea_query, ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, Database,
    DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, QueryTrait, Select, StatementBuilder, TransactionError, TransactionTrait,
    TryGetableMany,
};
pub use time::{OffsetDateTime, PrimitiveDateTime};

use time::Duration;

pub trait TransactionErrorExt<T, E> {
    /// Convert transaction [`Result`] into a [`Result`] with
    /// a custom error.
    fn into_raw_result(self) -> Result<T, E>;
}

impl<T, E> TransactionErrorExt<T, E> for Result<T, TransactionError<E>>
where
    E: Error + From<DbErr>,
{
    fn into_raw_result(self) -> Result<T, E> {
        match self {
            Ok(val) => Ok(val),
            Err(TransactionError::Connection(err)) => Err(err.into()),
            Err(TransactionError::Transaction(err)) => Err(err),
        }
    }
}

#[async_trait]
pub trait SelectExt {
    /// Check if at least one record that satisfies a query.
    async fn exists<C: ConnectionTrait + Send>(self, db: &C) -> Result<bool, DbErr>;
}

#[async_trait]
impl<T> SelectExt for T
where
    T: QueryTrait<QueryStatement = sea_query::SelectStatement> + Send,
{
    async fn exists<C: ConnectionTrait + Send>(self, db: &C) -> Result<bool, DbErr> {
        use sea_query::{Expr, Query};

        let mut query = self.into_query();

        // Fix failing tests with SQLite by returning at least some expr
        query.expr(1);

        let stmt = StatementBuilder::build(
            Query::select().expr(Expr::exists(query)),
            &db.get_database_backend(),
        );

        db.query_one(stmt)
            .await?
            .ok_or_else(|| DbErr::Custom(String::from("exists query returned no rows")))?
            .try_get_by_index(0)
    }
}

/// Get the current UTC time as stored in timestamp columns.
///
/// Stored timestamps have a whole-second precision, so that records created
/// at the same instant compare equal with values passed in as unix timestamps.
pub fn current_timestamp() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();
    let now = now - Duration::nanoseconds(now.nanosecond().into());

    PrimitiveDateTime::new(now.date(), now.time())
}

/// Convert a unix timestamp into a value comparable with timestamp columns.
pub fn timestamp_from_unix(timestamp: i64) -> Option<PrimitiveDateTime> {
    let value = OffsetDateTime::from_unix_timestamp(timestamp).ok()?;

    Some(PrimitiveDateTime::new(value.date(), value.time()))
}
