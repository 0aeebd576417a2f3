use std::{error::Error, sync::Arc};

use axum::async_trait;
use db::{user, Database, DatabaseConnection};
use hyper::body::{self, Bytes, HttpBody};
use migration::MigratorTrait;
use serde::Serialize;
use tracker::{UserDetails, UserDirectory};

pub(crate) async fn create_database() -> Arc<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("unable to create test database");

    migration::Migrator::up(&db, None)
        .await
        .expect("unable to run migrations");

    Arc::new(db)
}

pub(crate) async fn create_user(db: &Arc<DatabaseConnection>, username: &str) -> user::Model {
    UserDirectory::new(db.clone())
        .create(UserDetails {
            username: String::from(username),
            email: format!("{username}@example.com"),
            full_name: String::from(username),
            role: user::Role::Developer,
        })
        .await
        .expect("unable to create user")
}

pub(crate) trait RequestBodyExt: Sized {
    fn from_json<B: Serialize>(val: B) -> Self;
}

impl<T> RequestBodyExt for T
where
    T: HttpBody + From<Vec<u8>>,
{
    fn from_json<B: Serialize>(val: B) -> Self {
        T::from(serde_json::to_vec(&val).expect("unable to serialize"))
    }
}

#[async_trait(?Send)]
pub(crate) trait ResponseBodyExt {
    async fn bytes(self) -> Bytes;

    async fn json(self) -> serde_json::Value;
}

#[async_trait(?Send)]
impl<T> ResponseBodyExt for T
where
    T: HttpBody,
    T::Error: Error,
{
    async fn bytes(self) -> Bytes {
        body::to_bytes(self)
            .await
            .expect("unable to convert to bytes")
    }

    async fn json(self) -> serde_json::Value {
        serde_json::from_slice(&self.bytes().await).expect("unable to convert to json")
    }
}
