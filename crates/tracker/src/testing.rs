use std::sync::Arc;

use db::{
    current_timestamp, environment::Environment, release, user, ActiveValue, Database,
    DatabaseConnection, EntityTrait,
};
use migration::MigratorTrait;

pub(crate) async fn create_database() -> Arc<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("unable to create test database");

    migration::Migrator::up(&db, None)
        .await
        .expect("unable to run migrations");

    Arc::new(db)
}

pub(crate) async fn create_user(db: &DatabaseConnection, username: &str) -> user::Model {
    user::Entity::insert(user::ActiveModel {
        username: ActiveValue::Set(String::from(username)),
        email: ActiveValue::Set(format!("{username}@example.com")),
        full_name: ActiveValue::Set(String::from(username)),
        role: ActiveValue::Set(user::Role::Developer),
        created_at: ActiveValue::Set(current_timestamp()),
        ..Default::default()
    })
    .exec_with_returning(db)
    .await
    .expect("unable to create user")
}

pub(crate) async fn create_release(
    db: &DatabaseConnection,
    version_number: &str,
    owner_id: i64,
) -> release::Model {
    let now = current_timestamp();

    release::Entity::insert(release::ActiveModel {
        version_number: ActiveValue::Set(String::from(version_number)),
        description: ActiveValue::Set(format!("Release {version_number}")),
        owner_id: ActiveValue::Set(owner_id),
        current_environment: ActiveValue::Set(Environment::first()),
        created_at: ActiveValue::Set(now),
        updated_at: ActiveValue::Set(now),
        ..Default::default()
    })
    .exec_with_returning(db)
    .await
    .expect("unable to create release")
}
