//! User directory.

use std::sync::Arc;

use db::{
    current_timestamp, user, ActiveValue, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, SelectExt,
    TransactionErrorExt, TransactionTrait,
};
use derive_more::{Display, Error, From};
use tracing::info;

/// Errors that may occur during user directory operations.
#[derive(Debug, Display, From, Error)]
pub enum UserError {
    /// Database-related error.
    DatabaseError(DbErr),

    #[display(fmt = "user not found")]
    UserNotFound,

    #[display(fmt = "username already exists")]
    DuplicateUsername,

    #[display(fmt = "email already exists")]
    DuplicateEmail,
}

/// Editable user fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserDetails {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: user::Role,
}

/// Check if a user with the provided identifier exists.
pub(crate) async fn exists<C: ConnectionTrait + Send>(
    conn: &C,
    user_id: i64,
) -> Result<bool, DbErr> {
    user::Entity::find_by_id(user_id)
        .select_only()
        .exists(conn)
        .await
}

/// Check username and email uniqueness against every user other than `except`.
async fn check_unique<C: ConnectionTrait + Send>(
    conn: &C,
    details: &UserDetails,
    except: Option<i64>,
) -> Result<(), UserError> {
    let others = match except {
        Some(user_id) => Condition::all().add(user::Column::Id.ne(user_id)),
        None => Condition::all(),
    };

    let username_taken = user::Entity::find()
        .select_only()
        .filter(others.clone().add(user::Column::Username.eq(&*details.username)))
        .exists(conn)
        .await?;

    if username_taken {
        return Err(UserError::DuplicateUsername);
    }

    let email_taken = user::Entity::find()
        .select_only()
        .filter(others.add(user::Column::Email.eq(&*details.email)))
        .exists(conn)
        .await?;

    if email_taken {
        return Err(UserError::DuplicateEmail);
    }

    Ok(())
}

/// User directory handle.
#[derive(Clone)]
pub struct UserDirectory {
    db: Arc<DatabaseConnection>,
}

impl UserDirectory {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn create(&self, details: UserDetails) -> Result<user::Model, UserError> {
        self.db
            .transaction::<_, user::Model, UserError>(|txn| {
                Box::pin(async move {
                    check_unique(txn, &details, None).await?;

                    let model = user::Entity::insert(user::ActiveModel {
                        username: ActiveValue::Set(details.username),
                        email: ActiveValue::Set(details.email),
                        full_name: ActiveValue::Set(details.full_name),
                        role: ActiveValue::Set(details.role),
                        created_at: ActiveValue::Set(current_timestamp()),
                        ..Default::default()
                    })
                    .exec_with_returning(txn)
                    .await?;

                    info!(user_id = model.id, username = %model.username, "user created");

                    Ok(model)
                })
            })
            .await
            .into_raw_result()
    }

    pub async fn list_all(&self) -> Result<Vec<user::Model>, DbErr> {
        user::Entity::find()
            .order_by_asc(user::Column::Id)
            .all(&*self.db)
            .await
    }

    pub async fn list_by_role(&self, role: user::Role) -> Result<Vec<user::Model>, DbErr> {
        user::Entity::find()
            .filter(user::Column::Role.eq(role))
            .order_by_asc(user::Column::Id)
            .all(&*self.db)
            .await
    }

    pub async fn find_by_id(&self, user_id: i64) -> Result<Option<user::Model>, DbErr> {
        user::Entity::find_by_id(user_id).one(&*self.db).await
    }

    pub async fn get_by_id(&self, user_id: i64) -> Result<user::Model, UserError> {
        self.find_by_id(user_id)
            .await?
            .ok_or(UserError::UserNotFound)
    }

    pub async fn get_by_username(&self, username: &str) -> Result<user::Model, UserError> {
        user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&*self.db)
            .await?
            .ok_or(UserError::UserNotFound)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, DbErr> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&*self.db)
            .await
    }

    /// Overwrite all editable fields of an existing user.
    pub async fn update(
        &self,
        user_id: i64,
        details: UserDetails,
    ) -> Result<user::Model, UserError> {
        self.db
            .transaction::<_, user::Model, UserError>(|txn| {
                Box::pin(async move {
                    let user = user::Entity::find_by_id(user_id)
                        .lock_exclusive()
                        .one(txn)
                        .await?
                        .ok_or(UserError::UserNotFound)?;

                    check_unique(txn, &details, Some(user.id)).await?;

                    let mut active_model: user::ActiveModel = user.into();
                    active_model.username = ActiveValue::Set(details.username);
                    active_model.email = ActiveValue::Set(details.email);
                    active_model.full_name = ActiveValue::Set(details.full_name);
                    active_model.role = ActiveValue::Set(details.role);

                    let model = user::Entity::update(active_model).exec(txn).await?;

                    info!(user_id, "user updated");

                    Ok(model)
                })
            })
            .await
            .into_raw_result()
    }

    /// Delete a user.
    ///
    /// Users that own releases or are referenced by deployment log records
    /// can not be deleted, and the database rejects such requests.
    pub async fn delete(&self, user_id: i64) -> Result<(), UserError> {
        let result = user::Entity::delete_by_id(user_id).exec(&*self.db).await?;

        if result.rows_affected == 0 {
            return Err(UserError::UserNotFound);
        }

        info!(user_id, "user deleted");

        Ok(())
    }
}
