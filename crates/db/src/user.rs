//! Directory user.
//!
//! Users own releases and are credited as actors of deployment log entries.
//! Both usernames and email addresses are unique across the directory.

use schemars::JsonSchema;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub created_at: TimeDateTime,
}

/// User role within the organization.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[sea_orm(string_value = "DEVELOPER")]
    Developer,
    #[sea_orm(string_value = "QA")]
    Qa,
    #[sea_orm(string_value = "ADMIN")]
    Admin,
}

/// User model relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::release::Entity")]
    Releases,

    #[sea_orm(has_many = "super::deployment_log::Entity")]
    DeploymentLogs,
}

impl Related<super::release::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Releases.def()
    }
}

impl Related<super::deployment_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeploymentLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
