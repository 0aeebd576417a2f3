//! Versioned deliverable tracked through the environment ladder.
//!
//! A release is created at [`Environment::first`] and only ever changes
//! its [`Model::current_environment`] through promotion or rollback,
//! each of which is accompanied by a [`deployment_log`] record.
//!
//! [`Environment::first`]: crate::environment::Environment::first
//! [`deployment_log`]: super::deployment_log

use sea_orm::entity::prelude::*;

use crate::environment::Environment;

/// Release model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "releases")]
pub struct Model {
    /// Unique release identifier.
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Semantic version string, unique across all releases.
    #[sea_orm(unique)]
    pub version_number: String,

    /// Release description.
    pub description: String,

    /// Owning user identifier.
    pub owner_id: i64,

    /// Stage the release is currently deployed to.
    pub current_environment: Environment,

    /// Release creation timestamp.
    pub created_at: TimeDateTime,

    /// Timestamp of the latest modification.
    pub updated_at: TimeDateTime,
}

/// Release model relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id"
    )]
    Owner,

    #[sea_orm(has_many = "super::deployment_log::Entity")]
    DeploymentLogs,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::deployment_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeploymentLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
