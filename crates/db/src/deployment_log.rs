//! Deployment audit record.
//!
//! Deployment log records are historical facts: they are inserted once,
//! either directly or as a side effect of a release transition, and are
//! never updated afterwards. A record keeps pointing to the release
//! it was created for even if that release is later modified.

use sea_orm::entity::prelude::*;

use crate::environment::Environment;

/// Deployment log record model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "deployment_logs")]
pub struct Model {
    /// Unique deployment log identifier.
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Related release identifier.
    pub release_id: i64,

    /// Stage this deployment targeted.
    pub environment: Environment,

    /// Identifier of the user that performed the deployment.
    pub deployed_by: i64,

    /// Deployment time.
    pub deployment_timestamp: TimeDateTime,

    /// Whether the deployment succeeded.
    pub success: bool,

    /// Free-form notes.
    pub notes: Option<String>,
}

/// Deployment log record model relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::release::Entity",
        from = "Column::ReleaseId",
        to = "super::release::Column::Id"
    )]
    Release,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::DeployedBy",
        to = "super::user::Column::Id"
    )]
    DeployedBy,
}

impl Related<super::release::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Release.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeployedBy.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
