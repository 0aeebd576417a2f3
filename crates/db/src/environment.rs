//! Deployment environment ladder.
//!
//! Every release occupies exactly one [`Environment`] at a time and moves
//! along the ladder one stage at a time, either forward (promotion) or
//! backward (rollback). The ladder ends are reported as [`None`] rather
//! than as an error, since reaching them is an expected outcome.

use schemars::JsonSchema;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Deployment stage.
///
/// Variant declaration order is the ladder order, so the derived [`Ord`]
/// implementation matches `DEV < QA < UAT < PROD`.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(8))")]
#[serde(rename_all = "UPPERCASE")]
pub enum Environment {
    #[sea_orm(string_value = "DEV")]
    Dev,
    #[sea_orm(string_value = "QA")]
    Qa,
    #[sea_orm(string_value = "UAT")]
    Uat,
    #[sea_orm(string_value = "PROD")]
    Prod,
}

impl Environment {
    /// All stages, in promotion order.
    pub const LADDER: [Environment; 4] = [
        Environment::Dev,
        Environment::Qa,
        Environment::Uat,
        Environment::Prod,
    ];

    /// Stage every new release starts at.
    pub const fn first() -> Self {
        Environment::Dev
    }

    /// Stage that can not be promoted any further.
    pub const fn last() -> Self {
        Environment::Prod
    }

    const fn position(self) -> usize {
        match self {
            Environment::Dev => 0,
            Environment::Qa => 1,
            Environment::Uat => 2,
            Environment::Prod => 3,
        }
    }

    /// Get the stage a release is promoted to, if any.
    pub fn next(self) -> Option<Self> {
        Self::LADDER.get(self.position() + 1).copied()
    }

    /// Get the stage a release is rolled back to, if any.
    pub fn previous(self) -> Option<Self> {
        self.position()
            .checked_sub(1)
            .and_then(|position| Self::LADDER.get(position).copied())
    }

    /// Human-readable stage name.
    pub fn display_name(self) -> &'static str {
        match self {
            Environment::Dev => "Development",
            Environment::Qa => "Quality Assurance",
            Environment::Uat => "User Acceptance Testing",
            Environment::Prod => "Production",
        }
    }

    /// Short stage name, as stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Dev => "DEV",
            Environment::Qa => "QA",
            Environment::Uat => "UAT",
            Environment::Prod => "PROD",
        }
    }
}
