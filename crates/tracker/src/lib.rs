//! Release lifecycle tracking.
//!
//! Releases move through the [`Environment`] ladder one stage at a time.
//! Every transition is performed by the [`ReleaseManager`], which changes
//! the release and appends a matching deployment log record as a single
//! unit of work. Deployment history can be queried and extended directly
//! with the [`DeploymentLogRecorder`], while [`UserDirectory`] provides
//! the identities releases and deployments are attributed to.
//!
//! [`Environment`]: db::environment::Environment

pub mod recorder;
pub mod releases;
pub mod users;

#[cfg(test)]
mod testing;

pub use recorder::{DeploymentLogRecorder, NewDeploymentLog};
pub use releases::{ReleaseDetails, ReleaseError, ReleaseManager, Transition};
pub use users::{UserDetails, UserDirectory, UserError};
