/// Deployment log routes.
pub(crate) mod deployment_logs;

/// API documentation routes.
pub(crate) mod docs;

/// Release lifecycle routes.
pub(crate) mod releases;

/// User directory routes.
pub(crate) mod users;
