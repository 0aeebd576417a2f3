mod handlers;
mod schema;
mod validation;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use aide::{
    axum::ApiRouter,
    openapi::{Info, OpenApi},
};
use axum::{Extension, Router, Server};
use common::{config::Config, logging};
use db::{Database, DatabaseConnection};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::new(None)?;

    logging::init(&config);

    let Some(server_config) = config.server.as_ref() else {
        return Err(anyhow::Error::msg("unable to load server config"));
    };

    info!("connecting to database");
    let database = Arc::new(Database::connect(&config.database.url).await?);

    info!(address = %server_config.address, "starting server");
    Server::bind(&server_config.address)
        .serve(app_router(database).into_make_service())
        .await?;

    Ok(())
}

fn app_router(database: Arc<DatabaseConnection>) -> Router {
    let mut api = OpenApi {
        info: Info {
            title: String::from("Release tracker"),
            description: Some(String::from(
                "Release promotion along the DEV, QA, UAT and PROD ladder with deployment history.",
            )),
            version: String::from(env!("CARGO_PKG_VERSION")),
            ..Info::default()
        },
        ..OpenApi::default()
    };

    let router = ApiRouter::new()
        .nest("/releases", handlers::releases::routes())
        .nest("/deploymentLogs", handlers::deployment_logs::routes())
        .nest("/users", handlers::users::routes())
        .nest("/docs", handlers::docs::routes())
        .finish_api(&mut api);

    router
        .layer(Extension(Arc::new(api)))
        .with_state(database)
}
