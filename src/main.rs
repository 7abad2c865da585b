use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use dotenvy::dotenv;
use std::sync::Arc;

mod api;
mod config;
mod db;
mod docs;
mod finalize;
mod model;
mod routes;
mod store;

use config::Config;
use db::init_db;

use crate::docs::ApiDoc;
use crate::finalize::clock::{Clock, SystemClock};
use crate::finalize::{FinalizeEngine, FinalizeScheduler};
use crate::store::{
    OutboxNotifier, SqlAttendanceStore, SqlCalendarRules, SqlEmployeeDirectory, SqlLeaveLookup,
    SqlShiftResolver,
};
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Hello World!"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let pool = init_db(&config.database_url).await;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let records = Arc::new(SqlAttendanceStore::new(pool.clone()));
    let engine = Arc::new(FinalizeEngine::new(
        clock,
        Arc::new(SqlCalendarRules::new(pool.clone())),
        Arc::new(SqlLeaveLookup::new(pool.clone())),
        Arc::new(SqlEmployeeDirectory::new(pool.clone())),
        records.clone(),
        Arc::new(SqlShiftResolver::new(pool.clone())),
        Arc::new(OutboxNotifier::new(pool.clone())),
        config.shift_end_buffer_minutes,
    ));

    // Recurring finalization job; also reachable on demand through the
    // /attendance/finalize endpoints.
    let scheduler = FinalizeScheduler::new(engine.clone(), config.finalize_interval_minutes).start();

    let engine_data = Data::from(engine);
    let store_data = Data::from(records);
    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(engine_data.clone())
            .app_data(store_data.clone())
            .service(index)
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(server_addr)?
    .run()
    .await?;

    scheduler.stop();
    Ok(())
}
