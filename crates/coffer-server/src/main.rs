//! Main entry point for the Coffer custody server.

use actix_web::{App, HttpServer, middleware, web};
use coffer_server::{api, config::Configuration, model::common::AppState, startup};
use tracing::info;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let configuration = Configuration::new()?;

    let _logging_guard = startup::init_logging(&configuration.logging_config())?;

    let metrics = if configuration.metrics_enabled() {
        startup::init_metrics()
    } else {
        None
    };

    let state = AppState::from_configuration(&configuration)?.with_metrics(metrics);
    let app_data = web::Data::new(state);

    let address = configuration.server_address();
    let port = configuration.server_port();

    info!(
        custodian = %app_data.ledger.custodian(),
        holding_duration_secs = app_data.ledger.holding_duration(),
        registries = app_data.catalog.addresses().len(),
        "Starting custody server on {}:{}",
        address,
        port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(app_data.clone())
            .wrap(middleware::Logger::default())
            .configure(api::route::configure)
    })
    .bind((address.as_str(), port))?
    .run()
    .await?;

    Ok(())
}
